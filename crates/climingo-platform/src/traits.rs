// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for native capabilities.
//
// The bridge handlers and the developer-mode flow only ever talk to these
// traits, so the whole message bridge is testable without a real render
// surface or OS permission system.

use climingo_core::error::Result;
use climingo_core::types::Environment;

/// Unified bridge that groups all native capabilities.
pub trait PlatformBridge: NativeShareSheet + NativePhotoLibrary + NativeDialogs {
    /// Human-readable platform name (e.g. "iOS", "Android").
    fn platform_name(&self) -> &str;
}

/// Completion callback for a share-sheet presentation.
///
/// Invoked exactly once, after the user picks a target app, cancels, or the
/// OS reports an error.
pub type ShareCompletionHandler = Box<dyn FnOnce(ShareCompletion) + Send + 'static>;

/// Present the OS share sheet.
pub trait NativeShareSheet: Send + Sync {
    /// Present the share sheet for the given items.
    ///
    /// `anchor` positions the popover on tablet-style devices. When `None`,
    /// implementations must still present from the root surface with a
    /// degenerate anchor rectangle — the sheet is never skipped.
    ///
    /// Returns `Ok(())` once the sheet is presented; the outcome arrives
    /// later through `on_complete`. On `Err`, `on_complete` is never called.
    fn present_share_sheet(
        &self,
        items: &[String],
        anchor: Option<AnchorRect>,
        on_complete: ShareCompletionHandler,
    ) -> Result<()>;
}

/// Write images into the device photo album.
pub trait NativePhotoLibrary: Send + Sync {
    /// Request add-to-album authorization. May prompt the user; blocks the
    /// calling (non-UI) thread until the status is resolved.
    fn request_add_authorization(&self) -> Result<PhotoAuthorization>;

    /// Persist encoded image bytes into the photo album.
    fn save_to_album(&self, bytes: &[u8]) -> Result<()>;
}

/// Present native modal dialogs.
pub trait NativeDialogs: Send + Sync {
    /// One-button informational modal. Returns once dismissed.
    fn present_alert(&self, message: &str) -> Result<()>;

    /// Two-button confirm modal. Returns the user's choice, including
    /// non-button dismissal (back gesture, sheet swipe).
    fn present_confirm(&self, message: &str) -> Result<ConfirmChoice>;

    /// Modal with a secure text field. Returns `None` when cancelled.
    fn prompt_password(&self, title: &str) -> Result<Option<String>>;

    /// Environment switcher. Returns `None` when dismissed without a choice.
    fn pick_environment(&self, current: Environment) -> Result<Option<Environment>>;
}

// ---------------------------------------------------------------------------
// Info structs
// ---------------------------------------------------------------------------

/// Raw share-sheet completion as reported by the OS.
#[derive(Debug, Clone, Default)]
pub struct ShareCompletion {
    /// Whether the share action ran to completion.
    pub completed: bool,
    /// OS activity-type identifier of the chosen target, if reported.
    pub activity_type: Option<String>,
    /// OS error description, if the share failed.
    pub error: Option<String>,
}

/// Photo-library authorization status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoAuthorization {
    Authorized,
    /// User granted access to a limited selection (treated like full access
    /// for add-only writes).
    Limited,
    Denied,
    Restricted,
    NotDetermined,
    /// A status value this build does not recognise.
    Unknown(i32),
}

/// User's choice on a confirm modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmChoice {
    Confirmed,
    Cancelled,
    /// Modal left without pressing either button.
    Dismissed,
}

/// Popover anchor in the root surface's coordinate space (logical points).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl AnchorRect {
    /// Zero-size anchor at the given point — the fallback when no real
    /// anchor was computed.
    pub fn degenerate(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            width: 0.0,
            height: 0.0,
        }
    }
}
