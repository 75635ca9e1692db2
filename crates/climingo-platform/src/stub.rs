// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for desktop/CI builds where native mobile APIs are unavailable.
//
// Dialogs are backed by `rfd` so the developer-mode flow can be exercised
// during desktop development; share sheet and photo library report
// `PlatformUnavailable` — real implementations live in the `ios` and
// `android` modules.

use climingo_core::error::{ClimingoError, Result};
use climingo_core::types::Environment;

use crate::traits::*;

/// Bridge returned on non-mobile platforms.
pub struct StubBridge;

impl StubBridge {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StubBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformBridge for StubBridge {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }
}

impl NativeShareSheet for StubBridge {
    fn present_share_sheet(
        &self,
        items: &[String],
        _anchor: Option<AnchorRect>,
        _on_complete: ShareCompletionHandler,
    ) -> Result<()> {
        tracing::warn!(
            items = items.len(),
            "NativeShareSheet::present_share_sheet called on stub bridge"
        );
        Err(ClimingoError::PlatformUnavailable)
    }
}

impl NativePhotoLibrary for StubBridge {
    fn request_add_authorization(&self) -> Result<PhotoAuthorization> {
        tracing::warn!("NativePhotoLibrary::request_add_authorization called on stub bridge");
        Err(ClimingoError::PlatformUnavailable)
    }

    fn save_to_album(&self, _bytes: &[u8]) -> Result<()> {
        Err(ClimingoError::PlatformUnavailable)
    }
}

impl NativeDialogs for StubBridge {
    fn present_alert(&self, message: &str) -> Result<()> {
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Info)
            .set_title("Climingo")
            .set_description(message)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
        Ok(())
    }

    fn present_confirm(&self, message: &str) -> Result<ConfirmChoice> {
        let result = rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Info)
            .set_title("Climingo")
            .set_description(message)
            .set_buttons(rfd::MessageButtons::OkCancel)
            .show();
        Ok(match result {
            rfd::MessageDialogResult::Ok => ConfirmChoice::Confirmed,
            rfd::MessageDialogResult::Cancel => ConfirmChoice::Cancelled,
            _ => ConfirmChoice::Dismissed,
        })
    }

    fn prompt_password(&self, _title: &str) -> Result<Option<String>> {
        // rfd has no text-input dialog; desktop builds cannot unlock
        // developer mode interactively.
        tracing::warn!("NativeDialogs::prompt_password called on stub bridge");
        Err(ClimingoError::PlatformUnavailable)
    }

    fn pick_environment(&self, current: Environment) -> Result<Option<Environment>> {
        let result = rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Info)
            .set_title("Developer Mode")
            .set_description(format!("현재 환경: {}", current.label()))
            .set_buttons(rfd::MessageButtons::YesNoCancelCustom(
                Environment::Dev.label().to_owned(),
                Environment::Staging.label().to_owned(),
                Environment::Production.label().to_owned(),
            ))
            .show();
        let rfd::MessageDialogResult::Custom(label) = result else {
            return Ok(None);
        };
        Ok(Environment::ALL.into_iter().find(|env| env.label() == label))
    }
}
