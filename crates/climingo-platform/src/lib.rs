// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Climingo shell — native platform bridge abstractions.
//
// Defines the capability traits the bridge handlers and the developer-mode
// flow are written against, plus the per-OS implementations: iOS through
// objc2 message sends, Android through JNI, and a desktop stub for
// development and CI builds.

use std::sync::Arc;

pub mod traits;

#[cfg(target_os = "ios")]
pub mod ios;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(not(any(target_os = "ios", target_os = "android")))]
pub mod stub;

/// Concrete bridge type for the target operating system.
#[cfg(target_os = "ios")]
pub type ActiveBridge = ios::IosBridge;

/// Concrete bridge type for the target operating system.
#[cfg(target_os = "android")]
pub type ActiveBridge = android::AndroidBridge;

/// Concrete bridge type for the target operating system.
#[cfg(not(any(target_os = "ios", target_os = "android")))]
pub type ActiveBridge = stub::StubBridge;

/// The bridge implementation for the target operating system.
///
/// Returned as the concrete per-platform type so callers can coerce the
/// same instance into each capability trait they need (`NativeShareSheet`,
/// `NativePhotoLibrary`, `NativeDialogs`).
pub fn platform_bridge() -> Arc<ActiveBridge> {
    Arc::new(ActiveBridge::new())
}
