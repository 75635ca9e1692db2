// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Headless fallback for targets without an embedded webview backend.
//
// The bridge, platform, and service crates all build and test here; only
// the windowed surface is missing.

use climingo_core::error::Result;
use tracing::error;

use crate::services::app_services::AppServices;

pub fn run(services: AppServices) -> Result<()> {
    error!(
        base_url = %services.base_url(),
        "no embedded webview backend for this target; the Climingo shell runs on iOS, Android, macOS, and Windows"
    );
    Ok(())
}
