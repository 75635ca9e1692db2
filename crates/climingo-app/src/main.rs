// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Climingo — native shell for the Climingo web app.
//
// Entry point. Initialises logging, the persisted configuration, and the
// tokio task pool, then hands off to the windowed shell.

mod devmode;
mod services;

#[cfg(any(
    target_os = "ios",
    target_os = "android",
    target_os = "macos",
    target_os = "windows"
))]
mod shell;

#[cfg(not(any(
    target_os = "ios",
    target_os = "android",
    target_os = "macos",
    target_os = "windows"
)))]
#[path = "shell_headless.rs"]
mod shell;

use services::app_services::AppServices;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Climingo shell starting");

    let services = match AppServices::init() {
        Ok(services) => services,
        Err(err) => {
            tracing::error!(error = %err, "persistent storage failed — using in-memory fallback");
            AppServices::fallback()
        }
    };

    // Bridge handlers schedule their blocking work on this runtime; the
    // guard keeps the handle ambient for the shell's lifetime.
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            tracing::error!(error = %err, "failed to start the task pool");
            return;
        }
    };
    let _guard = runtime.enter();

    if let Err(err) = shell::run(services) {
        tracing::error!(error = %err, "shell terminated with error");
    }
}
