// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Hidden developer mode — a tap-gated, password-gated environment switcher.
//
// Seven taps on an invisible hotspot arm a password prompt; the correct
// secret reveals the environment picker. Selecting an environment persists
// the base URL and the shell reloads the render surface in place (a fresh
// process start honours the persisted URL the same way).

use climingo_core::messages;
use climingo_core::types::Environment;
use climingo_platform::traits::NativeDialogs;
use tracing::{info, warn};

use crate::services::app_services::AppServices;

/// Taps required on the hotspot before the password prompt appears.
const REQUIRED_TAPS: u32 = 7;

/// Fixed developer-mode secret.
const DEV_MODE_PASSWORD: &str = "climingo-dev!";

/// Hotspot edge length in logical px, anchored to the window's top-right
/// corner. Taps inside it never reach the page.
pub const HOTSPOT_SIZE: f64 = 64.0;

/// Developer-mode lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevModeState {
    /// Counting hotspot taps.
    Locked,
    /// Seven taps seen; waiting for the secret.
    PromptingPassword,
    /// Secret accepted; the switcher is revealed.
    Unlocked,
}

/// Outcome of a password submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordOutcome {
    Unlocked,
    Rejected,
}

/// The tap/password state machine, kept free of dialog and persistence
/// concerns so it can be tested directly.
#[derive(Debug)]
pub struct DeveloperMode {
    state: DevModeState,
    tap_count: u32,
}

impl DeveloperMode {
    pub fn new() -> Self {
        Self {
            state: DevModeState::Locked,
            tap_count: 0,
        }
    }

    pub fn state(&self) -> DevModeState {
        self.state
    }

    pub fn tap_count(&self) -> u32 {
        self.tap_count
    }

    /// Register one tap on the hotspot. Returns true when the tap arms the
    /// password prompt (the counter resets on the transition).
    pub fn register_tap(&mut self) -> bool {
        if self.state != DevModeState::Locked {
            return false;
        }
        self.tap_count += 1;
        if self.tap_count >= REQUIRED_TAPS {
            self.tap_count = 0;
            self.state = DevModeState::PromptingPassword;
            return true;
        }
        false
    }

    /// Check a submitted password. A mismatch re-locks; the caller shows
    /// the error dialog.
    pub fn submit_password(&mut self, password: &str) -> PasswordOutcome {
        if self.state != DevModeState::PromptingPassword {
            return PasswordOutcome::Rejected;
        }
        if password == DEV_MODE_PASSWORD {
            self.state = DevModeState::Unlocked;
            PasswordOutcome::Unlocked
        } else {
            self.state = DevModeState::Locked;
            PasswordOutcome::Rejected
        }
    }

    /// Abandon the password prompt without submitting.
    pub fn cancel_prompt(&mut self) {
        if self.state == DevModeState::PromptingPassword {
            self.state = DevModeState::Locked;
        }
    }
}

impl Default for DeveloperMode {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a tap at (`x`, `y`) lands inside the hotspot of a window
/// `window_width` logical px wide.
pub fn hotspot_contains(window_width: f64, x: f64, y: f64) -> bool {
    x >= (window_width - HOTSPOT_SIZE).max(0.0) && y <= HOTSPOT_SIZE
}

/// Drive one hotspot tap through the unlock/switch flow.
///
/// Returns the environment to reload when the user picked one. While
/// unlocked, a single tap re-opens the picker.
pub fn handle_hotspot_tap(
    mode: &mut DeveloperMode,
    dialogs: &dyn NativeDialogs,
    services: &AppServices,
) -> Option<Environment> {
    if mode.state() == DevModeState::Unlocked {
        return pick_and_persist(dialogs, services);
    }

    if !mode.register_tap() {
        return None;
    }

    let password = match dialogs.prompt_password(&messages::devmode_prompt_title()) {
        Ok(Some(password)) => password,
        Ok(None) => {
            mode.cancel_prompt();
            return None;
        }
        Err(err) => {
            warn!(error = %err, "password prompt unavailable");
            mode.cancel_prompt();
            return None;
        }
    };

    match mode.submit_password(&password) {
        PasswordOutcome::Unlocked => {
            info!("developer mode unlocked");
            pick_and_persist(dialogs, services)
        }
        PasswordOutcome::Rejected => {
            if let Err(err) = dialogs.present_alert(&messages::devmode_wrong_password()) {
                warn!(error = %err, "could not present password-mismatch alert");
            }
            None
        }
    }
}

fn pick_and_persist(dialogs: &dyn NativeDialogs, services: &AppServices) -> Option<Environment> {
    let current = services
        .config()
        .environment()
        .unwrap_or(Environment::Production);
    let picked = match dialogs.pick_environment(current) {
        Ok(env) => env?,
        Err(err) => {
            warn!(error = %err, "environment picker unavailable");
            return None;
        }
    };
    if let Err(err) = services.switch_environment(picked) {
        // The switch still applies for this session; only durability failed.
        warn!(error = %err, "failed to persist environment change");
    }
    Some(picked)
}
