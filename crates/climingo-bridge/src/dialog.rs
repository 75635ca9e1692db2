// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Dialog adapter — surfaces page-triggered alert/confirm calls as native
// modals and resumes the page's blocked script with the user's choice.

use std::sync::Arc;

use climingo_platform::traits::{ConfirmChoice, NativeDialogs};
use tracing::warn;

/// A dialog event raised by the render surface.
///
/// The render surface blocks the page's script until `resume` runs; the
/// adapter guarantees exactly one resume per event, on exactly one user
/// action — including non-button dismissal, which counts as cancel.
pub enum DialogRequest {
    Alert {
        message: String,
        resume: Box<dyn FnOnce() + Send>,
    },
    Confirm {
        message: String,
        resume: Box<dyn FnOnce(bool) + Send>,
    },
}

/// Presents render-surface dialog events as native modals.
pub struct DialogAdapter {
    dialogs: Arc<dyn NativeDialogs>,
}

impl DialogAdapter {
    pub fn new(dialogs: Arc<dyn NativeDialogs>) -> Self {
        Self { dialogs }
    }

    /// Present one dialog event and resume the page.
    ///
    /// If the modal cannot be presented at all (no active window), the
    /// resume callback is dropped — the page's blocking call appears to
    /// hang, which is the accepted degradation.
    pub fn handle(&self, request: DialogRequest) {
        match request {
            DialogRequest::Alert { message, resume } => {
                match self.dialogs.present_alert(&message) {
                    Ok(()) => resume(),
                    Err(err) => {
                        warn!(error = %err, "alert could not be presented; resume dropped");
                    }
                }
            }
            DialogRequest::Confirm { message, resume } => {
                match self.dialogs.present_confirm(&message) {
                    Ok(choice) => resume(matches!(choice, ConfirmChoice::Confirmed)),
                    Err(err) => {
                        warn!(error = %err, "confirm could not be presented; resume dropped");
                    }
                }
            }
        }
    }
}
