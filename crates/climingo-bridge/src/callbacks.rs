// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Script builders for the page-side callback functions.
//
// The hosted page may define any of `onShareStart`, `onShareComplete`,
// `onImageDownloadStart`, `onImageDownloadComplete` as globals. Every
// snippet guards on `typeof` so pages that define none of them are
// unaffected.

use climingo_core::types::{DownloadOutcome, ShareOutcome};

fn guarded_call(name: &str, args: &str) -> String {
    format!("if (typeof {name} === 'function') {{ {name}({args}); }}")
}

pub fn share_start() -> String {
    guarded_call("onShareStart", "")
}

pub fn share_complete(outcome: &ShareOutcome) -> String {
    let json = serde_json::to_string(outcome).unwrap_or_else(|_| "{}".to_owned());
    guarded_call("onShareComplete", &json)
}

pub fn download_start() -> String {
    guarded_call("onImageDownloadStart", "")
}

pub fn download_complete(outcome: &DownloadOutcome) -> String {
    let json = serde_json::to_string(outcome).unwrap_or_else(|_| "{}".to_owned());
    guarded_call("onImageDownloadComplete", &json)
}
