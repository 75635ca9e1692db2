// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Climingo shell — the JS↔native message bridge.
//
// The hosted page posts named messages through the webview's IPC channel;
// the dispatcher routes them to handlers, which drive the native capability
// traits and report outcomes back by injecting calls to the page's global
// callback functions.

pub mod callbacks;
pub mod dialog;
pub mod dispatch;
pub mod download;
pub mod fetch;
pub mod inject;
pub mod share;
