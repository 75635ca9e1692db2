// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge dispatcher — routes named page messages to registered handlers.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use climingo_core::error::ClimingoError;
use climingo_core::types::BridgeMessage;
use tracing::{debug, warn};

/// Executes a script inside the hosted page.
///
/// The shell's implementation marshals the script onto the UI event loop
/// before touching the webview; handlers therefore never need to know which
/// thread they run on.
pub trait ScriptEmitter: Send + Sync {
    fn emit_script(&self, script: String);
}

/// A handler's route back into the page.
///
/// Holds only a weak reference to the emitter owned by the shell event
/// loop. If the surface has been torn down by the time an asynchronous
/// handler finishes, evaluation silently no-ops instead of touching a dead
/// surface.
#[derive(Clone)]
pub struct PageHandle {
    emitter: Weak<dyn ScriptEmitter>,
}

impl PageHandle {
    pub fn new(emitter: &Arc<dyn ScriptEmitter>) -> Self {
        Self {
            emitter: Arc::downgrade(emitter),
        }
    }

    /// Run a script in the page, if the render surface is still alive.
    pub fn eval(&self, script: String) {
        match self.emitter.upgrade() {
            Some(emitter) => emitter.emit_script(script),
            None => debug!("render surface released; dropping script"),
        }
    }
}

/// One named bridge message handler.
///
/// `handle` must return promptly — long-running work (network, permission
/// prompts) is scheduled on the tokio blocking pool internally so the
/// calling render-surface thread is never blocked.
pub trait BridgeHandler: Send + Sync {
    /// Message name this handler is registered under.
    fn name(&self) -> &'static str;

    /// Handle one message body.
    fn handle(&self, body: serde_json::Value) -> climingo_core::error::Result<()>;

    /// Report a failure outcome for `err` to the page. Called by the
    /// dispatcher so handler errors surface the same way successes do.
    fn report_failure(&self, err: &ClimingoError);
}

/// Routes page messages to handlers by name.
///
/// Unregistered names are ignored without surfacing an error — the page may
/// target shell variants with more handlers than this one registers.
#[derive(Default)]
pub struct BridgeDispatcher {
    handlers: HashMap<&'static str, Arc<dyn BridgeHandler>>,
}

impl BridgeDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its own name. Re-registering a name
    /// replaces the previous handler.
    pub fn register(&mut self, handler: Arc<dyn BridgeHandler>) {
        let name = handler.name();
        if self.handlers.insert(name, handler).is_some() {
            warn!(name, "replaced an already-registered bridge handler");
        }
    }

    /// Registered message names, sorted for stable bootstrap scripts.
    pub fn registered_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Route one parsed message. Handler errors become page-visible failure
    /// outcomes and never propagate to the shell.
    pub fn dispatch(&self, message: BridgeMessage) {
        let Some(handler) = self.handlers.get(message.name.as_str()) else {
            debug!(name = %message.name, "no handler registered for bridge message");
            return;
        };
        if let Err(err) = handler.handle(message.body) {
            warn!(name = %message.name, error = %err, "bridge handler failed");
            handler.report_failure(&err);
        }
    }

    /// Route one raw IPC string as posted by the page. Unparseable input is
    /// logged and dropped.
    pub fn dispatch_raw(&self, raw: &str) {
        match BridgeMessage::parse(raw) {
            Ok(message) => self.dispatch(message),
            Err(err) => debug!(error = %err, "ignoring unparseable bridge message"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct RecordingHandler {
        name: &'static str,
        bodies: Mutex<Vec<serde_json::Value>>,
        failures: AtomicUsize,
        fail_with: Option<fn() -> ClimingoError>,
    }

    impl RecordingHandler {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                bodies: Mutex::new(Vec::new()),
                failures: AtomicUsize::new(0),
                fail_with: None,
            }
        }

        fn failing(name: &'static str, f: fn() -> ClimingoError) -> Self {
            Self {
                fail_with: Some(f),
                ..Self::new(name)
            }
        }
    }

    impl BridgeHandler for RecordingHandler {
        fn name(&self) -> &'static str {
            self.name
        }

        fn handle(&self, body: serde_json::Value) -> climingo_core::error::Result<()> {
            self.bodies.lock().unwrap().push(body);
            match self.fail_with {
                Some(f) => Err(f()),
                None => Ok(()),
            }
        }

        fn report_failure(&self, _err: &ClimingoError) {
            self.failures.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn dispatch_routes_by_name() {
        let share = Arc::new(RecordingHandler::new("share"));
        let download = Arc::new(RecordingHandler::new("downloadImage"));
        let mut dispatcher = BridgeDispatcher::new();
        dispatcher.register(share.clone());
        dispatcher.register(download.clone());

        dispatcher.dispatch_raw(r#"{"name":"share","body":{"text":"hi"}}"#);

        assert_eq!(share.bodies.lock().unwrap().len(), 1);
        assert!(download.bodies.lock().unwrap().is_empty());
    }

    #[test]
    fn unregistered_names_are_silently_ignored() {
        let share = Arc::new(RecordingHandler::new("share"));
        let mut dispatcher = BridgeDispatcher::new();
        dispatcher.register(share.clone());

        dispatcher.dispatch_raw(r#"{"name":"openSettings","body":{}}"#);

        assert!(share.bodies.lock().unwrap().is_empty());
    }

    #[test]
    fn unparseable_messages_are_dropped() {
        let share = Arc::new(RecordingHandler::new("share"));
        let mut dispatcher = BridgeDispatcher::new();
        dispatcher.register(share.clone());

        dispatcher.dispatch_raw("not json at all");
        dispatcher.dispatch_raw(r#"{"body":{}}"#);

        assert!(share.bodies.lock().unwrap().is_empty());
    }

    #[test]
    fn handler_errors_become_failure_reports() {
        let handler = Arc::new(RecordingHandler::failing("share", || {
            ClimingoError::Bridge("boom".into())
        }));
        let mut dispatcher = BridgeDispatcher::new();
        dispatcher.register(handler.clone());

        dispatcher.dispatch_raw(r#"{"name":"share","body":{}}"#);

        assert_eq!(handler.failures.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn registered_names_are_sorted() {
        let mut dispatcher = BridgeDispatcher::new();
        dispatcher.register(Arc::new(RecordingHandler::new("share")));
        dispatcher.register(Arc::new(RecordingHandler::new("downloadImage")));

        assert_eq!(dispatcher.registered_names(), vec!["downloadImage", "share"]);
    }

    #[test]
    fn page_handle_noops_after_emitter_drop() {
        struct CountingEmitter(Arc<AtomicUsize>);
        impl ScriptEmitter for CountingEmitter {
            fn emit_script(&self, _script: String) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let count = Arc::new(AtomicUsize::new(0));
        let emitter: Arc<dyn ScriptEmitter> = Arc::new(CountingEmitter(count.clone()));
        let page = PageHandle::new(&emitter);
        page.eval("1".into());
        assert_eq!(count.load(Ordering::SeqCst), 1);

        drop(emitter);
        // Must not panic or touch the dead emitter.
        page.eval("2".into());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
