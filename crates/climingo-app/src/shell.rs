// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Windowed shell — tao event loop plus a wry webview hosting the remote
// Climingo web app.
//
// The webview is exclusively owned by the event loop; everything that needs
// to touch it from another thread (handler outcome scripts, surface dialog
// events) arrives as a `UserEvent` through the loop's proxy.

use std::sync::{Arc, Mutex};

use climingo_bridge::dialog::{DialogAdapter, DialogRequest};
use climingo_bridge::dispatch::{BridgeDispatcher, PageHandle, ScriptEmitter};
use climingo_bridge::download::DownloadHandler;
use climingo_bridge::fetch::HttpFetcher;
use climingo_bridge::inject;
use climingo_bridge::share::ShareHandler;
use climingo_core::error::{ClimingoError, Result};
use tao::event::{ElementState, Event, MouseButton, TouchPhase, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoopBuilder, EventLoopProxy};
use tao::window::WindowBuilder;
use tracing::{info, warn};
use wry::WebViewBuilder;

use crate::devmode::{self, DeveloperMode};
use crate::services::app_services::AppServices;

/// Events marshalled onto the UI event loop.
pub enum UserEvent {
    /// Execute a script in the hosted page.
    EvalScript(String),
    /// A dialog event from the render surface (alert/confirm). WebKit-based
    /// backends feed these through the platform's UI-delegate glue.
    Dialog(DialogRequest),
}

/// `ScriptEmitter` backed by the event-loop proxy, so handler callbacks can
/// be evaluated from any thread while the webview itself is only touched on
/// the UI thread.
struct ProxyEmitter {
    proxy: Mutex<EventLoopProxy<UserEvent>>,
}

impl ProxyEmitter {
    fn new(proxy: EventLoopProxy<UserEvent>) -> Self {
        Self {
            proxy: Mutex::new(proxy),
        }
    }
}

impl ScriptEmitter for ProxyEmitter {
    fn emit_script(&self, script: String) {
        let proxy = self.proxy.lock().expect("proxy lock poisoned");
        if proxy.send_event(UserEvent::EvalScript(script)).is_err() {
            warn!("event loop closed; dropping page script");
        }
    }
}

/// Build the window, webview, and bridge, then run the event loop.
pub fn run(services: AppServices) -> Result<()> {
    let event_loop = EventLoopBuilder::<UserEvent>::with_user_event().build();
    let proxy = event_loop.create_proxy();

    // The emitter must outlive the loop: handlers only hold weak references
    // to it through their PageHandle.
    let emitter: Arc<dyn ScriptEmitter> = Arc::new(ProxyEmitter::new(proxy));
    let page = PageHandle::new(&emitter);

    let bridge = climingo_platform::platform_bridge();

    let mut dispatcher = BridgeDispatcher::new();
    dispatcher.register(Arc::new(ShareHandler::new(bridge.clone(), page.clone())));
    if services.image_download_enabled() {
        dispatcher.register(Arc::new(DownloadHandler::new(
            Arc::new(HttpFetcher::new()),
            bridge.clone(),
            page.clone(),
        )));
    }
    let dispatcher = Arc::new(dispatcher);

    let adapter = DialogAdapter::new(bridge.clone());
    let mut devmode = DeveloperMode::new();

    let window = WindowBuilder::new()
        .with_title("Climingo")
        .build(&event_loop)
        .map_err(|e| ClimingoError::Bridge(format!("window creation failed: {e}")))?;

    let bootstrap = inject::bootstrap_script(&dispatcher.registered_names());
    let ipc_dispatcher = Arc::clone(&dispatcher);
    let webview = WebViewBuilder::new()
        .with_url(services.base_url())
        .with_initialization_script(bootstrap.as_str())
        .with_back_forward_navigation_gestures(true)
        .with_ipc_handler(move |request| {
            ipc_dispatcher.dispatch_raw(request.body());
        })
        .build(&window)
        .map_err(|e| ClimingoError::Bridge(format!("webview creation failed: {e}")))?;

    info!(url = %services.base_url(), "shell ready");

    let mut cursor = (0.0_f64, 0.0_f64);
    event_loop.run(move |event, _target, control_flow| {
        // Keep the emitter owned by the loop so the page handles stay live.
        let _ = &emitter;
        *control_flow = ControlFlow::Wait;

        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,
                WindowEvent::CursorMoved { position, .. } => {
                    let logical = position.to_logical::<f64>(window.scale_factor());
                    cursor = (logical.x, logical.y);
                }
                WindowEvent::MouseInput {
                    state: ElementState::Pressed,
                    button: MouseButton::Left,
                    ..
                } => {
                    on_tap(cursor, &window, &mut devmode, &bridge, &services, &webview);
                }
                WindowEvent::Touch(touch) if touch.phase == TouchPhase::Started => {
                    let logical = touch.location.to_logical::<f64>(window.scale_factor());
                    on_tap(
                        (logical.x, logical.y),
                        &window,
                        &mut devmode,
                        &bridge,
                        &services,
                        &webview,
                    );
                }
                _ => {}
            },
            Event::UserEvent(UserEvent::EvalScript(script)) => {
                if let Err(err) = webview.evaluate_script(&script) {
                    warn!(error = %err, "script evaluation failed");
                }
            }
            Event::UserEvent(UserEvent::Dialog(request)) => adapter.handle(request),
            _ => {}
        }
    });
}

/// Route a tap through the developer-mode hotspot; reload the webview in
/// place when an environment was picked.
fn on_tap(
    cursor: (f64, f64),
    window: &tao::window::Window,
    devmode_state: &mut DeveloperMode,
    bridge: &Arc<climingo_platform::ActiveBridge>,
    services: &AppServices,
    webview: &wry::WebView,
) {
    let width = window
        .inner_size()
        .to_logical::<f64>(window.scale_factor())
        .width;
    if !devmode::hotspot_contains(width, cursor.0, cursor.1) {
        return;
    }
    if let Some(env) = devmode::handle_hotspot_tap(devmode_state, bridge.as_ref(), services) {
        info!(env = env.label(), url = env.base_url(), "reloading render surface");
        if let Err(err) = webview.load_url(env.base_url()) {
            warn!(error = %err, "environment reload failed");
        }
    }
}
