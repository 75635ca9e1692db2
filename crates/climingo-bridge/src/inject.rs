// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page bootstrap script.
//
// The hosted page was written against the WebKit message-handler surface
// (`window.webkit.messageHandlers.<name>.postMessage(body)`). On webview
// backends that expose a single IPC channel instead, this script installs a
// shim that forwards each named post as a `{name, body}` JSON envelope. On
// backends that already provide real message handlers the shim steps aside.

/// Build the initialization script for the given registered handler names.
pub fn bootstrap_script(handler_names: &[&str]) -> String {
    let names = serde_json::to_string(handler_names).unwrap_or_else(|_| "[]".to_owned());
    format!(
        r#"(function () {{
  if (window.webkit && window.webkit.messageHandlers) {{ return; }}
  var handlers = {{}};
  {names}.forEach(function (name) {{
    handlers[name] = {{
      postMessage: function (body) {{
        window.ipc.postMessage(JSON.stringify({{ name: name, body: body }}));
      }}
    }};
  }});
  window.webkit = {{ messageHandlers: handlers }};
}})();"#
    )
}
