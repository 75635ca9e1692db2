// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Share handler — bridges the page's `share` message to the OS share sheet.

use std::sync::Arc;

use climingo_core::error::ClimingoError;
use climingo_core::messages;
use climingo_core::types::{ShareOutcome, SharePayload, ShareTarget};
use climingo_platform::traits::{NativeShareSheet, ShareCompletion};
use tracing::info;

use crate::callbacks;
use crate::dispatch::{BridgeHandler, PageHandle};

/// Handles the `share` bridge message.
///
/// Presentation is fire-and-forget: the platform invokes the completion
/// callback once the user picks a target, cancels, or the OS errors, and
/// the classified outcome is injected back into the page.
pub struct ShareHandler {
    sheet: Arc<dyn NativeShareSheet>,
    page: PageHandle,
}

impl ShareHandler {
    pub fn new(sheet: Arc<dyn NativeShareSheet>, page: PageHandle) -> Self {
        Self { sheet, page }
    }
}

impl BridgeHandler for ShareHandler {
    fn name(&self) -> &'static str {
        "share"
    }

    fn handle(&self, body: serde_json::Value) -> climingo_core::error::Result<()> {
        // Every payload field is optional, so an unusable body degrades to
        // the fallback share item rather than a failure.
        let payload: SharePayload = serde_json::from_value(body).unwrap_or_default();
        let items = payload.share_items();
        info!(items = items.len(), "presenting share sheet");

        self.page.eval(callbacks::share_start());

        let page = self.page.clone();
        self.sheet.present_share_sheet(
            &items,
            None,
            Box::new(move |completion| {
                let outcome = classify_completion(completion);
                page.eval(callbacks::share_complete(&outcome));
            }),
        )
    }

    fn report_failure(&self, err: &ClimingoError) {
        let outcome = ShareOutcome::failure(messages::share_failed(&err.to_string()));
        self.page.eval(callbacks::share_complete(&outcome));
    }
}

/// Map a raw share-sheet completion onto the page-visible outcome.
///
/// An OS error wins over the completed flag; a completed share is labelled
/// with the Korean name of the chosen target; anything else is a
/// cancellation.
pub(crate) fn classify_completion(completion: ShareCompletion) -> ShareOutcome {
    if let Some(error) = completion.error {
        return ShareOutcome::failure(messages::share_failed(&error));
    }
    if !completion.completed {
        return ShareOutcome::failure(messages::share_cancelled());
    }
    let target = ShareTarget::from_activity_type(completion.activity_type.as_deref());
    let activity_type = completion
        .activity_type
        .unwrap_or_else(|| "unknown".to_owned());
    ShareOutcome::success(activity_type, messages::share_success(target))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use climingo_core::error::Result;
    use climingo_platform::traits::{AnchorRect, ShareCompletionHandler};

    use super::*;
    use crate::dispatch::ScriptEmitter;

    struct RecordingEmitter(Mutex<Vec<String>>);

    impl ScriptEmitter for RecordingEmitter {
        fn emit_script(&self, script: String) {
            self.0.lock().unwrap().push(script);
        }
    }

    /// Fake sheet that records the presented items and immediately invokes
    /// the completion with a canned value.
    struct FakeSheet {
        items_seen: Mutex<Vec<Vec<String>>>,
        completion: ShareCompletion,
    }

    impl FakeSheet {
        fn completing_with(completion: ShareCompletion) -> Self {
            Self {
                items_seen: Mutex::new(Vec::new()),
                completion,
            }
        }
    }

    impl NativeShareSheet for FakeSheet {
        fn present_share_sheet(
            &self,
            items: &[String],
            _anchor: Option<AnchorRect>,
            on_complete: ShareCompletionHandler,
        ) -> Result<()> {
            self.items_seen.lock().unwrap().push(items.to_vec());
            on_complete(self.completion.clone());
            Ok(())
        }
    }

    struct FailingSheet;

    impl NativeShareSheet for FailingSheet {
        fn present_share_sheet(
            &self,
            _items: &[String],
            _anchor: Option<AnchorRect>,
            _on_complete: ShareCompletionHandler,
        ) -> Result<()> {
            Err(ClimingoError::PlatformUnavailable)
        }
    }

    fn handler_with(
        sheet: Arc<dyn NativeShareSheet>,
    ) -> (ShareHandler, Arc<RecordingEmitter>, Arc<dyn ScriptEmitter>) {
        let recording = Arc::new(RecordingEmitter(Mutex::new(Vec::new())));
        let emitter: Arc<dyn ScriptEmitter> = recording.clone();
        let handler = ShareHandler::new(sheet, PageHandle::new(&emitter));
        (handler, recording, emitter)
    }

    #[test]
    fn completed_share_reports_target_name() {
        let sheet = Arc::new(FakeSheet::completing_with(ShareCompletion {
            completed: true,
            activity_type: Some("com.apple.UIKit.activity.Mail".into()),
            error: None,
        }));
        let (handler, recording, _keep) = handler_with(sheet);

        handler
            .handle(serde_json::json!({"text": "T", "url": "https://app.climingo.xyz"}))
            .unwrap();

        let scripts = recording.0.lock().unwrap();
        assert_eq!(scripts.len(), 2);
        assert!(scripts[0].contains("onShareStart"));
        assert!(scripts[1].contains("\"success\":true"));
        assert!(scripts[1].contains("메일"));
    }

    #[test]
    fn dismissed_share_reports_cancellation() {
        let sheet = Arc::new(FakeSheet::completing_with(ShareCompletion::default()));
        let (handler, recording, _keep) = handler_with(sheet);

        handler.handle(serde_json::json!({"text": "T"})).unwrap();

        let scripts = recording.0.lock().unwrap();
        assert!(scripts[1].contains("\"success\":false"));
        assert!(scripts[1].contains("공유를 취소했어요"));
    }

    #[test]
    fn os_error_wins_over_completed_flag() {
        let outcome = classify_completion(ShareCompletion {
            completed: true,
            activity_type: Some("com.apple.UIKit.activity.Mail".into()),
            error: Some("no network".into()),
        });
        assert!(!outcome.success);
        assert!(outcome.message.contains("no network"));
    }

    #[test]
    fn unreported_activity_type_maps_to_unknown() {
        let outcome = classify_completion(ShareCompletion {
            completed: true,
            activity_type: None,
            error: None,
        });
        assert!(outcome.success);
        assert_eq!(outcome.activity_type, "unknown");
        assert!(outcome.message.contains("알 수 없는 앱"));
    }

    #[test]
    fn garbage_body_still_presents_the_fallback_item() {
        let sheet = Arc::new(FakeSheet::completing_with(ShareCompletion::default()));
        let (handler, _recording, _keep) = handler_with(sheet.clone());

        handler.handle(serde_json::Value::Null).unwrap();

        let seen = sheet.items_seen.lock().unwrap();
        assert_eq!(seen[0], vec![climingo_core::types::SHARE_FALLBACK_TEXT.to_owned()]);
    }

    #[test]
    fn presentation_error_surfaces_through_report_failure() {
        let (handler, recording, _keep) = handler_with(Arc::new(FailingSheet));

        let err = handler.handle(serde_json::json!({"text": "T"})).unwrap_err();
        handler.report_failure(&err);

        let scripts = recording.0.lock().unwrap();
        // Start was already notified; the failure outcome follows.
        assert!(scripts[0].contains("onShareStart"));
        assert!(scripts[1].contains("\"success\":false"));
        assert!(scripts[1].contains("공유에 실패했어요"));
    }
}
