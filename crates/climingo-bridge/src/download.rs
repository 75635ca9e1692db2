// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Download handler — fetches a remote image and persists it to the device
// photo album, subject to permission.

use std::sync::Arc;

use climingo_core::error::ClimingoError;
use climingo_core::messages;
use climingo_core::types::{DownloadOutcome, DownloadPayload};
use climingo_platform::traits::{NativePhotoLibrary, PhotoAuthorization};
use tracing::{debug, info, warn};
use url::Url;

use crate::callbacks;
use crate::dispatch::{BridgeHandler, PageHandle};
use crate::fetch::FetchBytes;

/// Handles the `downloadImage` bridge message.
///
/// Registered only when the shell's `image_download_enabled` config flag is
/// set — the page treats the handler as optional.
pub struct DownloadHandler {
    fetcher: Arc<dyn FetchBytes>,
    photos: Arc<dyn NativePhotoLibrary>,
    page: PageHandle,
}

impl DownloadHandler {
    pub fn new(
        fetcher: Arc<dyn FetchBytes>,
        photos: Arc<dyn NativePhotoLibrary>,
        page: PageHandle,
    ) -> Self {
        Self {
            fetcher,
            photos,
            page,
        }
    }
}

impl BridgeHandler for DownloadHandler {
    fn name(&self) -> &'static str {
        "downloadImage"
    }

    fn handle(&self, body: serde_json::Value) -> climingo_core::error::Result<()> {
        let payload: DownloadPayload =
            serde_json::from_value(body).map_err(|e| ClimingoError::Payload(e.to_string()))?;
        // Validation failures are reported before any network activity and
        // without the start callback.
        let url = Url::parse(&payload.url)
            .map_err(|_| ClimingoError::InvalidImageUrl(payload.url.clone()))?;

        info!(url = %url, "starting image download");
        self.page.eval(callbacks::download_start());

        let fetcher = Arc::clone(&self.fetcher);
        let photos = Arc::clone(&self.photos);
        let page = self.page.clone();
        tokio::task::spawn_blocking(move || {
            let outcome = run_download(fetcher.as_ref(), photos.as_ref(), &url);
            page.eval(callbacks::download_complete(&outcome));
        });
        Ok(())
    }

    fn report_failure(&self, err: &ClimingoError) {
        let message = match err {
            ClimingoError::Payload(_) | ClimingoError::InvalidImageUrl(_) => {
                messages::download_invalid_url()
            }
            other => messages::download_failed(&other.to_string()),
        };
        self.page
            .eval(callbacks::download_complete(&DownloadOutcome::failure(message)));
    }
}

/// Fetch, validate, authorize, and persist — the blocking half of the flow.
fn run_download(
    fetcher: &dyn FetchBytes,
    photos: &dyn NativePhotoLibrary,
    url: &Url,
) -> DownloadOutcome {
    let bytes = match fetcher.fetch_bytes(url) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(url = %url, error = %err, "image fetch failed");
            return DownloadOutcome::failure(messages::download_failed(&err.to_string()));
        }
    };

    // Decode as validation only; the original encoded bytes are what get
    // persisted.
    if let Err(err) = image::load_from_memory(&bytes) {
        debug!(url = %url, error = %err, "fetched bytes are not a decodable image");
        return DownloadOutcome::failure(messages::download_invalid_format());
    }

    let authorization = match photos.request_add_authorization() {
        Ok(status) => status,
        Err(err) => {
            warn!(error = %err, "photo authorization request failed");
            return DownloadOutcome::failure(messages::download_failed(&err.to_string()));
        }
    };

    match authorization {
        PhotoAuthorization::Authorized | PhotoAuthorization::Limited => {
            match photos.save_to_album(&bytes) {
                Ok(()) => DownloadOutcome::success(messages::download_saved()),
                Err(err) => {
                    warn!(error = %err, "photo album save failed");
                    DownloadOutcome::failure(messages::download_save_failed())
                }
            }
        }
        PhotoAuthorization::Denied | PhotoAuthorization::Restricted => {
            DownloadOutcome::failure(messages::download_permission_required())
        }
        PhotoAuthorization::NotDetermined => {
            DownloadOutcome::failure(messages::download_permission_undetermined())
        }
        PhotoAuthorization::Unknown(status) => {
            DownloadOutcome::failure(messages::download_permission_unknown(status))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use climingo_core::error::Result;

    use super::*;
    use crate::dispatch::ScriptEmitter;

    /// A 1×1 PNG, the smallest thing `image` will decode.
    fn tiny_png() -> Vec<u8> {
        let pixel = image::RgbaImage::from_pixel(1, 1, image::Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(pixel)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    struct RecordingEmitter(Mutex<Vec<String>>);

    impl ScriptEmitter for RecordingEmitter {
        fn emit_script(&self, script: String) {
            self.0.lock().unwrap().push(script);
        }
    }

    /// Fetcher that counts calls and returns a configured result.
    struct FakeFetcher {
        calls: AtomicUsize,
        result: std::result::Result<Vec<u8>, String>,
    }

    impl FakeFetcher {
        fn returning(bytes: &[u8]) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                result: Ok(bytes.to_vec()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                result: Err(message.to_owned()),
            }
        }
    }

    impl FetchBytes for FakeFetcher {
        fn fetch_bytes(&self, _url: &Url) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.result {
                Ok(bytes) => Ok(bytes.clone()),
                Err(message) => Err(ClimingoError::Download(message.clone())),
            }
        }
    }

    struct FakePhotos {
        authorization: Result<PhotoAuthorization>,
        save_result: Result<()>,
        saves: AtomicUsize,
    }

    impl FakePhotos {
        fn authorized() -> Self {
            Self {
                authorization: Ok(PhotoAuthorization::Authorized),
                save_result: Ok(()),
                saves: AtomicUsize::new(0),
            }
        }

        fn with_status(status: PhotoAuthorization) -> Self {
            Self {
                authorization: Ok(status),
                ..Self::authorized()
            }
        }
    }

    impl NativePhotoLibrary for FakePhotos {
        fn request_add_authorization(&self) -> Result<PhotoAuthorization> {
            match &self.authorization {
                Ok(status) => Ok(*status),
                Err(_) => Err(ClimingoError::PlatformUnavailable),
            }
        }

        fn save_to_album(&self, _bytes: &[u8]) -> Result<()> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            match &self.save_result {
                Ok(()) => Ok(()),
                Err(_) => Err(ClimingoError::PhotoSave("disk full".into())),
            }
        }
    }

    fn test_url() -> Url {
        Url::parse("https://cdn.climingo.xyz/records/42.png").unwrap()
    }

    #[test]
    fn invalid_url_fails_without_any_network_call() {
        let fetcher = Arc::new(FakeFetcher::returning(&tiny_png()));
        let photos = Arc::new(FakePhotos::authorized());
        let recording = Arc::new(RecordingEmitter(Mutex::new(Vec::new())));
        let emitter: Arc<dyn ScriptEmitter> = recording.clone();
        let handler = DownloadHandler::new(fetcher.clone(), photos, PageHandle::new(&emitter));

        let err = handler
            .handle(serde_json::json!({"url": "not a url"}))
            .unwrap_err();
        handler.report_failure(&err);

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
        let scripts = recording.0.lock().unwrap();
        // No start callback — only the failure outcome.
        assert_eq!(scripts.len(), 1);
        assert!(scripts[0].contains("onImageDownloadComplete"));
        assert!(scripts[0].contains("\"success\":false"));
        assert!(scripts[0].contains("이미지 주소가 올바르지 않아요"));
    }

    #[test]
    fn missing_url_field_is_a_payload_error() {
        let fetcher = Arc::new(FakeFetcher::returning(&tiny_png()));
        let photos = Arc::new(FakePhotos::authorized());
        let recording = Arc::new(RecordingEmitter(Mutex::new(Vec::new())));
        let emitter: Arc<dyn ScriptEmitter> = recording.clone();
        let handler = DownloadHandler::new(fetcher.clone(), photos, PageHandle::new(&emitter));

        let err = handler.handle(serde_json::json!({})).unwrap_err();
        assert!(matches!(err, ClimingoError::Payload(_)));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn successful_download_saves_and_reports_success() {
        let fetcher = FakeFetcher::returning(&tiny_png());
        let photos = FakePhotos::authorized();

        let outcome = run_download(&fetcher, &photos, &test_url());

        assert!(outcome.success);
        assert_eq!(photos.saves.load(Ordering::SeqCst), 1);
        assert!(outcome.message.contains("앨범에 저장했어요"));
    }

    #[test]
    fn transport_error_carries_the_underlying_description() {
        let fetcher = FakeFetcher::failing("connection reset by peer");
        let photos = FakePhotos::authorized();

        let outcome = run_download(&fetcher, &photos, &test_url());

        assert!(!outcome.success);
        assert!(outcome.message.contains("connection reset by peer"));
        assert_eq!(photos.saves.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn undecodable_bytes_report_invalid_format() {
        let fetcher = FakeFetcher::returning(b"<!doctype html><html></html>");
        let photos = FakePhotos::authorized();

        let outcome = run_download(&fetcher, &photos, &test_url());

        assert!(!outcome.success);
        assert!(outcome.message.contains("이미지 형식이 올바르지 않아요"));
        assert_eq!(photos.saves.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn limited_authorization_still_saves() {
        let fetcher = FakeFetcher::returning(&tiny_png());
        let photos = FakePhotos::with_status(PhotoAuthorization::Limited);

        let outcome = run_download(&fetcher, &photos, &test_url());

        assert!(outcome.success);
        assert_eq!(photos.saves.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn denied_authorization_never_attempts_a_save() {
        for status in [PhotoAuthorization::Denied, PhotoAuthorization::Restricted] {
            let fetcher = FakeFetcher::returning(&tiny_png());
            let photos = FakePhotos::with_status(status);

            let outcome = run_download(&fetcher, &photos, &test_url());

            assert!(!outcome.success);
            assert!(outcome.message.contains("사진 접근 권한이 필요해요"));
            assert_eq!(photos.saves.load(Ordering::SeqCst), 0);
        }
    }

    #[test]
    fn unknown_statuses_are_failures_not_successes() {
        let fetcher = FakeFetcher::returning(&tiny_png());
        let photos = FakePhotos::with_status(PhotoAuthorization::Unknown(9));

        let outcome = run_download(&fetcher, &photos, &test_url());

        assert!(!outcome.success);
        assert!(outcome.message.contains("status 9"));

        let fetcher = FakeFetcher::returning(&tiny_png());
        let photos = FakePhotos::with_status(PhotoAuthorization::NotDetermined);
        let outcome = run_download(&fetcher, &photos, &test_url());
        assert!(!outcome.success);
    }

    #[test]
    fn save_failure_reports_the_generic_save_message() {
        let fetcher = FakeFetcher::returning(&tiny_png());
        let mut photos = FakePhotos::authorized();
        photos.save_result = Err(ClimingoError::PhotoSave("disk full".into()));

        let outcome = run_download(&fetcher, &photos, &test_url());

        assert!(!outcome.success);
        assert!(outcome.message.contains("이미지를 저장하지 못했어요"));
    }
}
