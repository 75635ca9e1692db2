// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// iOS platform bridge via objc2.
//
// Requires compilation with the iOS SDK (Xcode). Share sheet and dialog
// methods must run on the main thread and block on an mpsc channel until
// the corresponding UIKit completion fires; the main run loop continues to
// pump while the controller is presented. Photo-library methods are
// thread-safe and are called from the download handler's worker thread.
//
// The Photos.framework classes (PHPhotoLibrary, PHAssetChangeRequest) are
// resolved through the ObjC runtime; the Xcode project links the framework.

#![cfg(target_os = "ios")]

use std::cell::RefCell;
use std::ffi::c_void;
use std::sync::mpsc;

use block2::RcBlock;
use objc2::rc::Retained;
use objc2::runtime::{AnyObject, Bool};
use objc2::{msg_send, Encode, Encoding, MainThreadMarker};
use objc2_foundation::{NSArray, NSString};
use objc2_ui_kit::{UIActivityViewController, UIApplication, UIViewController};

use climingo_core::error::{ClimingoError, Result};
use climingo_core::types::Environment;

use crate::traits::*;

// ---------------------------------------------------------------------------
// Core Graphics geometry
// ---------------------------------------------------------------------------
// Minimal local definitions so the popover anchor can be passed by value
// without pulling in the full CoreGraphics bindings.

#[repr(C)]
#[derive(Clone, Copy)]
struct CGPoint {
    x: f64,
    y: f64,
}

#[repr(C)]
#[derive(Clone, Copy)]
struct CGSize {
    width: f64,
    height: f64,
}

#[repr(C)]
#[derive(Clone, Copy)]
struct CGRect {
    origin: CGPoint,
    size: CGSize,
}

// SAFETY: CGRect/CGPoint/CGSize are plain C structs of CGFloat (f64 on
// 64-bit iOS); the encodings match the SDK definitions.
unsafe impl Encode for CGPoint {
    const ENCODING: Encoding = Encoding::Struct("CGPoint", &[f64::ENCODING, f64::ENCODING]);
}
unsafe impl Encode for CGSize {
    const ENCODING: Encoding = Encoding::Struct("CGSize", &[f64::ENCODING, f64::ENCODING]);
}
unsafe impl Encode for CGRect {
    const ENCODING: Encoding =
        Encoding::Struct("CGRect", &[CGPoint::ENCODING, CGSize::ENCODING]);
}

impl CGRect {
    fn from_anchor(anchor: AnchorRect) -> Self {
        Self {
            origin: CGPoint {
                x: anchor.x,
                y: anchor.y,
            },
            size: CGSize {
                width: anchor.width,
                height: anchor.height,
            },
        }
    }
}

// UIAlertController / UIAlertAction style constants.
const ALERT_STYLE_ACTION_SHEET: isize = 0;
const ALERT_STYLE_ALERT: isize = 1;
const ACTION_STYLE_DEFAULT: isize = 0;
const ACTION_STYLE_CANCEL: isize = 1;

/// PHAccessLevelAdd — add-only photo-library access.
const PH_ACCESS_LEVEL_ADD_ONLY: isize = 1;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Assert that we are on the main thread and return the marker.
fn require_main_thread() -> Result<MainThreadMarker> {
    MainThreadMarker::new()
        .ok_or_else(|| ClimingoError::Bridge("must be called from the main thread".into()))
}

/// Obtain the root `UIViewController` from the key window.
///
/// Uses the deprecated `keyWindow` property for broad iOS-version compat.
fn root_view_controller() -> Result<Retained<UIViewController>> {
    let mtm = require_main_thread()?;

    let app = UIApplication::sharedApplication(mtm);

    // SAFETY: msg_send! to well-known UIApplication selectors (keyWindow,
    // rootViewController); main-thread execution guaranteed above.
    let root: Option<Retained<UIViewController>> = unsafe {
        let window: Option<Retained<AnyObject>> = msg_send![&app, keyWindow];
        window.and_then(|w| msg_send![&w, rootViewController])
    };

    root.ok_or_else(|| ClimingoError::Bridge("no root view controller available".into()))
}

/// Upcast an `NSString` into the `AnyObject` an item array expects.
fn nsstring_item(s: &str) -> Retained<AnyObject> {
    Retained::into_super(Retained::into_super(NSString::from_str(s)))
}

/// Build a `UIAlertAction` whose handler sends `value` through `tx`.
///
/// SAFETY of the contained msg_send: actionWithTitle:style:handler: is a
/// documented UIAlertAction class method; the handler block is retained by
/// UIKit until the action fires or the controller is deallocated.
fn alert_action<T: Copy + Send + 'static>(
    title: &str,
    style: isize,
    tx: mpsc::Sender<T>,
    value: T,
) -> Retained<AnyObject> {
    let ns_title = NSString::from_str(title);
    let handler = RcBlock::new(move |_action: *mut AnyObject| {
        let _ = tx.send(value);
    });
    unsafe {
        msg_send![
            objc2::class!(UIAlertAction),
            actionWithTitle: &*ns_title,
            style: style,
            handler: &*handler
        ]
    }
}

// ---------------------------------------------------------------------------
// IosBridge
// ---------------------------------------------------------------------------

/// Concrete iOS platform bridge.
pub struct IosBridge;

impl IosBridge {
    pub fn new() -> Self {
        Self
    }
}

impl Default for IosBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformBridge for IosBridge {
    fn platform_name(&self) -> &str {
        "iOS"
    }
}

// ---------------------------------------------------------------------------
// NativeShareSheet -- UIActivityViewController
// ---------------------------------------------------------------------------

impl NativeShareSheet for IosBridge {
    /// Present the iOS share sheet for the given items.
    ///
    /// The completion handler wraps the page callback; it is invoked once
    /// with the activity type, completion flag, and error reported by
    /// `completionWithItemsHandler`. On iPad the sheet is a popover and
    /// needs a source anchor; when none is supplied a degenerate rectangle
    /// at the root view's center is used so the sheet still presents.
    fn present_share_sheet(
        &self,
        items: &[String],
        anchor: Option<AnchorRect>,
        on_complete: ShareCompletionHandler,
    ) -> Result<()> {
        let _mtm = require_main_thread()?;

        tracing::info!(items = items.len(), "iOS: presenting UIActivityViewController");

        let item_objs: Vec<Retained<AnyObject>> =
            items.iter().map(|item| nsstring_item(item)).collect();
        let ns_items = NSArray::from_retained_slice(&item_objs);

        // SAFETY: ObjC alloc+init pattern for UIActivityViewController.
        // initWithActivityItems:applicationActivities: takes the item array
        // and an optional array of custom activities (nil = system default).
        let activity_vc: Retained<UIActivityViewController> = unsafe {
            let alloc: Retained<UIActivityViewController> =
                msg_send![objc2::class!(UIActivityViewController), alloc];
            msg_send![
                alloc,
                initWithActivityItems: &*ns_items,
                applicationActivities: std::ptr::null::<AnyObject>()
            ]
        };

        // The handler must fire exactly once; the FnOnce is parked in a
        // RefCell and taken on the first invocation.
        let handler = RefCell::new(Some(on_complete));
        let completion = RcBlock::new(
            move |activity: *mut AnyObject, completed: Bool, _returned: *mut AnyObject, error: *mut AnyObject| {
                let activity_type = unsafe { activity.as_ref() }.map(|obj| {
                    let s: Retained<NSString> = unsafe { msg_send![obj, description] };
                    s.to_string()
                });
                let error_text = unsafe { error.as_ref() }.map(|err| {
                    let s: Retained<NSString> = unsafe { msg_send![err, localizedDescription] };
                    s.to_string()
                });
                if let Some(callback) = handler.borrow_mut().take() {
                    callback(ShareCompletion {
                        completed: completed.as_bool(),
                        activity_type,
                        error: error_text,
                    });
                }
            },
        );
        // SAFETY: setCompletionWithItemsHandler: is a documented
        // UIActivityViewController property setter; UIKit retains the block.
        unsafe {
            let _: () = msg_send![&activity_vc, setCompletionWithItemsHandler: &*completion];
        }

        let root_vc = root_view_controller()?;

        // iPad presents the sheet as a popover and requires a source anchor.
        // SAFETY: popoverPresentationController / setSourceView: /
        // setSourceRect: are documented UIKit selectors; nil popover means a
        // full-screen presentation (iPhone) and no anchor is needed.
        unsafe {
            let popover: Option<Retained<AnyObject>> =
                msg_send![&activity_vc, popoverPresentationController];
            if let Some(popover) = popover {
                let root_view: Retained<AnyObject> = msg_send![&root_vc, view];
                let rect = match anchor {
                    Some(anchor) => CGRect::from_anchor(anchor),
                    None => {
                        let bounds: CGRect = msg_send![&root_view, bounds];
                        CGRect::from_anchor(AnchorRect::degenerate(
                            bounds.size.width / 2.0,
                            bounds.size.height / 2.0,
                        ))
                    }
                };
                let _: () = msg_send![&popover, setSourceView: &*root_view];
                let _: () = msg_send![&popover, setSourceRect: rect];
            }
        }

        // SAFETY: presentViewController is a UIViewController method;
        // main-thread requirement satisfied by require_main_thread() above.
        unsafe {
            root_vc.presentViewController_animated_completion(&activity_vc, true, None);
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// NativePhotoLibrary -- PHPhotoLibrary
// ---------------------------------------------------------------------------

impl NativePhotoLibrary for IosBridge {
    /// Request add-only photo-library authorization.
    ///
    /// May present the system permission prompt. Blocks the calling worker
    /// thread until the user resolves it; must not be called from the main
    /// thread (the prompt's completion would never be delivered).
    fn request_add_authorization(&self) -> Result<PhotoAuthorization> {
        tracing::info!("iOS: requesting photo-library add authorization");

        let (tx, rx) = mpsc::channel();
        let handler = RcBlock::new(move |status: isize| {
            let _ = tx.send(status);
        });
        // SAFETY: requestAuthorizationForAccessLevel:handler: is a documented
        // PHPhotoLibrary class method (iOS 14+); the handler may fire on an
        // arbitrary queue, which the channel absorbs.
        unsafe {
            let _: () = msg_send![
                objc2::class!(PHPhotoLibrary),
                requestAuthorizationForAccessLevel: PH_ACCESS_LEVEL_ADD_ONLY,
                handler: &*handler
            ];
        }

        let status = rx
            .recv()
            .map_err(|e| ClimingoError::Bridge(format!("authorization channel error: {e}")))?;

        // PHAuthorizationStatus values per the Photos SDK.
        Ok(match status {
            0 => PhotoAuthorization::NotDetermined,
            1 => PhotoAuthorization::Restricted,
            2 => PhotoAuthorization::Denied,
            3 => PhotoAuthorization::Authorized,
            4 => PhotoAuthorization::Limited,
            other => PhotoAuthorization::Unknown(other as i32),
        })
    }

    /// Persist encoded image bytes into the photo album via a
    /// `PHAssetChangeRequest` change block.
    fn save_to_album(&self, bytes: &[u8]) -> Result<()> {
        tracing::info!(bytes = bytes.len(), "iOS: saving image to photo album");

        let ns_data = objc2_foundation::NSData::with_bytes(bytes);
        // SAFETY: imageWithData: is a documented UIImage class method;
        // returns nil for undecodable data (pre-validated by the caller).
        let image: Option<Retained<AnyObject>> =
            unsafe { msg_send![objc2::class!(UIImage), imageWithData: &*ns_data] };
        let image =
            image.ok_or_else(|| ClimingoError::PhotoSave("UIImage rejected the data".into()))?;

        let changes = RcBlock::new(move || {
            // SAFETY: creationRequestForAssetFromImage: is a documented
            // PHAssetChangeRequest class method, valid inside a photo-library
            // change block.
            let _request: Option<Retained<AnyObject>> = unsafe {
                msg_send![
                    objc2::class!(PHAssetChangeRequest),
                    creationRequestForAssetFromImage: &*image
                ]
            };
        });

        let (tx, rx) = mpsc::channel();
        let completion = RcBlock::new(move |success: Bool, error: *mut AnyObject| {
            let error_text = unsafe { error.as_ref() }.map(|err| {
                let s: Retained<NSString> = unsafe { msg_send![err, localizedDescription] };
                s.to_string()
            });
            let _ = tx.send((success.as_bool(), error_text));
        });

        // SAFETY: sharedPhotoLibrary / performChanges:completionHandler: are
        // documented PHPhotoLibrary selectors; the completion fires on an
        // arbitrary queue once the change is committed.
        unsafe {
            let library: Retained<AnyObject> =
                msg_send![objc2::class!(PHPhotoLibrary), sharedPhotoLibrary];
            let _: () = msg_send![
                &library,
                performChanges: &*changes,
                completionHandler: &*completion
            ];
        }

        let (success, error_text) = rx
            .recv()
            .map_err(|e| ClimingoError::Bridge(format!("photo save channel error: {e}")))?;
        if success {
            Ok(())
        } else {
            Err(ClimingoError::PhotoSave(
                error_text.unwrap_or_else(|| "unknown photo library error".into()),
            ))
        }
    }
}

// ---------------------------------------------------------------------------
// NativeDialogs -- UIAlertController
// ---------------------------------------------------------------------------

impl NativeDialogs for IosBridge {
    fn present_alert(&self, message: &str) -> Result<()> {
        let _mtm = require_main_thread()?;

        let (tx, rx) = mpsc::channel();
        let alert = new_alert_controller(None, message, ALERT_STYLE_ALERT)?;
        // SAFETY: addAction: is a documented UIAlertController method.
        unsafe {
            let action = alert_action("확인", ACTION_STYLE_DEFAULT, tx, ());
            let _: () = msg_send![&alert, addAction: &*action];
        }
        present_on_root(&alert)?;

        rx.recv()
            .map_err(|e| ClimingoError::Bridge(format!("alert channel error: {e}")))
    }

    fn present_confirm(&self, message: &str) -> Result<ConfirmChoice> {
        let _mtm = require_main_thread()?;

        let (tx, rx) = mpsc::channel();
        let alert = new_alert_controller(None, message, ALERT_STYLE_ALERT)?;
        // SAFETY: addAction: — as above. The cancel-styled action also
        // covers keyboard/gesture dismissal routed through it by UIKit.
        unsafe {
            let cancel = alert_action(
                "취소",
                ACTION_STYLE_CANCEL,
                tx.clone(),
                ConfirmChoice::Cancelled,
            );
            let _: () = msg_send![&alert, addAction: &*cancel];
            let confirm = alert_action("확인", ACTION_STYLE_DEFAULT, tx, ConfirmChoice::Confirmed);
            let _: () = msg_send![&alert, addAction: &*confirm];
        }
        present_on_root(&alert)?;

        rx.recv()
            .map_err(|e| ClimingoError::Bridge(format!("confirm channel error: {e}")))
    }

    fn prompt_password(&self, title: &str) -> Result<Option<String>> {
        let _mtm = require_main_thread()?;

        let alert = new_alert_controller(Some(title), "비밀번호를 입력해 주세요.", ALERT_STYLE_ALERT)?;

        // Secure text field for the secret.
        let configure = RcBlock::new(|field: *mut AnyObject| {
            // SAFETY: setSecureTextEntry: is a documented UITextField setter;
            // UIKit hands the block a valid field.
            if let Some(field) = unsafe { field.as_ref() } {
                unsafe {
                    let _: () = msg_send![field, setSecureTextEntry: Bool::YES];
                }
            }
        });
        // SAFETY: addTextFieldWithConfigurationHandler: is a documented
        // UIAlertController method.
        unsafe {
            let _: () = msg_send![&alert, addTextFieldWithConfigurationHandler: &*configure];
        }

        let (tx, rx) = mpsc::channel::<Option<String>>();
        let cancel_tx = tx.clone();
        let cancel_handler = RcBlock::new(move |_action: *mut AnyObject| {
            let _ = cancel_tx.send(None);
        });
        // The OK handler reads the field's text back out of the controller.
        let alert_for_ok = Retained::clone(&alert);
        let ok_handler = RcBlock::new(move |_action: *mut AnyObject| {
            // SAFETY: textFields / firstObject / text are documented
            // selectors; the field was added above so firstObject is non-nil.
            let text: Option<String> = unsafe {
                let fields: Retained<NSArray<AnyObject>> =
                    msg_send![&alert_for_ok, textFields];
                let field: Option<Retained<AnyObject>> = msg_send![&fields, firstObject];
                field.and_then(|f| {
                    let s: Option<Retained<NSString>> = msg_send![&f, text];
                    s.map(|s| s.to_string())
                })
            };
            let _ = tx.send(Some(text.unwrap_or_default()));
        });
        // SAFETY: actionWithTitle:style:handler: / addAction: — as above.
        unsafe {
            let cancel_title = NSString::from_str("취소");
            let cancel: Retained<AnyObject> = msg_send![
                objc2::class!(UIAlertAction),
                actionWithTitle: &*cancel_title,
                style: ACTION_STYLE_CANCEL,
                handler: &*cancel_handler
            ];
            let _: () = msg_send![&alert, addAction: &*cancel];

            let ok_title = NSString::from_str("확인");
            let ok: Retained<AnyObject> = msg_send![
                objc2::class!(UIAlertAction),
                actionWithTitle: &*ok_title,
                style: ACTION_STYLE_DEFAULT,
                handler: &*ok_handler
            ];
            let _: () = msg_send![&alert, addAction: &*ok];
        }
        present_on_root(&alert)?;

        rx.recv()
            .map_err(|e| ClimingoError::Bridge(format!("password prompt channel error: {e}")))
    }

    fn pick_environment(&self, current: Environment) -> Result<Option<Environment>> {
        let _mtm = require_main_thread()?;

        let message = format!("현재 환경: {}", current.label());
        let alert = new_alert_controller(Some("개발자 모드"), &message, ALERT_STYLE_ACTION_SHEET)?;

        let (tx, rx) = mpsc::channel::<Option<Environment>>();
        // SAFETY: addAction: — as above.
        unsafe {
            for env in Environment::ALL {
                let action =
                    alert_action(env.label(), ACTION_STYLE_DEFAULT, tx.clone(), Some(env));
                let _: () = msg_send![&alert, addAction: &*action];
            }
            let cancel = alert_action("취소", ACTION_STYLE_CANCEL, tx, None);
            let _: () = msg_send![&alert, addAction: &*cancel];
        }
        present_on_root(&alert)?;

        rx.recv()
            .map_err(|e| ClimingoError::Bridge(format!("environment picker channel error: {e}")))
    }
}

/// Build a `UIAlertController` with the given style.
fn new_alert_controller(
    title: Option<&str>,
    message: &str,
    style: isize,
) -> Result<Retained<AnyObject>> {
    let _mtm = require_main_thread()?;
    let ns_message = NSString::from_str(message);
    // SAFETY: alertControllerWithTitle:message:preferredStyle: is a
    // documented UIAlertController class method; nil title is allowed.
    let alert: Option<Retained<AnyObject>> = unsafe {
        match title {
            Some(title) => {
                let ns_title = NSString::from_str(title);
                msg_send![
                    objc2::class!(UIAlertController),
                    alertControllerWithTitle: &*ns_title,
                    message: &*ns_message,
                    preferredStyle: style
                ]
            }
            None => msg_send![
                objc2::class!(UIAlertController),
                alertControllerWithTitle: std::ptr::null::<NSString>(),
                message: &*ns_message,
                preferredStyle: style
            ],
        }
    };
    alert.ok_or_else(|| ClimingoError::Bridge("UIAlertController init returned nil".into()))
}

/// Present an alert controller on the root view controller.
fn present_on_root(alert: &Retained<AnyObject>) -> Result<()> {
    let root_vc = root_view_controller()?;
    // SAFETY: presentViewController:animated:completion: is a documented
    // UIViewController method; main thread guaranteed by the callers.
    unsafe {
        let _: () = msg_send![
            &root_vc,
            presentViewController: &**alert,
            animated: Bool::YES,
            completion: std::ptr::null::<c_void>()
        ];
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Verify that the bridge reports the correct platform name.
    #[test]
    fn platform_name() {
        let bridge = IosBridge::new();
        assert_eq!(bridge.platform_name(), "iOS");
    }

    // Integration tests for UI-presenting methods require a running iOS app
    // with a key window. They are exercised in the Xcode test target rather
    // than via `cargo test`.
}
