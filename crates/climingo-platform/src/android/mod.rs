// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android platform bridge via JNI.
//
// Requires the Android NDK and targets `aarch64-linux-android` or
// `armv7-linux-androideabi`.
//
// ## Architecture notes
//
// The share sheet launches an `ACTION_SEND` chooser Intent, which can
// complete synchronously from JNI. Android does not report which target the
// user picked, so the completion carries no activity type and the page sees
// "알 수 없는 앱".
//
// Photo-library writes and modal dialogs need a host-Activity callback
// (`onActivityResult` / a dialog fragment); until that glue is wired they
// return `ClimingoError::Bridge` explaining the missing piece, which the
// handlers convert into page-visible failure outcomes.

#![cfg(target_os = "android")]

use jni::objects::{JObject, JValue};
use jni::JNIEnv;

use climingo_core::error::{ClimingoError, Result};
use climingo_core::types::Environment;

use crate::traits::*;

/// Obtain a [`JNIEnv`] handle from the global Android context.
fn jni_env() -> Result<JNIEnv<'static>> {
    let ctx = ndk_context::android_context();
    // SAFETY: `ctx.vm()` returns the `JavaVM*` set by the NDK glue code.
    // The pointer is guaranteed valid for the lifetime of the process.
    let vm = unsafe { jni::JavaVM::from_raw(ctx.vm().cast()) }
        .map_err(|e| ClimingoError::Bridge(format!("failed to obtain JavaVM: {e}")))?;
    vm.attach_current_thread()
        .map_err(|e| ClimingoError::Bridge(format!("failed to attach JNI thread: {e}")))
}

/// Obtain the current Android `Activity` as a [`JObject`].
fn activity() -> Result<JObject<'static>> {
    let ctx = ndk_context::android_context();
    let ptr = ctx.context();
    if ptr.is_null() {
        return Err(ClimingoError::Bridge(
            "Android context is null — native activity not initialised".into(),
        ));
    }
    // SAFETY: the NDK guarantees this pointer is a valid global jobject for
    // the hosting Activity.
    Ok(unsafe { JObject::from_raw(ptr.cast()) })
}

/// Convenience: map any `jni::errors::Error` into `ClimingoError::Bridge`.
fn jni_err(context: &str, e: jni::errors::Error) -> ClimingoError {
    ClimingoError::Bridge(format!("{context}: {e}"))
}

/// Concrete Android platform bridge.
pub struct AndroidBridge;

impl AndroidBridge {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AndroidBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformBridge for AndroidBridge {
    fn platform_name(&self) -> &str {
        "Android"
    }
}

impl NativeShareSheet for AndroidBridge {
    /// Launch an `ACTION_SEND` chooser with the items joined into one text
    /// extra (Android share Intents carry a single EXTRA_TEXT).
    fn present_share_sheet(
        &self,
        items: &[String],
        _anchor: Option<AnchorRect>,
        on_complete: ShareCompletionHandler,
    ) -> Result<()> {
        tracing::info!(items = items.len(), "Android: launching ACTION_SEND chooser");

        let mut env = jni_env()?;
        let activity = activity()?;

        let intent_class = env
            .find_class("android/content/Intent")
            .map_err(|e| jni_err("find Intent", e))?;
        let action = env
            .new_string("android.intent.action.SEND")
            .map_err(|e| jni_err("new_string action", e))?;
        let intent = env
            .new_object(
                &intent_class,
                "(Ljava/lang/String;)V",
                &[JValue::Object(&action)],
            )
            .map_err(|e| jni_err("new Intent", e))?;

        let mime = env
            .new_string("text/plain")
            .map_err(|e| jni_err("new_string mime", e))?;
        env.call_method(
            &intent,
            "setType",
            "(Ljava/lang/String;)Landroid/content/Intent;",
            &[JValue::Object(&mime)],
        )
        .map_err(|e| jni_err("Intent.setType", e))?;

        let extra_key = env
            .new_string("android.intent.extra.TEXT")
            .map_err(|e| jni_err("new_string extra key", e))?;
        let extra_text = env
            .new_string(items.join("\n"))
            .map_err(|e| jni_err("new_string extra text", e))?;
        env.call_method(
            &intent,
            "putExtra",
            "(Ljava/lang/String;Ljava/lang/String;)Landroid/content/Intent;",
            &[JValue::Object(&extra_key), JValue::Object(&extra_text)],
        )
        .map_err(|e| jni_err("Intent.putExtra", e))?;

        let chooser = env
            .call_static_method(
                &intent_class,
                "createChooser",
                "(Landroid/content/Intent;Ljava/lang/CharSequence;)Landroid/content/Intent;",
                &[JValue::Object(&intent), JValue::Object(&JObject::null())],
            )
            .map_err(|e| jni_err("Intent.createChooser", e))?
            .l()
            .map_err(|e| jni_err("chooser object", e))?;

        env.call_method(
            &activity,
            "startActivity",
            "(Landroid/content/Intent;)V",
            &[JValue::Object(&chooser)],
        )
        .map_err(|e| jni_err("startActivity", e))?;

        // The chooser gives no completion signal; report a completed share
        // with no target identity.
        on_complete(ShareCompletion {
            completed: true,
            activity_type: None,
            error: None,
        });
        Ok(())
    }
}

impl NativePhotoLibrary for AndroidBridge {
    fn request_add_authorization(&self) -> Result<PhotoAuthorization> {
        // MediaStore writes on API 29+ need no runtime permission, but the
        // insert path below is not wired yet, so do not report authorized.
        Err(ClimingoError::Bridge(
            "photo-library access requires host-Activity glue (MediaStore insert)".into(),
        ))
    }

    fn save_to_album(&self, _bytes: &[u8]) -> Result<()> {
        Err(ClimingoError::Bridge(
            "photo-library access requires host-Activity glue (MediaStore insert)".into(),
        ))
    }
}

impl NativeDialogs for AndroidBridge {
    fn present_alert(&self, _message: &str) -> Result<()> {
        Err(ClimingoError::Bridge(
            "dialogs require host-Activity glue (AlertDialog on the UI thread)".into(),
        ))
    }

    fn present_confirm(&self, _message: &str) -> Result<ConfirmChoice> {
        Err(ClimingoError::Bridge(
            "dialogs require host-Activity glue (AlertDialog on the UI thread)".into(),
        ))
    }

    fn prompt_password(&self, _title: &str) -> Result<Option<String>> {
        Err(ClimingoError::Bridge(
            "dialogs require host-Activity glue (AlertDialog on the UI thread)".into(),
        ))
    }

    fn pick_environment(&self, _current: Environment) -> Result<Option<Environment>> {
        Err(ClimingoError::Bridge(
            "dialogs require host-Activity glue (AlertDialog on the UI thread)".into(),
        ))
    }
}
