// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Climingo shell bridge.

use serde::{Deserialize, Serialize};
use url::Url;

/// Fallback share text used when the page supplies no usable content.
pub const SHARE_FALLBACK_TEXT: &str = "클라이밍 기록은 클라이밍고에서!";

/// Target environment for the hosted web app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Dev,
    Staging,
    Production,
}

impl Environment {
    /// All environments, in the order the switcher presents them.
    pub const ALL: [Environment; 3] = [
        Environment::Dev,
        Environment::Staging,
        Environment::Production,
    ];

    /// Base URL the render surface loads for this environment.
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Dev => "https://dev-app.climingo.xyz",
            Self::Staging => "https://stg-app.climingo.xyz",
            Self::Production => "https://app.climingo.xyz",
        }
    }

    /// Short label shown on the switcher buttons.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Dev => "Dev",
            Self::Staging => "Stg",
            Self::Production => "Prd",
        }
    }

    /// Reverse lookup from a persisted base URL.
    pub fn from_base_url(url: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|env| env.base_url() == url.trim_end_matches('/'))
    }
}

/// A named message posted from the hosted page through the webview IPC
/// channel. The name selects the handler; the body shape is handler-specific.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeMessage {
    pub name: String,
    #[serde(default)]
    pub body: serde_json::Value,
}

impl BridgeMessage {
    /// Parse the raw IPC string posted by the page.
    pub fn parse(raw: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// Body of the `share` bridge message. Every field is optional; an unusable
/// payload degrades to the fixed fallback item rather than an error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SharePayload {
    pub text: Option<String>,
    pub url: Option<String>,
    pub title: Option<String>,
}

impl SharePayload {
    /// Normalize the payload into the ordered list of share-sheet items.
    ///
    /// Text and title collapse into a single combined entry ("title\ntext",
    /// or just the title when no text is present); the url follows as a
    /// distinct item when it parses. An empty result is replaced by
    /// [`SHARE_FALLBACK_TEXT`] so the sheet always has something to offer.
    pub fn share_items(&self) -> Vec<String> {
        let text = self.text.as_deref().map(str::trim).filter(|t| !t.is_empty());
        let title = self
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());
        let url = self
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| Url::parse(u).is_ok());

        let combined = match (title, text) {
            (Some(title), Some(text)) => Some(format!("{title}\n{text}")),
            (Some(title), None) => Some(title.to_owned()),
            (None, Some(text)) => Some(text.to_owned()),
            (None, None) => None,
        };

        let mut items = Vec::new();
        if let Some(combined) = combined {
            items.push(combined);
        }
        if let Some(url) = url {
            items.push(url.to_owned());
        }
        if items.is_empty() {
            items.push(SHARE_FALLBACK_TEXT.to_owned());
        }
        items
    }
}

/// Body of the `downloadImage` bridge message.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadPayload {
    pub url: String,
}

/// The app the user picked on the share sheet, mapped from the OS
/// activity-type identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareTarget {
    Message,
    Mail,
    Clipboard,
    Facebook,
    Twitter,
    Weibo,
    SaveToPhotos,
    AirDrop,
    /// Any activity the enumeration does not name.
    Other,
    /// The OS reported no activity type at all.
    Unknown,
}

impl ShareTarget {
    /// Map a raw activity-type identifier (e.g.
    /// `com.apple.UIKit.activity.Mail`) onto a named target.
    pub fn from_activity_type(activity: Option<&str>) -> Self {
        let Some(activity) = activity else {
            return Self::Unknown;
        };
        match activity {
            a if a.ends_with("activity.Message") => Self::Message,
            a if a.ends_with("activity.Mail") => Self::Mail,
            a if a.ends_with("activity.CopyToPasteboard") => Self::Clipboard,
            a if a.ends_with("activity.PostToFacebook") => Self::Facebook,
            a if a.ends_with("activity.PostToTwitter") => Self::Twitter,
            a if a.ends_with("activity.PostToWeibo") => Self::Weibo,
            a if a.ends_with("activity.SaveToCameraRoll") => Self::SaveToPhotos,
            a if a.ends_with("activity.AirDrop") => Self::AirDrop,
            _ => Self::Other,
        }
    }

    /// User-facing name for the outcome message.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Message => "메시지",
            Self::Mail => "메일",
            Self::Clipboard => "클립보드",
            Self::Facebook => "Facebook",
            Self::Twitter => "Twitter",
            Self::Weibo => "Weibo",
            Self::SaveToPhotos => "사진",
            Self::AirDrop => "AirDrop",
            Self::Other => "다른 앱",
            Self::Unknown => "알 수 없는 앱",
        }
    }
}

/// Result of a share flow, reported to the page via `onShareComplete`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareOutcome {
    pub success: bool,
    /// Raw activity-type identifier, or `"unknown"` when unreported.
    pub activity_type: String,
    /// User-facing message (Korean).
    pub message: String,
}

impl ShareOutcome {
    pub fn success(activity_type: String, message: String) -> Self {
        Self {
            success: true,
            activity_type,
            message,
        }
    }

    pub fn failure(message: String) -> Self {
        Self {
            success: false,
            activity_type: "unknown".to_owned(),
            message,
        }
    }
}

/// Result of a download flow, reported via `onImageDownloadComplete`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadOutcome {
    pub success: bool,
    pub message: String,
}

impl DownloadOutcome {
    pub fn success(message: String) -> Self {
        Self {
            success: true,
            message,
        }
    }

    pub fn failure(message: String) -> Self {
        Self {
            success: false,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_only_payload_yields_just_the_url() {
        let payload = SharePayload {
            url: Some("https://app.climingo.xyz/records/42".into()),
            ..Default::default()
        };
        assert_eq!(
            payload.share_items(),
            vec!["https://app.climingo.xyz/records/42".to_owned()]
        );
    }

    #[test]
    fn title_and_text_collapse_into_one_item() {
        let payload = SharePayload {
            text: Some("T".into()),
            url: Some("https://app.climingo.xyz".into()),
            title: Some("H".into()),
        };
        assert_eq!(
            payload.share_items(),
            vec!["H\nT".to_owned(), "https://app.climingo.xyz".to_owned()]
        );
    }

    #[test]
    fn empty_payload_falls_back_to_fixed_text() {
        let items = SharePayload::default().share_items();
        assert_eq!(items, vec![SHARE_FALLBACK_TEXT.to_owned()]);
    }

    #[test]
    fn unparseable_url_is_dropped_from_items() {
        let payload = SharePayload {
            text: Some("hello".into()),
            url: Some("not a url".into()),
            ..Default::default()
        };
        assert_eq!(payload.share_items(), vec!["hello".to_owned()]);
    }

    #[test]
    fn title_without_text_stands_alone() {
        let payload = SharePayload {
            title: Some("H".into()),
            ..Default::default()
        };
        assert_eq!(payload.share_items(), vec!["H".to_owned()]);
    }

    #[test]
    fn activity_types_map_to_korean_names() {
        let target = ShareTarget::from_activity_type(Some("com.apple.UIKit.activity.Message"));
        assert_eq!(target, ShareTarget::Message);
        assert_eq!(target.display_name(), "메시지");

        let target = ShareTarget::from_activity_type(Some("com.apple.UIKit.activity.SaveToCameraRoll"));
        assert_eq!(target.display_name(), "사진");

        let target = ShareTarget::from_activity_type(Some("com.example.someapp.extension"));
        assert_eq!(target, ShareTarget::Other);
        assert_eq!(target.display_name(), "다른 앱");

        let target = ShareTarget::from_activity_type(None);
        assert_eq!(target, ShareTarget::Unknown);
        assert_eq!(target.display_name(), "알 수 없는 앱");
    }

    #[test]
    fn environment_urls_round_trip() {
        for env in Environment::ALL {
            assert_eq!(Environment::from_base_url(env.base_url()), Some(env));
        }
        assert_eq!(Environment::from_base_url("https://example.com"), None);
    }

    #[test]
    fn share_outcome_serializes_with_camel_case_activity_type() {
        let outcome = ShareOutcome::success("com.apple.UIKit.activity.Mail".into(), "메일".into());
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"activityType\""));
        assert!(json.contains("\"success\":true"));
    }

    #[test]
    fn bridge_message_parses_name_and_body() {
        let msg = BridgeMessage::parse(r#"{"name":"share","body":{"text":"hi"}}"#).unwrap();
        assert_eq!(msg.name, "share");
        assert_eq!(msg.body["text"], "hi");
    }

    #[test]
    fn bridge_message_body_defaults_to_null() {
        let msg = BridgeMessage::parse(r#"{"name":"share"}"#).unwrap();
        assert!(msg.body.is_null());
    }
}
