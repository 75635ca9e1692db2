// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use serde::{Deserialize, Serialize};

use crate::types::Environment;

/// Persistent application settings.
///
/// The base URL is the shell's only durable state of interest: it is read
/// once at startup and rewritten when developer mode switches environments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL the render surface loads on startup.
    pub base_url: String,
    /// Whether the optional `downloadImage` bridge handler is registered.
    pub image_download_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: Environment::Production.base_url().to_owned(),
            image_download_enabled: true,
        }
    }
}

impl AppConfig {
    /// The environment the stored base URL belongs to, if it is one of the
    /// enumerated endpoints.
    pub fn environment(&self) -> Option<Environment> {
        Environment::from_base_url(&self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_production() {
        let config = AppConfig::default();
        assert_eq!(config.base_url, "https://app.climingo.xyz");
        assert_eq!(config.environment(), Some(Environment::Production));
        assert!(config.image_download_enabled);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.environment(), Some(Environment::Production));
    }
}
