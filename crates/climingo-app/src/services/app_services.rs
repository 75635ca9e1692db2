// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — owns the persisted configuration.
//
// The config is the shell's only durable state: the active base URL (and
// the optional image-download flag), read once at startup and rewritten
// when developer mode switches environments.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use climingo_core::AppConfig;
use climingo_core::error::Result;
use climingo_core::types::Environment;
use tracing::info;

use super::data_dir;

/// Shared application services. All fields are cheaply cloneable
/// (Arc-wrapped) so the struct can be passed into closures without
/// lifetime issues.
#[derive(Clone)]
pub struct AppServices {
    config: Arc<Mutex<AppConfig>>,
    data_dir: PathBuf,
}

impl AppServices {
    /// Initialise services against the default data directory. Call once
    /// at app startup.
    pub fn init() -> Result<Self> {
        Self::init_at(data_dir::data_dir())
    }

    /// Initialise services against an explicit data directory.
    pub fn init_at(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)?;

        // Load persisted config or use defaults
        let config = load_config(&dir).unwrap_or_default();
        info!(path = %dir.display(), base_url = %config.base_url, "app services initialised");

        Ok(Self {
            config: Arc::new(Mutex::new(config)),
            data_dir: dir,
        })
    }

    /// In-memory fallback when persistent storage is unusable. Environment
    /// switches still apply for the session but will not survive a restart.
    pub fn fallback() -> Self {
        Self {
            config: Arc::new(Mutex::new(AppConfig::default())),
            data_dir: std::env::temp_dir(),
        }
    }

    // -- Config --------------------------------------------------------------

    /// Get a clone of the current config.
    pub fn config(&self) -> AppConfig {
        self.config.lock().expect("config lock poisoned").clone()
    }

    /// Base URL the render surface should load.
    pub fn base_url(&self) -> String {
        self.config.lock().expect("config lock poisoned").base_url.clone()
    }

    /// Whether the optional `downloadImage` handler should be registered.
    pub fn image_download_enabled(&self) -> bool {
        self.config
            .lock()
            .expect("config lock poisoned")
            .image_download_enabled
    }

    /// Persist a new target environment.
    ///
    /// The caller is responsible for reloading the render surface; a fresh
    /// process start also honours the persisted URL.
    pub fn switch_environment(&self, env: Environment) -> Result<()> {
        let updated = {
            let mut config = self.config.lock().expect("config lock poisoned");
            config.base_url = env.base_url().to_owned();
            config.clone()
        };
        info!(env = env.label(), base_url = %updated.base_url, "environment switched");
        persist_config(&self.data_dir, &updated)
    }

    /// Path to the data directory.
    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }
}

// -- Config file persistence -------------------------------------------------

const CONFIG_FILE: &str = "config.json";

fn load_config(data_dir: &Path) -> Option<AppConfig> {
    let path = data_dir.join(CONFIG_FILE);
    let data = std::fs::read_to_string(&path).ok()?;
    serde_json::from_str(&data).ok()
}

fn persist_config(data_dir: &Path, config: &AppConfig) -> Result<()> {
    let path = data_dir.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_directory_defaults_to_production() {
        let dir = tempfile::tempdir().unwrap();
        let services = AppServices::init_at(dir.path().to_path_buf()).unwrap();
        assert_eq!(services.base_url(), Environment::Production.base_url());
        assert!(services.image_download_enabled());
    }

    #[test]
    fn environment_switch_survives_a_restart() {
        let dir = tempfile::tempdir().unwrap();

        let services = AppServices::init_at(dir.path().to_path_buf()).unwrap();
        services.switch_environment(Environment::Dev).unwrap();
        assert_eq!(services.base_url(), Environment::Dev.base_url());
        drop(services);

        // Simulated restart: a fresh service layer over the same directory
        // must load the persisted dev URL, not the production default.
        let services = AppServices::init_at(dir.path().to_path_buf()).unwrap();
        assert_eq!(services.base_url(), Environment::Dev.base_url());
    }

    #[test]
    fn corrupt_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "not json").unwrap();

        let services = AppServices::init_at(dir.path().to_path_buf()).unwrap();
        assert_eq!(services.base_url(), Environment::Production.base_url());
    }
}
