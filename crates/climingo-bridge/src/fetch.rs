// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Byte-fetch capability behind the download handler.
//
// Injectable so handler tests can count or fake network activity without a
// server.

use climingo_core::error::{ClimingoError, Result};
use url::Url;

/// Fetch the raw bytes behind a URL. Single attempt, no retry; callers run
/// this on the blocking pool.
pub trait FetchBytes: Send + Sync {
    fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>>;
}

/// reqwest-backed fetcher with the platform-default timeout.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchBytes for HttpFetcher {
    fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| ClimingoError::Download(e.to_string()))?
            .error_for_status()
            .map_err(|e| ClimingoError::Download(e.to_string()))?;
        let bytes = response
            .bytes()
            .map_err(|e| ClimingoError::Download(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
