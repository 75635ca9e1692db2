// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the Climingo shell.

use thiserror::Error;

/// Top-level error type for all shell operations.
#[derive(Debug, Error)]
pub enum ClimingoError {
    // -- Bridge payloads --
    #[error("malformed bridge payload: {0}")]
    Payload(String),

    #[error("invalid image URL: {0}")]
    InvalidImageUrl(String),

    // -- Download --
    #[error("image download failed: {0}")]
    Download(String),

    #[error("downloaded bytes are not a decodable image")]
    InvalidImageFormat,

    #[error("photo library save failed: {0}")]
    PhotoSave(String),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ClimingoError>;
