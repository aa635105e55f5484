// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the LabelWriter client.

use thiserror::Error;

/// Top-level error type for all LabelWriter operations.
#[derive(Debug, Error)]
pub enum LabelWriterError {
    // -- Trust bootstrap --
    #[error("service certificate unavailable: {0}")]
    CertificateUnavailable(String),

    // -- Network --
    #[error("transport error: {0}")]
    Transport(String),

    // -- Response decoding --
    #[error("could not parse service response: {0}")]
    Parse(String),

    #[error("service reported failure: {0}")]
    ServiceFailure(String),

    // -- Configuration --
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LabelWriterError>;
