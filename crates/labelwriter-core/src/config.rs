// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Client configuration: where the label printing service lives.

use serde::{Deserialize, Serialize};

use crate::error::{LabelWriterError, Result};

/// Host the service binds to out of the box.
pub const DEFAULT_HOSTNAME: &str = "127.0.0.1";

/// Port the service listens on out of the box.
pub const DEFAULT_PORT: u16 = 41951;

/// Path prefix shared by every service operation.
pub const SERVICE_PATH: &str = "/DYMO/DLS/Printing";

/// Endpoint of the label printing web service.
///
/// Fixed for the lifetime of a client; a different endpoint needs a new
/// client (and therefore a new certificate bootstrap).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Host name or IP literal of the service.
    pub hostname: String,
    /// TCP port of the service.
    pub port: u16,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            hostname: DEFAULT_HOSTNAME.into(),
            port: DEFAULT_PORT,
        }
    }
}

impl ClientConfig {
    pub fn new(hostname: impl Into<String>, port: u16) -> Self {
        Self {
            hostname: hostname.into(),
            port,
        }
    }

    /// Reject endpoints that can never be connected to.
    pub fn validate(&self) -> Result<()> {
        if self.hostname.trim().is_empty() {
            return Err(LabelWriterError::InvalidConfig(
                "hostname must not be empty".into(),
            ));
        }
        if self.port == 0 {
            return Err(LabelWriterError::InvalidConfig(
                "port must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// `host:port`, with IPv6 literals bracketed.
    pub fn authority(&self) -> String {
        if self.hostname.contains(':') && !self.hostname.starts_with('[') {
            format!("[{}]:{}", self.hostname, self.port)
        } else {
            format!("{}:{}", self.hostname, self.port)
        }
    }

    /// Base URL every operation hangs off.
    pub fn base_url(&self) -> String {
        format!("https://{}{}", self.authority(), SERVICE_PATH)
    }

    /// Absolute request path for a service operation (may include a query).
    pub fn operation_path(operation: &str) -> String {
        format!("{SERVICE_PATH}/{operation}")
    }
}
