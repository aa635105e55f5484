// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fetch-style request engine built on `reqwest`.
//
// # Design note
//
// This engine is for hosts without raw socket access, where the trust anchor
// cannot be injected. On wasm32 requests go through the browser's fetch, so
// the browser's own trust decides whether the service certificate is
// accepted. Elsewhere the HTTP client's relaxed-TLS switch is set on this
// client instance only: certificate validation is off for requests made
// through this transport and unaffected everywhere else in the process. That
// is weaker than the native engine's pinning, which is why the native engine
// is preferred wherever it is available.

use async_trait::async_trait;
use tracing::instrument;

use labelwriter_core::config::ClientConfig;
use labelwriter_core::error::{LabelWriterError, Result};

use crate::transport::{self, Transport, TransportRequest, UniformResponse};

pub struct FetchTransport {
    client: reqwest::Client,
    /// `https://host:port`, prepended to request paths.
    origin: String,
}

impl FetchTransport {
    pub fn new(endpoint: &ClientConfig) -> Result<Self> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.danger_accept_invalid_certs(true);
        let client = builder
            .build()
            .map_err(|e| LabelWriterError::Transport(format!("fetch client setup: {e}")))?;
        Ok(Self {
            client,
            origin: format!("https://{}", endpoint.authority()),
        })
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl Transport for FetchTransport {
    #[instrument(skip(self, request), fields(method = request.method.as_str(), path = %request.path))]
    async fn request(&self, request: TransportRequest) -> Result<UniformResponse> {
        transport::execute(&self.client, &self.origin, request).await
    }
}
