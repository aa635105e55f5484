// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Native request engine: `reqwest` over a rustls configuration that pins the
// service certificate.
//
// The first request bootstraps the trust anchor, then builds one HTTP client
// around the pinned configuration. Every later request reuses that client, so
// the pin check runs on each new connection it opens.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, instrument};

use labelwriter_core::config::ClientConfig;
use labelwriter_core::error::{LabelWriterError, Result};
use labelwriter_security::{CertificateBootstrapper, pinned_client_config};

use crate::transport::{self, Transport, TransportRequest, UniformResponse};

/// Engine that pins the service certificate fetched by its bootstrapper.
pub struct NativeTransport {
    bootstrapper: Arc<CertificateBootstrapper>,
    /// `https://host:port`, prepended to request paths.
    origin: String,
    /// Built once from the pinned anchor, which never changes.
    client: OnceCell<reqwest::Client>,
}

impl NativeTransport {
    pub fn new(endpoint: ClientConfig) -> Self {
        Self::with_bootstrapper(Arc::new(CertificateBootstrapper::new(endpoint)))
    }

    pub fn with_bootstrapper(bootstrapper: Arc<CertificateBootstrapper>) -> Self {
        let origin = format!("https://{}", bootstrapper.endpoint().authority());
        Self {
            bootstrapper,
            origin,
            client: OnceCell::new(),
        }
    }

    pub fn bootstrapper(&self) -> &CertificateBootstrapper {
        &self.bootstrapper
    }

    async fn client(&self) -> Result<&reqwest::Client> {
        self.client
            .get_or_try_init(|| async {
                let anchor = self.bootstrapper.trust_anchor().await?;
                let tls = Arc::unwrap_or_clone(pinned_client_config(anchor)?);
                let client = reqwest::Client::builder()
                    .use_preconfigured_tls(tls)
                    .no_proxy()
                    .build()
                    .map_err(|e| LabelWriterError::Transport(format!("pinned client setup: {e}")))?;
                debug!(origin = %self.origin, "pinned HTTP client ready");
                Ok::<_, LabelWriterError>(client)
            })
            .await
    }
}

#[async_trait]
impl Transport for NativeTransport {
    #[instrument(skip(self, request), fields(method = request.method.as_str(), path = %request.path))]
    async fn request(&self, request: TransportRequest) -> Result<UniformResponse> {
        let client = self.client().await?;
        transport::execute(client, &self.origin, request).await
    }
}
