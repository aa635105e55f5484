// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Certificate bootstrap — trust on first use for the local printing service.
//
// # Trust model
//
// The service listens on HTTPS with a self-signed certificate. On the first
// operation a client opens a TLS handshake with peer validation disabled,
// reads the certificate the service presents and keeps it as a PEM
// `TrustAnchor`. Every later request on that client accepts the server only
// if it presents exactly that certificate.
//
// This is pinning, not PKI validation. Whatever certificate is presented on
// the first handshake is trusted. If an attacker answers that first
// handshake, or swaps the certificate between bootstrap and a later call
// before the pin exists, nothing here notices. The service is normally bound
// to loopback, which keeps that window local to the machine; callers talking
// to a remote host accept the same exposure.
//
// The anchor is never refreshed. A service restarted with a new certificate
// makes every request fail the pin check until a new client is created.
//
// Only built where raw sockets exist.

use std::sync::Arc;

use async_trait::async_trait;
use rustls::pki_types::ServerName;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::OnceCell;
use tokio_rustls::TlsConnector;
use tracing::{debug, info, instrument};

use labelwriter_core::config::ClientConfig;
use labelwriter_core::error::{LabelWriterError, Result};

use crate::certificates::TrustAnchor;
use crate::integrity::fingerprint;
use crate::verifier::bootstrap_client_config;

/// Something that can hand over the certificate a service presents.
#[async_trait]
pub trait PeerCertificateSource: Send + Sync {
    /// Connect to `endpoint` and return the DER bytes of the peer's
    /// end-entity certificate without validating it.
    async fn fetch_peer_certificate(&self, endpoint: &ClientConfig) -> Result<Vec<u8>>;
}

/// Reads the peer certificate through a real TLS handshake.
#[derive(Debug, Default, Clone, Copy)]
pub struct TlsHandshakeSource;

#[async_trait]
impl PeerCertificateSource for TlsHandshakeSource {
    #[instrument(skip(self), fields(endpoint = %endpoint.authority()))]
    async fn fetch_peer_certificate(&self, endpoint: &ClientConfig) -> Result<Vec<u8>> {
        let addr = endpoint.authority();
        let stream = TcpStream::connect(&addr).await.map_err(|e| {
            LabelWriterError::CertificateUnavailable(format!("connect to {addr}: {e}"))
        })?;

        let server_name = server_name(endpoint)?;
        let connector = TlsConnector::from(bootstrap_client_config()?);

        debug!("starting bootstrap handshake");
        let mut tls = connector.connect(server_name, stream).await.map_err(|e| {
            LabelWriterError::CertificateUnavailable(format!("handshake with {addr}: {e}"))
        })?;

        let der = {
            let (_, session) = tls.get_ref();
            session
                .peer_certificates()
                .and_then(|chain| chain.first())
                .map(|cert| cert.as_ref().to_vec())
                .ok_or_else(|| {
                    LabelWriterError::CertificateUnavailable(format!(
                        "{addr} presented no certificate"
                    ))
                })?
        };

        // The certificate is already in hand; a failed close changes nothing.
        if let Err(e) = tls.shutdown().await {
            debug!(error = %e, "bootstrap connection did not close cleanly");
        }

        Ok(der)
    }
}

/// TLS server name for the endpoint's host (DNS name or IP literal).
pub fn server_name(endpoint: &ClientConfig) -> Result<ServerName<'static>> {
    let host = endpoint.hostname.trim_start_matches('[').trim_end_matches(']');
    ServerName::try_from(host.to_owned()).map_err(|e| {
        LabelWriterError::InvalidConfig(format!("invalid server name '{host}': {e}"))
    })
}

/// Fetches the service certificate once and hands out the cached anchor.
///
/// Concurrent first callers share a single initialisation; none of them can
/// observe a partially built anchor. A failed bootstrap caches nothing, so a
/// later call tries again.
pub struct CertificateBootstrapper {
    endpoint: ClientConfig,
    source: Arc<dyn PeerCertificateSource>,
    anchor: OnceCell<TrustAnchor>,
}

impl CertificateBootstrapper {
    /// Bootstrapper that performs a real TLS handshake.
    pub fn new(endpoint: ClientConfig) -> Self {
        Self::with_source(endpoint, Arc::new(TlsHandshakeSource))
    }

    pub fn with_source(endpoint: ClientConfig, source: Arc<dyn PeerCertificateSource>) -> Self {
        Self {
            endpoint,
            source,
            anchor: OnceCell::new(),
        }
    }

    pub fn endpoint(&self) -> &ClientConfig {
        &self.endpoint
    }

    pub fn is_bootstrapped(&self) -> bool {
        self.anchor.initialized()
    }

    /// The pinned anchor, fetching it on first use.
    pub async fn trust_anchor(&self) -> Result<&TrustAnchor> {
        self.anchor
            .get_or_try_init(|| async {
                let der = self.source.fetch_peer_certificate(&self.endpoint).await?;
                let anchor = TrustAnchor::from_der(&der)?;
                info!(
                    endpoint = %self.endpoint.authority(),
                    sha256 = %fingerprint(&der),
                    "pinned service certificate"
                );
                Ok::<_, LabelWriterError>(anchor)
            })
            .await
    }
}
