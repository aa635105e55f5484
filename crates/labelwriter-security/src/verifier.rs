// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// rustls server certificate verifiers and the client configurations built
// around them.
//
// Two verifiers exist:
//   - `AcceptAnyServerCert`: used only for the bootstrap handshake, whose
//     sole purpose is to read the certificate the service presents.
//   - `PinnedServerCert`: used for every request; accepts the server only if
//     it presents the exact certificate captured during bootstrap.
//
// Neither performs chain, name or expiry validation. Handshake signatures are
// still checked with the ring provider so the peer must hold the private key
// of the certificate it presents.

use std::sync::Arc;

use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{CryptoProvider, verify_tls12_signature, verify_tls13_signature};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, SignatureScheme};
use tracing::warn;

use labelwriter_core::error::{LabelWriterError, Result};

use crate::certificates::TrustAnchor;
use crate::integrity::verify_fingerprint;

fn ring_provider() -> Arc<CryptoProvider> {
    Arc::new(rustls::crypto::ring::default_provider())
}

/// Build a client configuration around `verifier`, scoped to the connections
/// that use it.
fn client_config_with(
    provider: Arc<CryptoProvider>,
    verifier: Arc<dyn ServerCertVerifier>,
) -> Result<Arc<ClientConfig>> {
    let config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| LabelWriterError::Transport(format!("TLS protocol setup: {e}")))?
        .dangerous()
        .with_custom_certificate_verifier(verifier)
        .with_no_client_auth();
    Ok(Arc::new(config))
}

/// Configuration for the one-off handshake that captures the service's
/// certificate. Accepts whatever the peer presents.
pub fn bootstrap_client_config() -> Result<Arc<ClientConfig>> {
    let provider = ring_provider();
    let verifier = Arc::new(AcceptAnyServerCert {
        provider: Arc::clone(&provider),
    });
    client_config_with(provider, verifier)
}

/// Configuration that trusts `anchor` and nothing else.
pub fn pinned_client_config(anchor: &TrustAnchor) -> Result<Arc<ClientConfig>> {
    let provider = ring_provider();
    let verifier = Arc::new(PinnedServerCert {
        fingerprint: anchor.fingerprint()?,
        provider: Arc::clone(&provider),
    });
    client_config_with(provider, verifier)
}

#[derive(Debug)]
struct AcceptAnyServerCert {
    provider: Arc<CryptoProvider>,
}

impl ServerCertVerifier for AcceptAnyServerCert {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(message, cert, dss, &self.provider.signature_verification_algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(message, cert, dss, &self.provider.signature_verification_algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}

#[derive(Debug)]
struct PinnedServerCert {
    /// SHA-256 of the pinned certificate's DER encoding.
    fingerprint: String,
    provider: Arc<CryptoProvider>,
}

impl ServerCertVerifier for PinnedServerCert {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, rustls::Error> {
        verify_fingerprint(end_entity.as_ref(), &self.fingerprint)
            .map(|()| ServerCertVerified::assertion())
            .map_err(|e| {
                warn!(error = %e, "service presented an unpinned certificate");
                rustls::Error::General(e.to_string())
            })
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(message, cert, dss, &self.provider.signature_verification_algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(message, cert, dss, &self.provider.signature_verification_algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}
