// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Trust anchor: the service certificate kept as PEM.
//
// How the anchor is captured and pinned lives in `bootstrap` and `verifier`,
// which need raw sockets. This module only encodes and decodes, so it builds
// on every target.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use labelwriter_core::error::{LabelWriterError, Result};

use crate::integrity::fingerprint;

const PEM_BEGIN: &str = "-----BEGIN CERTIFICATE-----";
const PEM_END: &str = "-----END CERTIFICATE-----";
const PEM_LINE_WIDTH: usize = 64;

/// A PEM-encoded certificate used as the only accepted server identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustAnchor {
    pem: String,
}

impl TrustAnchor {
    /// Encode raw certificate bytes as a single PEM block.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        if der.is_empty() {
            return Err(LabelWriterError::CertificateUnavailable(
                "peer presented an empty certificate".into(),
            ));
        }

        let body = STANDARD.encode(der);
        let mut pem = String::with_capacity(body.len() + body.len() / PEM_LINE_WIDTH + 64);
        pem.push_str(PEM_BEGIN);
        pem.push('\n');
        for line in body.as_bytes().chunks(PEM_LINE_WIDTH) {
            // base64 output is ASCII, so any chunk boundary is a char boundary.
            pem.push_str(std::str::from_utf8(line).unwrap_or_default());
            pem.push('\n');
        }
        pem.push_str(PEM_END);
        pem.push('\n');
        Ok(Self { pem })
    }

    pub fn as_pem(&self) -> &str {
        &self.pem
    }

    /// Decode the PEM block back into certificate bytes.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        let mut reader = self.pem.as_bytes();
        let cert = rustls_pemfile::certs(&mut reader)
            .next()
            .ok_or_else(|| {
                LabelWriterError::CertificateUnavailable("trust anchor holds no certificate".into())
            })?
            .map_err(|e| LabelWriterError::CertificateUnavailable(format!("trust anchor PEM: {e}")))?;
        Ok(cert.as_ref().to_vec())
    }

    /// Lowercase hex SHA-256 of the certificate bytes.
    pub fn fingerprint(&self) -> Result<String> {
        Ok(fingerprint(&self.to_der()?))
    }
}
