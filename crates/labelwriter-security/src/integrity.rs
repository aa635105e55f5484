// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Certificate fingerprints — SHA-256 over DER bytes.

use labelwriter_core::error::LabelWriterError;
use sha2::{Digest, Sha256};

/// Compute the SHA-256 of `der` and return it as a lowercase hex string.
///
/// Used to identify the pinned certificate in logs and to compare it with
/// whatever the service presents on later connections.
pub fn fingerprint(der: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(der);
    hex::encode(hasher.finalize())
}

/// Check that `der` hashes to `expected_hex`.
///
/// Fails with `CertificateUnavailable` naming both fingerprints when the
/// presented certificate is not the pinned one.
pub fn verify_fingerprint(der: &[u8], expected_hex: &str) -> Result<(), LabelWriterError> {
    let actual = fingerprint(der);
    if actual == expected_hex {
        Ok(())
    } else {
        Err(LabelWriterError::CertificateUnavailable(format!(
            "certificate does not match pinned anchor: expected {expected_hex}, got {actual}"
        )))
    }
}
