// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// labelwriter-security — trust bootstrap for the local label printing service.
//
// The service answers over HTTPS with a self-signed certificate that no trust
// store knows about. This crate fetches that certificate once, keeps it as
// the only accepted server identity, and builds per-connection rustls
// configurations around it. Nothing here touches process-wide TLS settings.
//
// Capturing and pinning need raw sockets, so `bootstrap` and `verifier` are
// not built for wasm32.

#[cfg(not(target_arch = "wasm32"))]
pub mod bootstrap;
pub mod certificates;
pub mod integrity;
#[cfg(not(target_arch = "wasm32"))]
pub mod verifier;

// PUBLIC API: Re-export the trust primitives
#[cfg(not(target_arch = "wasm32"))]
pub use bootstrap::{CertificateBootstrapper, PeerCertificateSource, TlsHandshakeSource};
pub use certificates::TrustAnchor;
pub use integrity::{fingerprint, verify_fingerprint};
#[cfg(not(target_arch = "wasm32"))]
pub use verifier::{bootstrap_client_config, pinned_client_config};
