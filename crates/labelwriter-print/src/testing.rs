// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Local stand-in for the label printing service, for tests: a TLS listener on
// a free loopback port with a self-signed certificate that can be swapped
// while it runs, answering every request with the same raw HTTP bytes.

use std::sync::{Arc, Mutex};

use rustls::ServerConfig;
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;

use labelwriter_core::config::ClientConfig;

const MAX_REQUEST_HEAD: usize = 64 * 1024;

pub(crate) struct TestService {
    port: u16,
    identity: Arc<Mutex<Identity>>,
}

struct Identity {
    certificate: CertificateDer<'static>,
    config: Arc<ServerConfig>,
}

impl Identity {
    fn generate() -> Self {
        let rcgen::CertifiedKey { cert, key_pair } =
            rcgen::generate_simple_self_signed(vec!["localhost".to_string()])
                .expect("self-signed certificate");
        let certificate = cert.der().clone();
        let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key_pair.serialize_der()));

        let config = ServerConfig::builder_with_provider(Arc::new(
            rustls::crypto::ring::default_provider(),
        ))
        .with_safe_default_protocol_versions()
        .expect("protocol versions")
        .with_no_client_auth()
        .with_single_cert(vec![certificate.clone()], key)
        .expect("server certificate");

        Self {
            certificate,
            config: Arc::new(config),
        }
    }
}

/// A complete `200 OK` answer carrying `body`.
pub(crate) fn http_ok(body: &str) -> Vec<u8> {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
    .into_bytes()
}

impl TestService {
    /// Start listening; every request is answered with `response` verbatim.
    pub(crate) async fn start(response: Vec<u8>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();
        let identity = Arc::new(Mutex::new(Identity::generate()));
        let response = Arc::new(response);

        let shared = Arc::clone(&identity);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let config = Arc::clone(&shared.lock().expect("identity lock").config);
                let response = Arc::clone(&response);
                tokio::spawn(async move {
                    let Ok(mut tls) = TlsAcceptor::from(config).accept(stream).await else {
                        return;
                    };
                    let mut head = Vec::new();
                    let mut chunk = [0u8; 4096];
                    // The bootstrap handshake hangs up without sending a request.
                    loop {
                        match tls.read(&mut chunk).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => head.extend_from_slice(&chunk[..n]),
                        }
                        if head.windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                        if head.len() > MAX_REQUEST_HEAD {
                            return;
                        }
                    }
                    let _ = tls.write_all(&response).await;
                    let _ = tls.shutdown().await;
                });
            }
        });

        Self { port, identity }
    }

    pub(crate) fn endpoint(&self) -> ClientConfig {
        ClientConfig::new("127.0.0.1", self.port)
    }

    pub(crate) fn certificate(&self) -> CertificateDer<'static> {
        self.identity.lock().expect("identity lock").certificate.clone()
    }

    /// Present a freshly generated certificate on every later connection.
    pub(crate) fn rotate_certificate(&self) {
        *self.identity.lock().expect("identity lock") = Identity::generate();
    }
}
