// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Transport abstraction over the two request engines.
//
// Both engines hand HTTP to `reqwest` and differ only in how the client's
// TLS is set up. Their answers are normalised to `UniformResponse` before any
// parsing happens, so the operations in `client` never see which engine
// carried the request.
//
// Engine selection is decided at compile time: the native engine needs raw
// sockets and is not built for wasm32, where only the fetch engine exists.

use std::error::Error as _;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use labelwriter_core::config::ClientConfig;
use labelwriter_core::error::{LabelWriterError, Result};

use crate::fetch::FetchTransport;
#[cfg(not(target_arch = "wasm32"))]
use crate::native::NativeTransport;

/// Content type of every request body the service accepts.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// A single request to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub method: Method,
    /// Absolute path including any query string.
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl TransportRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// POST with an already form-encoded body.
    pub fn post_form(path: impl Into<String>, body: String) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            headers: vec![("Content-Type".into(), FORM_CONTENT_TYPE.into())],
            body: Some(body),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Engine-independent view of a completed response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformResponse {
    /// `true` for 2xx statuses.
    pub ok: bool,
    pub status: u16,
    pub body: String,
}

impl UniformResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            ok: (200..300).contains(&status),
            status,
            body: body.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.body
    }
}

/// Issues requests to the service and collects the whole response.
#[cfg(not(target_arch = "wasm32"))]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and wait for the complete response. Connection and
    /// protocol failures come back as `Err`; any HTTP status is `Ok`.
    async fn request(&self, request: TransportRequest) -> Result<UniformResponse>;
}

/// Issues requests to the service and collects the whole response.
///
/// Browser futures are not `Send`, so neither is this trait on wasm32.
#[cfg(target_arch = "wasm32")]
#[async_trait(?Send)]
pub trait Transport {
    async fn request(&self, request: TransportRequest) -> Result<UniformResponse>;
}

/// Which engine a client uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Raw socket + rustls; can pin the service certificate.
    Native,
    /// Fetch-style HTTP client; cannot take a custom trust anchor.
    Fetch,
}

impl TransportKind {
    /// Pick the engine the build target supports. Targets with raw socket
    /// access get the native engine; `wasm32` only has fetch.
    pub fn detect() -> Self {
        if cfg!(target_arch = "wasm32") {
            Self::Fetch
        } else {
            Self::Native
        }
    }

    pub fn build(self, config: &ClientConfig) -> Result<Arc<dyn Transport>> {
        match self {
            #[cfg(not(target_arch = "wasm32"))]
            Self::Native => Ok(Arc::new(NativeTransport::new(config.clone()))),
            #[cfg(target_arch = "wasm32")]
            Self::Native => Err(LabelWriterError::InvalidConfig(
                "the native engine needs raw sockets, which this target lacks".into(),
            )),
            Self::Fetch => Ok(Arc::new(FetchTransport::new(config)?)),
        }
    }
}

/// Send `request` through `client` to the service at `origin`
/// (`https://host:port`) and collect the whole answer.
pub(crate) async fn execute(
    client: &reqwest::Client,
    origin: &str,
    request: TransportRequest,
) -> Result<UniformResponse> {
    let url = format!("{origin}{}", request.path);
    let mut builder = match request.method {
        Method::Get => client.get(&url),
        Method::Post => client.post(&url),
    };
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    if let Some(body) = request.body {
        builder = builder.body(body);
    }

    let response = builder
        .send()
        .await
        .map_err(|e| LabelWriterError::Transport(format!("{url}: {}", error_chain(&e))))?;
    let status = response.status().as_u16();
    let body = response.text().await.map_err(|e| {
        LabelWriterError::Transport(format!("read body from {url}: {}", error_chain(&e)))
    })?;

    debug!(status, len = body.len(), "response received");
    Ok(UniformResponse::new(status, body))
}

/// `reqwest` keeps the interesting part (refused connection, failed pin) in
/// the source chain rather than its own message.
fn error_chain(err: &reqwest::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
