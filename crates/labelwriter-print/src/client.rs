// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Client for the local label printing service.
//
// Operations:
//   - GetPrinters                       (printer directory)
//   - GetConsumableInfoIn550Printer     (label stock)
//   - RenderLabel                       (PNG preview)
//   - PrintLabel                        (print job)
//
// Every public operation returns `OperationResult`; nothing is raised across
// this boundary.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use labelwriter_core::config::ClientConfig;
use labelwriter_core::error::{LabelWriterError, Result};
use labelwriter_core::types::{ConsumableInfo, LabelParameters, OperationResult, Printer};

use crate::consumables::parse_consumable_info;
use crate::params::encode_params;
use crate::printers::parse_printers;
use crate::transport::{Transport, TransportKind, TransportRequest, UniformResponse};

/// Prefix turning the rendered base64 into a usable image URI.
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// The only body `PrintLabel` answers with on success.
const PRINT_ACCEPTED: &str = "true";

/// Async client bound to one service endpoint.
///
/// Cloning is cheap and clones share the transport, so they also share the
/// pinned certificate.
#[derive(Clone)]
pub struct LabelWriterClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl LabelWriterClient {
    /// Create a client for `config`, using the engine the host supports.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let kind = TransportKind::detect();
        let transport = kind.build(&config)?;
        info!(base_url = %config.base_url(), engine = ?kind, "label printing client created");
        Ok(Self { config, transport })
    }

    /// Create a client that sends requests through `transport`.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// List the printers the service knows about.
    #[instrument(skip(self))]
    pub async fn get_printers(&self) -> OperationResult<Vec<Printer>> {
        finish("GetPrinters", self.fetch_printers().await)
    }

    /// Query the label stock loaded in `printer_name`.
    #[instrument(skip(self))]
    pub async fn get_consumable_info(&self, printer_name: &str) -> OperationResult<ConsumableInfo> {
        finish(
            "GetConsumableInfoIn550Printer",
            self.fetch_consumable_info(printer_name).await,
        )
    }

    /// Render `label_xml` to a `data:image/png;base64,…` URI.
    #[instrument(skip(self, label_xml), fields(label_len = label_xml.len()))]
    pub async fn render_label(&self, label_xml: &str) -> OperationResult<String> {
        finish("RenderLabel", self.send_render(label_xml).await)
    }

    /// Print `label_xml` on `printer_name`. `None` parameters print one copy
    /// with the service defaults.
    #[instrument(skip(self, label_xml, parameters), fields(label_len = label_xml.len()))]
    pub async fn print_label(
        &self,
        printer_name: &str,
        label_xml: &str,
        parameters: Option<&LabelParameters>,
    ) -> OperationResult<bool> {
        finish(
            "PrintLabel",
            self.send_print(printer_name, label_xml, parameters).await,
        )
    }

    async fn fetch_printers(&self) -> Result<Vec<Printer>> {
        let request = TransportRequest::get(ClientConfig::operation_path("GetPrinters"));
        let response = self.send(request).await?;
        parse_printers(response.text())
    }

    async fn fetch_consumable_info(&self, printer_name: &str) -> Result<ConsumableInfo> {
        let operation = format!(
            "GetConsumableInfoIn550Printer?printerName={}",
            urlencoding::encode(printer_name)
        );
        let request = TransportRequest::get(ClientConfig::operation_path(&operation));
        let response = self.send(request).await?;
        parse_consumable_info(response.text())
    }

    async fn send_render(&self, label_xml: &str) -> Result<String> {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("labelXml", label_xml)
            .finish();
        let request = TransportRequest::post_form(ClientConfig::operation_path("RenderLabel"), body);
        let response = self.send(request).await?;
        decode_render_response(response.text())
    }

    async fn send_print(
        &self,
        printer_name: &str,
        label_xml: &str,
        parameters: Option<&LabelParameters>,
    ) -> Result<bool> {
        let params_xml = encode_params(parameters.unwrap_or(&LabelParameters::default()));
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("printerName", printer_name)
            .append_pair("labelXml", label_xml)
            .append_pair("printParamsXml", &params_xml)
            .finish();
        let request = TransportRequest::post_form(ClientConfig::operation_path("PrintLabel"), body);
        let response = self.send(request).await?;
        decode_print_response(response.text())
    }

    async fn send(&self, request: TransportRequest) -> Result<UniformResponse> {
        let response = self.transport.request(request).await?;
        if !response.ok {
            warn!(status = response.status, "service answered with a non-success status");
        }
        Ok(response)
    }
}

/// Log a failed operation and wrap the outcome.
fn finish<T>(operation: &str, result: Result<T>) -> OperationResult<T> {
    if let Err(e) = &result {
        warn!(operation, error = %e, "operation failed");
    }
    result.into()
}

/// Turn the quoted base64 `RenderLabel` body into a PNG data URI.
///
/// The body must be exactly `"<base64>"`: the first and last characters are
/// dropped and nothing else is interpreted.
pub fn decode_render_response(body: &str) -> Result<String> {
    let image = body
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(|| {
            LabelWriterError::Parse(format!(
                "render response is not a quoted string ({} bytes)",
                body.len()
            ))
        })?;
    Ok(format!("{PNG_DATA_URI_PREFIX}{image}"))
}

/// `PrintLabel` succeeded only if the body is exactly `true`; anything else
/// is returned as the failure detail.
pub fn decode_print_response(body: &str) -> Result<bool> {
    if body == PRINT_ACCEPTED {
        Ok(true)
    } else {
        Err(LabelWriterError::ServiceFailure(body.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use labelwriter_security::{CertificateBootstrapper, PeerCertificateSource};

    use super::*;
    use crate::native::NativeTransport;
    use crate::testing::{TestService, http_ok};
    use crate::transport::{FORM_CONTENT_TYPE, Method};

    /// Transport that records requests and answers with a canned body.
    struct MockTransport {
        reply: std::result::Result<UniformResponse, String>,
        requests: Mutex<Vec<TransportRequest>>,
    }

    impl MockTransport {
        fn replying(body: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(UniformResponse::new(200, body)),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn failing(detail: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(detail.to_owned()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn last_request(&self) -> TransportRequest {
            self.requests
                .lock()
                .expect("lock")
                .last()
                .cloned()
                .expect("a request was sent")
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn request(&self, request: TransportRequest) -> Result<UniformResponse> {
            self.requests.lock().expect("lock").push(request);
            self.reply
                .clone()
                .map_err(LabelWriterError::Transport)
        }
    }

    fn client_with(transport: Arc<MockTransport>) -> LabelWriterClient {
        LabelWriterClient::with_transport(ClientConfig::default(), transport)
    }

    fn closed_port() -> u16 {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    }

    const LABEL: &str = "<DYMOLabel>Test</DYMOLabel>";

    #[tokio::test]
    async fn get_printers_parses_directory() {
        let transport = MockTransport::replying(
            "<Printers><LabelWriterPrinter><Name>LabelWriter</Name>\
             <ModelName>DYMO LabelWriter 550</ModelName><IsConnected>True</IsConnected>\
             <IsLocal>True</IsLocal><IsTwinTurbo>False</IsTwinTurbo>\
             </LabelWriterPrinter></Printers>",
        );
        let client = client_with(transport.clone());

        let result = client.get_printers().await;
        assert!(result.is_success());
        assert_eq!(
            result.data().expect("printers"),
            &vec![Printer {
                name: "LabelWriter".into(),
                model: "DYMO LabelWriter 550".into(),
                connected: true,
                local: true,
                twin_turbo: false,
            }]
        );

        let request = transport.last_request();
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.path, "/DYMO/DLS/Printing/GetPrinters");
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn get_printers_transport_error_is_failure() {
        let client = client_with(MockTransport::failing("Network error"));
        let result = client.get_printers().await;
        assert!(!result.is_success());
        assert!(matches!(result.error(), Some(LabelWriterError::Transport(_))));
    }

    #[tokio::test]
    async fn get_printers_malformed_xml_is_parse_failure() {
        let client = client_with(MockTransport::replying("<Printers><Oops></Printers>"));
        let result = client.get_printers().await;
        assert!(matches!(result.error(), Some(LabelWriterError::Parse(_))));
    }

    #[tokio::test]
    async fn get_printers_error_page_is_parse_failure() {
        let client = client_with(MockTransport::replying(
            "<html><body>500 Internal Server Error</body></html>",
        ));
        let result = client.get_printers().await;
        assert!(matches!(result.error(), Some(LabelWriterError::Parse(_))));
    }

    #[tokio::test]
    async fn render_label_builds_data_uri() {
        let transport = MockTransport::replying("\"abc123\"");
        let client = client_with(transport.clone());

        let result = client.render_label(LABEL).await;
        assert_eq!(
            result.data().map(String::as_str),
            Some("data:image/png;base64,abc123")
        );

        let request = transport.last_request();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.path, "/DYMO/DLS/Printing/RenderLabel");
        assert_eq!(request.header("Content-Type"), Some(FORM_CONTENT_TYPE));
        assert_eq!(
            request.body.as_deref(),
            Some("labelXml=%3CDYMOLabel%3ETest%3C%2FDYMOLabel%3E")
        );
    }

    #[tokio::test]
    async fn render_label_rejects_unquoted_body() {
        for body in ["", "\"", "abc123", "\"abc123"] {
            let client = client_with(MockTransport::replying(body));
            let result = client.render_label(LABEL).await;
            assert!(
                matches!(result.error(), Some(LabelWriterError::Parse(_))),
                "body {body:?} should fail"
            );
        }
    }

    #[tokio::test]
    async fn print_label_true_is_success() {
        let transport = MockTransport::replying("true");
        let client = client_with(transport.clone());

        let params = LabelParameters::default().with_copies(2);
        let result = client
            .print_label("DYMO LabelWriter 550", LABEL, Some(&params))
            .await;
        assert!(result.is_success());
        assert_eq!(result.data(), Some(&true));

        let request = transport.last_request();
        assert_eq!(request.path, "/DYMO/DLS/Printing/PrintLabel");
        assert_eq!(
            request.body.as_deref(),
            Some(
                "printerName=DYMO+LabelWriter+550\
                 &labelXml=%3CDYMOLabel%3ETest%3C%2FDYMOLabel%3E\
                 &printParamsXml=%3CLabelWriterPrintParams%3E%3CCopies%3E2%3C%2FCopies%3E%3C%2FLabelWriterPrintParams%3E"
            )
        );
    }

    #[tokio::test]
    async fn print_label_without_parameters_sends_one_copy() {
        let transport = MockTransport::replying("true");
        let client = client_with(transport.clone());

        assert!(client.print_label("P", LABEL, None).await.is_success());
        let body = transport.last_request().body.expect("body");
        assert!(body.ends_with("%3CCopies%3E1%3C%2FCopies%3E%3C%2FLabelWriterPrintParams%3E"));
    }

    #[tokio::test]
    async fn print_label_other_bodies_are_service_failures() {
        for body in ["false", "", "True", "Printer 'X' not found"] {
            let client = client_with(MockTransport::replying(body));
            let result = client.print_label("X", LABEL, None).await;
            assert!(!result.is_success());
            match result.error() {
                Some(LabelWriterError::ServiceFailure(detail)) => assert_eq!(detail, body),
                other => panic!("unexpected outcome for {body:?}: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn consumable_info_encodes_printer_name() {
        let transport = MockTransport::replying(r#"{"sku":"S0722540","labelsRemaining":999}"#);
        let client = client_with(transport.clone());

        let result = client.get_consumable_info("DYMO LabelWriter 550").await;
        assert_eq!(
            result.data(),
            Some(&ConsumableInfo {
                sku: Some("S0722540".into()),
                labels_remaining: 999,
            })
        );
        assert_eq!(
            transport.last_request().path,
            "/DYMO/DLS/Printing/GetConsumableInfoIn550Printer?printerName=DYMO%20LabelWriter%20550"
        );
    }

    #[tokio::test]
    async fn consumable_info_without_marker_is_success() {
        let client = client_with(MockTransport::replying("No consumable information"));
        let result = client.get_consumable_info("LabelWriter 450").await;
        assert!(result.is_success());
        assert_eq!(result.data(), Some(&ConsumableInfo::default()));
    }

    #[tokio::test]
    async fn refused_connection_is_failure_not_panic() {
        let client =
            LabelWriterClient::new(ClientConfig::new("127.0.0.1", closed_port())).expect("client");

        assert!(!client.get_printers().await.is_success());
        assert!(!client.get_consumable_info("P").await.is_success());
        assert!(!client.render_label(LABEL).await.is_success());
        assert!(!client.print_label("P", LABEL, None).await.is_success());
    }

    #[tokio::test]
    async fn live_service_is_pinned_on_first_use() {
        let service = TestService::start(http_ok(
            "<Printers><LabelWriterPrinter><Name>LabelWriter</Name>\
             <ModelName>DYMO LabelWriter 550</ModelName><IsConnected>True</IsConnected>\
             </LabelWriterPrinter></Printers>",
        ))
        .await;
        let client = LabelWriterClient::new(service.endpoint()).expect("client");

        let result = client.get_printers().await;
        let printers = result.data().expect("printers over the pinned connection");
        assert_eq!(printers.len(), 1);
        assert_eq!(printers[0].model, "DYMO LabelWriter 550");
        assert!(printers[0].connected);

        // A service restarted with a new certificate no longer matches the pin.
        service.rotate_certificate();
        let result = client.get_printers().await;
        assert!(
            matches!(result.error(), Some(LabelWriterError::Transport(_))),
            "unexpected outcome: {result:?}"
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(matches!(
            LabelWriterClient::new(ClientConfig::new("", 41951)),
            Err(LabelWriterError::InvalidConfig(_))
        ));
    }

    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PeerCertificateSource for CountingSource {
        async fn fetch_peer_certificate(&self, _endpoint: &ClientConfig) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            Ok(b"service-cert".to_vec())
        }
    }

    #[tokio::test]
    async fn concurrent_first_operations_bootstrap_once() {
        let config = ClientConfig::new("127.0.0.1", closed_port());
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let bootstrapper = Arc::new(CertificateBootstrapper::with_source(
            config.clone(),
            source.clone(),
        ));
        let client = LabelWriterClient::with_transport(
            config,
            Arc::new(NativeTransport::with_bootstrapper(bootstrapper)),
        );

        let mut tasks = Vec::new();
        for i in 0..8 {
            let client = client.clone();
            tasks.push(tokio::spawn(async move {
                if i % 2 == 0 {
                    client.get_printers().await.is_success()
                } else {
                    client.print_label("P", LABEL, None).await.is_success()
                }
            }));
        }
        for task in tasks {
            // Nothing listens on the port, so every request fails after bootstrap.
            assert!(!task.await.expect("join"));
        }
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn render_decoder_strips_exactly_one_quote_each_side() {
        assert_eq!(
            decode_render_response("\"\"x\"\"").expect("decode"),
            "data:image/png;base64,\"x\""
        );
    }

    #[test]
    fn print_decoder() {
        assert!(decode_print_response("true").expect("accepted"));
        assert!(matches!(
            decode_print_response("false"),
            Err(LabelWriterError::ServiceFailure(detail)) if detail == "false"
        ));
    }
}
