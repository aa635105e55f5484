// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printer directory parsing for the `GetPrinters` answer.
//
// The service returns a `<Printers>` root holding zero, one or many
// `<LabelWriterPrinter>` elements, possibly mixed with elements for other
// printer families. Collecting the children into a `Vec` normalises every
// cardinality to a list; unknown siblings and fields are skipped. The serde
// layer ignores the root element's name, so it is checked up front: an error
// page is a parse failure, not an empty directory.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Deserialize;
use tracing::debug;

use labelwriter_core::error::{LabelWriterError, Result};
use labelwriter_core::types::Printer;

const ROOT_TAG: &[u8] = b"Printers";

#[derive(Debug, Deserialize)]
struct PrintersDocument {
    #[serde(rename = "LabelWriterPrinter", default)]
    printers: Vec<PrinterRecord>,
}

/// One `<LabelWriterPrinter>` as it appears on the wire. Missing fields
/// deserialize as empty strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PrinterRecord {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "ModelName")]
    model_name: String,
    #[serde(rename = "IsConnected")]
    is_connected: String,
    #[serde(rename = "IsLocal")]
    is_local: String,
    #[serde(rename = "IsTwinTurbo")]
    is_twin_turbo: String,
}

impl From<PrinterRecord> for Printer {
    fn from(record: PrinterRecord) -> Self {
        Self {
            name: record.name,
            model: record.model_name,
            connected: is_true(&record.is_connected),
            local: is_true(&record.is_local),
            twin_turbo: is_true(&record.is_twin_turbo),
        }
    }
}

/// The service spells booleans `True`/`False`; only the exact `True` counts.
fn is_true(value: &str) -> bool {
    value == "True"
}

/// Some service builds send the XML as a JSON string literal.
fn unwrap_json_string(text: &str) -> Result<Cow<'_, str>> {
    let trimmed = text.trim_start_matches('\u{feff}').trim();
    if trimmed.starts_with('"') {
        let inner: String = serde_json::from_str(trimmed)
            .map_err(|e| LabelWriterError::Parse(format!("quoted printer list: {e}")))?;
        Ok(Cow::Owned(inner))
    } else {
        Ok(Cow::Borrowed(trimmed))
    }
}

/// Fail unless the first element of `xml` is `<Printers>`.
fn expect_printers_root(xml: &str) -> Result<()> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) | Ok(Event::Empty(element)) => {
                let name = element.name();
                return if name.as_ref() == ROOT_TAG {
                    Ok(())
                } else {
                    Err(LabelWriterError::Parse(format!(
                        "printer list: expected <Printers>, found <{}>",
                        String::from_utf8_lossy(name.as_ref())
                    )))
                };
            }
            Ok(Event::Eof) => {
                return Err(LabelWriterError::Parse(
                    "printer list: no root element".into(),
                ));
            }
            Ok(_) => {}
            Err(e) => return Err(LabelWriterError::Parse(format!("printer list: {e}"))),
        }
    }
}

/// Parse the `GetPrinters` body into printer records.
///
/// Fails with `Parse` when the body is not well-formed XML or its root is not
/// `<Printers>`.
pub fn parse_printers(xml: &str) -> Result<Vec<Printer>> {
    let xml = unwrap_json_string(xml)?;
    expect_printers_root(&xml)?;
    let document: PrintersDocument = quick_xml::de::from_str(&xml)
        .map_err(|e| LabelWriterError::Parse(format!("printer list: {e}")))?;

    let printers: Vec<Printer> = document.printers.into_iter().map(Printer::from).collect();
    debug!(count = printers.len(), "parsed printer list");
    Ok(printers)
}
