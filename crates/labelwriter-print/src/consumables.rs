// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Consumable (label stock) answer parsing.
//
// The body is checked for the `sku` marker before any JSON decoding. Printers
// without queryable consumables answer with text that is not JSON at all,
// and that answer means "nothing to report" rather than an error.

use serde::Deserialize;
use tracing::debug;

use labelwriter_core::error::{LabelWriterError, Result};
use labelwriter_core::types::ConsumableInfo;

/// Substring whose presence marks a body worth decoding.
const DATA_MARKER: &str = "sku";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConsumableRecord {
    #[serde(default)]
    sku: Option<String>,
    #[serde(default)]
    labels_remaining: Option<i64>,
}

/// Parse a `GetConsumableInfoIn550Printer` body.
pub fn parse_consumable_info(text: &str) -> Result<ConsumableInfo> {
    if !text.contains(DATA_MARKER) {
        debug!(len = text.len(), "no consumable data in response");
        return Ok(ConsumableInfo::default());
    }

    let record: ConsumableRecord = serde_json::from_str(text)
        .map_err(|e| LabelWriterError::Parse(format!("consumable info: {e}")))?;

    Ok(ConsumableInfo {
        sku: record.sku,
        labels_remaining: record.labels_remaining.unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sku_and_count_are_taken_verbatim() {
        let info = parse_consumable_info(r#"{"sku":"S0722540","labelsRemaining":999}"#)
            .expect("parse");
        assert_eq!(info.sku.as_deref(), Some("S0722540"));
        assert_eq!(info.labels_remaining, 999);
    }

    #[test]
    fn no_marker_is_zero_value() {
        for body in ["", "null", "Printer does not support consumable info"] {
            assert_eq!(
                parse_consumable_info(body).expect("parse"),
                ConsumableInfo::default()
            );
        }
    }

    #[test]
    fn missing_count_defaults_to_zero() {
        let info = parse_consumable_info(r#"{"sku":"S0904980"}"#).expect("parse");
        assert_eq!(info.sku.as_deref(), Some("S0904980"));
        assert_eq!(info.labels_remaining, 0);
    }

    #[test]
    fn extra_fields_are_ignored() {
        let info = parse_consumable_info(
            r#"{"sku":"S0722540","labelsRemaining":12,"rollStatus":"Ok","labelsRemainingPercent":4}"#,
        )
        .expect("parse");
        assert_eq!(info.labels_remaining, 12);
    }

    #[test]
    fn marker_without_json_is_parse_error() {
        assert!(matches!(
            parse_consumable_info("sku unavailable"),
            Err(LabelWriterError::Parse(_))
        ));
    }
}
