// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print parameter XML (`printParamsXml`) encoding.

use std::borrow::Cow;

use quick_xml::escape::escape;

use labelwriter_core::types::LabelParameters;

const ROOT_TAG: &str = "LabelWriterPrintParams";

/// Copies sent when the caller does not ask for a number.
pub const DEFAULT_COPIES: u32 = 1;

fn bool_value(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

/// Optional fields as (wire tag, value) pairs, in wire order.
fn optional_fields(params: &LabelParameters) -> [(&'static str, Option<Cow<'_, str>>); 7] {
    [
        ("JobTitle", params.job_title.as_deref().map(|title| escape(title))),
        (
            "FlowDirection",
            params.flow_direction.map(|v| Cow::Borrowed(v.as_str())),
        ),
        (
            "PrintQuality",
            params.print_quality.map(|v| Cow::Borrowed(v.as_str())),
        ),
        (
            "TwinTurboRoll",
            params.twin_turbo_roll.map(|v| Cow::Borrowed(v.as_str())),
        ),
        ("Rotation", params.rotation.map(|v| Cow::Borrowed(v.as_str()))),
        (
            "IsTwinTurbo",
            params.is_twin_turbo.map(|v| Cow::Borrowed(bool_value(v))),
        ),
        (
            "IsAutoCut",
            params.is_auto_cut.map(|v| Cow::Borrowed(bool_value(v))),
        ),
    ]
}

fn push_tag(xml: &mut String, tag: &str, value: &str) {
    xml.push('<');
    xml.push_str(tag);
    xml.push('>');
    xml.push_str(value);
    xml.push_str("</");
    xml.push_str(tag);
    xml.push('>');
}

/// Encode `params` as the service's print parameter document.
///
/// `Copies` is always present; every other tag appears only when the field
/// is set.
pub fn encode_params(params: &LabelParameters) -> String {
    let mut xml = String::with_capacity(128);
    xml.push('<');
    xml.push_str(ROOT_TAG);
    xml.push('>');

    let copies = params.copies.unwrap_or(DEFAULT_COPIES).to_string();
    push_tag(&mut xml, "Copies", &copies);

    for (tag, value) in optional_fields(params) {
        if let Some(value) = value {
            push_tag(&mut xml, tag, &value);
        }
    }

    xml.push_str("</");
    xml.push_str(ROOT_TAG);
    xml.push('>');
    xml
}
