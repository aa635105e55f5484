// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for applications embedding the client.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The taxonomy uses three severity levels that drive UI presentation.

use crate::error::LabelWriterError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Service not up yet or a network blip; trying again may work.
    Transient,
    /// User must do something (plug the printer in, load labels, fix a setting).
    ActionRequired,
    /// Cannot be fixed by retrying (malformed label, unexpected service answer).
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether trying the same call again is worthwhile.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `LabelWriterError` into a `HumanError`.
pub fn humanize_error(err: &LabelWriterError) -> HumanError {
    match err {
        LabelWriterError::CertificateUnavailable(detail) | LabelWriterError::Transport(detail) => {
            humanize_connection_error(detail)
        }

        LabelWriterError::Parse(_) => HumanError {
            message: "The label printing service sent an answer we couldn't read.".into(),
            suggestion: "Make sure DYMO Connect is up to date, then try again.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        LabelWriterError::ServiceFailure(detail) => humanize_service_failure(detail),

        LabelWriterError::InvalidConfig(detail) => HumanError {
            message: "The printing service address doesn't look right.".into(),
            suggestion: format!("Check the host name and port in the settings. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}

/// Map handshake and socket failures onto something actionable.
fn humanize_connection_error(detail: &str) -> HumanError {
    let lower = detail.to_ascii_lowercase();

    if lower.contains("connection refused") {
        HumanError {
            message: "The label printing service isn't running.".into(),
            suggestion: "Start DYMO Connect (or the DYMO web service), then try again.".into(),
            retriable: true,
            severity: Severity::ActionRequired,
        }
    } else if lower.contains("timed out") {
        HumanError {
            message: "The label printing service didn't respond in time.".into(),
            suggestion: "It may still be starting up. Wait a moment and try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        }
    } else if lower.contains("certificate") {
        HumanError {
            message: "The printing service presented a different security certificate.".into(),
            suggestion: "If DYMO Connect was restarted or reinstalled, restart this application so it can pick up the new certificate.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        }
    } else {
        HumanError {
            message: "We couldn't reach the label printing service.".into(),
            suggestion: format!("Check that DYMO Connect is running on this computer. (Detail: {detail})"),
            retriable: true,
            severity: Severity::Transient,
        }
    }
}

/// Interpret the body the service sent back instead of `true`.
fn humanize_service_failure(detail: &str) -> HumanError {
    let lower = detail.to_ascii_lowercase();

    if lower.is_empty() || lower == "false" {
        HumanError {
            message: "The printer didn't accept the label.".into(),
            suggestion: "Check the printer is switched on, connected and has labels loaded, then try again.".into(),
            retriable: true,
            severity: Severity::ActionRequired,
        }
    } else if lower.contains("not found") || lower.contains("no printer") {
        HumanError {
            message: "That printer couldn't be found.".into(),
            suggestion: "Refresh the printer list and choose a printer that is connected.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        }
    } else if lower.contains("xml") || lower.contains("label") {
        HumanError {
            message: "The label design couldn't be printed.".into(),
            suggestion: format!("The label file may be damaged or from an unsupported version. (Detail: {detail})"),
            retriable: false,
            severity: Severity::Permanent,
        }
    } else {
        HumanError {
            message: "The printer had a problem.".into(),
            suggestion: format!("Try again. If this keeps happening, unplug the printer and plug it back in. (Detail: {detail})"),
            retriable: true,
            severity: Severity::Transient,
        }
    }
}
