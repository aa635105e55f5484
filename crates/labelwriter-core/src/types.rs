// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the LabelWriter client.

use serde::{Deserialize, Serialize};

use crate::error::{LabelWriterError, Result};

/// A printer reported by the service.
///
/// Rebuilt from the service on every listing; there is no identity beyond
/// the field values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Printer {
    /// Queue name used to address the printer in later calls.
    pub name: String,
    /// Marketing model name (e.g. "DYMO LabelWriter 550").
    pub model: String,
    pub connected: bool,
    pub local: bool,
    /// Whether the printer carries two label rolls.
    pub twin_turbo: bool,
}

/// Label stock loaded in a printer.
///
/// The zero value (no SKU, no labels) is what printers without queryable
/// consumables report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumableInfo {
    pub sku: Option<String>,
    pub labels_remaining: i64,
}

/// Text layout direction on the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowDirection {
    LeftToRight,
    TopToBottom,
}

/// Print head optimisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrintQuality {
    Text,
    Barcode,
    Graphics,
}

/// Roll selection on twin-roll printers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TwinTurboRoll {
    None,
    Left,
    Right,
}

/// Label rotation in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rotation {
    Rotation0,
    Rotation90,
    Rotation180,
    Rotation270,
}

impl FlowDirection {
    /// Value used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LeftToRight => "LeftToRight",
            Self::TopToBottom => "TopToBottom",
        }
    }
}

impl PrintQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Barcode => "Barcode",
            Self::Graphics => "Graphics",
        }
    }
}

impl TwinTurboRoll {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Left => "Left",
            Self::Right => "Right",
        }
    }
}

impl Rotation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rotation0 => "Rotation0",
            Self::Rotation90 => "Rotation90",
            Self::Rotation180 => "Rotation180",
            Self::Rotation270 => "Rotation270",
        }
    }
}

/// Options for a print job. Unset fields are left out of the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelParameters {
    /// Number of copies; the service is sent 1 when unset.
    pub copies: Option<u32>,
    pub job_title: Option<String>,
    pub flow_direction: Option<FlowDirection>,
    pub print_quality: Option<PrintQuality>,
    pub twin_turbo_roll: Option<TwinTurboRoll>,
    pub rotation: Option<Rotation>,
    pub is_twin_turbo: Option<bool>,
    pub is_auto_cut: Option<bool>,
}

impl LabelParameters {
    pub fn with_copies(mut self, copies: u32) -> Self {
        self.copies = Some(copies);
        self
    }

    pub fn with_job_title(mut self, title: impl Into<String>) -> Self {
        self.job_title = Some(title.into());
        self
    }

    pub fn with_flow_direction(mut self, direction: FlowDirection) -> Self {
        self.flow_direction = Some(direction);
        self
    }

    pub fn with_print_quality(mut self, quality: PrintQuality) -> Self {
        self.print_quality = Some(quality);
        self
    }

    pub fn with_twin_turbo_roll(mut self, roll: TwinTurboRoll) -> Self {
        self.twin_turbo_roll = Some(roll);
        self
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn with_twin_turbo(mut self, enabled: bool) -> Self {
        self.is_twin_turbo = Some(enabled);
        self
    }

    pub fn with_auto_cut(mut self, enabled: bool) -> Self {
        self.is_auto_cut = Some(enabled);
        self
    }
}

/// Outcome of a public client operation.
///
/// Operations never return `Err` or panic across the public boundary;
/// every failure lands in [`OperationResult::Failure`]. Check
/// [`is_success`](Self::is_success) before trusting the data.
#[derive(Debug)]
pub enum OperationResult<T> {
    Success(T),
    Failure(LabelWriterError),
}

impl<T> OperationResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The payload, if the operation succeeded.
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            Self::Failure(_) => None,
        }
    }

    /// The failure detail, if the operation failed.
    pub fn error(&self) -> Option<&LabelWriterError> {
        match self {
            Self::Success(_) => None,
            Self::Failure(err) => Some(err),
        }
    }

    pub fn into_result(self) -> Result<T> {
        match self {
            Self::Success(data) => Ok(data),
            Self::Failure(err) => Err(err),
        }
    }
}

impl<T> From<Result<T>> for OperationResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(err) => Self::Failure(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consumable_zero_value() {
        let info = ConsumableInfo::default();
        assert!(info.sku.is_none());
        assert_eq!(info.labels_remaining, 0);
    }

    #[test]
    fn builder_sets_only_requested_fields() {
        let params = LabelParameters::default()
            .with_copies(2)
            .with_rotation(Rotation::Rotation90);
        assert_eq!(params.copies, Some(2));
        assert_eq!(params.rotation, Some(Rotation::Rotation90));
        assert!(params.job_title.is_none());
        assert!(params.is_auto_cut.is_none());
    }

    #[test]
    fn wire_names_match_variants() {
        assert_eq!(FlowDirection::TopToBottom.as_str(), "TopToBottom");
        assert_eq!(PrintQuality::Barcode.as_str(), "Barcode");
        assert_eq!(TwinTurboRoll::None.as_str(), "None");
        assert_eq!(Rotation::Rotation270.as_str(), "Rotation270");
    }

    #[test]
    fn operation_result_from_result() {
        let ok: OperationResult<u8> = Ok(7).into();
        assert!(ok.is_success());
        assert_eq!(ok.data(), Some(&7));
        assert!(ok.error().is_none());

        let failed: OperationResult<u8> =
            Err(LabelWriterError::ServiceFailure("false".into())).into();
        assert!(!failed.is_success());
        assert!(failed.data().is_none());
        assert!(matches!(
            failed.into_result(),
            Err(LabelWriterError::ServiceFailure(body)) if body == "false"
        ));
    }
}
