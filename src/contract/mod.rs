//! Output contract: raw execution results and the typed card payloads they normalize into.
//!
//! ## Files
//! - `mapping.rs` — per-card-type field mapping configuration and its defaults.
//! - `path.rs` — dot-path lookup over untyped JSON.
//! - `normalize.rs` — raw result → `CardPayload`.
//!
//! Payload types are plain values: built fresh per call, never mutated afterwards.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub mod mapping;
pub mod normalize;
pub mod path;

pub use mapping::FieldMappingConfig;
pub use normalize::normalize;

/// Which payload shape a card expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Scalar,
    Series,
    Gauge,
    Status,
    Digest,
}

impl CardType {
    pub const ALL: [CardType; 5] = [
        CardType::Scalar,
        CardType::Series,
        CardType::Gauge,
        CardType::Status,
        CardType::Digest,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CardType::Scalar => "scalar",
            CardType::Series => "series",
            CardType::Gauge => "gauge",
            CardType::Status => "status",
            CardType::Digest => "digest",
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CardType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown card type: {s}"))
    }
}

/// Result emitted by a script: a declared type tag plus producer-shaped data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawExecutionResult {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

impl RawExecutionResult {
    pub fn new(kind: impl Into<String>, data: Value) -> Self {
        Self {
            kind: kind.into(),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarPayload {
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// One named line of a series card. Names are not unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesLine {
    pub name: String,
    pub values: Vec<f64>,
}

/// `x_axis` and each line's `values` are index-aligned by convention only.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesPayload {
    pub x_axis: Vec<String>,
    pub series: Vec<SeriesLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugePayload {
    pub min: f64,
    pub max: f64,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusState {
    Ok,
    Warning,
    Error,
}

/// Accepted state tokens (lowercase) and the canonical state each maps to.
const STATE_ALIASES: &[(&str, StatusState)] = &[
    ("ok", StatusState::Ok),
    ("warning", StatusState::Warning),
    ("error", StatusState::Error),
    ("critical", StatusState::Error),
    ("healthy", StatusState::Ok),
    ("success", StatusState::Ok),
];

impl StatusState {
    /// Map a producer token onto a canonical state; unknown tokens yield `None`.
    pub fn from_alias(token: &str) -> Option<Self> {
        let token = token.trim().to_ascii_lowercase();
        STATE_ALIASES
            .iter()
            .find(|(alias, _)| *alias == token)
            .map(|(_, state)| *state)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusState::Ok => "ok",
            StatusState::Warning => "warning",
            StatusState::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusPayload {
    pub label: String,
    pub state: StatusState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigestItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DigestPayload {
    pub items: Vec<DigestItem>,
}

/// Normalized card payload; the variant always matches the requested `CardType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum CardPayload {
    Scalar(ScalarPayload),
    Series(SeriesPayload),
    Gauge(GaugePayload),
    Status(StatusPayload),
    Digest(DigestPayload),
}

impl CardPayload {
    pub fn card_type(&self) -> CardType {
        match self {
            CardPayload::Scalar(_) => CardType::Scalar,
            CardPayload::Series(_) => CardType::Series,
            CardPayload::Gauge(_) => CardType::Gauge,
            CardPayload::Status(_) => CardType::Status,
            CardPayload::Digest(_) => CardType::Digest,
        }
    }

    pub fn as_series(&self) -> Option<&SeriesPayload> {
        match self {
            CardPayload::Series(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    #[error("payload type `{actual}` does not match card type `{expected}`")]
    TypeMismatch { expected: CardType, actual: String },

    #[error("{card} payload is missing required field `{field}` (looked up at `{path}`)")]
    MissingField {
        card: CardType,
        field: String,
        path: String,
    },

    #[error("{card} field `{field}` must be {expected}, got {found}")]
    CoercionFailure {
        card: CardType,
        field: String,
        expected: &'static str,
        found: String,
    },
}
