//! Raw execution result → typed `CardPayload`.
//!
//! Normalization is all-or-nothing: the first problem found aborts with a
//! `NormalizeError`, and no payload is produced with fields silently dropped.

use serde_json::{Number, Value};
use tracing::{debug, trace};

use super::mapping::FieldMappingConfig;
use super::path::lookup;
use super::{
    CardPayload, CardType, DigestItem, DigestPayload, GaugePayload, NormalizeError,
    RawExecutionResult, ScalarPayload, SeriesLine, SeriesPayload, StatusPayload, StatusState,
};
use crate::utils::unicode::truncate_chars;

/// Normalize `raw` into the payload variant for `expected`.
///
/// Fails with `TypeMismatch` when the declared type differs from `expected`,
/// regardless of what `data` holds.
pub fn normalize(
    raw: &RawExecutionResult,
    expected: CardType,
    mapping: &FieldMappingConfig,
) -> Result<CardPayload, NormalizeError> {
    if raw.kind != expected.as_str() {
        return Err(NormalizeError::TypeMismatch {
            expected,
            actual: raw.kind.clone(),
        });
    }

    let fields = Fields {
        card: expected,
        data: &raw.data,
    };
    let result = match expected {
        CardType::Scalar => scalar(&fields, mapping).map(CardPayload::Scalar),
        CardType::Series => series(&fields, mapping).map(CardPayload::Series),
        CardType::Gauge => gauge(&fields, mapping).map(CardPayload::Gauge),
        CardType::Status => status(&fields, mapping).map(CardPayload::Status),
        CardType::Digest => digest(&fields, mapping).map(CardPayload::Digest),
    };
    match &result {
        Ok(_) => debug!(card = %expected, "normalized payload"),
        Err(err) => debug!(card = %expected, %err, "normalization failed"),
    }
    result
}

/// Field resolution against one value (the data root, or a list entry).
struct Fields<'a> {
    card: CardType,
    data: &'a Value,
}

impl<'a> Fields<'a> {
    fn optional(&self, path: &str) -> Option<&'a Value> {
        let found = lookup(self.data, path);
        trace!(card = %self.card, path, found = found.is_some(), "field lookup");
        found
    }

    fn required(&self, field: &str, path: &str) -> Result<&'a Value, NormalizeError> {
        self.optional(path).ok_or_else(|| NormalizeError::MissingField {
            card: self.card,
            field: field.to_string(),
            path: path.to_string(),
        })
    }

    fn required_number(&self, field: &str, path: &str) -> Result<f64, NormalizeError> {
        let v = self.required(field, path)?;
        to_number(self.card, field, v)
    }

    fn optional_text(&self, path: &str) -> Option<String> {
        self.optional(path).map(to_text)
    }

    fn required_array(&self, field: &str, path: &str) -> Result<&'a Vec<Value>, NormalizeError> {
        let v = self.required(field, path)?;
        v.as_array()
            .ok_or_else(|| coercion_failure(self.card, field, "an array", v))
    }

    fn entry(&self, field: &str, value: &'a Value) -> Result<Fields<'a>, NormalizeError> {
        if value.is_object() {
            Ok(Fields {
                card: self.card,
                data: value,
            })
        } else {
            Err(coercion_failure(self.card, field, "an object", value))
        }
    }
}

fn coercion_failure(card: CardType, field: &str, expected: &'static str, found: &Value) -> NormalizeError {
    NormalizeError::CoercionFailure {
        card,
        field: field.to_string(),
        expected,
        found: truncate_chars(&found.to_string(), 60),
    }
}

/// Numbers pass through; strings are parsed (`"28.5"` → `28.5`). Non-finite results fail.
pub(crate) fn to_number(card: CardType, field: &str, value: &Value) -> Result<f64, NormalizeError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|f| f.is_finite())
        .ok_or_else(|| coercion_failure(card, field, "a number", value))
}

/// String conversion of any JSON value; integral numbers print without a fraction.
pub(crate) fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => number_text(n),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn number_text(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

fn scalar(f: &Fields<'_>, mapping: &FieldMappingConfig) -> Result<ScalarPayload, NormalizeError> {
    let keys = mapping.scalar.resolve();
    Ok(ScalarPayload {
        value: f.required_number("value", &keys.value)?,
        unit: f.optional_text(&keys.unit),
        trend: f.optional_text(&keys.trend),
        color: f.optional_text(&keys.color),
    })
}

fn series(f: &Fields<'_>, mapping: &FieldMappingConfig) -> Result<SeriesPayload, NormalizeError> {
    let keys = mapping.series.resolve();
    let x_axis = f
        .required_array("x_axis", &keys.x_axis)?
        .iter()
        .map(to_text)
        .collect();

    let entries = f.required_array("series", &keys.series)?;
    let mut lines = Vec::with_capacity(entries.len());
    for (i, raw_entry) in entries.iter().enumerate() {
        let field = format!("series[{i}]");
        let entry = f.entry(&field, raw_entry)?;
        let name = entry
            .optional_text(&keys.name)
            .unwrap_or_else(|| format!("Series {}", i + 1));
        let values_field = format!("{field}.values");
        let values = entry
            .required_array(&values_field, &keys.values)?
            .iter()
            .enumerate()
            .map(|(j, v)| to_number(f.card, &format!("{values_field}[{j}]"), v))
            .collect::<Result<Vec<_>, _>>()?;
        lines.push(SeriesLine { name, values });
    }

    Ok(SeriesPayload {
        x_axis,
        series: lines,
    })
}

fn gauge(f: &Fields<'_>, mapping: &FieldMappingConfig) -> Result<GaugePayload, NormalizeError> {
    let keys = mapping.gauge.resolve();
    Ok(GaugePayload {
        min: f.required_number("min", &keys.min)?,
        max: f.required_number("max", &keys.max)?,
        value: f.required_number("value", &keys.value)?,
        unit: f.optional_text(&keys.unit),
    })
}

fn status(f: &Fields<'_>, mapping: &FieldMappingConfig) -> Result<StatusPayload, NormalizeError> {
    let keys = mapping.status.resolve();
    let label = to_text(f.required("label", &keys.label)?);
    let raw_state = f.required("state", &keys.state)?;
    let state = StatusState::from_alias(&to_text(raw_state)).ok_or_else(|| {
        coercion_failure(f.card, "state", "one of ok, warning, error", raw_state)
    })?;
    Ok(StatusPayload {
        label,
        state,
        message: f.optional_text(&keys.message),
    })
}

fn digest(f: &Fields<'_>, mapping: &FieldMappingConfig) -> Result<DigestPayload, NormalizeError> {
    let keys = mapping.digest.resolve();
    let mut items = Vec::new();
    for (i, raw_item) in f.required_array("items", &keys.items)?.iter().enumerate() {
        let field = format!("items[{i}]");
        let item = f.entry(&field, raw_item)?;
        let body = to_text(item.required(&format!("{field}.body"), &keys.body)?);
        items.push(DigestItem {
            title: item.optional_text(&keys.title),
            body,
        });
    }
    Ok(DigestPayload { items })
}
