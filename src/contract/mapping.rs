//! Field mapping configuration.
//!
//! Each card type has a set of `*_key` entries naming the dot-path in `data`
//! where a canonical field is read from. Unset (or blank) entries keep their
//! default, which is the canonical field name itself. Unknown keys are ignored.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldMappingConfig {
    #[serde(default)]
    pub scalar: ScalarMapping,
    #[serde(default)]
    pub series: SeriesMapping,
    #[serde(default)]
    pub gauge: GaugeMapping,
    #[serde(default)]
    pub status: StatusMapping,
    #[serde(default)]
    pub digest: DigestMapping,
}

impl FieldMappingConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parsing field mapping json")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading field mapping: {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("in field mapping file: {}", path.display()))
    }
}

fn pick(configured: &Option<String>, default: &str) -> String {
    match configured.as_deref().map(str::trim) {
        Some(k) if !k.is_empty() => k.to_string(),
        _ => default.to_string(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScalarMapping {
    pub value_key: Option<String>,
    pub unit_key: Option<String>,
    pub trend_key: Option<String>,
    pub color_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarKeys {
    pub value: String,
    pub unit: String,
    pub trend: String,
    pub color: String,
}

impl ScalarMapping {
    pub fn resolve(&self) -> ScalarKeys {
        ScalarKeys {
            value: pick(&self.value_key, "value"),
            unit: pick(&self.unit_key, "unit"),
            trend: pick(&self.trend_key, "trend"),
            color: pick(&self.color_key, "color"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesMapping {
    pub x_axis_key: Option<String>,
    pub series_key: Option<String>,
    pub series_name_key: Option<String>,
    pub series_values_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesKeys {
    pub x_axis: String,
    pub series: String,
    /// Looked up inside each series entry, not from the data root.
    pub name: String,
    pub values: String,
}

impl SeriesMapping {
    pub fn resolve(&self) -> SeriesKeys {
        SeriesKeys {
            x_axis: pick(&self.x_axis_key, "x_axis"),
            series: pick(&self.series_key, "series"),
            name: pick(&self.series_name_key, "name"),
            values: pick(&self.series_values_key, "values"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GaugeMapping {
    pub min_key: Option<String>,
    pub max_key: Option<String>,
    pub value_key: Option<String>,
    pub unit_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaugeKeys {
    pub min: String,
    pub max: String,
    pub value: String,
    pub unit: String,
}

impl GaugeMapping {
    pub fn resolve(&self) -> GaugeKeys {
        GaugeKeys {
            min: pick(&self.min_key, "min"),
            max: pick(&self.max_key, "max"),
            value: pick(&self.value_key, "value"),
            unit: pick(&self.unit_key, "unit"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusMapping {
    pub label_key: Option<String>,
    pub state_key: Option<String>,
    pub message_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusKeys {
    pub label: String,
    pub state: String,
    pub message: String,
}

impl StatusMapping {
    pub fn resolve(&self) -> StatusKeys {
        StatusKeys {
            label: pick(&self.label_key, "label"),
            state: pick(&self.state_key, "state"),
            message: pick(&self.message_key, "message"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DigestMapping {
    pub items_key: Option<String>,
    pub title_key: Option<String>,
    pub body_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestKeys {
    pub items: String,
    /// Looked up inside each item.
    pub title: String,
    pub body: String,
}

impl DigestMapping {
    pub fn resolve(&self) -> DigestKeys {
        DigestKeys {
            items: pick(&self.items_key, "items"),
            title: pick(&self.title_key, "title"),
            body: pick(&self.body_key, "body"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_canonical_names() {
        let cfg = FieldMappingConfig::default();
        let s = cfg.series.resolve();
        assert_eq!(
            (s.x_axis.as_str(), s.series.as_str(), s.name.as_str(), s.values.as_str()),
            ("x_axis", "series", "name", "values")
        );
        assert_eq!(cfg.gauge.resolve().unit, "unit");
        assert_eq!(cfg.digest.resolve().body, "body");
    }

    #[test]
    fn overrides_merge_field_by_field() {
        let cfg = FieldMappingConfig::from_json_str(
            r#"{"gauge": {"min_key": "limits.low", "value_key": "current"}}"#,
        )
        .unwrap();
        let keys = cfg.gauge.resolve();
        assert_eq!(keys.min, "limits.low");
        assert_eq!(keys.value, "current");
        assert_eq!(keys.max, "max");
        assert_eq!(keys.unit, "unit");
    }

    #[test]
    fn unknown_and_blank_keys_are_ignored() {
        let cfg = FieldMappingConfig::from_json_str(
            r#"{"scalar": {"value_key": "  ", "bogus_key": "x"}, "chart": {}}"#,
        )
        .unwrap();
        assert_eq!(cfg.scalar.resolve().value, "value");
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapping.json");
        fs::write(&path, r#"{"digest": {"items_key": "blocks"}}"#).unwrap();
        let cfg = FieldMappingConfig::load(&path).unwrap();
        assert_eq!(cfg.digest.resolve().items, "blocks");
        assert!(FieldMappingConfig::load(&dir.path().join("missing.json")).is_err());
    }
}
