//! Axis-mode selection for series cards.
//!
//! A series card renders as one line, two lines on a shared axis, or two lines
//! on separate axes. The mode is either requested by the card or inferred from
//! how far apart the value ranges of the first two lines are.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::contract::{SeriesLine, SeriesPayload};

/// Range ratio at or above which two lines get separate axes.
pub const DUAL_AXIS_RANGE_RATIO_THRESHOLD: f64 = 3.0;

/// Setting value that asks for the mode to be inferred from the payload.
pub const AUTO_MODE: &str = "auto";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesMode {
    #[default]
    SingleAxisSingleLine,
    SingleAxisDoubleLine,
    DualAxisDoubleLine,
}

impl SeriesMode {
    pub const ALL: [SeriesMode; 3] = [
        SeriesMode::SingleAxisSingleLine,
        SeriesMode::SingleAxisDoubleLine,
        SeriesMode::DualAxisDoubleLine,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SeriesMode::SingleAxisSingleLine => "single_axis_single_line",
            SeriesMode::SingleAxisDoubleLine => "single_axis_double_line",
            SeriesMode::DualAxisDoubleLine => "dual_axis_double_line",
        }
    }

    pub fn is_double_line(self) -> bool {
        matches!(
            self,
            SeriesMode::SingleAxisDoubleLine | SeriesMode::DualAxisDoubleLine
        )
    }

    pub fn is_dual_axis(self) -> bool {
        self == SeriesMode::DualAxisDoubleLine
    }
}

impl fmt::Display for SeriesMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeriesMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SeriesMode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("unknown series mode: {s}"))
    }
}

/// `value` if it names a mode, otherwise `fallback`.
pub fn normalize_mode(value: Option<&str>, fallback: SeriesMode) -> SeriesMode {
    value
        .and_then(|v| v.parse::<SeriesMode>().ok())
        .unwrap_or(fallback)
}

pub fn is_double_line(mode: SeriesMode) -> bool {
    mode.is_double_line()
}

pub fn is_dual_axis(mode: SeriesMode) -> bool {
    mode.is_dual_axis()
}

/// max − min over the finite values, or `None` when there are none.
pub fn value_range(line: &SeriesLine) -> Option<f64> {
    let mut finite = line.values.iter().copied().filter(|v| v.is_finite());
    let first = finite.next()?;
    let (min, max) = finite.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    Some(max - min)
}

/// Larger range over smaller range of two lines.
///
/// Both ranges zero gives `1`; exactly one zero gives `+inf`. `None` when either
/// line has no finite values.
pub fn range_ratio(first: &SeriesLine, second: &SeriesLine) -> Option<f64> {
    let a = value_range(first)?;
    let b = value_range(second)?;
    if a == 0.0 && b == 0.0 {
        return Some(1.0);
    }
    if a == 0.0 || b == 0.0 {
        return Some(f64::INFINITY);
    }
    Some(a.max(b) / a.min(b))
}

/// Infer the mode from the first two lines of `payload`.
pub fn infer_mode_from_payload(payload: &SeriesPayload, dual_axis_ratio_threshold: f64) -> SeriesMode {
    let [first, second, ..] = payload.series.as_slice() else {
        return SeriesMode::SingleAxisSingleLine;
    };
    let ratio = range_ratio(first, second);
    let mode = match ratio {
        Some(r) if r >= dual_axis_ratio_threshold => SeriesMode::DualAxisDoubleLine,
        _ => SeriesMode::SingleAxisDoubleLine,
    };
    debug!(?ratio, threshold = dual_axis_ratio_threshold, %mode, "inferred series mode");
    mode
}

/// True when a double-line `mode` is requested but the payload has fewer than two lines.
pub fn should_fallback_to_single_line(mode: SeriesMode, payload: &SeriesPayload) -> bool {
    mode.is_double_line() && payload.series.len() < 2
}

/// The mode a renderer should actually use for a requested `mode`.
pub fn effective_mode(mode: SeriesMode, payload: &SeriesPayload) -> SeriesMode {
    if should_fallback_to_single_line(mode, payload) {
        debug!(requested = %mode, "series has fewer than two lines; falling back");
        SeriesMode::SingleAxisSingleLine
    } else {
        mode
    }
}

/// Resolve a textual mode setting against a payload.
///
/// Absent or `auto` infers from the data; anything else goes through
/// `normalize_mode` with `fallback`, then the single-line fallback rule.
pub fn resolve_mode(
    setting: Option<&str>,
    payload: &SeriesPayload,
    fallback: SeriesMode,
    dual_axis_ratio_threshold: f64,
) -> SeriesMode {
    match setting.map(str::trim) {
        None | Some(AUTO_MODE) => infer_mode_from_payload(payload, dual_axis_ratio_threshold),
        Some(value) => effective_mode(normalize_mode(Some(value), fallback), payload),
    }
}
