//! Printers: plain text, markdown (termimad) and JSON envelopes for card payloads.

use owo_colors::OwoColorize;
use serde::Serialize;
use termimad::MadSkin;

use crate::contract::{CardPayload, DigestPayload, StatusState};
use crate::series::SeriesMode;

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

pub fn print_json<T: Serialize>(data: T) -> anyhow::Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&JsonOut { ok: true, data })?
    );
    Ok(())
}

pub struct TextPrinter {
    pub color: Option<String>,
}

impl TextPrinter {
    pub fn print(&self, text: &str) {
        match self.color.as_deref() {
            Some("green") => println!("{}", text.green()),
            Some("cyan") => println!("{}", text.cyan()),
            Some("magenta") => println!("{}", text.magenta()),
            Some("yellow") => println!("{}", text.yellow()),
            Some("red") => println!("{}", text.red()),
            _ => println!("{}", text),
        }
    }
}

#[derive(Default)]
pub struct MarkdownPrinter {
    pub skin: MadSkin,
}

impl MarkdownPrinter {
    pub fn print(&self, text: &str) {
        self.skin.print_text(text);
        println!();
    }
}

/// Title shown for a digest item that has none (`index` is 0-based).
pub fn untitled_item(index: usize) -> String {
    format!("Item {}", index + 1)
}

/// Digest items as markdown: a heading and body per item, separated by rules.
pub fn digest_markdown(digest: &DigestPayload) -> String {
    if digest.items.is_empty() {
        return "_No data_".to_string();
    }
    digest
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let title = item.title.clone().unwrap_or_else(|| untitled_item(i));
            format!("### {}\n\n{}", title, item.body)
        })
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

fn fmt_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

fn join_numbers(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| fmt_number(*v))
        .collect::<Vec<_>>()
        .join(", ")
}

/// One-screen plain-text rendering. `mode` is only used for series payloads.
pub fn payload_text(payload: &CardPayload, mode: Option<SeriesMode>) -> String {
    match payload {
        CardPayload::Scalar(s) => {
            let mut out = fmt_number(s.value);
            if let Some(unit) = &s.unit {
                out.push_str(unit);
            }
            if let Some(trend) = &s.trend {
                out.push_str(&format!(" ({trend})"));
            }
            out
        }
        CardPayload::Gauge(g) => {
            let unit = g.unit.as_deref().unwrap_or("");
            format!(
                "{}{unit} [{} .. {}]",
                fmt_number(g.value),
                fmt_number(g.min),
                fmt_number(g.max)
            )
        }
        CardPayload::Status(s) => match &s.message {
            Some(msg) => format!("[{}] {}: {}", s.state.as_str().to_uppercase(), s.label, msg),
            None => format!("[{}] {}", s.state.as_str().to_uppercase(), s.label),
        },
        CardPayload::Series(s) => {
            let mut lines = Vec::new();
            if let Some(mode) = mode {
                lines.push(format!("mode: {mode}"));
            }
            lines.push(format!("x: {}", s.x_axis.join(", ")));
            // Single-line rendering only draws the first series.
            let shown = match mode {
                Some(m) if !m.is_double_line() => 1,
                _ => s.series.len(),
            };
            for line in s.series.iter().take(shown) {
                lines.push(format!("{}: {}", line.name, join_numbers(&line.values)));
            }
            lines.join("\n")
        }
        CardPayload::Digest(d) => digest_markdown(d),
    }
}

/// Color hint for a payload: status state wins, then a scalar's own color field.
pub fn payload_color(payload: &CardPayload, default: &str) -> String {
    match payload {
        CardPayload::Status(s) => match s.state {
            StatusState::Ok => "green",
            StatusState::Warning => "yellow",
            StatusState::Error => "red",
        }
        .to_string(),
        CardPayload::Scalar(s) => match s.color.as_deref() {
            Some("success") => "green".to_string(),
            Some("warning") => "yellow".to_string(),
            Some("danger") => "red".to_string(),
            _ => default.to_string(),
        },
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{DigestItem, GaugePayload, ScalarPayload, SeriesLine, SeriesPayload, StatusPayload};

    #[test]
    fn digest_joins_items_with_rules_and_placeholders() {
        let digest = DigestPayload {
            items: vec![
                DigestItem { title: Some("A".into()), body: "alpha".into() },
                DigestItem { title: None, body: "beta".into() },
            ],
        };
        assert_eq!(
            digest_markdown(&digest),
            "### A\n\nalpha\n\n---\n\n### Item 2\n\nbeta"
        );
        assert_eq!(digest_markdown(&DigestPayload::default()), "_No data_");
    }

    #[test]
    fn scalar_and_gauge_text() {
        let scalar = CardPayload::Scalar(ScalarPayload {
            value: 18.0,
            unit: Some("%".into()),
            trend: Some("up".into()),
            color: None,
        });
        assert_eq!(payload_text(&scalar, None), "18% (up)");
        let gauge = CardPayload::Gauge(GaugePayload {
            min: 10.0,
            max: 60.0,
            value: 28.5,
            unit: Some("MB".into()),
        });
        assert_eq!(payload_text(&gauge, None), "28.5MB [10 .. 60]");
    }

    #[test]
    fn status_text_and_color() {
        let status = CardPayload::Status(StatusPayload {
            label: "DB".into(),
            state: StatusState::Error,
            message: Some("down".into()),
        });
        assert_eq!(payload_text(&status, None), "[ERROR] DB: down");
        assert_eq!(payload_color(&status, "cyan"), "red");
    }

    #[test]
    fn single_line_mode_shows_first_series_only() {
        let series = CardPayload::Series(SeriesPayload {
            x_axis: vec!["a".into(), "b".into()],
            series: vec![
                SeriesLine { name: "cpu".into(), values: vec![1.0, 2.5] },
                SeriesLine { name: "mem".into(), values: vec![3.0, 4.0] },
            ],
        });
        assert_eq!(
            payload_text(&series, Some(SeriesMode::SingleAxisSingleLine)),
            "mode: single_axis_single_line\nx: a, b\ncpu: 1, 2.5"
        );
        assert!(payload_text(&series, Some(SeriesMode::DualAxisDoubleLine)).contains("mem: 3, 4"));
    }
}
