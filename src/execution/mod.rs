//! Decoding a completed script run into a `RawExecutionResult`.
//!
//! Scripts print one JSON object `{"type": ..., "data": ...}` on stdout. Some log
//! before printing it, so when the whole output is not a single object the last
//! line that is one wins. A non-zero exit always fails, whatever stdout holds.

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::contract::RawExecutionResult;
use crate::utils::unicode::truncate_chars;

/// Captured output of a script that has already exited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionResult {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("script exited with code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("script produced no output")]
    EmptyOutput,

    #[error("script output is not a JSON object: {reason}")]
    InvalidJson { reason: String },

    #[error("script output has no string `type` field")]
    MissingType,
}

pub fn decode(result: &ExecutionResult) -> Result<RawExecutionResult, DecodeError> {
    if result.exit_code != 0 {
        return Err(DecodeError::NonZeroExit {
            code: result.exit_code,
            stderr: truncate_chars(result.stderr.trim(), 200),
        });
    }
    decode_stdout(&result.stdout)
}

pub fn decode_stdout(stdout: &str) -> Result<RawExecutionResult, DecodeError> {
    let text = stdout.trim();
    if text.is_empty() {
        return Err(DecodeError::EmptyOutput);
    }

    let object = match serde_json::from_str::<Value>(text) {
        Ok(v) if v.is_object() => v,
        first => {
            let reason = match first {
                Ok(_) => "top-level value is not an object".to_string(),
                Err(e) => e.to_string(),
            };
            debug!(%reason, "whole stdout is not a result object; scanning lines");
            last_object_line(text).ok_or(DecodeError::InvalidJson { reason })?
        }
    };
    into_raw(object)
}

fn last_object_line(text: &str) -> Option<Value> {
    text.lines()
        .rev()
        .map(str::trim)
        .filter(|l| l.starts_with('{'))
        .find_map(|l| serde_json::from_str::<Value>(l).ok().filter(Value::is_object))
}

fn into_raw(mut object: Value) -> Result<RawExecutionResult, DecodeError> {
    let kind = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or(DecodeError::MissingType)?
        .to_string();
    let data = match object.get_mut("data").map(Value::take) {
        Some(Value::Null) | None => Value::Object(Default::default()),
        Some(v) => v,
    };
    Ok(RawExecutionResult::new(kind, data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_single_object() {
        let raw = decode(&ExecutionResult::success(
            r#"{"type": "scalar", "data": {"value": 1}}"#,
        ))
        .unwrap();
        assert_eq!(raw.kind, "scalar");
        assert_eq!(raw.data, json!({"value": 1}));
    }

    #[test]
    fn pretty_printed_object_is_accepted() {
        let raw = decode_stdout("{\n  \"type\": \"status\",\n  \"data\": {}\n}\n").unwrap();
        assert_eq!(raw.kind, "status");
    }

    #[test]
    fn last_json_line_wins_after_logging() {
        let out = "starting\n{\"type\": \"scalar\", \"data\": {\"value\": 1}}\n{\"type\": \"gauge\"}\n";
        let raw = decode_stdout(out).unwrap();
        assert_eq!(raw.kind, "gauge");
        assert_eq!(raw.data, json!({}));
    }

    #[test]
    fn non_zero_exit_fails_even_with_json() {
        let result = ExecutionResult {
            exit_code: 2,
            stdout: r#"{"type": "scalar", "data": {"value": 999}}"#.into(),
            stderr: "simulated script failure\n".into(),
        };
        assert_eq!(
            decode(&result).unwrap_err(),
            DecodeError::NonZeroExit {
                code: 2,
                stderr: "simulated script failure".into(),
            }
        );
    }

    #[test]
    fn rejects_empty_and_non_object_output() {
        assert_eq!(decode_stdout("  \n").unwrap_err(), DecodeError::EmptyOutput);
        assert!(matches!(decode_stdout("[1, 2]"), Err(DecodeError::InvalidJson { .. })));
        assert!(matches!(decode_stdout("hello"), Err(DecodeError::InvalidJson { .. })));
        assert_eq!(decode_stdout(r#"{"data": {}}"#).unwrap_err(), DecodeError::MissingType);
        assert_eq!(decode_stdout(r#"{"type": 3}"#).unwrap_err(), DecodeError::MissingType);
    }
}
