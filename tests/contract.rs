use mymetrics::args;
use mymetrics::contract::{
    normalize, CardPayload, CardType, FieldMappingConfig, NormalizeError, RawExecutionResult,
};
use mymetrics::execution::{decode, ExecutionResult};
use mymetrics::series::{self, SeriesMode, DUAL_AXIS_RANGE_RATIO_THRESHOLD};
use pretty_assertions::assert_eq;
use serde_json::json;

fn script_output(value: serde_json::Value) -> ExecutionResult {
    ExecutionResult::success(format!("{value}\n"))
}

#[test]
fn series_script_output_flows_to_effective_mode() {
    let out = script_output(json!({
        "type": "series",
        "data": {
            "x_axis": [0.0, 1.0, 2.0],
            "series": [
                {"name": "cpu", "values": [0, 10, 8]},
                {"name": "cost", "values": [0, 40, 30]},
            ],
        },
    }));
    let raw = decode(&out).unwrap();
    let payload = normalize(&raw, CardType::Series, &FieldMappingConfig::default()).unwrap();
    let s = payload.as_series().unwrap();
    assert_eq!(s.x_axis, vec!["0", "1", "2"]);
    assert_eq!(
        series::infer_mode_from_payload(s, DUAL_AXIS_RANGE_RATIO_THRESHOLD),
        SeriesMode::DualAxisDoubleLine
    );
}

#[test]
fn single_series_requested_as_double_line_falls_back() {
    let raw = RawExecutionResult::new(
        "series",
        json!({"x_axis": ["A", "B"], "series": [{"name": "demo", "values": [1, 2]}]}),
    );
    let payload = normalize(&raw, CardType::Series, &FieldMappingConfig::default()).unwrap();
    let s = payload.as_series().unwrap();
    assert!(series::should_fallback_to_single_line(SeriesMode::SingleAxisDoubleLine, s));
    assert_eq!(
        series::effective_mode(SeriesMode::SingleAxisDoubleLine, s),
        SeriesMode::SingleAxisSingleLine
    );
}

#[test]
fn nested_scalar_payload_with_mapping_file_shape() {
    let out = script_output(json!({
        "type": "scalar",
        "data": {
            "metrics": {"cpu": {"value": 67.8, "unit": "%", "trend": "up", "color": "warning"}},
            "meta": {"host": "local-dev"},
        },
    }));
    let mapping = FieldMappingConfig::from_json_str(
        r#"{"scalar": {"value_key": "metrics.cpu.value", "unit_key": "metrics.cpu.unit",
            "trend_key": "metrics.cpu.trend", "color_key": "metrics.cpu.color"}}"#,
    )
    .unwrap();
    let payload = normalize(&decode(&out).unwrap(), CardType::Scalar, &mapping).unwrap();
    let v = serde_json::to_value(&payload).unwrap();
    assert_eq!(
        v,
        json!({"type": "scalar", "data": {"value": 67.8, "unit": "%", "trend": "up", "color": "warning"}})
    );
}

#[test]
fn wrong_type_is_rejected_for_every_card_type() {
    let raw = RawExecutionResult::new("status", json!({"label": "service-a", "state": "ok"}));
    for expected in CardType::ALL {
        let result = normalize(&raw, expected, &FieldMappingConfig::default());
        if expected == CardType::Status {
            assert!(matches!(result, Ok(CardPayload::Status(_))));
        } else {
            assert!(matches!(result, Err(NormalizeError::TypeMismatch { .. })));
        }
    }
}

#[test]
fn digest_script_output_normalizes_in_order() {
    let items: Vec<_> = (1..=3)
        .map(|i| json!({"title": format!("Headline {i}"), "body": format!("Summary paragraph for item {i}.")}))
        .collect();
    let out = script_output(json!({"type": "digest", "data": {"items": items}}));
    let payload = normalize(&decode(&out).unwrap(), CardType::Digest, &FieldMappingConfig::default())
        .unwrap();
    let CardPayload::Digest(d) = payload else {
        panic!("expected digest payload");
    };
    assert_eq!(d.items.len(), 3);
    assert_eq!(d.items[2].title.as_deref(), Some("Headline 3"));
}

#[test]
fn argument_text_round_trips_through_format() {
    let tokens = vec![
        "--series-names".to_string(),
        "cpu, mem".to_string(),
        "--body-template".to_string(),
        "Say \"hi\" to {index}\\n".to_string(),
        String::new(),
    ];
    let text = args::format(&tokens);
    assert_eq!(args::parse(&text).unwrap(), tokens);
    assert_eq!(args::format(&args::parse(&text).unwrap()), text);
}
