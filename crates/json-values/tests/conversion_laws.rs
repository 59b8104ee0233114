//! Behavioural laws of the conversion engine on realistic payloads.

use json_values::{decode, encode, DecodeContext};
use serde_json::json;
use value_core::{TypedValue, ValueType};

fn decode_root(raw: &serde_json::Value) -> TypedValue {
    decode(raw, &mut DecodeContext::new()).expect("decode is total on JSON input")
}

#[test]
fn test_round_trip_query_rows() {
    // Shape of an endpoint query response row set
    let raw = json!([
        {"date": ["2025-10-02"], "count": 12, "ratio": 0.25, "ok": true, "meta": {"host": "a"}},
        {"date": [], "count": 3, "ratio": 1.5, "ok": false, "meta": {"host": "b"}},
    ]);
    assert_eq!(encode(&decode_root(&raw)), raw);
}

#[test]
fn test_round_trip_nested_metrics_blob() {
    let raw = json!({
        "avg": 4.5,
        "buffer": 0,
        "inserts": 123_456_789_i64,
        "latest": null,
        "rates": {"1m": [1.0, 2.5], "5m": []},
    });
    assert_eq!(encode(&decode_root(&raw)), raw);
}

#[test]
fn test_heterogeneous_list_keeps_values_but_declares_last_type() {
    let raw = json!([1, "a", true]);
    let tv = decode_root(&raw);
    assert_eq!(tv.value_type(), ValueType::list(ValueType::Bool));
    // Values survive even though the declared type only reflects the last one
    assert_eq!(encode(&tv), raw);
}

#[test]
fn test_decode_is_total_on_deep_but_legal_input() {
    let mut raw = json!("leaf");
    for _ in 0..100 {
        raw = json!([raw]);
    }
    let tv = decode_root(&raw);
    assert_eq!(encode(&tv), raw);
}
