#![allow(missing_docs)]
use chrono::{DateTime, TimeZone, Utc};
use station_core::error::PadError;
use station_core::store::PadStore;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).single().expect("valid timestamp")
}

fn write_json(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).expect("Failed to write fixture store");
    path
}

#[test]
fn test_load_current_schema() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let path = write_json(
        temp_dir.path(),
        "HQ-2024-01-01.json",
        r#"{
            "id": "1704067200-1234",
            "pads": {
                "0": { "key": "deadbeef00", "epoch_date": null, "consumed": false },
                "1": { "key": "cafebabe11", "epoch_date": 1704153600, "consumed": true }
            }
        }"#,
    );

    let store = PadStore::load(&path).expect("Failed to load store");
    assert_eq!(store.id(), "1704067200-1234");
    assert_eq!(store.len(), 2);
    assert_eq!(store.unconsumed(), 1);

    let first = store.entry(0).expect("entry 0 should exist");
    assert_eq!(first.key, vec![0xde, 0xad, 0xbe, 0xef, 0x00]);
    assert!(!first.consumed);
    assert_eq!(first.consumed_at, None);

    let second = store.entry(1).expect("entry 1 should exist");
    assert!(second.consumed);
    assert_eq!(
        second.consumed_at,
        Utc.timestamp_opt(1_704_153_600, 0).single()
    );
}

#[test]
fn test_load_legacy_bare_hex_entries() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let path = write_json(
        temp_dir.path(),
        "one_time_pad_00042.json",
        r#"{ "id": "00042", "pads": { "0": "deadbeef00", "1": "cafebabe11" } }"#,
    );

    let store = PadStore::load(&path).expect("Failed to load legacy store");
    assert_eq!(store.id(), "00042");
    assert_eq!(store.len(), 2);
    assert_eq!(store.unconsumed(), 2);
    assert_eq!(
        store.entry(1).expect("entry 1 should exist").key,
        vec![0xca, 0xfe, 0xba, 0xbe, 0x11]
    );
}

#[test]
fn test_load_normalizes_numeric_id() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let path = write_json(
        temp_dir.path(),
        "one_time_pad_00007.json",
        r#"{ "id": 7, "pads": { "0": "ff" } }"#,
    );

    let store = PadStore::load(&path).expect("Failed to load store");
    assert_eq!(store.id(), "7");
}

#[test]
fn test_load_rejects_missing_id() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let path = write_json(
        temp_dir.path(),
        "HQ-2024-01-01.json",
        r#"{ "pads": { "0": "ff" } }"#,
    );

    let err = PadStore::load(&path).expect_err("missing id must fail");
    assert!(matches!(err, PadError::MalformedStore { .. }));
}

#[test]
fn test_load_rejects_missing_pads() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let path = write_json(temp_dir.path(), "HQ-2024-01-01.json", r#"{ "id": "x" }"#);

    let err = PadStore::load(&path).expect_err("missing pads must fail");
    assert!(matches!(err, PadError::MalformedStore { .. }));
}

#[test]
fn test_load_rejects_non_hex_key_material() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let path = write_json(
        temp_dir.path(),
        "HQ-2024-01-01.json",
        r#"{ "id": "x", "pads": { "0": { "key": "not hex!", "epoch_date": null, "consumed": false } } }"#,
    );

    let err = PadStore::load(&path).expect_err("non-hex key must fail");
    match err {
        PadError::MalformedStore { reason, .. } => assert!(reason.contains("index 0")),
        other => panic!("expected MalformedStore, got {other:?}"),
    }
}

#[test]
fn test_load_rejects_odd_length_key() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let path = write_json(
        temp_dir.path(),
        "HQ-2024-01-01.json",
        r#"{ "id": "x", "pads": { "0": "abc" } }"#,
    );

    let err = PadStore::load(&path).expect_err("odd-length hex must fail");
    assert!(matches!(err, PadError::MalformedStore { .. }));
}

#[test]
fn test_load_rejects_non_numeric_index() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let path = write_json(
        temp_dir.path(),
        "HQ-2024-01-01.json",
        r#"{ "id": "x", "pads": { "first": "ff" } }"#,
    );

    let err = PadStore::load(&path).expect_err("non-numeric index must fail");
    match err {
        PadError::MalformedStore { reason, .. } => assert!(reason.contains("first")),
        other => panic!("expected MalformedStore, got {other:?}"),
    }
}

#[test]
fn test_load_rejects_garbage_bytes() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let path = write_json(temp_dir.path(), "HQ-2024-01-01.json", "*** not json ***");

    let err = PadStore::load(&path).expect_err("garbage must fail");
    assert!(matches!(err, PadError::MalformedStore { .. }));
}

#[test]
fn test_mark_consumed_flips_flag_and_returns_previous_state() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let path = write_json(
        temp_dir.path(),
        "HQ-2024-01-01.json",
        r#"{ "id": "x", "pads": { "0": "deadbeef00" } }"#,
    );

    let mut store = PadStore::load(&path).expect("Failed to load store");
    let previous = store.mark_consumed(0, fixed_now()).expect("Failed to consume");
    assert!(!previous.consumed);
    assert_eq!(previous.consumed_at, None);

    let entry = store.entry(0).expect("entry 0 should exist");
    assert!(entry.consumed);
    assert_eq!(entry.consumed_at, Some(fixed_now()));
}

#[test]
fn test_mark_consumed_twice_reports_original_timestamp() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let path = write_json(
        temp_dir.path(),
        "HQ-2024-01-01.json",
        r#"{ "id": "x", "pads": { "0": "deadbeef00" } }"#,
    );

    let mut store = PadStore::load(&path).expect("Failed to load store");
    store.mark_consumed(0, fixed_now()).expect("Failed to consume");

    let later = fixed_now() + chrono::Duration::hours(1);
    let err = store.mark_consumed(0, later).expect_err("double consume must fail");
    match err {
        PadError::AlreadyConsumed { index, consumed_at } => {
            assert_eq!(index, 0);
            assert_eq!(consumed_at, Some(fixed_now()));
        }
        other => panic!("expected AlreadyConsumed, got {other:?}"),
    }
}

#[test]
fn test_mark_consumed_unknown_index() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let path = write_json(
        temp_dir.path(),
        "HQ-2024-01-01.json",
        r#"{ "id": "x", "pads": { "0": "ff" } }"#,
    );

    let mut store = PadStore::load(&path).expect("Failed to load store");
    let err = store.mark_consumed(9, fixed_now()).expect_err("unknown index must fail");
    assert!(matches!(err, PadError::NoEligiblePad { .. }));
}

#[test]
fn test_save_round_trips_consumption_state() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let path = write_json(
        temp_dir.path(),
        "HQ-2024-01-01.json",
        r#"{ "id": "1704067200-1234", "pads": { "0": "deadbeef00", "1": "cafebabe11" } }"#,
    );

    let mut store = PadStore::load(&path).expect("Failed to load store");
    store.mark_consumed(1, fixed_now()).expect("Failed to consume");
    store.save(&path).expect("Failed to save store");

    let reloaded = PadStore::load(&path).expect("Failed to reload store");
    assert_eq!(reloaded.id(), "1704067200-1234");
    assert_eq!(reloaded.len(), 2);
    assert!(!reloaded.entry(0).expect("entry 0 should exist").consumed);
    let consumed = reloaded.entry(1).expect("entry 1 should exist");
    assert!(consumed.consumed);
    assert_eq!(consumed.consumed_at, Some(fixed_now()));
    assert_eq!(consumed.key, vec![0xca, 0xfe, 0xba, 0xbe, 0x11]);

    // The legacy form is rewritten in the current schema.
    let raw = fs::read_to_string(&path).expect("Failed to read raw store");
    assert!(raw.contains("\"epoch_date\""));
    assert!(!temp_dir.path().join("HQ-2024-01-01.json.tmp").exists());
}
