use domain::{HistoryRecord, MessageRecord, TableKind, TableRecord, ValueRecord};

#[test]
fn table_kind_parses_known_names() {
    assert_eq!(TableKind::parse("messages"), Some(TableKind::Messages));
    assert_eq!(TableKind::parse("values"), Some(TableKind::Values));
    assert_eq!(TableKind::parse("history"), Some(TableKind::History));
    assert_eq!(TableKind::parse("users"), Some(TableKind::Users));
    assert_eq!(TableKind::parse("unknown"), None);
}

#[test]
fn message_record_omits_absent_value() {
    let record = TableRecord::Messages(MessageRecord {
        topic: "t1".to_string(),
        payload: "hello".to_string(),
        value: None,
    });
    let json = serde_json::to_value(&record).expect("serialize");
    assert_eq!(json["topic"], "t1");
    assert!(json.get("value").is_none());
}

#[test]
fn value_record_omits_absent_date() {
    let record = TableRecord::Values(ValueRecord {
        data: 3.5,
        date: None,
    });
    let json = serde_json::to_value(&record).expect("serialize");
    assert_eq!(json["data"], 3.5);
    assert!(json.get("date").is_none());
}

#[test]
fn history_record_keeps_null_performer() {
    // performer 列在插入时保留（允许为 null），与另外两个可选字段不同。
    let record = TableRecord::History(HistoryRecord {
        performer: None,
        value: 1.0,
        date: "2026-01-01T00:00:00+00:00".to_string(),
    });
    let json = serde_json::to_value(&record).expect("serialize");
    assert!(json.get("performer").is_some());
    assert!(json["performer"].is_null());
}

#[test]
fn record_reports_its_table() {
    let record = TableRecord::Values(ValueRecord {
        data: 1.0,
        date: None,
    });
    assert_eq!(record.table(), TableKind::Values);
}
