//! Tests for AG-UI event serialization/deserialization.
//!
//! These tests verify the external API contract between the server and frontend.

use super::*;
use serde_json::json;

fn to_value(kind: EventKind) -> Value {
    serde_json::to_value(Event::at(kind, 1_700_000_000_000)).unwrap()
}

#[test]
fn test_all_lifecycle_events_serialization() {
    let cases = [
        (
            EventKind::RunStarted {
                thread_id: "t1".to_string(),
                run_id: "r1".to_string(),
                parent_run_id: None,
            },
            "RUN_STARTED",
        ),
        (
            EventKind::RunFinished {
                thread_id: "t1".to_string(),
                run_id: "r1".to_string(),
            },
            "RUN_FINISHED",
        ),
        (
            EventKind::RunError {
                thread_id: None,
                run_id: None,
                message: "failure".to_string(),
                code: None,
            },
            "RUN_ERROR",
        ),
        (
            EventKind::RunError {
                thread_id: Some("t1".to_string()),
                run_id: Some("r1".to_string()),
                message: "failure".to_string(),
                code: Some("E001".to_string()),
            },
            "RUN_ERROR",
        ),
    ];

    for (kind, expected_type) in cases {
        assert_eq!(kind.event_type(), expected_type);
        let json = serde_json::to_string(&Event::new(kind.clone())).unwrap();
        assert!(
            json.contains(&format!("\"type\":\"{}\"", expected_type)),
            "Event {:?} should serialize with type {}",
            kind,
            expected_type
        );
    }
}

#[test]
fn test_run_started_wire_shape() {
    let value = to_value(EventKind::RunStarted {
        thread_id: "t1".to_string(),
        run_id: "r1".to_string(),
        parent_run_id: None,
    });

    assert_eq!(
        value,
        json!({
            "type": "RUN_STARTED",
            "threadId": "t1",
            "runId": "r1",
            "timestamp": 1_700_000_000_000i64
        })
    );
}

#[test]
fn test_fields_are_camel_case() {
    let value = to_value(EventKind::ToolCallStart {
        tool_call_id: "tc-1".to_string(),
        tool_call_name: "search".to_string(),
        parent_message_id: Some("msg-1".to_string()),
    });

    assert_eq!(value["toolCallId"], "tc-1");
    assert_eq!(value["toolCallName"], "search");
    assert_eq!(value["parentMessageId"], "msg-1");
    assert!(value.get("tool_call_id").is_none());
}

#[test]
fn test_all_message_events_roundtrip() {
    let kinds = vec![
        EventKind::TextMessageStart {
            message_id: "msg-1".to_string(),
            role: MessageRole::Assistant,
        },
        EventKind::TextMessageContent {
            message_id: "msg-1".to_string(),
            delta: "Hello world".to_string(),
        },
        EventKind::TextMessageEnd {
            message_id: "msg-1".to_string(),
        },
    ];

    for kind in kinds {
        let event = Event::new(kind);
        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deserialized);
    }
}

#[test]
fn test_tool_call_events_complete_sequence() {
    let cases = [
        (
            EventKind::ToolCallStart {
                tool_call_id: "tc-1".to_string(),
                tool_call_name: "echo".to_string(),
                parent_message_id: None,
            },
            "TOOL_CALL_START",
        ),
        (
            EventKind::ToolCallArgs {
                tool_call_id: "tc-1".to_string(),
                delta: r#"{"arg":"value"}"#.to_string(),
            },
            "TOOL_CALL_ARGS",
        ),
        (
            EventKind::ToolCallEnd {
                tool_call_id: "tc-1".to_string(),
            },
            "TOOL_CALL_END",
        ),
        (
            EventKind::ToolCallResult {
                message_id: "result-1".to_string(),
                tool_call_id: "tc-1".to_string(),
                role: Some(MessageRole::Tool),
                content: "Success".to_string(),
            },
            "TOOL_CALL_RESULT",
        ),
    ];

    for (kind, expected_type) in cases {
        let value = to_value(kind.clone());
        assert_eq!(value["type"], expected_type);

        let back: Event = serde_json::from_value(value).unwrap();
        assert_eq!(back.kind, kind);
    }
}

#[test]
fn test_state_events_with_complex_data() {
    let state = json!({
        "users": [
            {"id": 1, "name": "Alice"},
            {"id": 2, "name": "Bob"}
        ],
        "count": 2
    });

    let value = to_value(EventKind::StateSnapshot {
        state: state.clone(),
    });
    assert_eq!(value["type"], "STATE_SNAPSHOT");
    assert_eq!(value["state"], state);

    let value = to_value(EventKind::StateDelta {
        delta: json!({"count": 3}),
    });
    assert_eq!(value["type"], "STATE_DELTA");
    assert_eq!(value["delta"]["count"], 3);

    let back: Event = serde_json::from_value(value).unwrap();
    assert!(matches!(back.kind, EventKind::StateDelta { .. }));
}

#[test]
fn test_messages_snapshot_uses_array_content() {
    let value = to_value(EventKind::MessagesSnapshot {
        messages: vec![Message::text("m1", MessageRole::User, "hi")],
    });

    assert_eq!(value["type"], "MESSAGES_SNAPSHOT");
    assert_eq!(
        value["messages"][0]["content"],
        json!([{"type": "text", "text": "hi"}])
    );
}

#[test]
fn test_activity_events() {
    let mut activity = Activity::new("a1", "thinking", ActivityStatus::Running);
    activity.description = Some("pondering".to_string());

    let value = to_value(EventKind::ActivityDelta {
        activity: activity.clone(),
    });
    assert_eq!(value["type"], "ACTIVITY_DELTA");
    assert_eq!(
        value["activity"],
        json!({"id": "a1", "type": "thinking", "status": "running", "description": "pondering"})
    );

    let value = to_value(EventKind::ActivitySnapshot {
        activities: vec![activity],
    });
    assert_eq!(value["type"], "ACTIVITY_SNAPSHOT");
    assert_eq!(value["activities"].as_array().unwrap().len(), 1);
}

#[test]
fn test_raw_and_custom_events() {
    let value = to_value(EventKind::Raw {
        data: json!({"anything": [1, 2, 3]}),
    });
    assert_eq!(value["type"], "RAW");
    assert_eq!(value["data"]["anything"][2], 3);

    let value = to_value(EventKind::Custom {
        name: "thinking".to_string(),
        data: json!({"content": "hmm"}),
    });
    assert_eq!(value["type"], "CUSTOM");
    assert_eq!(value["name"], "thinking");
}

#[test]
fn test_skip_serializing_if_behavior() {
    let value = to_value(EventKind::RunError {
        thread_id: None,
        run_id: None,
        message: "error".to_string(),
        code: None,
    });
    let obj = value.as_object().unwrap();
    assert!(!obj.contains_key("code"), "None code should be omitted");
    assert!(!obj.contains_key("threadId"));
    assert!(!obj.contains_key("rawEvent"));
    assert!(!obj.values().any(Value::is_null));

    let value = to_value(EventKind::RunError {
        thread_id: None,
        run_id: None,
        message: "error".to_string(),
        code: Some("E001".to_string()),
    });
    assert_eq!(value["code"], "E001");
}

#[test]
fn test_raw_event_included_when_set() {
    let event = Event::new(EventKind::TextMessageEnd {
        message_id: "m1".to_string(),
    })
    .with_raw_event(json!({"source": "framework"}));

    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["rawEvent"], json!({"source": "framework"}));
}

#[test]
fn test_deserialize_without_timestamp() {
    let event: Event =
        serde_json::from_str(r#"{"type":"TEXT_MESSAGE_END","messageId":"m1"}"#).unwrap();
    assert_eq!(event.timestamp, 0);
    assert_eq!(event.event_type(), "TEXT_MESSAGE_END");
}

#[test]
fn test_unknown_type_fails() {
    let result: Result<Event, _> = serde_json::from_str(r#"{"type":"NOT_A_THING"}"#);
    assert!(result.is_err());
}

#[test]
fn test_event_with_special_characters() {
    let special_chars = "Hello \"world\"\n\t\r\\slash/forward";

    let event = Event::new(EventKind::TextMessageContent {
        message_id: "msg-1".to_string(),
        delta: special_chars.to_string(),
    });

    let json = serde_json::to_string(&event).unwrap();
    let deserialized: Event = serde_json::from_str(&json).unwrap();

    if let EventKind::TextMessageContent { delta, .. } = deserialized.kind {
        assert_eq!(delta, special_chars);
    } else {
        panic!("Wrong event type");
    }
}

#[test]
fn test_event_with_unicode() {
    let unicode_text = "Hello 世界 🌍 Привет";

    let event = Event::new(EventKind::TextMessageContent {
        message_id: "msg-1".to_string(),
        delta: unicode_text.to_string(),
    });

    let json = serde_json::to_string(&event).unwrap();
    let deserialized: Event = serde_json::from_str(&json).unwrap();
    assert_eq!(event.kind, deserialized.kind);
}

#[test]
fn test_terminal_kinds() {
    assert!(EventKind::RunFinished {
        thread_id: "t".to_string(),
        run_id: "r".to_string()
    }
    .is_terminal());
    assert!(EventKind::RunError {
        thread_id: None,
        run_id: None,
        message: "x".to_string(),
        code: None
    }
    .is_terminal());
    assert!(!EventKind::TextMessageEnd {
        message_id: "m".to_string()
    }
    .is_terminal());
}

#[test]
fn test_timestamp_is_current() {
    let before = now_millis();
    let event = Event::new(EventKind::StepFinished {
        step_id: "s1".to_string(),
    });
    let after = now_millis();

    assert!(event.timestamp >= before && event.timestamp <= after);
}
