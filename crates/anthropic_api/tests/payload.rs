use anthropic_api::{MessageParam, MessageRole, MessagesRequest, MessagesResponse};
use serde_json::json;

#[test]
fn request_serializes_flat_message_list_with_lowercase_roles() {
    let request = MessagesRequest::new(
        "claude-sonnet-4-5",
        2048,
        vec![
            MessageParam::new(MessageRole::User, "hello"),
            MessageParam::new(MessageRole::Assistant, "hi there"),
            MessageParam::new(MessageRole::User, "next question"),
        ],
    );

    let value = serde_json::to_value(&request).expect("request should serialize");
    assert_eq!(
        value,
        json!({
            "model": "claude-sonnet-4-5",
            "max_tokens": 2048,
            "messages": [
                {"role": "user", "content": "hello"},
                {"role": "assistant", "content": "hi there"},
                {"role": "user", "content": "next question"},
            ],
        })
    );
}

#[test]
fn absent_system_and_metadata_are_omitted_from_the_wire() {
    let request = MessagesRequest::new("model", 64, Vec::new());
    let value = serde_json::to_value(&request).expect("request should serialize");

    assert!(value.get("system").is_none());
    assert!(value.get("metadata").is_none());
}

#[test]
fn system_and_user_id_are_carried_when_set() {
    let request = MessagesRequest::new("model", 64, Vec::new())
        .with_system("be terse")
        .with_user_id("session-42");
    let value = serde_json::to_value(&request).expect("request should serialize");

    assert_eq!(value["system"], "be terse");
    assert_eq!(value["metadata"]["user_id"], "session-42");
}

#[test]
fn response_text_joins_text_blocks_with_newlines() {
    let response: MessagesResponse = serde_json::from_value(json!({
        "id": "msg_01",
        "type": "message",
        "role": "assistant",
        "model": "claude-sonnet-4-5",
        "content": [
            {"type": "text", "text": "first"},
            {"type": "text", "text": "second"},
        ],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 10, "output_tokens": 4},
    }))
    .expect("response should deserialize despite unknown fields");

    assert_eq!(response.text(), "first\nsecond");
    assert_eq!(response.stop_reason.as_deref(), Some("end_turn"));
}

#[test]
fn unknown_block_types_are_tolerated_and_skipped() {
    let response: MessagesResponse = serde_json::from_value(json!({
        "content": [
            {"type": "thinking", "thinking": "...", "signature": "sig"},
            {"type": "text", "text": "visible"},
            {"type": "tool_use", "id": "t1", "name": "calc", "input": {}},
        ],
    }))
    .expect("unknown block types must not break parsing");

    assert_eq!(response.text(), "visible");
}

#[test]
fn response_with_no_text_blocks_is_an_empty_reply() {
    let response: MessagesResponse =
        serde_json::from_value(json!({ "content": [] })).expect("empty content should parse");
    assert_eq!(response.text(), "");

    let response: MessagesResponse = serde_json::from_value(json!({}))
        .expect("missing content should default to empty");
    assert_eq!(response.text(), "");
}
