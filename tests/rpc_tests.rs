use std::sync::Arc;

use mcp_notes::protocol::{JsonRpcMessage, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR};
use mcp_notes::rpc::McpHandler;
use mcp_notes::store::NoteStore;
use serde_json::{json, Value};

struct Fixture {
    handler: McpHandler,
    _dir: tempfile::TempDir,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let store = NoteStore::open(dir.path().join("notes.json"));
    Fixture {
        handler: McpHandler::new(Arc::new(store)),
        _dir: dir,
    }
}

fn request(handler: &McpHandler, id: u64, method: &str, params: Value) -> JsonRpcMessage {
    let frame = json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params
    });
    handler
        .handle_raw(&frame.to_string())
        .expect("request should produce a response")
}

/// A successful tools/call returns the payload as JSON text; parse it back out.
fn tool_payload(response: &JsonRpcMessage) -> Value {
    let result = response.result.as_ref().expect("tool call should succeed");
    assert_eq!(result["isError"], false);
    let text = result["content"][0]["text"].as_str().unwrap();
    serde_json::from_str(text).unwrap()
}

#[test]
fn initialize_echoes_a_supported_protocol_version() {
    let f = fixture();
    let resp = request(
        &f.handler,
        1,
        "initialize",
        json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": { "name": "test-client", "version": "0.0.1" }
        }),
    );
    let result = resp.result.unwrap();
    assert_eq!(result["protocolVersion"], "2024-11-05");
    assert_eq!(result["serverInfo"]["name"], "mcp-notes");
    assert!(result["capabilities"]["tools"].is_object());
}

#[test]
fn initialize_falls_back_on_unknown_protocol_version() {
    let f = fixture();
    let resp = request(
        &f.handler,
        1,
        "initialize",
        json!({ "protocolVersion": "1999-01-01" }),
    );
    assert_eq!(resp.result.unwrap()["protocolVersion"], "2025-03-26");
}

#[test]
fn initialized_notification_gets_no_reply() {
    let f = fixture();
    let frame = json!({ "jsonrpc": "2.0", "method": "notifications/initialized" });
    assert!(f.handler.handle_raw(&frame.to_string()).is_none());
}

#[test]
fn ping_returns_empty_object() {
    let f = fixture();
    let resp = request(&f.handler, 7, "ping", json!({}));
    assert_eq!(resp.result.unwrap(), json!({}));
    assert_eq!(resp.id, Some(json!(7)));
}

#[test]
fn tools_list_exposes_the_three_note_tools() {
    let f = fixture();
    let resp = request(&f.handler, 2, "tools/list", json!({}));
    let tools = resp.result.unwrap()["tools"].as_array().unwrap().clone();
    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["list_notes", "read_notes", "add_note"]);
    for tool in &tools {
        assert_eq!(tool["inputSchema"]["type"], "object");
        assert!(tool["description"].as_str().unwrap().len() > 0);
    }
}

#[test]
fn add_then_list_then_read_roundtrip() {
    let f = fixture();

    let created = tool_payload(&request(
        &f.handler,
        3,
        "tools/call",
        json!({ "name": "add_note", "arguments": { "title": "groceries", "body": "eggs" } }),
    ));
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["title"], "groceries");
    assert_eq!(created["body"], "eggs");
    assert_eq!(created["created_at"], created["updated_at"]);

    // Summaries have no body.
    let listed = tool_payload(&request(
        &f.handler,
        4,
        "tools/call",
        json!({ "name": "list_notes", "arguments": {} }),
    ));
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], id.as_str());
    assert!(listed[0].get("body").is_none());

    // Reading by id returns the full note.
    let by_id = tool_payload(&request(
        &f.handler,
        5,
        "tools/call",
        json!({ "name": "read_notes", "arguments": { "ids": [id] } }),
    ));
    assert_eq!(by_id.as_array().unwrap()[0]["body"], "eggs");

    // all=true reads everything without ids.
    let all = tool_payload(&request(
        &f.handler,
        6,
        "tools/call",
        json!({ "name": "read_notes", "arguments": { "all": true } }),
    ));
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[test]
fn read_notes_without_arguments_reads_nothing() {
    let f = fixture();
    request(
        &f.handler,
        1,
        "tools/call",
        json!({ "name": "add_note", "arguments": { "title": "t", "body": "" } }),
    );
    let resp = request(&f.handler, 2, "tools/call", json!({ "name": "read_notes" }));
    assert_eq!(tool_payload(&resp), json!([]));
}

#[test]
fn add_note_with_blank_title_is_a_tool_error() {
    let f = fixture();
    let resp = request(
        &f.handler,
        1,
        "tools/call",
        json!({ "name": "add_note", "arguments": { "title": "   ", "body": "x" } }),
    );
    let result = resp.result.unwrap();
    assert_eq!(result["isError"], true);
    assert!(result["content"][0]["text"]
        .as_str()
        .unwrap()
        .contains("title is required"));
}

#[test]
fn add_note_with_missing_arguments_is_invalid_params() {
    let f = fixture();
    let resp = request(
        &f.handler,
        1,
        "tools/call",
        json!({ "name": "add_note", "arguments": { "body": "no title key" } }),
    );
    assert_eq!(resp.error.unwrap().code, INVALID_PARAMS);
}

#[test]
fn unknown_tool_is_invalid_params() {
    let f = fixture();
    let resp = request(
        &f.handler,
        1,
        "tools/call",
        json!({ "name": "delete_everything", "arguments": {} }),
    );
    let err = resp.error.unwrap();
    assert_eq!(err.code, INVALID_PARAMS);
    assert!(err.message.contains("delete_everything"));
}

#[test]
fn unknown_method_is_method_not_found() {
    let f = fixture();
    let resp = request(&f.handler, 1, "resources/list", json!({}));
    assert_eq!(resp.error.unwrap().code, METHOD_NOT_FOUND);
}

#[test]
fn unparseable_frame_is_a_parse_error_with_null_id() {
    let f = fixture();
    let resp = f.handler.handle_raw("{ this is not json").unwrap();
    assert_eq!(resp.error.unwrap().code, PARSE_ERROR);
    assert_eq!(resp.id, Some(Value::Null));
}

#[test]
fn batch_frames_are_rejected() {
    let f = fixture();
    let resp = f
        .handler
        .handle_raw(r#"[{"jsonrpc":"2.0","id":1,"method":"ping"}]"#)
        .unwrap();
    assert_eq!(resp.error.unwrap().code, INVALID_REQUEST);
}

#[test]
fn wrong_jsonrpc_version_is_invalid_request() {
    let f = fixture();
    let resp = f
        .handler
        .handle_raw(r#"{"jsonrpc":"1.0","id":1,"method":"ping"}"#)
        .unwrap();
    assert_eq!(resp.error.unwrap().code, INVALID_REQUEST);
}

#[test]
fn client_response_frames_are_ignored() {
    let f = fixture();
    let frame = r#"{"jsonrpc":"2.0","id":9,"result":{}}"#;
    assert!(f.handler.handle_raw(frame).is_none());
}
