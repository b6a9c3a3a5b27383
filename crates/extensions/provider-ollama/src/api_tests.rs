use super::*;

#[test]
fn test_chat_request_serialization() {
    let request = ChatRequest {
        model: "gemma3",
        messages: vec![ChatMessage::user("Hello".to_string(), Vec::new())],
        stream: false,
    };

    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["model"], "gemma3");
    assert_eq!(json["stream"], false);
    assert_eq!(json["messages"][0]["role"], "user");
    assert!(json["messages"][0].get("images").is_none());
}

#[test]
fn test_chat_request_with_images() {
    let request = ChatRequest {
        model: "llava",
        messages: vec![ChatMessage::user("Look".to_string(), vec!["aGk=".to_string()])],
        stream: false,
    };

    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["messages"][0]["images"][0], "aGk=");
}

#[test]
fn test_chat_response_deserialization() {
    let json = r#"{"model":"gemma3","message":{"role":"assistant","content":"Jane"},"done":true}"#;
    let response: ChatResponse = serde_json::from_str(json).unwrap();
    assert_eq!(response.message.content, "Jane");
    assert!(response.done);
}

#[test]
fn test_tags_contains() {
    let json = r#"{"models":[{"name":"gemma3:latest"},{"name":"llava:13b"},{"name":"phi"}]}"#;
    let tags: TagsResponse = serde_json::from_str(json).unwrap();
    assert!(tags.contains("gemma3"));
    assert!(tags.contains("gemma3:latest"));
    assert!(tags.contains("phi"));
    assert!(!tags.contains("gemma"));
    assert!(!tags.contains("llava:7b"));
}

#[test]
fn test_tags_missing_models_key() {
    let tags: TagsResponse = serde_json::from_str("{}").unwrap();
    assert!(!tags.contains("gemma3"));
}
