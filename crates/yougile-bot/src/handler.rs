//! Serverless entry point.
//!
//! Accepts the loosely-shaped events a cloud function receives and answers
//! with `{statusCode, body}` where `body` is the result envelope as JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use crate::domain::{failure_envelope, Dispatcher};
use crate::entities::{Request, RequestType};
use crate::errors::Failure;

/// Function response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status_code: u16,
    pub body: String,
}

/// Turn an incoming event into a request.
///
/// - an object with `body`: a string body is parsed as JSON (plain text on
///   failure), an object body is used as-is
/// - an object without `body` is the request itself
/// - a string is parsed as JSON, plain text on failure
///
/// JSON that is not an object counts as plain text.
pub fn normalize_event(event: Value) -> Request {
    match event {
        Value::Object(mut fields) => match fields.remove("body") {
            Some(body) => from_payload(body),
            None => Request::from_value(&Value::Object(fields)),
        },
        other => from_payload(other),
    }
}

fn from_payload(payload: Value) -> Request {
    match payload {
        Value::Object(_) => Request::from_value(&payload),
        Value::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(parsed @ Value::Object(_)) => Request::from_value(&parsed),
            _ => Request::new(RequestType::default(), text),
        },
        Value::Null => Request::new(RequestType::default(), String::new()),
        other => Request::new(RequestType::default(), other.to_string()),
    }
}

/// Decode a raw request body: JSON when it parses, otherwise a text string.
pub fn event_from_bytes(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Handle one event.
///
/// Errors that escape the dispatcher answer 500, except recoverable ones.
pub async fn handle_event(dispatcher: &Dispatcher, event: Value) -> HandlerResponse {
    let request = normalize_event(event);
    info!(
        request_type = %request.request_type,
        text_chars = request.text.chars().count(),
        "Received request"
    );

    match dispatcher.dispatch(&request).await {
        Ok(envelope) => {
            info!(status = envelope.status.as_str(), "Request processed");
            HandlerResponse {
                status_code: 200,
                body: envelope.to_json(),
            }
        }
        Err(err) => {
            let status_code = match err.failure() {
                Failure::Recoverable(..) => 200,
                Failure::Fatal(kind, _) => {
                    error!(?kind, "Request failed with a fatal error");
                    500
                }
            };
            HandlerResponse {
                status_code,
                body: failure_envelope(&request, &err).to_json(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_body_string_json() {
        let request = normalize_event(json!({"body": r#"{"type": "sprint", "text": "sprint 12"}"#}));
        assert_eq!(request, Request::new(RequestType::Sprint, "sprint 12"));
    }

    #[test]
    fn test_body_plain_text() {
        let request = normalize_event(json!({"body": "Сделать форму входа"}));
        assert_eq!(request, Request::new(RequestType::Analysis, "Сделать форму входа"));
    }

    #[test]
    fn test_body_object() {
        let request = normalize_event(json!({"body": {"type": "governance", "text": "check"}}));
        assert_eq!(request, Request::new(RequestType::Governance, "check"));
    }

    #[test]
    fn test_bare_object() {
        let request = normalize_event(json!({"type": "calendar", "text": "sync"}));
        assert_eq!(request, Request::new(RequestType::Calendar, "sync"));

        let request = normalize_event(json!({"text": "only text"}));
        assert_eq!(request.request_type, RequestType::Analysis);
    }

    #[test]
    fn test_string_event() {
        let request = normalize_event(json!(r#"{"type": "sprint", "text": "go"}"#));
        assert_eq!(request, Request::new(RequestType::Sprint, "go"));

        let request = normalize_event(json!("just words"));
        assert_eq!(request, Request::new(RequestType::Analysis, "just words"));
    }

    #[test]
    fn test_non_object_json_is_text() {
        let request = normalize_event(json!({"body": "[1, 2]"}));
        assert_eq!(request.text, "[1, 2]");
        assert_eq!(normalize_event(json!("42")).text, "42");
        assert_eq!(normalize_event(json!(7)).text, "7");
        assert!(normalize_event(Value::Null).text.is_empty());
    }

    #[test]
    fn test_event_from_bytes() {
        assert_eq!(event_from_bytes(br#"{"text": "a"}"#), json!({"text": "a"}));
        assert_eq!(event_from_bytes(b"plain"), json!("plain"));
    }

    #[test]
    fn test_response_field_names() {
        let response = HandlerResponse {
            status_code: 200,
            body: "{}".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"statusCode": 200, "body": "{}"})
        );
    }
}
