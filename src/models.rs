use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::time_fmt::{UNSPECIFIED, json_display_time};

// WeCom robot message format
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "msgtype", rename_all = "lowercase")]
pub enum MessageEnvelope {
    Text { text: TextBody },
    Markdown { markdown: MarkdownBody },
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TextBody {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentioned_list: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentioned_mobile_list: Option<Vec<Value>>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MarkdownBody {
    pub content: String,
}

impl MessageEnvelope {
    // plain text, no mentions
    pub fn text(content: impl Into<String>) -> Self {
        MessageEnvelope::Text {
            text: TextBody {
                content: content.into(),
                mentioned_list: None,
                mentioned_mobile_list: None,
            },
        }
    }

    pub fn text_with_mentions(content: String, mentioned: Vec<Value>, mobiles: Vec<Value>) -> Self {
        MessageEnvelope::Text {
            text: TextBody {
                content,
                mentioned_list: Some(mentioned),
                mentioned_mobile_list: Some(mobiles),
            },
        }
    }

    pub fn markdown(content: String) -> Self {
        MessageEnvelope::Markdown {
            markdown: MarkdownBody { content },
        }
    }
}

const INVALID_BODY: &str = "Invalid request body. Must be a JSON object.";
const INVALID_CONTENT: &str = "Content is required and must be a non-empty string.";

// Parse a send request body into a JSON object
pub fn parse_object(body: &[u8]) -> Result<Map<String, Value>, AppError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(AppError::InvalidInput(INVALID_BODY.to_string())),
    }
}

// Non-empty `content` string, trimmed
pub fn required_content(body: &Map<String, Value>) -> Result<String, AppError> {
    match body.get("content") {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(AppError::InvalidInput(INVALID_CONTENT.to_string())),
    }
}

// Anything that is not an array becomes an empty list
pub fn list_or_empty(body: &Map<String, Value>, key: &str) -> Vec<Value> {
    match body.get(key) {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

// Upstream reports success with errcode 0
pub fn upstream_ok(result: &Value) -> bool {
    result.get("errcode").and_then(Value::as_i64) == Some(0)
}

const ALERT_LABELS: [&str; 5] = [
    "Search Name",
    "Event Type",
    "Search Type",
    "Start Time",
    "End Time",
];

/// The five alert fields picked out of an inbound alert object.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AlertPayload {
    pub search_name: Option<Value>,
    pub webhook_call_event: Option<Value>,
    pub search_type: Option<Value>,
    pub result_start: Option<Value>,
    pub result_end: Option<Value>,
}

impl AlertPayload {
    // Only these five fields are kept, everything else in the object is ignored
    pub fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            search_name: obj.get("searchName").cloned(),
            webhook_call_event: obj.get("webhookCallEvent").cloned(),
            search_type: obj.get("searchType").cloned(),
            result_start: obj.get("resultStart").cloned(),
            result_end: obj.get("resultEnd").cloned(),
        }
    }

    pub fn render(&self) -> String {
        let values = [
            field_text(self.search_name.as_ref()),
            field_text(self.webhook_call_event.as_ref()),
            field_text(self.search_type.as_ref()),
            json_display_time(self.result_start.as_ref()),
            json_display_time(self.result_end.as_ref()),
        ];

        ALERT_LABELS
            .iter()
            .zip(values)
            .map(|(label, value)| format!("{label}: {value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Alert text for a root intake body.
///
/// JSON objects become the five-line block, JSON strings and plain text are
/// used trimmed, anything else gets the all-unspecified block.
pub fn alert_text(body: &[u8]) -> String {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(obj)) => AlertPayload::from_object(&obj).render(),
        Ok(Value::String(s)) => s.trim().to_string(),
        Ok(_) => AlertPayload::default().render(),
        Err(_) => match std::str::from_utf8(body) {
            Ok(text) if !text.is_empty() => text.trim().to_string(),
            _ => AlertPayload::default().render(),
        },
    }
}

// Falsy values render as unspecified
fn field_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => UNSPECIFIED.to_string(),
        Some(Value::String(s)) if s.is_empty() => UNSPECIFIED.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => UNSPECIFIED.to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const UNSPECIFIED_BLOCK: &str = "Search Name: 未指定\nEvent Type: 未指定\nSearch Type: 未指定\nStart Time: 未指定\nEnd Time: 未指定";

    #[test]
    fn text_envelope_shape() {
        let env = MessageEnvelope::text_with_mentions("hi".into(), vec![json!("@all")], vec![]);
        assert_eq!(
            serde_json::to_value(&env).unwrap(),
            json!({
                "msgtype": "text",
                "text": { "content": "hi", "mentioned_list": ["@all"], "mentioned_mobile_list": [] }
            })
        );
    }

    #[test]
    fn plain_text_envelope_omits_mentions() {
        assert_eq!(
            serde_json::to_value(MessageEnvelope::text("hi")).unwrap(),
            json!({ "msgtype": "text", "text": { "content": "hi" } })
        );
    }

    #[test]
    fn markdown_envelope_shape() {
        assert_eq!(
            serde_json::to_value(MessageEnvelope::markdown("# t".into())).unwrap(),
            json!({ "msgtype": "markdown", "markdown": { "content": "# t" } })
        );
    }

    #[test]
    fn content_is_trimmed_and_required() {
        let body = parse_object(br#"{"content":"  hello  "}"#).unwrap();
        assert_eq!(required_content(&body).unwrap(), "hello");

        for raw in [r#"{}"#, r#"{"content":""}"#, r#"{"content":"   "}"#, r#"{"content":5}"#] {
            let body = parse_object(raw.as_bytes()).unwrap();
            assert!(matches!(required_content(&body), Err(AppError::InvalidInput(_))), "{raw}");
        }
    }

    #[test]
    fn body_must_be_object() {
        for raw in ["", "[]", "\"x\"", "{oops"] {
            assert!(matches!(parse_object(raw.as_bytes()), Err(AppError::InvalidInput(_))), "{raw}");
        }
    }

    #[test]
    fn non_array_lists_become_empty() {
        let body = parse_object(br#"{"mentioned_list":"bob","mentioned_mobile_list":["138"]}"#).unwrap();
        assert!(list_or_empty(&body, "mentioned_list").is_empty());
        assert_eq!(list_or_empty(&body, "mentioned_mobile_list"), vec![json!("138")]);
        assert!(list_or_empty(&body, "missing").is_empty());
    }

    #[test]
    fn upstream_errcode() {
        assert!(upstream_ok(&json!({ "errcode": 0, "errmsg": "ok" })));
        assert!(!upstream_ok(&json!({ "errcode": 93000 })));
        assert!(!upstream_ok(&json!({ "errmsg": "no code" })));
    }

    #[test]
    fn alert_object_renders_five_lines() {
        let body = br#"{"searchName":"X","webhookCallEvent":"Y","searchType":"Z","resultStart":"1700000000","resultEnd":"1700000000","extra":"ignored"}"#;
        assert_eq!(
            alert_text(body),
            "Search Name: X\nEvent Type: Y\nSearch Type: Z\nStart Time: 2023-11-15 06:13:20\nEnd Time: 2023-11-15 06:13:20"
        );
    }

    #[test]
    fn alert_missing_fields_are_unspecified() {
        assert_eq!(alert_text(b"{}"), UNSPECIFIED_BLOCK);
        assert_eq!(
            alert_text(br#"{"searchName":"","searchType":null,"resultStart":"junk"}"#),
            "Search Name: 未指定\nEvent Type: 未指定\nSearch Type: 未指定\nStart Time: 时间格式异常\nEnd Time: 未指定"
        );
    }

    #[test]
    fn alert_strings_are_used_verbatim() {
        assert_eq!(alert_text(br#""  disk full  ""#), "disk full");
        assert_eq!(alert_text(b"  cpu high \n"), "cpu high");
    }

    #[test]
    fn alert_other_bodies_fall_back() {
        for raw in ["", "[]", "42", "null", "true"] {
            assert_eq!(alert_text(raw.as_bytes()), UNSPECIFIED_BLOCK, "{raw}");
        }
    }
}
