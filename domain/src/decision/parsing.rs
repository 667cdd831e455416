//! Decision parsing from LLM responses.
//!
//! Models are run in JSON mode, but some still wrap the object in a
//! ` ```json ` fence or add a sentence around it. The parser tries, in order:
//!
//! 1. the whole response as JSON
//! 2. the first fenced code block
//! 3. the span from the first `{` to the last `}`

use super::entities::{Decision, DecisionKind};
use crate::core::task::Task;
use serde_json::Value;
use thiserror::Error;

/// Why a model response could not be turned into a [`Decision`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecisionParseError {
    #[error("response is not a JSON object: {0}")]
    InvalidJson(String),

    #[error("missing `{0}` field")]
    MissingField(&'static str),

    #[error("decision must be one of 'dispatch', 'code_execute', 'answer' - got '{0}'")]
    UnknownDecision(String),

    #[error("invalid content for '{kind}': {reason}")]
    InvalidContent { kind: DecisionKind, reason: String },
}

/// Parse raw model output into a [`Decision`].
pub fn parse_decision(response: &str) -> Result<Decision, DecisionParseError> {
    let value = extract_json_object(response)?;
    parse_decision_json(&value)
}

/// Parse an already-decoded JSON value into a [`Decision`].
pub fn parse_decision_json(value: &Value) -> Result<Decision, DecisionParseError> {
    let object = value
        .as_object()
        .ok_or_else(|| DecisionParseError::InvalidJson("expected an object".to_string()))?;

    let tag = match object.get("decision") {
        Some(Value::String(tag)) => tag.trim(),
        Some(other) => return Err(DecisionParseError::UnknownDecision(other.to_string())),
        None => return Err(DecisionParseError::MissingField("decision")),
    };
    let kind: DecisionKind = tag.parse().map_err(DecisionParseError::UnknownDecision)?;

    let content = object
        .get("content")
        .ok_or(DecisionParseError::MissingField("content"))?;

    match kind {
        DecisionKind::Answer => Ok(Decision::Answer(scalar_text(kind, content)?)),
        DecisionKind::CodeExecute => {
            let code = scalar_text(kind, content)?;
            if code.trim().is_empty() {
                return Err(invalid(kind, "code is empty"));
            }
            Ok(Decision::CodeExecute(code))
        }
        DecisionKind::Dispatch => {
            let items = content
                .as_array()
                .ok_or_else(|| invalid(kind, "expected an array of strings"))?;
            let mut tasks = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let text = item
                    .as_str()
                    .ok_or_else(|| invalid(kind, format!("item {} is not a string", index)))?;
                let task = Task::try_new(text)
                    .ok_or_else(|| invalid(kind, format!("item {} is blank", index)))?;
                tasks.push(task);
            }
            if tasks.is_empty() {
                return Err(invalid(kind, "no sub-tasks"));
            }
            Ok(Decision::Dispatch(tasks))
        }
    }
}

fn invalid(kind: DecisionKind, reason: impl Into<String>) -> DecisionParseError {
    DecisionParseError::InvalidContent {
        kind,
        reason: reason.into(),
    }
}

/// Strings pass through; numbers and booleans are stringified.
fn scalar_text(kind: DecisionKind, value: &Value) -> Result<String, DecisionParseError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(invalid(kind, "expected a string")),
    }
}

fn extract_json_object(response: &str) -> Result<Value, DecisionParseError> {
    let trimmed = response.trim();

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }

    if let Some(block) = fenced_block(trimmed)
        && let Ok(value) = serde_json::from_str::<Value>(block)
    {
        return Ok(value);
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}'))
        && start < end
        && let Ok(value) = serde_json::from_str::<Value>(&trimmed[start..=end])
    {
        return Ok(value);
    }

    Err(DecisionParseError::InvalidJson(
        crate::core::string::truncate(trimmed, 200),
    ))
}

/// Body of the first ` ``` ` fenced block, ignoring its language tag.
fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_fence = &text[open + 3..];
    let body_start = after_fence.find('\n')? + 1;
    let body = &after_fence[body_start..];
    let close = body.find("```")?;
    Some(body[..close].trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_answer() {
        let decision = parse_decision(r#"{"decision": "answer", "content": "42"}"#).unwrap();
        assert_eq!(decision, Decision::Answer("42".to_string()));
    }

    #[test]
    fn test_parse_numeric_answer_is_stringified() {
        let decision = parse_decision(r#"{"decision": "answer", "content": 42}"#).unwrap();
        assert_eq!(decision, Decision::Answer("42".to_string()));
    }

    #[test]
    fn test_parse_code_execute() {
        let decision =
            parse_decision(r#"{"decision": "code_execute", "content": "result = 1 + 1"}"#)
                .unwrap();
        assert_eq!(decision, Decision::CodeExecute("result = 1 + 1".to_string()));
    }

    #[test]
    fn test_parse_dispatch_keeps_order() {
        let decision =
            parse_decision(r#"{"decision": "dispatch", "content": ["A", "B", "C"]}"#).unwrap();
        assert_eq!(
            decision,
            Decision::Dispatch(vec![Task::new("A"), Task::new("B"), Task::new("C")])
        );
    }

    #[test]
    fn test_unknown_decision_tag() {
        let err = parse_decision(r#"{"decision": "maybe"}"#).unwrap_err();
        assert_eq!(err, DecisionParseError::UnknownDecision("maybe".to_string()));
    }

    #[test]
    fn test_missing_content() {
        let err = parse_decision(r#"{"decision": "answer"}"#).unwrap_err();
        assert_eq!(err, DecisionParseError::MissingField("content"));
    }

    #[test]
    fn test_invalid_json() {
        let err = parse_decision("I think the answer is 42").unwrap_err();
        assert!(matches!(err, DecisionParseError::InvalidJson(_)));
    }

    #[test]
    fn test_dispatch_requires_array() {
        let err = parse_decision(r#"{"decision": "dispatch", "content": "A"}"#).unwrap_err();
        assert!(matches!(
            err,
            DecisionParseError::InvalidContent {
                kind: DecisionKind::Dispatch,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_dispatch_rejected() {
        let err = parse_decision(r#"{"decision": "dispatch", "content": []}"#).unwrap_err();
        assert!(matches!(err, DecisionParseError::InvalidContent { .. }));
    }

    #[test]
    fn test_fenced_json() {
        let response = "Here is my decision:\n```json\n{\"decision\": \"answer\", \"content\": \"ok\"}\n```\n";
        assert_eq!(
            parse_decision(response).unwrap(),
            Decision::Answer("ok".to_string())
        );
    }

    #[test]
    fn test_embedded_object() {
        let response = "Decision follows {\"decision\": \"answer\", \"content\": \"ok\"} done";
        assert_eq!(
            parse_decision(response).unwrap(),
            Decision::Answer("ok".to_string())
        );
    }

    #[test]
    fn test_roundtrip_through_wire_format() {
        let decision = Decision::Dispatch(vec![Task::new("first"), Task::new("second")]);
        let text = decision.to_json().to_string();
        assert_eq!(parse_decision(&text).unwrap(), decision);
    }
}
