use axum::body::{Body, Bytes};
use http_body_util::LengthLimitError;
use serde_json::Value;

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::providers::openai::{ChatCompletionRequest, Message};

pub const DEFAULT_MAX_TOKENS: u32 = 50;
pub const DEFAULT_TEMPERATURE: f64 = 0.3;
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

pub async fn read_body(body: Body) -> Result<Bytes, RelayError> {
    axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| {
            if e.into_inner().is::<LengthLimitError>() {
                RelayError::PayloadTooLarge
            } else {
                RelayError::BadRequest("unreadable body".into())
            }
        })
}

/// Parse the inbound body.
///
/// An empty body means "no fields" and yields `Null`. A body that decodes
/// to a JSON string is a raw string payload and is decoded once more.
pub fn parse_body(bytes: &[u8]) -> Result<Value, RelayError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    match serde_json::from_slice::<Value>(bytes).map_err(|_| RelayError::invalid_json())? {
        Value::String(raw) => {
            serde_json::from_str::<Value>(&raw).map_err(|_| RelayError::invalid_json())
        }
        other => Ok(other),
    }
}

/// 与 JavaScript 的真值判断一致：null、false、0、"" 为假
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn truthy(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| is_truthy(v))
}

/// Text content of a field: strings as-is, anything else as JSON text.
pub fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn string_to_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = s.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix).map_or(f64::NAN, |n| n as f64);
        }
    }
    // Rust 额外接受 "inf"/"nan" 等写法，JavaScript 不接受
    if s.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

/// Numeric coercion with JavaScript `Number()` rules.
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => string_to_number(s),
        Value::Array(items) => match items.as_slice() {
            [] => 0.0,
            [only] => match only {
                Value::Array(_) | Value::Object(_) => f64::NAN,
                Value::Null => 0.0,
                Value::Bool(_) => f64::NAN,
                other => to_number(other),
            },
            _ => f64::NAN,
        },
        Value::Object(_) => f64::NAN,
    }
}

fn max_tokens_of(body: &Value) -> Result<u32, RelayError> {
    let Some(raw) = truthy(body.get("maxTokens")) else {
        return Ok(DEFAULT_MAX_TOKENS);
    };
    let n = to_number(raw);
    if n.is_finite() && n >= 1.0 && n.fract() == 0.0 && n <= f64::from(u32::MAX) {
        Ok(n as u32)
    } else {
        Err(RelayError::BadRequest("invalid maxTokens".into()))
    }
}

/// Build the upstream request, substituting defaults for missing fields.
///
/// `model`, `prompt.system`, `prompt.user` and `maxTokens` fall back when
/// the provided value is falsy; `temperature` only when it is missing or
/// `null`, so an explicit `0` is sent as-is.
pub fn build_completion_request(
    body: &Value,
    config: &RelayConfig,
) -> Result<ChatCompletionRequest, RelayError> {
    let model = truthy(body.get("model"))
        .map(text_of)
        .unwrap_or_else(|| config.default_model().to_string());

    let prompt = body.get("prompt");
    let system = truthy(prompt.and_then(|p| p.get("system")))
        .map(text_of)
        .unwrap_or_default();
    let user = truthy(prompt.and_then(|p| p.get("user")))
        .map(text_of)
        .unwrap_or_default();

    let max_tokens = max_tokens_of(body)?;

    let temperature = match body.get("temperature") {
        None | Some(Value::Null) => Value::from(DEFAULT_TEMPERATURE),
        Some(v) => v.clone(),
    };

    Ok(ChatCompletionRequest {
        model,
        messages: vec![Message::system(system), Message::user(user)],
        max_tokens,
        temperature,
    })
}
