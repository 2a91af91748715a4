//! Extraction of the alert text from an inbound webhook body

use serde_json::Value;

/// JSON keys searched for the alert text, in order
pub const MESSAGE_KEYS: &[&str] = &["message", "text", "alert", "data"];

/// How the alert text was located in the body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageSource {
    /// Non-JSON body used verbatim
    RawBody,
    /// Body was a bare JSON string
    JsonString,
    /// One of [`MESSAGE_KEYS`]
    Key(&'static str),
    /// No known key: the first string value of the object
    FirstStringValue(String),
}

/// Alert text pulled out of a request body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedMessage {
    pub text: String,
    pub source: MessageSource,
}

/// Extract the alert text from a webhook body
///
/// Returns `Ok(None)` when there is nothing to process and `Err` when a
/// JSON content type carries a body that is not valid JSON.
pub fn extract_message(
    content_type: Option<&str>,
    body: &[u8],
) -> Result<Option<ExtractedMessage>, serde_json::Error> {
    if !is_json(content_type) {
        let text = String::from_utf8_lossy(body).trim().to_string();
        return Ok(non_blank(text, MessageSource::RawBody));
    }

    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(None);
    }

    let value: Value = serde_json::from_slice(body)?;
    Ok(from_json(&value))
}

fn from_json(value: &Value) -> Option<ExtractedMessage> {
    match value {
        Value::String(text) => non_blank(text.trim().to_string(), MessageSource::JsonString),
        Value::Object(map) => {
            for key in MESSAGE_KEYS {
                if let Some(text) = map.get(*key).and_then(Value::as_str) {
                    return non_blank(text.trim().to_string(), MessageSource::Key(*key));
                }
            }
            // Fallback rule: first string-valued field, in document order
            map.iter().find_map(|(key, value)| {
                value.as_str().and_then(|text| {
                    non_blank(
                        text.trim().to_string(),
                        MessageSource::FirstStringValue(key.clone()),
                    )
                })
            })
        }
        _ => None,
    }
}

fn non_blank(text: String, source: MessageSource) -> Option<ExtractedMessage> {
    if text.is_empty() {
        None
    } else {
        Some(ExtractedMessage { text, source })
    }
}

fn is_json(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}
