use lexicon_types::{FieldErrors, FormError};
use serde_json::Value;

/// Every failure of a backend call, with the body shapes the backend uses
/// folded into one union.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    Validation { message: String, fields: FieldErrors },

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Invalid base url: {0}")]
    InvalidUrl(String),
}

const MESSAGE_KEYS: [&str; 3] = ["error", "detail", "message"];
const NON_FIELD: &str = "non_field_errors";

impl ApiError {
    /// Build the error for a non-2xx response from its status and raw body.
    ///
    /// Accepted bodies: a bare string, `{error, details}`, `{error}`,
    /// `{detail}`, `{message}`, `{non_field_errors: [..]}` and field maps
    /// whose values are a message or a list of messages.
    pub fn from_response(status: u16, body: &str) -> Self {
        let (message, fields) = match serde_json::from_str::<Value>(body) {
            Ok(value) => split_body(&value),
            Err(_) => {
                let text = body.trim();
                ((!text.is_empty()).then(|| text.to_string()), FieldErrors::new())
            }
        };

        let message = message.unwrap_or_else(|| default_message(status, &fields));

        match status {
            400 | 422 if !fields.is_empty() => ApiError::Validation { message, fields },
            401 => ApiError::Unauthorized(message),
            404 => ApiError::NotFound(message),
            _ => ApiError::Backend { status, message },
        }
    }

    /// Field errors carried by a validation failure
    pub fn fields(&self) -> Option<&FieldErrors> {
        match self {
            ApiError::Validation { fields, .. } => Some(fields),
            _ => None,
        }
    }

    /// Convert into the error a form keeps next to its inputs
    pub fn to_form_error(&self) -> FormError {
        match self {
            ApiError::Validation { message, fields } => {
                FormError::with_details(message.clone(), fields.clone())
            }
            other => FormError::message(other.to_string()),
        }
    }
}

fn split_body(value: &Value) -> (Option<String>, FieldErrors) {
    let mut fields = FieldErrors::new();

    let object = match value {
        Value::String(text) => return (Some(text.clone()), fields),
        Value::Object(object) => object,
        _ => return (None, fields),
    };

    let message = MESSAGE_KEYS
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_str))
        .map(str::to_string);

    if let Some(Value::Object(details)) = object.get("details") {
        for (field, value) in details {
            collect_messages(&mut fields, field, value);
        }
    }

    for (field, value) in object {
        if MESSAGE_KEYS.contains(&field.as_str()) || field == "details" {
            continue;
        }
        collect_messages(&mut fields, field, value);
    }

    let message = message.or_else(|| {
        fields
            .get(NON_FIELD)
            .filter(|messages| !messages.is_empty())
            .map(|messages| messages.join(", "))
    });

    (message, fields)
}

fn collect_messages(fields: &mut FieldErrors, field: &str, value: &Value) {
    match value {
        Value::String(message) => fields.push(field, message.clone()),
        Value::Array(items) => {
            for item in items {
                if let Some(message) = item.as_str() {
                    fields.push(field, message);
                }
            }
        }
        _ => {}
    }
}

fn default_message(status: u16, fields: &FieldErrors) -> String {
    if !fields.is_empty() {
        return "Validation failed".to_string();
    }
    match status {
        401 => "Unauthorized".to_string(),
        404 => "Resource not found".to_string(),
        _ => format!("Request failed with HTTP {status}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_map_becomes_validation_error() {
        let err = ApiError::from_response(400, r#"{"term": ["This field is required."]}"#);
        let fields = err.fields().expect("validation error");
        assert_eq!(fields.first("term"), Some("This field is required."));
        assert_eq!(err.to_string(), "Validation failed");
    }

    #[test]
    fn nested_error_and_details_keep_both_parts() {
        let body = r#"{"error": "Failed to suggest new word", "details": {"translation": "Too short"}}"#;
        let err = ApiError::from_response(400, body);
        let form = err.to_form_error();
        assert_eq!(form.message, "Failed to suggest new word");
        assert_eq!(form.details.first("translation"), Some("Too short"));
    }

    #[test]
    fn flat_error_on_401_is_unauthorized() {
        let err = ApiError::from_response(401, r#"{"error": "Invalid credentials"}"#);
        assert!(matches!(err, ApiError::Unauthorized(ref m) if m == "Invalid credentials"));
    }

    #[test]
    fn detail_key_on_404_is_not_found() {
        let err = ApiError::from_response(404, r#"{"detail": "Vocabulary item does not exist"}"#);
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "Vocabulary item does not exist"));
    }

    #[test]
    fn non_field_errors_are_joined_into_the_message() {
        let body = r#"{"non_field_errors": ["Username taken", "Email taken"]}"#;
        let err = ApiError::from_response(400, body);
        assert_eq!(err.to_string(), "Username taken, Email taken");
        assert_eq!(err.fields().unwrap().get(NON_FIELD).unwrap().len(), 2);
    }

    #[test]
    fn plain_text_body_is_used_verbatim() {
        let err = ApiError::from_response(502, "Bad Gateway\n");
        assert!(matches!(err, ApiError::Backend { status: 502, ref message } if message == "Bad Gateway"));
    }

    #[test]
    fn empty_body_gets_a_status_message() {
        let err = ApiError::from_response(500, "");
        assert_eq!(err.to_string(), "Backend error (500): Request failed with HTTP 500");
    }
}
