// Error taxonomy for the publisher client.
// Every operation in `api` returns these as values; the driver only
// branches on them for display.

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// One entry of a GraphQL `errors` array. Only `message` is interpreted;
/// everything else the server sent (locations, path, extensions) is kept
/// in `extra` so callers can show the raw payload.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct GraphQlError {
    #[serde(default)]
    pub message: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GraphQlError {
    /// Build a locally synthesized error, used for payloads that do not
    /// match the expected response shape.
    pub fn new(message: impl Into<String>) -> Self {
        GraphQlError {
            message: message.into(),
            extra: Map::new(),
        }
    }
}

// Entries of a server `errors` array are not always objects; anything else
// is kept as its JSON text so the payload is never dropped.
impl From<Value> for GraphQlError {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(mut extra) => {
                let message = match extra.remove("message") {
                    Some(Value::String(message)) => message,
                    Some(Value::Null) | None => String::new(),
                    Some(other) => other.to_string(),
                };
                GraphQlError { message, extra }
            }
            Value::String(message) => GraphQlError::new(message),
            other => GraphQlError::new(other.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("no API key configured; set HASHNODE_API_KEY")]
    MissingCredential,

    #[error("API key is not a valid header value")]
    InvalidCredential(#[from] reqwest::header::InvalidHeaderValue),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("API error: {}", describe_errors(.0))]
    Remote(Vec<GraphQlError>),

    #[error("publish rejected: {message}")]
    Application { message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl PublishError {
    /// A response that parsed as JSON but not as the expected schema.
    pub(crate) fn malformed(detail: impl std::fmt::Display) -> Self {
        PublishError::Remote(vec![GraphQlError::new(format!(
            "malformed response: {detail}"
        ))])
    }
}

// Each entry prints its message followed by any extra fields as JSON.
fn describe_errors(errors: &[GraphQlError]) -> String {
    if errors.is_empty() {
        return "server returned an empty errors list".into();
    }
    errors
        .iter()
        .map(describe_error)
        .collect::<Vec<_>>()
        .join("; ")
}

fn describe_error(error: &GraphQlError) -> String {
    if error.extra.is_empty() {
        return error.message.clone();
    }
    let extra = serde_json::to_string(&error.extra).unwrap_or_default();
    if error.message.is_empty() {
        extra
    } else {
        format!("{} {}", error.message, extra)
    }
}
