//! Transport failures and user-facing message extraction.
//!
//! ERROR HANDLING
//! ==============
//! Every transport call returns `Result<_, ApiError>`. The state layer only
//! ever needs one string out of a failure, which `extract_message` produces
//! without panicking on any body shape.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Shown when a failure carries no server-provided message.
pub const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

/// Body keys that may carry a server-provided message, checked in order.
const MESSAGE_KEYS: &[&str] = &["details", "message", "error"];

/// Coarse failure class used for policy decisions and logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// No reachable server, or a non-2xx response with no structured body.
    Network,
    /// Input rejected by the server, or a response that broke the schema.
    Validation,
}

/// Failure from one transport round trip.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("service returned status {status}")]
    Status { status: u16, body: String },

    /// A success response whose body did not match the entity contract.
    #[error("unexpected response shape: {0}")]
    Schema(String),
}

impl ApiError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) => ErrorKind::Network,
            Self::Status { body, .. } => {
                if server_message(body).is_some() {
                    ErrorKind::Validation
                } else {
                    ErrorKind::Network
                }
            }
            Self::Schema(_) => ErrorKind::Validation,
        }
    }
}

/// Reduce a failure to the single message shown to the user.
#[must_use]
pub fn extract_message(error: &ApiError) -> String {
    match error {
        ApiError::Status { body, .. } => server_message(body).unwrap_or_else(|| FALLBACK_MESSAGE.to_owned()),
        ApiError::Network(_) | ApiError::Schema(_) => FALLBACK_MESSAGE.to_owned(),
    }
}

/// Pull a non-empty message string out of a JSON object body.
fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;
    MESSAGE_KEYS.iter().find_map(|key| {
        let text = object.get(*key)?.as_str()?;
        if text.is_empty() { None } else { Some(text.to_owned()) }
    })
}
