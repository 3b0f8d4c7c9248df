//! Shared response envelope for API handlers.
//!
//! Every success body is `{ "success": true, "message"?: ..., ...payload }`.
//! The payload's fields are flattened next to `success`, so payload types
//! must serialize as maps (structs) or as `()` for message-only responses.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub payload: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(payload: T) -> Self {
        Self {
            success: true,
            message: None,
            payload,
        }
    }

    pub fn with_message(message: impl Into<String>, payload: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            payload,
        }
    }
}

impl ApiResponse<()> {
    /// Message-only success body.
    pub fn message(message: impl Into<String>) -> Self {
        Self::with_message(message, ())
    }
}
