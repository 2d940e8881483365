//! Protocol status.

use serde::{Deserialize, Serialize};

use super::status_codes;

/// Status carried by a protocol response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    /// The status code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<StatusCode>,

    /// Optional status message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
}

impl Status {
    /// Returns true if this status indicates success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status_code.as_ref().is_some_and(StatusCode::is_success)
    }
}

/// A status code, optionally refined by a nested code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCode {
    /// The status code URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Nested status code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<Box<StatusCode>>,
}

impl StatusCode {
    /// Creates a status code with the given value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            status_code: None,
        }
    }

    /// Returns true if this is the success code.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.value.as_deref() == Some(status_codes::SUCCESS)
    }

    /// Returns the nested status code value, if present.
    #[must_use]
    pub fn sub_status_value(&self) -> Option<&str> {
        self.status_code.as_ref().and_then(|s| s.value.as_deref())
    }
}
