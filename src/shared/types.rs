use serde::ser::{Serialize, Serializer};
use utoipa::ToSchema;

/// Structured response envelope shared by every endpoint.
///
/// On the wire both variants render as `{"success": bool, "message": string}`
/// with the payload's fields flattened next to them, so a submission answers
/// `{"success": true, "message": "...", "report_id": 7}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse<T> {
    Success { message: String, payload: T },
    /// `payload` is only set by endpoints whose failures still carry a
    /// well-formed body (the report list answers with an empty `data`).
    Failure { message: String, payload: Option<T> },
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, payload: T) -> Self {
        Self::Success {
            message: message.into(),
            payload,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
            payload: None,
        }
    }

    pub fn failure_with(message: impl Into<String>, payload: T) -> Self {
        Self::Failure {
            message: message.into(),
            payload: Some(payload),
        }
    }
}

#[derive(serde::Serialize)]
struct Envelope<'a, T> {
    success: bool,
    message: &'a str,
    #[serde(flatten)]
    payload: Option<&'a T>,
}

impl<T: Serialize> Serialize for ApiResponse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let envelope = match self {
            Self::Success { message, payload } => Envelope {
                success: true,
                message,
                payload: Some(payload),
            },
            Self::Failure { message, payload } => Envelope {
                success: false,
                message,
                payload: payload.as_ref(),
            },
        };
        envelope.serialize(serializer)
    }
}

/// Failure body for OpenAPI documentation
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct ErrorResponseDoc {
    /// Always `false`
    pub success: bool,
    #[schema(example = "Report not found")]
    pub message: String,
}
