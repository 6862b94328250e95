use serde::{Deserialize, Serialize};

// -------------------------
// Envelope
// -------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultCode {
    Success,
    Error,
}

impl ResultCode {
    pub fn message(self) -> &'static str {
        match self {
            ResultCode::Success => "request completed successfully",
            ResultCode::Error => "an error occurred",
        }
    }
}

/// Body shape shared by every member endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseResponse<T> {
    pub result_code: ResultCode,
    pub data: Option<T>,
    pub message: String,
}

impl<T> BaseResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            result_code: ResultCode::Success,
            data: Some(data),
            message: ResultCode::Success.message().to_string(),
        }
    }

    pub fn error(data: T) -> Self {
        Self {
            result_code: ResultCode::Error,
            data: Some(data),
            message: ResultCode::Error.message().to_string(),
        }
    }
}

impl BaseResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            result_code: ResultCode::Success,
            data: None,
            message: message.into(),
        }
    }
}

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub nickname: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// -------------------------
// Response DTOs
// -------------------------

/// What the caller's own token says about them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberInfo {
    pub subject: String,
    pub authorities: Vec<String>,
}
