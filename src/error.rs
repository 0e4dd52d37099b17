use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")] Database(#[from] sea_orm::DbErr),

    #[error("Invalid {field}: {message}")] InvalidInput {
        field: String,
        message: String,
    },

    #[error("{0}")] NotFound(String),

    #[error("Conflict: {0}")] Conflict(String),

    #[error("Insufficient balance")]
    InsufficientBalance,

    #[error("Configuration error: {0}")] Config(String),

    #[error("Internal error: {0}")] Internal(String),
}

impl AppError {
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        AppError::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// The offending field for validation failures.
    pub fn field(&self) -> Option<&str> {
        match self {
            AppError::InvalidInput { field, .. } => Some(field),
            _ => None,
        }
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(serde::Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    pub fn to_error_response(&self) -> ErrorResponse {
        let (code, message, field) = match self {
            AppError::Database(e) => ("DATABASE_ERROR", e.to_string(), None),
            AppError::InvalidInput { field, message } =>
                ("INVALID_INPUT", message.clone(), Some(field.clone())),
            AppError::NotFound(msg) => ("NOT_FOUND", msg.clone(), None),
            AppError::Conflict(msg) => ("CONFLICT", msg.clone(), None),
            AppError::InsufficientBalance =>
                (
                    "INSUFFICIENT_BALANCE",
                    "Insufficient balance for investment".to_string(),
                    Some("amount".to_string()),
                ),
            AppError::Config(msg) => ("CONFIG_ERROR", msg.clone(), None),
            AppError::Internal(msg) => ("INTERNAL_ERROR", msg.clone(), None),
        };

        ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field,
            },
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::NotFound(_) => axum::http::StatusCode::NOT_FOUND,
            AppError::InvalidInput { .. } | AppError::InsufficientBalance => {
                axum::http::StatusCode::BAD_REQUEST
            }
            AppError::Conflict(_) => axum::http::StatusCode::CONFLICT,
            _ => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let response = self.to_error_response();
        (status, axum::Json(response)).into_response()
    }
}

/// Malformed or mistyped request bodies share the validation envelope.
impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AppError::invalid("body", rejection.body_text())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Failures surfaced by the API client. The client never recovers from these;
/// the calling page decides what to show.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport failure or timeout; no response was received.
    #[error("Network error: {0}")] Network(String),

    /// A response arrived with a non-2xx status.
    #[error("HTTP {status}: {body}")] Http {
        status: u16,
        body: String,
    },

    /// The response body was not valid JSON (or not the expected shape).
    #[error("Failed to decode response: {0}")] Decode(String),

    #[error("Invalid input: {field}")] InvalidInput {
        field: String,
    },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short message suitable for showing next to a disabled form or a retry prompt.
    pub fn user_message(&self) -> &'static str {
        match self {
            ApiError::Network(_) => "Unable to reach the server. Please try again.",
            ApiError::Http { status: 404, .. } => "The requested item could not be found.",
            ApiError::Http { status: 401 | 403, .. } =>
                "Your session has expired. Please reload the page.",
            ApiError::Http { status, .. } if *status >= 500 =>
                "The server encountered an error. Please try again later.",
            ApiError::Http { .. } => "The request was rejected.",
            ApiError::Decode(_) => "The server returned an unexpected response.",
            ApiError::InvalidInput { .. } => "Please check the highlighted field.",
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            ApiError::Http {
                status: status.as_u16(),
                body: String::new(),
            }
        } else {
            ApiError::Network(e.to_string())
        }
    }
}
