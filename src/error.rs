use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::{Display, Error};
use serde_json::json;

#[derive(Debug, Clone, Display, Error, PartialEq)]
pub enum PresenceError {
    /// A CSV row that could not be turned into an attendance record
    #[display(fmt = "Malformed record at line {}: {}", line, reason)]
    MalformedRecord { line: usize, reason: String },

    #[display(fmt = "User {} not found", user_id)]
    UserNotFound { user_id: u64 },

    /// The attendance log or the users directory could not be read at all
    #[display(fmt = "Source {} unavailable: {}", path, reason)]
    SourceUnavailable { path: String, reason: String },

    #[display(fmt = "Internal error: {}", reason)]
    Internal { reason: String },
}

impl PresenceError {
    pub fn source_unavailable(path: impl Into<String>, reason: impl ToString) -> Self {
        PresenceError::SourceUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl ResponseError for PresenceError {
    fn status_code(&self) -> StatusCode {
        match self {
            PresenceError::UserNotFound { .. } => StatusCode::NOT_FOUND,
            PresenceError::SourceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            PresenceError::MalformedRecord { .. } | PresenceError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string()
        }))
    }
}
