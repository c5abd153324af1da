use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;

pub const READ_FAILURE_MESSAGE: &str = "Internal Server Error during data retrieval.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// Read-path failure; the client only sees a generic message.
    #[error("failed to {action}: {source}")]
    Query {
        action: &'static str,
        #[source]
        source: DbErr,
    },

    /// Write-path failure; the client sees the action and a coarse category.
    #[error("failed to {action}: {source}")]
    Write {
        action: &'static str,
        #[source]
        source: DbErr,
    },
}

impl AppError {
    pub fn query(action: &'static str) -> impl FnOnce(DbErr) -> Self {
        move |source| Self::Query { action, source }
    }

    pub fn write(action: &'static str) -> impl FnOnce(DbErr) -> Self {
        move |source| Self::Write { action, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Query { .. } | AppError::Write { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message that is safe to hand back to the client.
    pub fn public_message(&self) -> String {
        match self {
            AppError::BadRequest(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::Query { .. } => READ_FAILURE_MESSAGE.to_string(),
            AppError::Write { action, source } => format!("failed to {action}: {}", category(source)),
        }
    }
}

fn category(err: &DbErr) -> &'static str {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => "unique constraint violated",
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => "referenced record does not exist",
        _ => match err {
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => "database unavailable",
            _ => "database statement failed",
        },
    }
}

#[derive(Serialize)]
struct ErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    success: Option<bool>,
    error: String,
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Query { .. } | AppError::Write { .. } => {
                tracing::error!(error = %self, "request failed");
            },
            _ => tracing::debug!(error = %self, "request rejected"),
        }

        let body = ErrorBody {
            success: matches!(self, AppError::Write { .. }).then_some(false),
            error: self.public_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
