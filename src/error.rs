use actix_web::error::UrlGenerationError;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use serde::Serialize;

use thiserror::Error;

pub type RestResult<T> = Result<T, RestError>;

#[derive(Debug, Error)]
pub enum RestError {
    /// A request that breaks an entity rule, reported with a stable error key
    #[error("{message}")]
    BadRequestAlert {
        message: String,
        entity_name: &'static str,
        error_key: &'static str,
    },

    #[error("Parse Error: {0}")]
    ParseError(String),

    #[error("Not Found")]
    NotFound,

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Internal Server Error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RestError {
    pub fn bad_request(
        message: impl Into<String>,
        entity_name: &'static str,
        error_key: &'static str,
    ) -> Self {
        Self::BadRequestAlert {
            message: message.into(),
            entity_name,
            error_key,
        }
    }
}

impl From<UrlGenerationError> for RestError {
    fn from(e: UrlGenerationError) -> Self {
        tracing::error!("Failed to generate URL for controller: {}", e);
        Self::InternalError("URL generation".into())
    }
}

impl From<sqlx::Error> for RestError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db_error) = e.as_database_error() {
            if db_error.is_foreign_key_violation() {
                return Self::bad_request(
                    "Referenced practice session does not exist",
                    "practiceSession",
                    "idnotfound",
                );
            }
            // string_data_right_truncation
            if db_error.code().as_deref() == Some("22001") {
                return Self::ParseError("Value too long".into());
            }
        }

        tracing::error!(error.cause_chain = ?e, "Database error");
        Self::InternalError("Database error".into())
    }
}

/// `application/problem+json` body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Problem<'a> {
    title: String,
    status: u16,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_key: Option<&'a str>,
}

impl ResponseError for RestError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequestAlert { .. } | Self::ParseError(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::InternalError(_) | Self::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        let problem = match self {
            Self::BadRequestAlert {
                message,
                entity_name,
                error_key,
            } => Problem {
                title: message.clone(),
                status: status.as_u16(),
                message: format!("error.{}", error_key),
                entity_name: Some(*entity_name),
                error_key: Some(*error_key),
            },
            Self::ParseError(msg) => Problem {
                title: msg.clone(),
                status: status.as_u16(),
                message: "error.validation".into(),
                entity_name: None,
                error_key: None,
            },
            // Internal details stay in the logs
            Self::InternalError(_) | Self::Other(_) | Self::NotFound | Self::MethodNotAllowed => {
                Problem {
                    title: status.canonical_reason().unwrap_or("Error").into(),
                    status: status.as_u16(),
                    message: format!("error.http.{}", status.as_u16()),
                    entity_name: None,
                    error_key: None,
                }
            }
        };

        if let Self::Other(e) = self {
            tracing::error!(error.cause_chain = ?e, "Unhandled error");
        }

        HttpResponse::build(status)
            .insert_header((CONTENT_TYPE, "application/problem+json"))
            .json(problem)
    }
}
