use chrono::{DateTime, Utc};

use serde::Serialize;

use crate::model::Practice;

/// Stored practice session record
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PracticeSession {
    pub id: i64,
    #[sqlx(rename = "start_time")]
    pub start: Option<DateTime<Utc>>,
    #[sqlx(rename = "end_time")]
    pub end: Option<DateTime<Utc>>,
    /// Practices attempted during the session.
    /// `None` unless explicitly loaded, which keeps list responses flat
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub practices: Option<Vec<Practice>>,
}
