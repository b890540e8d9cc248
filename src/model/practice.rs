use chrono::{DateTime, Utc};

use serde::Serialize;

use crate::domain::PracticeResult;
use crate::model::PracticeSession;

/// Stored practice record, joined with its owning session if it has one
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Practice {
    pub id: i64,
    pub problem_name: String,
    pub problem_link: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub result: Option<PracticeResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub practice_session: Option<PracticeSession>,
}

impl Practice {
    /// ID of the owning session, if linked
    pub fn practice_session_id(&self) -> Option<i64> {
        self.practice_session.as_ref().map(|session| session.id)
    }
}
