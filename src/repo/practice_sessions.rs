use chrono::{DateTime, Utc};

use sqlx::PgExecutor;

use crate::model::PracticeSession;
use crate::repo::Page;

/// Writable columns of a practice session
#[derive(Debug, Clone, Default)]
pub struct PracticeSessionFields {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Repository for interfacing with the `practice_session` table
pub struct PracticeSessionRepo;

impl PracticeSessionRepo {
    #[tracing::instrument(name = "Insert practice session", skip(executor))]
    pub async fn insert<'con>(
        executor: impl PgExecutor<'con>,
        fields: &PracticeSessionFields,
    ) -> sqlx::Result<PracticeSession> {
        sqlx::query_as::<_, PracticeSession>(
            "insert into practice_session(start_time, end_time) values ($1, $2) \
             returning id, start_time, end_time",
        )
        .bind(fields.start)
        .bind(fields.end)
        .fetch_one(executor)
        .await
    }

    #[tracing::instrument(name = "Update practice session", skip(executor))]
    pub async fn update<'con>(
        executor: impl PgExecutor<'con>,
        id: i64,
        fields: &PracticeSessionFields,
    ) -> sqlx::Result<Option<PracticeSession>> {
        sqlx::query_as::<_, PracticeSession>(
            "update practice_session set start_time=$2, end_time=$3 where id=$1 \
             returning id, start_time, end_time",
        )
        .bind(id)
        .bind(fields.start)
        .bind(fields.end)
        .fetch_optional(executor)
        .await
    }

    #[tracing::instrument(name = "Fetch practice session by id", skip(executor))]
    pub async fn fetch_by_id<'con>(
        executor: impl PgExecutor<'con>,
        id: i64,
    ) -> sqlx::Result<Option<PracticeSession>> {
        sqlx::query_as::<_, PracticeSession>(
            "select id, start_time, end_time from practice_session where id=$1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    #[tracing::instrument(name = "Fetch all practice sessions", skip(executor))]
    pub async fn fetch_all<'con>(
        executor: impl PgExecutor<'con>,
        page: Option<Page>,
    ) -> sqlx::Result<Vec<PracticeSession>> {
        sqlx::query_as::<_, PracticeSession>(
            "select id, start_time, end_time from practice_session \
             order by id limit $1 offset $2",
        )
        .bind(page.map(|p| p.limit()))
        .bind(page.map(|p| p.offset()).unwrap_or(0))
        .fetch_all(executor)
        .await
    }

    #[tracing::instrument(name = "Count practice sessions", skip(executor))]
    pub async fn count<'con>(executor: impl PgExecutor<'con>) -> sqlx::Result<i64> {
        sqlx::query_scalar::<_, i64>("select count(*) from practice_session")
            .fetch_one(executor)
            .await
    }

    #[tracing::instrument(name = "Check practice session exists", skip(executor))]
    pub async fn exists<'con>(executor: impl PgExecutor<'con>, id: i64) -> sqlx::Result<bool> {
        sqlx::query_scalar::<_, bool>(
            "select exists(select 1 from practice_session where id=$1)",
        )
        .bind(id)
        .fetch_one(executor)
        .await
    }

    #[tracing::instrument(name = "Delete practice session by id", skip(executor))]
    pub async fn delete_by_id<'con>(executor: impl PgExecutor<'con>, id: i64) -> sqlx::Result<u64> {
        let result = sqlx::query("delete from practice_session where id=$1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
