use chrono::{DateTime, Utc};

use sqlx::PgExecutor;

use crate::domain::{PracticeResult, ProblemLink, ProblemName};
use crate::model::{Practice, PracticeSession};
use crate::repo::Page;

const SELECT_PRACTICE: &str = "select p.id, p.problem_name, p.problem_link, p.start_time, p.end_time, p.result, \
     p.practice_session_id, s.start_time as session_start_time, s.end_time as session_end_time \
     from practice p \
     left outer join practice_session s on s.id = p.practice_session_id";

/// Writable columns of a practice
#[derive(Debug, Clone)]
pub struct PracticeFields {
    pub problem_name: ProblemName,
    pub problem_link: ProblemLink,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub result: Option<PracticeResult>,
    pub practice_session_id: Option<i64>,
}

/// A practice row joined with the columns of its owning session
#[derive(Debug, sqlx::FromRow)]
struct PracticeRow {
    id: i64,
    problem_name: String,
    problem_link: String,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    result: Option<PracticeResult>,
    practice_session_id: Option<i64>,
    session_start_time: Option<DateTime<Utc>>,
    session_end_time: Option<DateTime<Utc>>,
}

impl From<PracticeRow> for Practice {
    fn from(row: PracticeRow) -> Self {
        let practice_session = row.practice_session_id.map(|id| PracticeSession {
            id,
            start: row.session_start_time,
            end: row.session_end_time,
            practices: None,
        });

        Self {
            id: row.id,
            problem_name: row.problem_name,
            problem_link: row.problem_link,
            start: row.start_time,
            end: row.end_time,
            result: row.result,
            practice_session,
        }
    }
}

/// Repository for interfacing with the `practice` table
pub struct PracticeRepo;

impl PracticeRepo {
    #[tracing::instrument(name = "Insert practice", skip(executor))]
    pub async fn insert<'con>(
        executor: impl PgExecutor<'con>,
        fields: &PracticeFields,
    ) -> sqlx::Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "insert into practice(problem_name, problem_link, start_time, end_time, result, practice_session_id) \
             values ($1, $2, $3, $4, $5, $6) returning id",
        )
        .bind(fields.problem_name.as_ref())
        .bind(fields.problem_link.as_ref())
        .bind(fields.start)
        .bind(fields.end)
        .bind(fields.result)
        .bind(fields.practice_session_id)
        .fetch_one(executor)
        .await
    }

    /// Replace every writable column of a practice, returning `false` if there is no such row
    #[tracing::instrument(name = "Update practice", skip(executor))]
    pub async fn update<'con>(
        executor: impl PgExecutor<'con>,
        id: i64,
        fields: &PracticeFields,
    ) -> sqlx::Result<bool> {
        let result = sqlx::query(
            "update practice set problem_name=$2, problem_link=$3, start_time=$4, end_time=$5, \
             result=$6, practice_session_id=$7 where id=$1",
        )
        .bind(id)
        .bind(fields.problem_name.as_ref())
        .bind(fields.problem_link.as_ref())
        .bind(fields.start)
        .bind(fields.end)
        .bind(fields.result)
        .bind(fields.practice_session_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(name = "Fetch practice by id", skip(executor))]
    pub async fn fetch_by_id<'con>(
        executor: impl PgExecutor<'con>,
        id: i64,
    ) -> sqlx::Result<Option<Practice>> {
        let sql = format!("{} where p.id=$1", SELECT_PRACTICE);
        let row = sqlx::query_as::<_, PracticeRow>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(row.map(Practice::from))
    }

    #[tracing::instrument(name = "Fetch all practices", skip(executor))]
    pub async fn fetch_all<'con>(
        executor: impl PgExecutor<'con>,
        page: Option<Page>,
    ) -> sqlx::Result<Vec<Practice>> {
        let sql = format!("{} order by p.id limit $1 offset $2", SELECT_PRACTICE);
        let rows = sqlx::query_as::<_, PracticeRow>(&sql)
            .bind(page.map(|p| p.limit()))
            .bind(page.map(|p| p.offset()).unwrap_or(0))
            .fetch_all(executor)
            .await?;

        Ok(rows.into_iter().map(Practice::from).collect())
    }

    #[tracing::instrument(name = "Fetch practices of a session", skip(executor))]
    pub async fn fetch_by_practice_session<'con>(
        executor: impl PgExecutor<'con>,
        practice_session_id: i64,
    ) -> sqlx::Result<Vec<Practice>> {
        let sql = format!(
            "{} where p.practice_session_id=$1 order by p.id",
            SELECT_PRACTICE
        );
        let rows = sqlx::query_as::<_, PracticeRow>(&sql)
            .bind(practice_session_id)
            .fetch_all(executor)
            .await?;

        Ok(rows.into_iter().map(Practice::from).collect())
    }

    #[tracing::instrument(name = "Fetch practices without a session", skip(executor))]
    pub async fn fetch_all_without_practice_session<'con>(
        executor: impl PgExecutor<'con>,
    ) -> sqlx::Result<Vec<Practice>> {
        let sql = format!(
            "{} where p.practice_session_id is null order by p.id",
            SELECT_PRACTICE
        );
        let rows = sqlx::query_as::<_, PracticeRow>(&sql)
            .fetch_all(executor)
            .await?;

        Ok(rows.into_iter().map(Practice::from).collect())
    }

    #[tracing::instrument(name = "Count practices", skip(executor))]
    pub async fn count<'con>(executor: impl PgExecutor<'con>) -> sqlx::Result<i64> {
        sqlx::query_scalar::<_, i64>("select count(*) from practice")
            .fetch_one(executor)
            .await
    }

    #[tracing::instrument(name = "Check practice exists", skip(executor))]
    pub async fn exists<'con>(executor: impl PgExecutor<'con>, id: i64) -> sqlx::Result<bool> {
        sqlx::query_scalar::<_, bool>("select exists(select 1 from practice where id=$1)")
            .bind(id)
            .fetch_one(executor)
            .await
    }

    #[tracing::instrument(name = "Delete practice by id", skip(executor))]
    pub async fn delete_by_id<'con>(executor: impl PgExecutor<'con>, id: i64) -> sqlx::Result<u64> {
        let result = sqlx::query("delete from practice where id=$1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
