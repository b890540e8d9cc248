use actix_web::dev::HttpServiceFactory;
use actix_web::http::header::LOCATION;
use actix_web::{web, HttpRequest, HttpResponse};

use chrono::{DateTime, Utc};

use serde::Deserialize;

use sqlx::PgPool;

use crate::controller::{check_id, entity_not_found, list_response, method_not_allowed, Alerts, PageQuery};
use crate::error::{RestError, RestResult};
use crate::repo::{PracticeRepo, PracticeSessionFields, PracticeSessionRepo};

const ENTITY_NAME: &str = "practiceSession";

/// JSON body of the create/update endpoints.
/// A `practices` member, if sent, is ignored; practices link to sessions, not the other way round.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeSessionBody {
    id: Option<i64>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl From<PracticeSessionBody> for PracticeSessionFields {
    fn from(body: PracticeSessionBody) -> Self {
        Self {
            start: body.start,
            end: body.end,
        }
    }
}

#[tracing::instrument(name = "Create a practice session", skip(req, pool, alerts))]
async fn create(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    alerts: web::Data<Alerts>,
    body: web::Json<PracticeSessionBody>,
) -> RestResult<HttpResponse> {
    let body = body.into_inner();
    if body.id.is_some() {
        return Err(RestError::bad_request(
            "A new practiceSession cannot already have an ID",
            ENTITY_NAME,
            "idexists",
        ));
    }

    let session = PracticeSessionRepo::insert(pool.get_ref(), &body.into()).await?;
    let location = req.url_for("practice_session", [session.id.to_string()])?;

    let mut res = HttpResponse::Created();
    res.insert_header((LOCATION, location.path()));
    alerts.created(&mut res, ENTITY_NAME, session.id);
    Ok(res.json(session))
}

#[tracing::instrument(name = "Update a practice session", skip(pool, alerts))]
async fn update(
    pool: web::Data<PgPool>,
    alerts: web::Data<Alerts>,
    path: web::Path<i64>,
    body: web::Json<PracticeSessionBody>,
) -> RestResult<HttpResponse> {
    let id = path.into_inner();
    let body = body.into_inner();
    check_id(ENTITY_NAME, id, body.id)?;

    let mut tx = pool.begin().await?;
    if !PracticeSessionRepo::exists(&mut *tx, id).await? {
        return Err(entity_not_found(ENTITY_NAME));
    }
    let session = PracticeSessionRepo::update(&mut *tx, id, &body.into())
        .await?
        .ok_or(RestError::NotFound)?;
    tx.commit().await?;

    let mut res = HttpResponse::Ok();
    alerts.updated(&mut res, ENTITY_NAME, id);
    Ok(res.json(session))
}

/// Merge-patch: only members that are present and non-null replace stored values
#[tracing::instrument(name = "Partially update a practice session", skip(pool, alerts))]
async fn partial_update(
    pool: web::Data<PgPool>,
    alerts: web::Data<Alerts>,
    path: web::Path<i64>,
    body: web::Json<PracticeSessionBody>,
) -> RestResult<HttpResponse> {
    let id = path.into_inner();
    let body = body.into_inner();
    check_id(ENTITY_NAME, id, body.id)?;

    let mut tx = pool.begin().await?;
    let existing = PracticeSessionRepo::fetch_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| entity_not_found(ENTITY_NAME))?;

    let fields = PracticeSessionFields {
        start: body.start.or(existing.start),
        end: body.end.or(existing.end),
    };
    let session = PracticeSessionRepo::update(&mut *tx, id, &fields)
        .await?
        .ok_or(RestError::NotFound)?;
    tx.commit().await?;

    let mut res = HttpResponse::Ok();
    alerts.updated(&mut res, ENTITY_NAME, id);
    Ok(res.json(session))
}

#[tracing::instrument(name = "List practice sessions", skip(req, pool))]
async fn list(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    query: web::Query<PageQuery>,
) -> RestResult<HttpResponse> {
    let page = query.page()?;
    let pool = pool.get_ref();

    let sessions = PracticeSessionRepo::fetch_all(pool, page).await?;
    let total = match page {
        Some(_) => Some(PracticeSessionRepo::count(pool).await?),
        None => None,
    };

    list_response(&req, &sessions, total)
}

/// A single session is returned together with its practices
#[tracing::instrument(name = "Get a practice session", skip(pool))]
async fn get(pool: web::Data<PgPool>, path: web::Path<i64>) -> RestResult<HttpResponse> {
    let id = path.into_inner();
    let pool = pool.get_ref();

    let mut session = PracticeSessionRepo::fetch_by_id(pool, id)
        .await?
        .ok_or(RestError::NotFound)?;

    let practices = PracticeRepo::fetch_by_practice_session(pool, id)
        .await?
        .into_iter()
        .map(|mut practice| {
            practice.practice_session = None;
            practice
        })
        .collect();
    session.practices = Some(practices);

    Ok(HttpResponse::Ok().json(session))
}

#[tracing::instrument(name = "Delete a practice session", skip(pool, alerts))]
async fn delete(
    pool: web::Data<PgPool>,
    alerts: web::Data<Alerts>,
    path: web::Path<i64>,
) -> RestResult<HttpResponse> {
    let id = path.into_inner();

    let deleted = PracticeSessionRepo::delete_by_id(pool.get_ref(), id).await?;
    tracing::debug!("Deleted {} practice session rows", deleted);

    let mut res = HttpResponse::NoContent();
    alerts.deleted(&mut res, ENTITY_NAME, id);
    Ok(res.finish())
}

/// Practice session API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/api/practice-sessions")
        .service(
            web::resource("")
                .name("practice_sessions")
                .route(web::get().to(list))
                .route(web::post().to(create))
                .default_service(web::to(method_not_allowed)),
        )
        .service(
            web::resource("/{id}")
                .name("practice_session")
                .route(web::get().to(get))
                .route(web::put().to(update))
                .route(web::patch().to(partial_update))
                .route(web::delete().to(delete))
                .default_service(web::to(method_not_allowed)),
        )
}
