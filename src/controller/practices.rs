use actix_web::dev::HttpServiceFactory;
use actix_web::http::header::LOCATION;
use actix_web::{web, HttpRequest, HttpResponse};

use chrono::{DateTime, Utc};

use serde::Deserialize;

use sqlx::PgPool;

use crate::controller::{check_id, entity_not_found, list_response, method_not_allowed, Alerts, PageQuery};
use crate::domain::PracticeResult;
use crate::error::{RestError, RestResult};
use crate::model::Practice;
use crate::repo::{PracticeFields, PracticeRepo};

const ENTITY_NAME: &str = "practice";

/// `?filter=` of the list endpoint
#[derive(Debug, Deserialize)]
pub struct FilterQuery {
    filter: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ListFilter {
    WithoutPracticeSession,
}

impl FilterQuery {
    fn filter(&self) -> RestResult<Option<ListFilter>> {
        match self.filter.as_deref() {
            None => Ok(None),
            Some("practicesession-is-null") => Ok(Some(ListFilter::WithoutPracticeSession)),
            Some(other) => Err(RestError::ParseError(format!("Unknown filter: {}", other))),
        }
    }
}

/// Reference to the owning session; only its id is read
#[derive(Debug, Deserialize)]
pub struct PracticeSessionRef {
    id: Option<i64>,
}

/// JSON body of the create/update endpoints
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeBody {
    id: Option<i64>,
    problem_name: Option<String>,
    problem_link: Option<String>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    result: Option<PracticeResult>,
    practice_session: Option<PracticeSessionRef>,
}

impl TryFrom<PracticeBody> for PracticeFields {
    type Error = String;

    fn try_from(body: PracticeBody) -> Result<Self, Self::Error> {
        let problem_name = body
            .problem_name
            .ok_or("Problem name is required")?
            .parse()?;
        let problem_link = body
            .problem_link
            .ok_or("Problem link is required")?
            .parse()?;

        Ok(Self {
            problem_name,
            problem_link,
            start: body.start,
            end: body.end,
            result: body.result,
            practice_session_id: body.practice_session.and_then(|session| session.id),
        })
    }
}

impl PracticeBody {
    /// Overlay the members present in this body onto a stored practice.
    /// The session link is never changed by a merge.
    fn merge_into(self, existing: Practice) -> Result<PracticeFields, String> {
        let practice_session_id = existing.practice_session_id();

        let problem_name = self.problem_name.unwrap_or(existing.problem_name).parse()?;
        let problem_link = self.problem_link.unwrap_or(existing.problem_link).parse()?;

        Ok(PracticeFields {
            problem_name,
            problem_link,
            start: self.start.or(existing.start),
            end: self.end.or(existing.end),
            result: self.result.or(existing.result),
            practice_session_id,
        })
    }
}

#[tracing::instrument(name = "Create a practice", skip(req, pool, alerts))]
async fn create(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    alerts: web::Data<Alerts>,
    body: web::Json<PracticeBody>,
) -> RestResult<HttpResponse> {
    let body = body.into_inner();
    if body.id.is_some() {
        return Err(RestError::bad_request(
            "A new practice cannot already have an ID",
            ENTITY_NAME,
            "idexists",
        ));
    }
    let fields: PracticeFields = body.try_into().map_err(RestError::ParseError)?;

    let mut tx = pool.begin().await?;
    let id = PracticeRepo::insert(&mut *tx, &fields).await?;
    let practice = PracticeRepo::fetch_by_id(&mut *tx, id)
        .await?
        .ok_or(RestError::NotFound)?;
    tx.commit().await?;

    let location = req.url_for("practice", [id.to_string()])?;

    let mut res = HttpResponse::Created();
    res.insert_header((LOCATION, location.path()));
    alerts.created(&mut res, ENTITY_NAME, id);
    Ok(res.json(practice))
}

#[tracing::instrument(name = "Update a practice", skip(pool, alerts))]
async fn update(
    pool: web::Data<PgPool>,
    alerts: web::Data<Alerts>,
    path: web::Path<i64>,
    body: web::Json<PracticeBody>,
) -> RestResult<HttpResponse> {
    let id = path.into_inner();
    let body = body.into_inner();
    check_id(ENTITY_NAME, id, body.id)?;
    let fields: PracticeFields = body.try_into().map_err(RestError::ParseError)?;

    let mut tx = pool.begin().await?;
    if !PracticeRepo::exists(&mut *tx, id).await? {
        return Err(entity_not_found(ENTITY_NAME));
    }
    if !PracticeRepo::update(&mut *tx, id, &fields).await? {
        return Err(RestError::NotFound);
    }
    let practice = PracticeRepo::fetch_by_id(&mut *tx, id)
        .await?
        .ok_or(RestError::NotFound)?;
    tx.commit().await?;

    let mut res = HttpResponse::Ok();
    alerts.updated(&mut res, ENTITY_NAME, id);
    Ok(res.json(practice))
}

#[tracing::instrument(name = "Partially update a practice", skip(pool, alerts))]
async fn partial_update(
    pool: web::Data<PgPool>,
    alerts: web::Data<Alerts>,
    path: web::Path<i64>,
    body: web::Json<PracticeBody>,
) -> RestResult<HttpResponse> {
    let id = path.into_inner();
    let body = body.into_inner();
    check_id(ENTITY_NAME, id, body.id)?;

    let mut tx = pool.begin().await?;
    let existing = PracticeRepo::fetch_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| entity_not_found(ENTITY_NAME))?;

    let fields = body.merge_into(existing).map_err(RestError::ParseError)?;
    if !PracticeRepo::update(&mut *tx, id, &fields).await? {
        return Err(RestError::NotFound);
    }
    let practice = PracticeRepo::fetch_by_id(&mut *tx, id)
        .await?
        .ok_or(RestError::NotFound)?;
    tx.commit().await?;

    let mut res = HttpResponse::Ok();
    alerts.updated(&mut res, ENTITY_NAME, id);
    Ok(res.json(practice))
}

/// With `?filter=practicesession-is-null` only unlinked practices are listed, unpaged
#[tracing::instrument(name = "List practices", skip(req, pool))]
async fn list(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    query: web::Query<PageQuery>,
    filter: web::Query<FilterQuery>,
) -> RestResult<HttpResponse> {
    let page = query.page()?;
    let pool = pool.get_ref();

    if let Some(ListFilter::WithoutPracticeSession) = filter.filter()? {
        let practices = PracticeRepo::fetch_all_without_practice_session(pool).await?;
        return list_response(&req, &practices, None);
    }

    let practices = PracticeRepo::fetch_all(pool, page).await?;
    let total = match page {
        Some(_) => Some(PracticeRepo::count(pool).await?),
        None => None,
    };

    list_response(&req, &practices, total)
}

#[tracing::instrument(name = "Get a practice", skip(pool))]
async fn get(pool: web::Data<PgPool>, path: web::Path<i64>) -> RestResult<HttpResponse> {
    let practice = PracticeRepo::fetch_by_id(pool.get_ref(), path.into_inner())
        .await?
        .ok_or(RestError::NotFound)?;

    Ok(HttpResponse::Ok().json(practice))
}

#[tracing::instrument(name = "Delete a practice", skip(pool, alerts))]
async fn delete(
    pool: web::Data<PgPool>,
    alerts: web::Data<Alerts>,
    path: web::Path<i64>,
) -> RestResult<HttpResponse> {
    let id = path.into_inner();

    let deleted = PracticeRepo::delete_by_id(pool.get_ref(), id).await?;
    tracing::debug!("Deleted {} practice rows", deleted);

    let mut res = HttpResponse::NoContent();
    alerts.deleted(&mut res, ENTITY_NAME, id);
    Ok(res.finish())
}

/// Practice API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/api/practices")
        .service(
            web::resource("")
                .name("practices")
                .route(web::get().to(list))
                .route(web::post().to(create))
                .default_service(web::to(method_not_allowed)),
        )
        .service(
            web::resource("/{id}")
                .name("practice")
                .route(web::get().to(get))
                .route(web::put().to(update))
                .route(web::patch().to(partial_update))
                .route(web::delete().to(delete))
                .default_service(web::to(method_not_allowed)),
        )
}
