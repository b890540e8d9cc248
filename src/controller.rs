use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::header::ACCEPT;
use actix_web::{web, HttpRequest, HttpResponse};

use anyhow::Context;

use serde::{Deserialize, Serialize};

use crate::error::{RestError, RestResult};
use crate::repo::Page;

mod alert;
/// Practice endpoints
pub mod practices;
/// Practice session endpoints
pub mod practice_sessions;

pub use alert::Alerts;

/// Media type of the streaming list representation
pub const NDJSON: &str = "application/x-ndjson";

const DEFAULT_PAGE_SIZE: i64 = 20;

/// Optional `?page=&size=` parameters of the list endpoints
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    page: Option<i64>,
    size: Option<i64>,
}

impl PageQuery {
    /// `None` unless the client asked for a page
    pub fn page(&self) -> RestResult<Option<Page>> {
        match (self.page, self.size) {
            (None, None) => Ok(None),
            (page, size) => Page::new(page.unwrap_or(0), size.unwrap_or(DEFAULT_PAGE_SIZE))
                .map(Some)
                .map_err(RestError::ParseError),
        }
    }
}

/// Enforce that an update body names the same entity as the request path
pub fn check_id(entity_name: &'static str, path_id: i64, body_id: Option<i64>) -> RestResult<()> {
    match body_id {
        None => Err(RestError::bad_request("Invalid id", entity_name, "idnull")),
        Some(id) if id != path_id => Err(RestError::bad_request("Invalid ID", entity_name, "idinvalid")),
        Some(_) => Ok(()),
    }
}

pub fn entity_not_found(entity_name: &'static str) -> RestError {
    RestError::bad_request("Entity not found", entity_name, "idnotfound")
}

fn accepts_ndjson(req: &HttpRequest) -> bool {
    req.headers()
        .get(ACCEPT)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.contains(NDJSON))
        .unwrap_or(false)
}

/// Render a list as a JSON array, or as newline-delimited JSON if the client asked for it.
/// `total` is reported in `X-Total-Count` for paged requests.
pub fn list_response<T: Serialize>(
    req: &HttpRequest,
    items: &[T],
    total: Option<i64>,
) -> RestResult<HttpResponse> {
    let mut res = HttpResponse::Ok();
    if let Some(total) = total {
        res.insert_header(("X-Total-Count", total.to_string()));
    }

    if accepts_ndjson(req) {
        let mut body = String::new();
        for item in items {
            body.push_str(&serde_json::to_string(item).context("Failed to serialize entity")?);
            body.push('\n');
        }
        return Ok(res.content_type(NDJSON).body(body));
    }

    Ok(res.json(items))
}

pub async fn method_not_allowed() -> RestResult<HttpResponse> {
    Err(RestError::MethodNotAllowed)
}

/// Extractor configs that report malformed input through `RestError`
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req| {
        RestError::ParseError(err.to_string()).into()
    })
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err: PathError, _req| RestError::ParseError(err.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, _req| {
        RestError::ParseError(err.to_string()).into()
    })
}
