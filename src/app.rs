use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::{get, HttpResponse, Responder};
use actix_web::{web, App, HttpServer};

use sqlx::PgPool;

use tracing_actix_web::TracingLogger;

use crate::controller::{self, practice_sessions, practices, Alerts};

/// Simple health-check endpoint
#[tracing::instrument(name = "Health check")]
#[get("/health_check")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().finish()
}

/// Run the application on a specified TCP listener
pub fn run(listener: TcpListener, pool: PgPool, alerts: Alerts) -> anyhow::Result<Server> {
    // Wrap application data
    let pool = web::Data::new(pool);
    let alerts = web::Data::new(alerts);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(pool.clone())
            .app_data(alerts.clone())
            .app_data(controller::json_config())
            .app_data(controller::path_config())
            .app_data(controller::query_config())
            .service(health_check)
            .service(practice_sessions::scope())
            .service(practices::scope())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
