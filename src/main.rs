use std::net::TcpListener;

use anyhow::Context;

use practice_tracker::app;
use practice_tracker::controller::Alerts;
use practice_tracker::settings::Settings;
use practice_tracker::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;

    let subscriber = telemetry::create_subscriber(settings.log.filter(), std::io::stdout);
    telemetry::set_subscriber(subscriber)?;

    let pool = settings.database.pool();
    sqlx::migrate!()
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let listener = TcpListener::bind(settings.app.addr())?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    let alerts = Alerts::new(settings.app.name());

    app::run(listener, pool, alerts)?.await.context("Failed to run app")
}
