//! Service entry-point: loads settings, prepares storage and serves HTTP.

mod server;

use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use speedtest::domain::ports::{DisabledWeatherSource, WeatherSource};
use speedtest::inbound::http::health::HealthState;
use speedtest::outbound::persistence::{DbPool, run_pending_migrations};
use speedtest::outbound::rate_limit::{RedisRateLimitStore, redis_url};
use speedtest::outbound::weather::OpenWeatherHttpSource;
use speedtest::settings::AppSettings;

const REDIS_POOL_SIZE: u32 = 16;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let config = build_server_config(&settings).await?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!("speed-test service listening");

    let result = server.await;
    health_state.mark_unhealthy();
    info!("speed-test service stopped");
    result
}

async fn build_server_config(settings: &AppSettings) -> std::io::Result<ServerConfig> {
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let pool_config = settings.pool_config().map_err(std::io::Error::other)?;

    let database_url = pool_config.database_url().to_owned();
    let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&database_url))
        .await
        .map_err(|e| std::io::Error::other(format!("migration task failed: {e}")))?
        .map_err(std::io::Error::other)?;
    info!(applied, "database migrations complete");

    let db_pool = DbPool::new(pool_config)
        .await
        .map_err(std::io::Error::other)?;

    let redis = redis_url(settings.redis_host(), settings.redis_port());
    let rate_limit_store =
        RedisRateLimitStore::connect_lazy(&redis, REDIS_POOL_SIZE).map_err(std::io::Error::other)?;
    info!(
        host = settings.redis_host(),
        port = settings.redis_port(),
        "rate limit store configured"
    );

    let weather = build_weather_source(settings)?;

    Ok(
        ServerConfig::new(bind_addr, db_pool, rate_limit_store, weather)
            .with_rate_limit_policy(settings.rate_limit_policy()),
    )
}

fn build_weather_source(settings: &AppSettings) -> std::io::Result<Arc<dyn WeatherSource>> {
    let Some(api_key) = settings.weather_api_key() else {
        warn!("no weather API key configured; speed tests will be stored without weather");
        return Ok(Arc::new(DisabledWeatherSource));
    };
    let endpoint = settings.weather_endpoint().map_err(std::io::Error::other)?;
    info!(endpoint = %endpoint, "weather enrichment enabled");
    let source = OpenWeatherHttpSource::new(endpoint, api_key, settings.weather_timeout())
        .map_err(|e| std::io::Error::other(format!("failed to build weather client: {e}")))?;
    Ok(Arc::new(source))
}
