use std::sync::Arc;

use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::{Context, Result};
use env_logger::Env;
use log::{info, warn};

use kurs::api;
use kurs::config::AppConfig;
use kurs::nbu::NbuClient;
use kurs::refresh::RefreshJob;
use kurs::service::RateService;
use kurs::store::{MemoryRateStore, PgRateStore, RateStore};

#[actix_web::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env()?;
    let store = open_store(&config).await?;

    RefreshJob::new(
        NbuClient::new(&config.nbu_url),
        store.clone(),
        config.refresh_at,
    )
    .spawn();

    let service = web::Data::new(RateService::new(
        store,
        &config.base_currency,
        config.resolution,
        config.snapshot_limit,
    ));

    info!(
        "Serving rates against {} ({} resolution) on {}",
        config.base_currency, config.resolution, config.bind_addr
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(service.clone())
            .configure(api::configure)
    })
    .bind(&config.bind_addr)
    .with_context(|| format!("Can't bind to {}", config.bind_addr))?
    .run()
    .await?;

    Ok(())
}

async fn open_store(config: &AppConfig) -> Result<Arc<dyn RateStore>> {
    match &config.database_url {
        Some(url) => Ok(Arc::new(
            PgRateStore::connect(url, config.db_max_connections).await?,
        )),
        None => {
            warn!("DATABASE_URL is not set, keeping exchange rates in memory");
            Ok(Arc::new(MemoryRateStore::new()))
        }
    }
}
