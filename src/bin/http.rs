#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::sync::Arc;

    use env_logger::Env;
    use log::info;
    use open_hours::{
        HoursService, MemoryQueryCache, ServiceConfig, SqliteScheduleStore, http_api, load_seed_csv,
    };

    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = ServiceConfig::from_env()?;
    let store = SqliteScheduleStore::new(&config.db_path)?;
    let cache = MemoryQueryCache::new(config.cache_capacity, config.cache_ttl);
    let service = HoursService::new(Arc::new(store), Arc::new(cache));

    if let Some(path) = &config.seed_csv {
        let records = load_seed_csv(path)?;
        info!("found {} schedules in {}", records.len(), path.display());
        let summary = service.seed(&records)?;
        info!("seed complete ({})", summary.to_cli_summary());
    }

    info!(
        "open-hours HTTP API using database {}",
        config.db_path.display()
    );
    http_api::serve(config.http_addr, service).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
