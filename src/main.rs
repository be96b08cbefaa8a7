use std::time::Duration;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;

mod api;
mod config;
mod docs;
mod error;
mod model;
mod routes;
mod utils;

use config::Config;

use crate::docs::api_doc;
use crate::utils::presence_loader::store_cache;
use crate::utils::user_directory::UserDirectoryCache;
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "presence.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(
        data_csv = %config.data_csv,
        users_xml = %config.users_xml,
        cache_ttl = config.cache_ttl,
        "Server starting..."
    );

    // One cache per process, shared by every worker
    let ttl = Duration::from_secs(config.cache_ttl);
    let store = Data::new(store_cache(&config.data_csv, ttl));
    let users = Data::new(UserDirectoryCache::new(&config.users_xml, ttl));

    let warmup_store = store.clone().into_inner();
    actix_web::rt::spawn(async move {
        match actix_web::web::block(move || warmup_store.call()).await {
            Ok(Ok(snapshot)) => info!(users = snapshot.len(), "Attendance cache warmed up"),
            Ok(Err(e)) => warn!(error = %e, "Failed to warm up attendance cache"),
            Err(e) => warn!(error = %e, "Attendance warmup task failed"),
        }
    });

    let server_addr = config.server_addr.clone();
    let openapi = api_doc(&config.api_prefix);

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", openapi.clone()),
            )
            .app_data(store.clone())
            .app_data(users.clone())
            .configure(|cfg| routes::configure(cfg, &config))
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {server_addr}"))?
    .run()
    .await?;

    Ok(())
}
