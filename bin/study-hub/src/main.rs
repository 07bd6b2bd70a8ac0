//! # Study Hub Binary
//!
//! The entry point that assembles the server from its crates: settings,
//! the SQLite store, the JSON API and, in production, the front-end bundle.

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use secrecy::ExposeSecret;
use smh_api::middleware::{cors_policy, security_headers, standard_middleware};
use smh_api::{configure_routes, spa_service, AppState};
use smh_config::Settings;
use smh_core::traits::MaterialRepo;

// Feature-gated storage plugin
#[cfg(feature = "db-sqlite")]
use smh_db_sqlite::SqliteMaterialRepo;

#[cfg(not(feature = "db-sqlite"))]
compile_error!("study-hub needs a storage plugin; enable the `db-sqlite` feature");

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load settings")?;
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(settings.mode.default_log_filter()));

    // 1. Storage
    let repo = Arc::new(
        SqliteMaterialRepo::open(settings.database_url.expose_secret())
            .await
            .context("failed to open the material store")?,
    );

    // 2. Shared state (dynamic dispatch over the repository port)
    let dyn_repo: Arc<dyn MaterialRepo> = repo.clone();
    let state = web::Data::new(AppState::new(dyn_repo, settings.mode.is_development()));

    let development = settings.mode.is_development();
    let cors_origin = settings.cors_origin().map(str::to_string);
    let static_dir = settings.static_dir.clone();
    if !development && cors_origin.is_none() {
        log::warn!("CORS_ORIGIN is not set; cross-origin requests will be refused");
    }

    log::info!(
        "Study Hub starting in {} mode on http://{}:{}",
        settings.mode,
        settings.host,
        settings.port
    );

    // 3. HTTP server. Stops on SIGINT/SIGTERM once in-flight requests finish.
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(cors_policy(cors_origin.as_deref(), development))
            .wrap(security_headers())
            .wrap(standard_middleware())
            .configure(configure_routes)
            .configure(|cfg| {
                if !development {
                    cfg.service(spa_service(&static_dir));
                }
            })
    })
    .bind((settings.host.as_str(), settings.port))
    .with_context(|| format!("failed to bind {}:{}", settings.host, settings.port))?
    .run()
    .await
    .context("server error")?;

    log::info!("Server stopped, closing the material store");
    repo.close().await;
    Ok(())
}
