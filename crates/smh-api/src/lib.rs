//! # smh-api
//!
//! The REST routing and orchestration layer for the Study Materials Hub.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod spa;

use actix_web::web;
use smh_core::error::AppError;

pub use error::ApiError;
pub use handlers::AppState;
pub use spa::spa_service;

/// Configures the JSON API routes.
///
/// # Developer Note
/// Everything is mounted under `/api` so the binary can serve the front end
/// from `/` in the same process. Unknown `/api/*` paths never fall through to
/// the front end; they get a JSON 404.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            // Probes
            .route("/health", web::get().to(handlers::health))
            .route("/health/db", web::get().to(handlers::health_db))
            // Materials
            .route("/materials", web::get().to(handlers::list_materials))
            .route("/materials", web::post().to(handlers::create_material))
            .route("/materials/{id}", web::delete().to(handlers::delete_material))
            // Categories
            .route("/categories", web::get().to(handlers::list_categories))
            .default_service(web::to(handlers::api_not_found)),
    );
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| ApiError::malformed(err.to_string()).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| ApiError::malformed(err.to_string()).into())
}

/// A path id that is not a UUID cannot name a stored material.
fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: actix_web::error::PathError, req| {
        let raw = req.match_info().get("id").unwrap_or_default().to_string();
        log::debug!("unusable path id {raw:?}: {err}");
        ApiError::new("Failed to delete material", AppError::not_found("Material", raw), false).into()
    })
}
