//! # smh-api Handlers
//!
//! This module coordinates the flow between HTTP requests and Core traits.

use std::sync::Arc;

use actix_web::http::header;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;
use smh_core::draft::MaterialDraft;
use smh_core::error::AppError;
use smh_core::filter::FilterOptions;
use smh_core::models::{iso_timestamp, StudyMaterial};
use smh_core::traits::MaterialRepo;
use uuid::Uuid;

use crate::error::ApiError;

/// State shared across all Actix-web workers.
pub struct AppState {
    pub repo: Arc<dyn MaterialRepo>,
    /// Include storage diagnostics in 500 bodies (development mode).
    pub detailed_errors: bool,
}

impl AppState {
    pub fn new(repo: Arc<dyn MaterialRepo>, detailed_errors: bool) -> Self {
        Self {
            repo,
            detailed_errors,
        }
    }

    fn fail(&self, context: &'static str) -> impl FnOnce(AppError) -> ApiError {
        let detailed = self.detailed_errors;
        move |source| ApiError::new(context, source, detailed)
    }
}

/// Liveness probe.
pub async fn health() -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(json!({
            "status": "ok",
            "timestamp": iso_timestamp(Utc::now()),
        }))
}

/// Storage connectivity probe.
pub async fn health_db(data: web::Data<AppState>) -> HttpResponse {
    match data.repo.ping().await {
        Ok(()) => HttpResponse::Ok()
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .json(json!({ "status": "ok", "database": "connected" })),
        Err(err) => {
            log::error!("Health check failed: {err}");
            let mut body = json!({ "status": "error", "database": "disconnected" });
            if data.detailed_errors {
                body["error"] = json!(err.to_string());
            }
            HttpResponse::InternalServerError()
                .insert_header((header::CACHE_CONTROL, "no-store"))
                .json(body)
        }
    }
}

/// `GET /materials?searchQuery&subject&semester&type`
pub async fn list_materials(
    data: web::Data<AppState>,
    query: web::Query<FilterOptions>,
) -> Result<HttpResponse, ApiError> {
    let filter = query.into_inner().into_filter().map_err(data.fail("Invalid filter"))?;

    let materials: Vec<StudyMaterial> = data
        .repo
        .list_materials(&filter)
        .await
        .map_err(data.fail("Failed to fetch materials"))?
        .into_iter()
        .map(StudyMaterial::from)
        .collect();

    Ok(HttpResponse::Ok().json(materials))
}

/// `POST /materials`
pub async fn create_material(
    data: web::Data<AppState>,
    body: web::Json<MaterialDraft>,
) -> Result<HttpResponse, ApiError> {
    // 1. Validation: presence, type, semester range
    let material = body.validate().map_err(data.fail("Invalid material"))?;

    // 2. Persistence: user and category are resolved inside the same transaction
    let record = data
        .repo
        .create_material(material)
        .await
        .map_err(data.fail("Failed to create material"))?;

    log::info!("Created material {} in {}", record.id, record.category_id);
    Ok(HttpResponse::Created().json(StudyMaterial::from(record)))
}

/// `DELETE /materials/{id}`
pub async fn delete_material(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    data.repo
        .delete_material(id)
        .await
        .map_err(data.fail("Failed to delete material"))?;

    log::info!("Deleted material {id}");
    Ok(HttpResponse::NoContent().finish())
}

/// `GET /categories`
pub async fn list_categories(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let categories = data
        .repo
        .list_categories()
        .await
        .map_err(data.fail("Failed to fetch categories"))?;
    Ok(HttpResponse::Ok().json(categories))
}

/// Fallback for unknown routes under the API scope.
pub async fn api_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "error": "API endpoint not found" }))
}
