//! The seam between the UI state and wherever materials live.

use async_trait::async_trait;
use smh_core::draft::MaterialDraft;
use smh_core::filter::FilterOptions;
use smh_core::models::StudyMaterial;
use uuid::Uuid;

use crate::error::Result;

/// A backend holding the material list: the HTTP API or the local library.
#[async_trait]
pub trait MaterialSource: Send + Sync {
    /// Materials matching `filters`, newest first.
    async fn fetch_materials(&self, filters: &FilterOptions) -> Result<Vec<StudyMaterial>>;

    /// Validates and stores `draft`, returning the stored material.
    async fn create_material(&self, draft: &MaterialDraft) -> Result<StudyMaterial>;

    async fn delete_material(&self, id: Uuid) -> Result<()>;
}
