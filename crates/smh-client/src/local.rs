//! # LocalLibrary
//!
//! Offline [`MaterialSource`]: the whole material list is one JSON array
//! under the `materials` key. Reads filter in memory with the same
//! predicate the server translates to SQL.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use smh_core::draft::MaterialDraft;
use smh_core::error::AppError;
use smh_core::filter::FilterOptions;
use smh_core::models::StudyMaterial;
use smh_core::traits::KeyValueStore;
use uuid::Uuid;

use crate::catalog::{derive_view, SortOrder};
use crate::error::Result;
use crate::prefs::DownloadCounts;
use crate::source::MaterialSource;
use crate::store::{keys, load_json, save_json};

pub struct LocalLibrary {
    store: Arc<dyn KeyValueStore>,
}

impl LocalLibrary {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    async fn load(&self) -> Result<Vec<StudyMaterial>> {
        Ok(load_json(self.store.as_ref(), keys::MATERIALS)
            .await?
            .unwrap_or_default())
    }

    async fn save(&self, materials: &[StudyMaterial]) -> Result<()> {
        save_json(self.store.as_ref(), keys::MATERIALS, materials).await
    }
}

#[async_trait]
impl MaterialSource for LocalLibrary {
    async fn fetch_materials(&self, filters: &FilterOptions) -> Result<Vec<StudyMaterial>> {
        let filter = filters.clone().into_filter()?;
        let materials = self.load().await?;
        Ok(derive_view(&materials, &filter, SortOrder::Date, &DownloadCounts::default())
            .into_iter()
            .cloned()
            .collect())
    }

    async fn create_material(&self, draft: &MaterialDraft) -> Result<StudyMaterial> {
        let new = draft.validate()?;
        // Local materials have no owner row; the nil id stands in.
        let material = StudyMaterial::from(new.into_record(Uuid::nil(), Utc::now()));

        let mut materials = self.load().await?;
        materials.push(material.clone());
        self.save(&materials).await?;
        log::info!("Stored material {} locally", material.id);
        Ok(material)
    }

    async fn delete_material(&self, id: Uuid) -> Result<()> {
        let mut materials = self.load().await?;
        let before = materials.len();
        materials.retain(|m| m.id != id);
        if materials.len() == before {
            return Err(AppError::not_found("Material", id).into());
        }
        self.save(&materials).await
    }
}
