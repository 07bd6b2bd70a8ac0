//! # Preferences
//!
//! Per-device state that never leaves the client: favorites, download
//! counts and the theme flag. Every mutation is written through to the
//! store before it returns; the in-memory copy only changes once the store
//! has accepted the write.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smh_core::traits::KeyValueStore;
use uuid::Uuid;

use crate::error::Result;
use crate::store::{keys, load_json, save_json};

/// Times each material was downloaded on this device. Absent means zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DownloadCounts(BTreeMap<Uuid, u64>);

impl DownloadCounts {
    pub fn get(&self, id: Uuid) -> u64 {
        self.0.get(&id).copied().unwrap_or(0)
    }

    fn increment(&mut self, id: Uuid) -> u64 {
        let count = self.0.entry(id).or_insert(0);
        *count += 1;
        *count
    }

    fn remove(&mut self, id: Uuid) -> bool {
        self.0.remove(&id).is_some()
    }
}

impl FromIterator<(Uuid, u64)> for DownloadCounts {
    fn from_iter<I: IntoIterator<Item = (Uuid, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
    favorites: BTreeSet<Uuid>,
    downloads: DownloadCounts,
}

impl Preferences {
    /// Reads favorites and download counts from `store`.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let favorites = load_json(store.as_ref(), keys::FAVORITES).await?.unwrap_or_default();
        let downloads = load_json(store.as_ref(), keys::DOWNLOADS).await?.unwrap_or_default();
        Ok(Self { store, favorites, downloads })
    }

    pub fn is_favorite(&self, id: Uuid) -> bool {
        self.favorites.contains(&id)
    }

    pub fn favorites(&self) -> &BTreeSet<Uuid> {
        &self.favorites
    }

    /// Flips membership of `id`; returns whether it is now a favorite.
    pub async fn toggle_favorite(&mut self, id: Uuid) -> Result<bool> {
        let mut favorites = self.favorites.clone();
        let now_favorite = if favorites.remove(&id) {
            false
        } else {
            favorites.insert(id)
        };
        save_json(self.store.as_ref(), keys::FAVORITES, &favorites).await?;
        self.favorites = favorites;
        Ok(now_favorite)
    }

    pub fn downloads(&self) -> &DownloadCounts {
        &self.downloads
    }

    pub fn download_count(&self, id: Uuid) -> u64 {
        self.downloads.get(id)
    }

    /// Records one download of `id`; returns the new count.
    pub async fn increment_download(&mut self, id: Uuid) -> Result<u64> {
        let mut downloads = self.downloads.clone();
        let count = downloads.increment(id);
        save_json(self.store.as_ref(), keys::DOWNLOADS, &downloads).await?;
        self.downloads = downloads;
        Ok(count)
    }

    /// Drops every trace of a deleted material.
    pub async fn forget(&mut self, id: Uuid) -> Result<()> {
        let mut favorites = self.favorites.clone();
        if favorites.remove(&id) {
            save_json(self.store.as_ref(), keys::FAVORITES, &favorites).await?;
            self.favorites = favorites;
        }
        let mut downloads = self.downloads.clone();
        if downloads.remove(id) {
            save_json(self.store.as_ref(), keys::DOWNLOADS, &downloads).await?;
            self.downloads = downloads;
        }
        Ok(())
    }

    pub async fn dark_mode(&self) -> Result<bool> {
        Ok(load_json(self.store.as_ref(), keys::DARK_MODE).await?.unwrap_or(false))
    }

    /// Flips the theme flag; returns the new value.
    pub async fn toggle_dark_mode(&self) -> Result<bool> {
        let enabled = !self.dark_mode().await?;
        save_json(self.store.as_ref(), keys::DARK_MODE, &enabled).await?;
        Ok(enabled)
    }
}
