//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::filter::MaterialFilter;
use crate::models::{Category, MaterialRecord, NewMaterial};

/// Data persistence contract for materials and their categories.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MaterialRepo: Send + Sync {
    /// Materials matching `filter`, most recently created first.
    async fn list_materials(&self, filter: &MaterialFilter) -> Result<Vec<MaterialRecord>>;

    /// Inserts a material, creating the default user and the subject's
    /// category on first use. Either everything is written or nothing is.
    async fn create_material(&self, material: NewMaterial) -> Result<MaterialRecord>;

    /// Hard delete. `AppError::NotFound` if no material has this id.
    async fn delete_material(&self, id: Uuid) -> Result<()>;

    async fn list_categories(&self) -> Result<Vec<Category>>;

    /// Round-trips a trivial query to prove the store is reachable.
    async fn ping(&self) -> Result<()>;
}

/// String key/value persistence, the shape of browser local storage.
/// Values are JSON documents.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}
