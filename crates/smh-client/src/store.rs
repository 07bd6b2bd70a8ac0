//! JSON documents over a [`KeyValueStore`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use smh_core::error::AppError;
use smh_core::traits::KeyValueStore;

use crate::error::Result;

/// Storage keys, one JSON value each.
pub mod keys {
    pub const LOGGED_IN: &str = "isLoggedIn";
    pub const DARK_MODE: &str = "darkMode";
    pub const MATERIALS: &str = "materials";
    pub const FAVORITES: &str = "favorites";
    pub const DOWNLOADS: &str = "downloads";
}

/// Reads `key`. A value that does not parse is logged and treated as absent.
pub(crate) async fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            log::warn!("ignoring unreadable {key} value: {e}");
            Ok(None)
        }
    }
}

pub(crate) async fn save_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value).map_err(|e| AppError::Internal(e.to_string()))?;
    store.set(key, &raw).await?;
    Ok(())
}
