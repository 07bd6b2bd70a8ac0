//! # Session
//!
//! Admin login for the client UI. This gates which controls are shown; the
//! server does not check it.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use smh_core::traits::KeyValueStore;

use crate::error::{ClientError, Result};
use crate::store::{keys, load_json, save_json};

pub const DEFAULT_ADMIN_ID: &str = "RRCE";
const DEFAULT_ADMIN_PASSWORD: &str = "RRCE@Study";

#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub user_id: String,
    pub password: SecretString,
}

impl AdminCredentials {
    pub fn new(user_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            password: SecretString::from(password.into()),
        }
    }
}

impl Default for AdminCredentials {
    fn default() -> Self {
        Self::new(DEFAULT_ADMIN_ID, DEFAULT_ADMIN_PASSWORD)
    }
}

pub struct Session {
    store: Arc<dyn KeyValueStore>,
    credentials: AdminCredentials,
}

impl Session {
    pub fn new(store: Arc<dyn KeyValueStore>, credentials: AdminCredentials) -> Self {
        Self { store, credentials }
    }

    /// Returns whether the pair matched. A match persists the logged-in flag.
    pub async fn login(&self, user_id: &str, password: &str) -> Result<bool> {
        let matched = user_id == self.credentials.user_id
            && password == self.credentials.password.expose_secret();
        if matched {
            save_json(self.store.as_ref(), keys::LOGGED_IN, &true).await?;
            log::info!("Admin {user_id} logged in");
        } else {
            log::warn!("Rejected login attempt for {user_id:?}");
        }
        Ok(matched)
    }

    pub async fn logout(&self) -> Result<()> {
        self.store.remove(keys::LOGGED_IN).await?;
        Ok(())
    }

    pub async fn is_logged_in(&self) -> Result<bool> {
        Ok(load_json(self.store.as_ref(), keys::LOGGED_IN).await?.unwrap_or(false))
    }

    pub(crate) async fn require_admin(&self) -> Result<()> {
        if self.is_logged_in().await? {
            Ok(())
        } else {
            Err(ClientError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smh_storage_local::MemoryStore;

    #[tokio::test]
    async fn test_login_logout_cycle() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let session = Session::new(store.clone(), AdminCredentials::default());

        assert!(!session.is_logged_in().await.unwrap());
        assert!(!session.login("RRCE", "wrong").await.unwrap());
        assert!(!session.login("rrce", "RRCE@Study").await.unwrap());
        assert!(!session.is_logged_in().await.unwrap());

        assert!(session.login("RRCE", "RRCE@Study").await.unwrap());
        assert_eq!(store.get("isLoggedIn").await.unwrap().as_deref(), Some("true"));

        // a fresh handle over the same store sees the flag
        let again = Session::new(store.clone(), AdminCredentials::default());
        assert!(again.is_logged_in().await.unwrap());

        session.logout().await.unwrap();
        assert!(!again.is_logged_in().await.unwrap());
        assert!(matches!(again.require_admin().await, Err(ClientError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_custom_credentials() {
        let session = Session::new(Arc::new(MemoryStore::new()), AdminCredentials::new("admin", "s3cret"));
        assert!(!session.login("RRCE", "RRCE@Study").await.unwrap());
        assert!(session.login("admin", "s3cret").await.unwrap());
    }
}
