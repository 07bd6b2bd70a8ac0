//! # smh-client
//!
//! Everything the Study Materials Hub front end needs besides rendering:
//! a typed client for the HTTP API, an offline material library, the
//! filter/sort view derivation and the per-device preferences and session.
//!
//! Persistent client state goes through `smh_core::KeyValueStore`; pick
//! `smh-storage-local`'s `FileStore` for a real device or `MemoryStore`
//! for a throwaway one.

pub mod api;
pub mod catalog;
pub mod error;
pub mod local;
pub mod prefs;
pub mod session;
pub mod source;
pub mod store;

pub use api::{ApiClient, DEFAULT_BASE_URL};
pub use catalog::{derive_view, Catalog, SortOrder};
pub use error::ClientError;
pub use local::LocalLibrary;
pub use prefs::{DownloadCounts, Preferences};
pub use session::{AdminCredentials, Session};
pub use source::MaterialSource;
