//! # smh-core
//!
//! The central domain logic and interface definitions for the Study
//! Materials Hub: entities, the filter predicate, the view-model mapping and
//! the ports storage plugins implement.

pub mod departments;
pub mod draft;
pub mod error;
pub mod filter;
pub mod models;
pub mod traits;

// Re-exporting for easier access in other crates
pub use departments::*;
pub use draft::*;
pub use error::*;
pub use filter::*;
pub use models::*;
pub use traits::*;
