// Adapters layer: concrete implementations for external systems (http, storage, fixtures).

pub mod fixtures;
pub mod http;
pub mod storage;

pub use http::{HttpCentreSource, HttpTargetStore};
pub use storage::LocalStorage;
