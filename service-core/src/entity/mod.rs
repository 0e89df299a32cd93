//! Generic in-memory entity component shared by the CRUD services.
//!
//! An [`Entity`] describes one record type: its display name, the shape a
//! client posts to create one, and how a record is built once the store has
//! assigned it an id. [`EntityStore`] owns the records, [`EntityService`]
//! exposes them to handlers, and [`handlers`] provides the axum endpoints.

pub mod handlers;
pub mod service;
pub mod store;

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

pub use service::EntityService;
pub use store::EntityStore;

/// A record type held by an [`EntityStore`].
pub trait Entity: Clone + Serialize + Send + Sync + 'static {
    /// Human-readable name used in log lines and error messages.
    const NAME: &'static str;

    /// Creation input accepted from clients.
    type Create: DeserializeOwned + Send + 'static;

    /// Build the stored record from its assigned id and the creation input.
    fn from_create(id: u64, input: Self::Create) -> Self;

    fn id(&self) -> u64;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{entity} not found.")]
    NotFound { entity: &'static str, id: i64 },
}
