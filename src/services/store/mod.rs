pub mod client;
pub mod facility;

pub use client::{StoreClient, StoreError, StoreResult};
pub use facility::{StoreFacility, StoreHandle};
