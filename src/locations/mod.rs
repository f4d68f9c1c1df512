//! Location records: file-backed store, validation, and TTL cache

pub mod cache;
pub mod store;
pub mod types;

pub use cache::LocationCache;
pub use store::{FileLocationStore, LocationStore, StoreError};
pub use types::{ClientLocation, Latitude, Longitude, RawLocation};
