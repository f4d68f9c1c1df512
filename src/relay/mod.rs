//! Outbound relays to third-party geo services

pub mod error;
pub mod geocode;
pub mod tiles;

pub use error::RelayError;
pub use geocode::{GeocodingRelay, SearchResponse};
pub use tiles::{TileBases, TileProvider, TileRelay, TileRequest, TileResponse};
