//! Tilegate - a gateway between a browser map client and third-party geo
//! services
//!
//! Relays tile and geocoding requests through a single configurable
//! outbound connection (direct, forward proxy, or SOCKS5), serves a
//! TTL-cached location list, and appends an audit record for every
//! serviced request.

pub mod application;
pub mod audit;
pub mod config;
pub mod error;
pub mod locations;
pub mod relay;
pub mod server;
pub mod upstream;

pub use application::Application;
pub use error::{Error, Result};
