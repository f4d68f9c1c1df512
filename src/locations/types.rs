//! Location record types and coordinate validation

use nutype::nutype;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Latitude in decimal degrees
#[nutype(
    derive(Clone, Copy, Debug, Display, PartialEq, Deserialize, Serialize, TryFrom, AsRef),
    validate(predicate = |lat: &f64| (-90.0..=90.0).contains(lat)),
)]
pub struct Latitude(f64);

/// Longitude in decimal degrees
#[nutype(
    derive(Clone, Copy, Debug, Display, PartialEq, Deserialize, Serialize, TryFrom, AsRef),
    validate(predicate = |lon: &f64| (-180.0..=180.0).contains(lon)),
)]
pub struct Longitude(f64);

/// Raw record as stored in the location file, with the coordinate pair
/// packed into a single `"lat,lon"` string.
#[derive(Clone, Debug, Deserialize)]
pub struct RawLocation {
    pub location: String,
    #[serde(rename = "as", default)]
    pub as_label: String,
    #[serde(default)]
    pub asname: String,
    #[serde(default)]
    pub details: String,
}

/// Validated location handed to the map client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClientLocation {
    pub lat: Latitude,
    pub lon: Longitude,
    #[serde(rename = "as")]
    pub as_label: String,
    pub asname: String,
    #[serde(default)]
    pub details: String,
}

/// Why a raw record was rejected during conversion.
#[derive(Error, Debug)]
pub enum LocationParseError {
    #[error("invalid location format: {0}")]
    Format(String),

    #[error("invalid latitude: {0}")]
    Latitude(String),

    #[error("latitude out of range: {0}")]
    LatitudeRange(f64),

    #[error("invalid longitude: {0}")]
    Longitude(String),

    #[error("longitude out of range: {0}")]
    LongitudeRange(f64),
}

/// Splits a `"latitude,longitude"` string into validated coordinates.
pub fn parse_coordinates(raw: &str) -> Result<(Latitude, Longitude), LocationParseError> {
    let (lat_part, lon_part) = raw
        .split_once(',')
        .ok_or_else(|| LocationParseError::Format(raw.to_string()))?;
    if lon_part.contains(',') {
        return Err(LocationParseError::Format(raw.to_string()));
    }

    let lat: f64 = lat_part
        .trim()
        .parse()
        .map_err(|_| LocationParseError::Latitude(lat_part.trim().to_string()))?;
    let lat = Latitude::try_new(lat).map_err(|_| LocationParseError::LatitudeRange(lat))?;

    let lon: f64 = lon_part
        .trim()
        .parse()
        .map_err(|_| LocationParseError::Longitude(lon_part.trim().to_string()))?;
    let lon = Longitude::try_new(lon).map_err(|_| LocationParseError::LongitudeRange(lon))?;

    Ok((lat, lon))
}

impl RawLocation {
    /// Converts the raw record into a [`ClientLocation`], validating the
    /// coordinate string.
    pub fn into_client(self) -> Result<ClientLocation, LocationParseError> {
        let (lat, lon) = parse_coordinates(&self.location)?;
        Ok(ClientLocation {
            lat,
            lon,
            as_label: self.as_label,
            asname: self.asname,
            details: self.details,
        })
    }
}
