//! Core data types for the groundwater depth + RWH sizing service.
//!
//! This module defines the shared domain model imported by all other modules.
//! It contains no I/O and no external dependencies beyond serde — only types.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Geographic types
// ---------------------------------------------------------------------------

/// A validated WGS84 coordinate pair.
///
/// Construction enforces `lat ∈ [-90, 90]` and `lon ∈ [-180, 180]`, so any
/// `GeoPoint` handed to the search or archive layers is already known valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

impl GeoPoint {
    /// Builds a point from decimal degrees, rejecting out-of-range values.
    pub fn new(lat: f64, lon: f64) -> Result<Self, ApiError> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(ApiError::Validation(format!(
                "Invalid lat/lon: ({}, {})",
                lat, lon
            )));
        }
        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

// ---------------------------------------------------------------------------
// Station types
// ---------------------------------------------------------------------------

/// A single CGWB/India-WRIS groundwater monitoring record.
///
/// Loaded once from the station CSV. Coordinates are parsed at load time
/// (rows with unparsable coordinates never enter the catalog); the depth
/// field stays free text and is parsed only when the record is selected
/// as nearest, because the source data is known to contain occasional
/// non-numeric depth entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationRecord {
    pub station_id: String,
    pub station_name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Depth in meters below ground level, as it appears in the CSV.
    pub depth_m_bgl: String,
    /// Observation date, as it appears in the CSV.
    pub date: String,
    pub state: String,
    pub district: String,
}

/// Result of a nearest-station search: the winning record plus the
/// distance to it and its parsed depth, both rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestStation {
    pub record: StationRecord,
    pub distance_km: f64,
    pub depth_m: f64,
}

// ---------------------------------------------------------------------------
// Rainfall types
// ---------------------------------------------------------------------------

/// The annual maximum of a precipitation series at one coordinate.
///
/// `max_mm` is mm/day for the daily series and mm/hour for the hourly
/// series; `at` is the upstream timestamp of the first occurrence of
/// that maximum.
#[derive(Debug, Clone, PartialEq)]
pub struct RainfallSample {
    pub year: i32,
    pub max_mm: f64,
    pub at: String,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Service-level error taxonomy, mapped one-to-one onto HTTP status codes
/// by the endpoint layer.
#[derive(Debug, PartialEq)]
pub enum ApiError {
    /// Bad request input (invalid coordinates, non-positive area). 400.
    Validation(String),
    /// No station within radius, or an empty upstream series. 404.
    NotFound(String),
    /// Malformed local or upstream data. 500.
    Data(String),
    /// Upstream archive unreachable or returned unusable values. 502.
    Upstream(String),
    /// Upstream archive answered with a non-success status, passed through.
    UpstreamStatus(u16),
}

impl ApiError {
    /// The HTTP status code this error surfaces as.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Validation(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::Data(_) => 500,
            ApiError::Upstream(_) => 502,
            ApiError::UpstreamStatus(code) => *code,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Validation(msg) => write!(f, "{}", msg),
            ApiError::NotFound(msg) => write!(f, "{}", msg),
            ApiError::Data(msg) => write!(f, "{}", msg),
            ApiError::Upstream(msg) => write!(f, "{}", msg),
            ApiError::UpstreamStatus(code) => {
                write!(f, "Open-Meteo archive returned status {}", code)
            }
        }
    }
}

impl std::error::Error for ApiError {}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Rounds to 2 decimal places. Used only at output boundaries — never in
/// intermediate comparisons.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
