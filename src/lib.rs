//! rwh_service: groundwater depth lookup + rooftop rainwater harvesting sizing API.
//!
//! # Module structure
//!
//! ```text
//! rwh_service
//! ├── model       — shared data types (GeoPoint, StationRecord, ApiError, …)
//! ├── config      — service configuration (rwh.toml + env overrides)
//! ├── catalog     — CGWB/WRIS station CSV with lazy at-most-once loading
//! ├── geo         — haversine distance + nearest-station linear scan
//! ├── hydrology   — pure runoff / peak-flow / design-category derivations
//! ├── ingest
//! │   ├── open_meteo — Open-Meteo archive API: URL construction + JSON parsing
//! │   └── fixtures (test only) — representative archive response payloads
//! ├── logging     — leveled console/file logger with source tags
//! └── endpoint    — tiny_http API: routing, query parsing, JSON shaping
//! ```

pub mod catalog;
pub mod config;
pub mod endpoint;
pub mod geo;
pub mod hydrology;
pub mod ingest;
pub mod logging;
pub mod model;
