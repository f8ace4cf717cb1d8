//! Service configuration loader.
//!
//! Configuration comes from three layers, later layers overriding earlier:
//!   1. built-in defaults
//!   2. an optional `rwh.toml` file in the working directory
//!   3. environment variables (`RWH_PORT`, `RWH_STATIONS_FILE`,
//!      `RWH_ARCHIVE_URL`), loaded via dotenv so a `.env` file works too
//!
//! Everything has a sensible default, so the service starts with no
//! configuration at all as long as the station CSV is in place.

use serde::Deserialize;
use std::env;
use std::fs;

use crate::ingest::open_meteo::DEFAULT_ARCHIVE_URL;

pub const DEFAULT_CONFIG_FILE: &str = "rwh.toml";

// ---------------------------------------------------------------------------
// Configuration shape
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Port the HTTP endpoint listens on.
    pub port: u16,
    /// Path to the CGWB/WRIS station CSV.
    pub stations_file: String,
    /// Base URL of the Open-Meteo archive API.
    pub archive_base_url: String,
    /// Timeout applied to each archive request, in seconds.
    pub request_timeout_secs: u64,
    /// Year used for rainfall queries when the request omits one.
    pub default_year: i32,
    /// Station search radius when the request omits one, in km.
    pub default_max_radius_km: f64,
    /// Value for the Access-Control-Allow-Origin response header.
    pub allowed_origin: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: 8001,
            stations_file: "data/india_gw_stations.csv".to_string(),
            archive_base_url: DEFAULT_ARCHIVE_URL.to_string(),
            request_timeout_secs: 20,
            default_year: 2024,
            default_max_radius_km: 50.0,
            allowed_origin: "*".to_string(),
        }
    }
}

/// TOML file shape — every field optional so partial files work.
#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    port: Option<u16>,
    stations_file: Option<String>,
    archive_base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    default_year: Option<i32>,
    default_max_radius_km: Option<f64>,
    allowed_origin: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl ServiceConfig {
    /// Loads configuration from the given TOML path (or the default path
    /// when `None`), then applies environment overrides.
    ///
    /// A missing file falls back to defaults; a file that exists but does
    /// not parse is an error — silently ignoring a broken config would be
    /// worse than refusing to start.
    pub fn load(path: Option<&str>) -> Result<Self, String> {
        dotenv::dotenv().ok();

        let path = path.unwrap_or(DEFAULT_CONFIG_FILE);
        let file_config = match fs::read_to_string(path) {
            Ok(contents) => toml::from_str::<FileConfig>(&contents)
                .map_err(|e| format!("Failed to parse {}: {}", path, e))?,
            Err(_) => FileConfig::default(),
        };

        let mut config = Self::default().merge(file_config);

        if let Ok(port) = env::var("RWH_PORT") {
            config.port = port
                .parse()
                .map_err(|_| format!("RWH_PORT is not a valid port: '{}'", port))?;
        }
        if let Ok(file) = env::var("RWH_STATIONS_FILE") {
            config.stations_file = file;
        }
        if let Ok(url) = env::var("RWH_ARCHIVE_URL") {
            config.archive_base_url = url;
        }

        Ok(config)
    }

    fn merge(mut self, file: FileConfig) -> Self {
        if let Some(port) = file.port {
            self.port = port;
        }
        if let Some(stations_file) = file.stations_file {
            self.stations_file = stations_file;
        }
        if let Some(url) = file.archive_base_url {
            self.archive_base_url = url;
        }
        if let Some(secs) = file.request_timeout_secs {
            self.request_timeout_secs = secs;
        }
        if let Some(year) = file.default_year {
            self.default_year = year;
        }
        if let Some(radius) = file.default_max_radius_km {
            self.default_max_radius_km = radius;
        }
        if let Some(origin) = file.allowed_origin {
            self.allowed_origin = origin;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
