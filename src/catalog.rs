//! Station catalog: loads the CGWB/WRIS groundwater station CSV.
//!
//! The catalog is constructed once at startup and shared by reference with
//! every request handler. Loading is lazy and at-most-once-successful: the
//! first request that needs station data triggers the load; a failed load
//! leaves the catalog unloaded so the next request retries, and a successful
//! load is terminal — the records are never reloaded or mutated afterward.
//!
//! Expected CSV columns:
//!   station_id,station_name,latitude,longitude,depth_m_bgl,date,state,district

use crate::model::StationRecord;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can arise while loading the station dataset.
#[derive(Debug)]
pub enum CatalogError {
    /// The CSV file does not exist at the configured path.
    Missing(PathBuf),
    /// The file exists but could not be read.
    Read(std::io::Error),
    /// The CSV structure could not be parsed at all.
    Malformed(String),
    /// The file parsed but contained no data rows.
    Empty(PathBuf),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Missing(path) => write!(
                f,
                "Station file '{}' not found. Provide a CSV with columns: \
                 station_id,station_name,latitude,longitude,depth_m_bgl,date,state,district",
                path.display()
            ),
            CatalogError::Read(e) => write!(f, "Error reading station file: {}", e),
            CatalogError::Malformed(msg) => write!(f, "Error parsing station file: {}", msg),
            CatalogError::Empty(path) => {
                write!(f, "Station file '{}' has no rows", path.display())
            }
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<CatalogError> for crate::model::ApiError {
    fn from(e: CatalogError) -> Self {
        crate::model::ApiError::Data(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// CSV row shape
// ---------------------------------------------------------------------------

/// Raw CSV row — everything as text, exactly as exported from WRIS.
/// Coordinate and depth fields are frequently messy in the source data,
/// so numeric interpretation happens after deserialization.
#[derive(Debug, Deserialize)]
struct RawStationRow {
    #[serde(default)]
    station_id: String,
    #[serde(default)]
    station_name: String,
    #[serde(default)]
    latitude: String,
    #[serde(default)]
    longitude: String,
    #[serde(default)]
    depth_m_bgl: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    district: String,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Process-wide station registry handle.
pub struct StationCatalog {
    path: PathBuf,
    records: Mutex<Option<Arc<Vec<StationRecord>>>>,
}

impl StationCatalog {
    /// Creates an unloaded catalog backed by the given CSV path. No I/O
    /// happens until `records()` is first called.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            records: Mutex::new(None),
        }
    }

    /// Creates a pre-loaded catalog from in-memory records. Test seam.
    pub fn from_records(records: Vec<StationRecord>) -> Self {
        Self {
            path: PathBuf::new(),
            records: Mutex::new(Some(Arc::new(records))),
        }
    }

    /// Returns the station records, loading the CSV on first use.
    ///
    /// A load failure is returned to the caller and does not poison the
    /// catalog: the next call attempts the load again.
    pub fn records(&self) -> Result<Arc<Vec<StationRecord>>, CatalogError> {
        let mut guard = self
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(records) = guard.as_ref() {
            return Ok(Arc::clone(records));
        }

        let loaded = Arc::new(load_station_file(&self.path)?);
        *guard = Some(Arc::clone(&loaded));
        Ok(loaded)
    }
}

/// Reads and parses the station CSV from disk.
fn load_station_file(path: &Path) -> Result<Vec<StationRecord>, CatalogError> {
    if !path.exists() {
        return Err(CatalogError::Missing(path.to_path_buf()));
    }

    let contents = std::fs::read_to_string(path).map_err(CatalogError::Read)?;
    let records = parse_station_csv(&contents)?;
    if records.is_empty() && count_data_rows(&contents) == 0 {
        return Err(CatalogError::Empty(path.to_path_buf()));
    }
    Ok(records)
}

/// Parses CSV text into station records.
///
/// Rows whose latitude or longitude do not parse as numbers are silently
/// skipped — they can never win a nearest-station search, so excluding
/// them up front is equivalent to skipping them on every scan. The depth
/// field is kept as text; it is only interpreted when a record is chosen.
pub fn parse_station_csv(contents: &str) -> Result<Vec<StationRecord>, CatalogError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(contents.as_bytes());

    let mut records = Vec::new();
    for row in reader.deserialize::<RawStationRow>() {
        let row = row.map_err(|e| CatalogError::Malformed(e.to_string()))?;

        let (Ok(latitude), Ok(longitude)) =
            (row.latitude.parse::<f64>(), row.longitude.parse::<f64>())
        else {
            continue;
        };

        records.push(StationRecord {
            station_id: row.station_id,
            station_name: row.station_name,
            latitude,
            longitude,
            depth_m_bgl: row.depth_m_bgl,
            date: row.date,
            state: row.state,
            district: row.district,
        });
    }

    Ok(records)
}

/// Counts non-empty data lines after the header, to distinguish "the file
/// is empty" from "every row had unusable coordinates".
fn count_data_rows(contents: &str) -> usize {
    contents
        .lines()
        .skip(1)
        .filter(|l| !l.trim().is_empty())
        .count()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
