//! Open-Meteo historical archive API client.
//!
//! Handles URL construction and JSON response parsing for the archive
//! endpoint:
//!   https://archive-api.open-meteo.com/v1/archive
//!
//! Two series are requested per design query, each covering one full
//! calendar year in the coordinate's local time zone:
//!   - daily `precipitation_sum` (mm/day) — drives runoff volume
//!   - hourly `precipitation` (mm/hour)  — the I in Q = C·I·A
//!
//! Every call round-trips to the archive: no retries, no caching. Call
//! volume is low and results are not reused across requests.
//! See `fixtures.rs` for annotated examples of the response structure.

use crate::model::{ApiError, GeoPoint, RainfallSample};
use serde_json::Value;

/// Default archive endpoint; overridable through service configuration.
pub const DEFAULT_ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching or parsing archive data.
#[derive(Debug, PartialEq)]
pub enum ArchiveError {
    /// Transport-level failure (connect, TLS, timeout).
    Unavailable(String),
    /// Non-success HTTP status from the archive.
    HttpStatus(u16),
    /// The body was not parseable as JSON.
    Format(String),
    /// Valid JSON, but an expected field was absent.
    Schema(String),
    /// A series element was present but neither null nor a number.
    BadValue(String),
    /// The series was present but empty (or contained only nulls).
    NoData(String),
}

impl std::fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArchiveError::Unavailable(msg) => write!(f, "Error calling Open-Meteo: {}", msg),
            ArchiveError::HttpStatus(code) => {
                write!(f, "Open-Meteo returned status {}", code)
            }
            ArchiveError::Format(msg) => {
                write!(f, "Failed to parse JSON from Open-Meteo: {}", msg)
            }
            ArchiveError::Schema(msg) => write!(f, "Missing key in Open-Meteo response: {}", msg),
            ArchiveError::BadValue(msg) => {
                write!(f, "Non-numeric value in Open-Meteo series: {}", msg)
            }
            ArchiveError::NoData(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ArchiveError {}

impl From<ArchiveError> for ApiError {
    fn from(e: ArchiveError) -> Self {
        match e {
            ArchiveError::Unavailable(_) => ApiError::Upstream(e.to_string()),
            ArchiveError::HttpStatus(code) => ApiError::UpstreamStatus(code),
            ArchiveError::Format(_) => ApiError::Data(e.to_string()),
            ArchiveError::Schema(_) => ApiError::Data(e.to_string()),
            ArchiveError::BadValue(_) => ApiError::Upstream(e.to_string()),
            ArchiveError::NoData(_) => ApiError::NotFound(e.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Builds the archive URL for the daily precipitation-sum series covering
/// the full calendar year at the given coordinate, in its local time zone.
pub fn daily_url(base_url: &str, point: GeoPoint, year: i32) -> String {
    format!(
        "{}?latitude={}&longitude={}&start_date={}-01-01&end_date={}-12-31&daily=precipitation_sum&timezone=auto",
        base_url,
        point.lat(),
        point.lon(),
        year,
        year
    )
}

/// Builds the archive URL for the hourly precipitation series covering
/// the full calendar year at the given coordinate, in its local time zone.
pub fn hourly_url(base_url: &str, point: GeoPoint, year: i32) -> String {
    format!(
        "{}?latitude={}&longitude={}&start_date={}-01-01&end_date={}-12-31&hourly=precipitation&timezone=auto",
        base_url,
        point.lat(),
        point.lon(),
        year,
        year
    )
}

// ---------------------------------------------------------------------------
// Fetching
// ---------------------------------------------------------------------------

/// Fetches the annual maximum daily rainfall (mm/day) for the year.
pub fn fetch_max_daily(
    client: &reqwest::blocking::Client,
    base_url: &str,
    point: GeoPoint,
    year: i32,
) -> Result<RainfallSample, ArchiveError> {
    let body = fetch_body(client, &daily_url(base_url, point, year))?;
    parse_daily_response(&body, year)
}

/// Fetches the annual maximum hourly rainfall (mm/hour) for the year.
pub fn fetch_max_hourly(
    client: &reqwest::blocking::Client,
    base_url: &str,
    point: GeoPoint,
    year: i32,
) -> Result<RainfallSample, ArchiveError> {
    let body = fetch_body(client, &hourly_url(base_url, point, year))?;
    parse_hourly_response(&body, year)
}

/// One round trip to the archive. The client carries the request timeout,
/// so a stalled upstream surfaces as `Unavailable`, never a hang.
fn fetch_body(
    client: &reqwest::blocking::Client,
    url: &str,
) -> Result<String, ArchiveError> {
    let response = client
        .get(url)
        .send()
        .map_err(|e| ArchiveError::Unavailable(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ArchiveError::HttpStatus(status.as_u16()));
    }

    response
        .text()
        .map_err(|e| ArchiveError::Unavailable(e.to_string()))
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses a daily-resolution archive response body.
///
/// Expected shape:
///   { "daily": { "time": [...], "precipitation_sum": [...] } }
pub fn parse_daily_response(body: &str, year: i32) -> Result<RainfallSample, ArchiveError> {
    parse_series(body, year, "daily", "precipitation_sum", "daily precipitation")
}

/// Parses an hourly-resolution archive response body.
///
/// Expected shape:
///   { "hourly": { "time": [...], "precipitation": [...] } }
pub fn parse_hourly_response(body: &str, year: i32) -> Result<RainfallSample, ArchiveError> {
    parse_series(body, year, "hourly", "precipitation", "hourly precipitation")
}

fn parse_series(
    body: &str,
    year: i32,
    block_key: &str,
    value_key: &str,
    label: &str,
) -> Result<RainfallSample, ArchiveError> {
    let root: Value =
        serde_json::from_str(body).map_err(|e| ArchiveError::Format(e.to_string()))?;

    let block = root
        .get(block_key)
        .ok_or_else(|| ArchiveError::Schema(format!("'{}'", block_key)))?;
    let values = block
        .get(value_key)
        .and_then(Value::as_array)
        .ok_or_else(|| ArchiveError::Schema(format!("'{}.{}'", block_key, value_key)))?;
    let times = block
        .get("time")
        .and_then(Value::as_array)
        .ok_or_else(|| ArchiveError::Schema(format!("'{}.time'", block_key)))?;

    if values.is_empty() {
        return Err(ArchiveError::NoData(format!(
            "No {} data returned from Open-Meteo",
            label
        )));
    }

    let (max_mm, index) = series_max(values)?.ok_or_else(|| {
        ArchiveError::NoData(format!("No {} data returned from Open-Meteo", label))
    })?;

    let at = times
        .get(index)
        .and_then(Value::as_str)
        .ok_or_else(|| ArchiveError::Schema(format!("'{}.time[{}]'", block_key, index)))?
        .to_string();

    Ok(RainfallSample { year, max_mm, at })
}

/// Finds the maximum value and its index, taking the FIRST occurrence on
/// ties. This deterministic tie-break must be preserved — test fixtures
/// and downstream consumers depend on it.
///
/// Null entries (archive data gaps) are skipped; a series of only nulls
/// yields `Ok(None)`. Any other non-numeric element is an error.
fn series_max(values: &[Value]) -> Result<Option<(f64, usize)>, ArchiveError> {
    let mut best: Option<(f64, usize)> = None;

    for (index, value) in values.iter().enumerate() {
        let number = match value {
            Value::Null => continue,
            Value::Number(n) => n.as_f64().ok_or_else(|| {
                ArchiveError::BadValue(format!("unrepresentable number at index {}", index))
            })?,
            other => {
                return Err(ArchiveError::BadValue(format!(
                    "{} at index {}",
                    other, index
                )));
            }
        };

        if best.map_or(true, |(b, _)| number > b) {
            best = Some((number, index));
        }
    }

    Ok(best)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::fixtures::*;

    fn kolkata() -> GeoPoint {
        GeoPoint::new(22.5726, 88.3639).expect("valid test point")
    }

    // --- URL construction ---------------------------------------------------

    #[test]
    fn test_daily_url_covers_full_year() {
        let url = daily_url(DEFAULT_ARCHIVE_URL, kolkata(), 2024);
        assert!(url.starts_with("https://archive-api.open-meteo.com/v1/archive?"));
        assert!(url.contains("start_date=2024-01-01"), "got: {}", url);
        assert!(url.contains("end_date=2024-12-31"), "got: {}", url);
        assert!(url.contains("daily=precipitation_sum"));
        assert!(url.contains("timezone=auto"), "must use local time zone");
    }

    #[test]
    fn test_hourly_url_requests_hourly_series() {
        let url = hourly_url(DEFAULT_ARCHIVE_URL, kolkata(), 2023);
        assert!(url.contains("hourly=precipitation"));
        assert!(!url.contains("precipitation_sum"));
        assert!(url.contains("start_date=2023-01-01"));
        assert!(url.contains("end_date=2023-12-31"));
    }

    #[test]
    fn test_urls_include_coordinates() {
        let url = daily_url(DEFAULT_ARCHIVE_URL, kolkata(), 2024);
        assert!(url.contains("latitude=22.5726"));
        assert!(url.contains("longitude=88.3639"));
    }

    // --- Parsing: happy path ------------------------------------------------

    #[test]
    fn test_parse_daily_selects_maximum_and_date() {
        let sample = parse_daily_response(fixture_daily_json(), 2024)
            .expect("valid daily fixture should parse");
        assert_eq!(sample.year, 2024);
        assert!((sample.max_mm - 94.6).abs() < 1e-9);
        assert_eq!(sample.at, "2024-07-28");
    }

    #[test]
    fn test_parse_hourly_selects_maximum_and_timestamp() {
        let sample = parse_hourly_response(fixture_hourly_json(), 2024)
            .expect("valid hourly fixture should parse");
        assert!((sample.max_mm - 38.2).abs() < 1e-9);
        assert_eq!(sample.at, "2024-07-28T15:00");
    }

    #[test]
    fn test_parse_tie_takes_first_occurrence() {
        let sample = parse_daily_response(fixture_daily_tied_maxima_json(), 2024)
            .expect("tied fixture should parse");
        // 61.0 appears on both 03-14 and 09-02; the earlier index wins.
        assert!((sample.max_mm - 61.0).abs() < 1e-9);
        assert_eq!(sample.at, "2024-03-14");
    }

    #[test]
    fn test_parse_skips_null_gaps() {
        let sample = parse_daily_response(fixture_daily_with_nulls_json(), 2024)
            .expect("nulls are data gaps, not errors");
        assert!((sample.max_mm - 12.4).abs() < 1e-9);
        assert_eq!(sample.at, "2024-01-03");
    }

    // --- Parsing: error and edge cases --------------------------------------

    #[test]
    fn test_parse_empty_series_is_no_data() {
        let result = parse_daily_response(fixture_daily_empty_series_json(), 2024);
        assert!(
            matches!(result, Err(ArchiveError::NoData(_))),
            "empty series should yield NoData, got {:?}",
            result
        );
    }

    #[test]
    fn test_parse_all_null_series_is_no_data() {
        let result = parse_daily_response(fixture_daily_all_nulls_json(), 2024);
        assert!(matches!(result, Err(ArchiveError::NoData(_))));
    }

    #[test]
    fn test_parse_missing_block_is_schema_error() {
        let result = parse_daily_response(r#"{"latitude": 22.5, "longitude": 88.3}"#, 2024);
        assert!(matches!(result, Err(ArchiveError::Schema(_))));
    }

    #[test]
    fn test_parse_missing_series_key_is_schema_error() {
        let result = parse_daily_response(fixture_daily_missing_precip_key_json(), 2024);
        assert!(matches!(result, Err(ArchiveError::Schema(_))));
    }

    #[test]
    fn test_parse_malformed_body_is_format_error() {
        let result = parse_daily_response("{ not json }}}", 2024);
        assert!(matches!(result, Err(ArchiveError::Format(_))));
        let result = parse_hourly_response("", 2024);
        assert!(matches!(result, Err(ArchiveError::Format(_))));
    }

    #[test]
    fn test_parse_non_numeric_value_is_bad_value() {
        let result = parse_daily_response(fixture_daily_non_numeric_json(), 2024);
        assert!(
            matches!(result, Err(ArchiveError::BadValue(_))),
            "a string in the series must not default to a number, got {:?}",
            result
        );
    }

    // --- Error mapping ------------------------------------------------------

    #[test]
    fn test_archive_errors_map_to_api_statuses() {
        let cases: [(ArchiveError, u16); 6] = [
            (ArchiveError::Unavailable("refused".into()), 502),
            (ArchiveError::HttpStatus(429), 429),
            (ArchiveError::Format("eof".into()), 500),
            (ArchiveError::Schema("'daily'".into()), 500),
            (ArchiveError::BadValue("\"x\" at index 0".into()), 502),
            (ArchiveError::NoData("empty".into()), 404),
        ];
        for (err, expected) in cases {
            let api: ApiError = err.into();
            assert_eq!(api.status_code(), expected);
        }
    }
}
