//! Test fixtures: representative JSON payloads from the Open-Meteo archive.
//!
//! These fixtures are structurally complete but truncated to the minimum
//! needed to exercise the parser. They reflect the real envelope returned by:
//!   https://archive-api.open-meteo.com/v1/archive?daily=precipitation_sum&...
//!
//! Archive response shape (daily variant):
//!   response.latitude / longitude / timezone — echo of the query
//!   response.daily_units — unit labels per series
//!   response.daily.time[]              — ISO dates
//!   response.daily.precipitation_sum[] — mm/day, number or null (data gap)
//!
//! The hourly variant nests under `hourly` with `precipitation` (mm/hour)
//! and minute-resolution timestamps.

/// Daily series with a clear single maximum (94.6 mm on 2024-07-28).
pub(crate) fn fixture_daily_json() -> &'static str {
    r#"{
      "latitude": 22.5,
      "longitude": 88.375,
      "timezone": "Asia/Kolkata",
      "daily_units": { "time": "iso8601", "precipitation_sum": "mm" },
      "daily": {
        "time": ["2024-07-25", "2024-07-26", "2024-07-27", "2024-07-28", "2024-07-29"],
        "precipitation_sum": [3.2, 18.7, 0.0, 94.6, 41.5]
      }
    }"#
}

/// Hourly series with its maximum (38.2 mm) at 15:00 local time.
pub(crate) fn fixture_hourly_json() -> &'static str {
    r#"{
      "latitude": 22.5,
      "longitude": 88.375,
      "timezone": "Asia/Kolkata",
      "hourly_units": { "time": "iso8601", "precipitation": "mm" },
      "hourly": {
        "time": ["2024-07-28T13:00", "2024-07-28T14:00", "2024-07-28T15:00", "2024-07-28T16:00"],
        "precipitation": [2.1, 17.8, 38.2, 9.4]
      }
    }"#
}

/// The same maximum (61.0 mm) appears twice; the earlier date must win.
pub(crate) fn fixture_daily_tied_maxima_json() -> &'static str {
    r#"{
      "latitude": 22.5,
      "longitude": 88.375,
      "timezone": "Asia/Kolkata",
      "daily_units": { "time": "iso8601", "precipitation_sum": "mm" },
      "daily": {
        "time": ["2024-03-13", "2024-03-14", "2024-06-20", "2024-09-02"],
        "precipitation_sum": [5.5, 61.0, 12.0, 61.0]
      }
    }"#
}

/// Archive data gaps are encoded as JSON null, not omitted — the parser
/// must skip them without failing.
pub(crate) fn fixture_daily_with_nulls_json() -> &'static str {
    r#"{
      "latitude": 22.5,
      "longitude": 88.375,
      "timezone": "Asia/Kolkata",
      "daily_units": { "time": "iso8601", "precipitation_sum": "mm" },
      "daily": {
        "time": ["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04"],
        "precipitation_sum": [null, 3.0, 12.4, null]
      }
    }"#
}

/// Well-formed envelope with an empty series — e.g. a year before the
/// archive's coverage begins.
pub(crate) fn fixture_daily_empty_series_json() -> &'static str {
    r#"{
      "latitude": 22.5,
      "longitude": 88.375,
      "timezone": "Asia/Kolkata",
      "daily_units": { "time": "iso8601", "precipitation_sum": "mm" },
      "daily": { "time": [], "precipitation_sum": [] }
    }"#
}

/// Every element null: timestamps exist but no usable measurement.
pub(crate) fn fixture_daily_all_nulls_json() -> &'static str {
    r#"{
      "latitude": 22.5,
      "longitude": 88.375,
      "timezone": "Asia/Kolkata",
      "daily_units": { "time": "iso8601", "precipitation_sum": "mm" },
      "daily": {
        "time": ["2024-01-01", "2024-01-02"],
        "precipitation_sum": [null, null]
      }
    }"#
}

/// The daily block exists but the precipitation series key is absent —
/// defensive against unexpected API changes.
pub(crate) fn fixture_daily_missing_precip_key_json() -> &'static str {
    r#"{
      "latitude": 22.5,
      "longitude": 88.375,
      "timezone": "Asia/Kolkata",
      "daily": { "time": ["2024-01-01", "2024-01-02"] }
    }"#
}

/// A series element that is a string rather than a number or null.
pub(crate) fn fixture_daily_non_numeric_json() -> &'static str {
    r#"{
      "latitude": 22.5,
      "longitude": 88.375,
      "timezone": "Asia/Kolkata",
      "daily": {
        "time": ["2024-01-01", "2024-01-02"],
        "precipitation_sum": [4.0, "trace"]
      }
    }"#
}
