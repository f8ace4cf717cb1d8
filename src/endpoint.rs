//! HTTP endpoints for groundwater depth lookup and RWH design sizing.
//!
//! Provides a small read-only JSON API:
//! - GET /                — service index
//! - GET /health          — service health check
//! - GET /gw-depth-india  — nearest CGWB/WRIS station groundwater depth
//! - GET /rwh-design      — composite rooftop rainwater harvesting design
//!
//! Requests are handled synchronously end-to-end on the accept loop. The
//! two rainfall fetches inside /rwh-design are independent reads issued
//! sequentially; nothing downstream depends on their ordering.

use crate::catalog::StationCatalog;
use crate::config::ServiceConfig;
use crate::geo;
use crate::hydrology::{self, RoofMaterial};
use crate::ingest::open_meteo;
use crate::logging::{self, DataSource};
use crate::model::{ApiError, GeoPoint, NearestStation, RainfallSample};
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Application context
// ---------------------------------------------------------------------------

/// Everything a request handler needs, owned once per process and shared
/// by reference with every request.
pub struct AppContext {
    pub config: ServiceConfig,
    pub catalog: StationCatalog,
    pub http: reqwest::blocking::Client,
}

impl AppContext {
    /// Builds the context from configuration: the catalog handle (no I/O
    /// yet — loading is deferred to first use) and the outbound HTTP
    /// client with its bounded request timeout.
    pub fn new(config: ServiceConfig) -> Result<Self, String> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;
        let catalog = StationCatalog::new(config.stations_file.clone());

        Ok(Self {
            config,
            catalog,
            http,
        })
    }
}

// ---------------------------------------------------------------------------
// HTTP server
// ---------------------------------------------------------------------------

/// Starts the endpoint server and blocks on the accept loop.
pub fn start_endpoint_server(ctx: &AppContext) -> Result<(), String> {
    let server = tiny_http::Server::http(format!("0.0.0.0:{}", ctx.config.port))
        .map_err(|e| format!("Failed to start HTTP server: {}", e))?;

    logging::info(
        DataSource::System,
        &format!("HTTP endpoint listening on http://0.0.0.0:{}", ctx.config.port),
    );

    for request in server.incoming_requests() {
        let url = request.url().to_string();
        let (path, params) = split_url(&url);

        let (status, body) = match path {
            "/" => (200, index_body()),
            "/health" => (200, health_body()),
            "/gw-depth-india" => dispatch(&url, handle_gw_depth(ctx, &params)),
            "/rwh-design" => dispatch(&url, handle_rwh_design(ctx, &params)),
            _ => (
                404,
                json!({
                    "error": "Not found",
                    "available_endpoints": ["/", "/health", "/gw-depth-india", "/rwh-design"]
                }),
            ),
        };

        let response = json_response(status, &body, &ctx.config.allowed_origin);
        if let Err(e) = request.respond(response) {
            logging::error(DataSource::Http, &format!("Failed to send response: {}", e));
        }
    }

    Ok(())
}

/// Maps a handler result onto a status/body pair and logs the outcome.
fn dispatch(url: &str, result: Result<serde_json::Value, ApiError>) -> (u16, serde_json::Value) {
    match result {
        Ok(body) => {
            logging::info(DataSource::Http, &format!("200 {}", url));
            (200, body)
        }
        Err(e) => {
            let status = e.status_code();
            logging::warn(DataSource::Http, &format!("{} {} - {}", status, url, e));
            (status, json!({ "detail": e.to_string() }))
        }
    }
}

fn index_body() -> serde_json::Value {
    json!({
        "message": "Groundwater Depth + RWH API",
        "endpoints": [
            "/gw-depth-india (CGWB/WRIS local CSV)",
            "/rwh-design (Rooftop rainwater harvesting design helper)"
        ]
    })
}

fn health_body() -> serde_json::Value {
    json!({
        "status": "ok",
        "service": "rwh_service",
        "version": env!("CARGO_PKG_VERSION")
    })
}

/// Create HTTP response with JSON body and CORS header
fn json_response(
    status_code: u16,
    body: &serde_json::Value,
    allowed_origin: &str,
) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let text = serde_json::to_string_pretty(body).unwrap_or_else(|_| "{}".to_string());

    let mut response = tiny_http::Response::from_data(text.into_bytes())
        .with_status_code(tiny_http::StatusCode::from(status_code));

    // Header names are static and valid; from_bytes cannot fail on them.
    if let Ok(header) =
        tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
    {
        response = response.with_header(header);
    }
    if let Ok(header) = tiny_http::Header::from_bytes(
        &b"Access-Control-Allow-Origin"[..],
        allowed_origin.as_bytes(),
    ) {
        response = response.with_header(header);
    }

    response
}

// ---------------------------------------------------------------------------
// Query parameter handling
// ---------------------------------------------------------------------------

/// Splits a request URL into its path and decoded query parameters.
fn split_url(url: &str) -> (&str, HashMap<String, String>) {
    match url.split_once('?') {
        Some((path, query)) => (path, parse_query(query)),
        None => (url, HashMap::new()),
    }
}

/// Parses an `a=1&b=2` query string, percent-decoding values. Repeated
/// keys keep the last occurrence.
fn parse_query(query: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = urlencoding::decode(key).map(|k| k.into_owned());
        let value = urlencoding::decode(&value.replace('+', " ")).map(|v| v.into_owned());
        if let (Ok(key), Ok(value)) = (key, value) {
            params.insert(key, value);
        }
    }
    params
}

fn require_f64(params: &HashMap<String, String>, name: &str) -> Result<f64, ApiError> {
    let raw = params
        .get(name)
        .ok_or_else(|| ApiError::Validation(format!("Missing query parameter '{}'", name)))?;
    raw.parse()
        .map_err(|_| ApiError::Validation(format!("Parameter '{}' is not a number: '{}'", name, raw)))
}

fn require_str<'a>(
    params: &'a HashMap<String, String>,
    name: &str,
) -> Result<&'a str, ApiError> {
    params
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| ApiError::Validation(format!("Missing query parameter '{}'", name)))
}

fn optional_f64(
    params: &HashMap<String, String>,
    name: &str,
    default: f64,
) -> Result<f64, ApiError> {
    match params.get(name) {
        Some(raw) => raw.parse().map_err(|_| {
            ApiError::Validation(format!("Parameter '{}' is not a number: '{}'", name, raw))
        }),
        None => Ok(default),
    }
}

fn optional_i32(
    params: &HashMap<String, String>,
    name: &str,
    default: i32,
) -> Result<i32, ApiError> {
    match params.get(name) {
        Some(raw) => raw.parse().map_err(|_| {
            ApiError::Validation(format!("Parameter '{}' is not an integer: '{}'", name, raw))
        }),
        None => Ok(default),
    }
}

// ---------------------------------------------------------------------------
// GET /gw-depth-india
// ---------------------------------------------------------------------------

fn handle_gw_depth(
    ctx: &AppContext,
    params: &HashMap<String, String>,
) -> Result<serde_json::Value, ApiError> {
    let lat = require_f64(params, "lat")?;
    let lon = require_f64(params, "lon")?;
    let max_radius_km = optional_f64(params, "max_radius_km", ctx.config.default_max_radius_km)?;

    let nearest = lookup_groundwater(ctx, lat, lon, max_radius_km)?;
    Ok(groundwater_body(lat, lon, &nearest))
}

/// The shared groundwater lookup: validate the point, load the catalog
/// (lazily, retrying after any earlier failure), scan for the nearest
/// station.
fn lookup_groundwater(
    ctx: &AppContext,
    lat: f64,
    lon: f64,
    max_radius_km: f64,
) -> Result<NearestStation, ApiError> {
    let point = GeoPoint::new(lat, lon)?;
    let records = ctx.catalog.records().map_err(|e| {
        logging::error(DataSource::Catalog, &e.to_string());
        ApiError::from(e)
    })?;
    geo::nearest(&records, point, max_radius_km)
}

fn groundwater_body(lat: f64, lon: f64, nearest: &NearestStation) -> serde_json::Value {
    json!({
        "input_lat": lat,
        "input_lon": lon,
        "nearest_station_id": nearest.record.station_id,
        "nearest_station_name": nearest.record.station_name,
        "state": nearest.record.state,
        "district": nearest.record.district,
        "station_lat": nearest.record.latitude,
        "station_lon": nearest.record.longitude,
        "distance_km": nearest.distance_km,
        "depth_m_below_ground": nearest.depth_m,
        "date": nearest.record.date,
        "note": "Depth from CGWB/India-WRIS stations (m below ground level, bgl)"
    })
}

// ---------------------------------------------------------------------------
// GET /rwh-design
// ---------------------------------------------------------------------------

fn handle_rwh_design(
    ctx: &AppContext,
    params: &HashMap<String, String>,
) -> Result<serde_json::Value, ApiError> {
    let rooftop_area_m2 = require_f64(params, "rooftop_area_m2")?;
    // Written as a negated `>` so NaN (which fails every comparison) is
    // rejected along with zero and negative areas.
    if !(rooftop_area_m2 > 0.0) {
        return Err(ApiError::Validation(format!(
            "Parameter 'rooftop_area_m2' must be > 0, got {}",
            rooftop_area_m2
        )));
    }
    let rooftop_type = require_str(params, "rooftop_type")?;
    let lat = require_f64(params, "lat")?;
    let lon = require_f64(params, "lon")?;
    let year = optional_i32(params, "year", ctx.config.default_year)?;
    let max_radius_km = optional_f64(params, "max_radius_km", ctx.config.default_max_radius_km)?;

    let groundwater = lookup_groundwater(ctx, lat, lon, max_radius_km)?;
    let point = GeoPoint::new(lat, lon)?;

    // Two independent reads of the archive; sequential here, but nothing
    // orders them — the hydrology step joins both.
    let base = &ctx.config.archive_base_url;
    let daily = open_meteo::fetch_max_daily(&ctx.http, base, point, year).map_err(|e| {
        logging::warn(DataSource::Archive, &format!("daily fetch failed: {}", e));
        ApiError::from(e)
    })?;
    let hourly = open_meteo::fetch_max_hourly(&ctx.http, base, point, year).map_err(|e| {
        logging::warn(DataSource::Archive, &format!("hourly fetch failed: {}", e));
        ApiError::from(e)
    })?;

    let material = RoofMaterial::parse(rooftop_type);
    let calc = hydrology::runoff(rooftop_area_m2, material, daily.max_mm, hourly.max_mm);
    let design = hydrology::recommend(groundwater.depth_m, calc.runoff_volume_m3);

    Ok(json!({
        "input": {
            "rooftop_area_m2": rooftop_area_m2,
            "rooftop_type": rooftop_type,
            "latitude": lat,
            "longitude": lon,
            "year": year,
        },
        "groundwater": groundwater_body(lat, lon, &groundwater),
        "rainfall": {
            "daily": daily_body(&daily),
            "hourly": hourly_body(&hourly),
        },
        "runoff_calculation": calc,
        "design": {
            "category": design.category.description(),
            "components": design.category.components(),
            "recharge_pit_volume_m3": design.recharge_pit_volume_m3,
            "recharge_pit_dimensions_m": design.pit,
            "feasible": if design.feasible { "yes" } else { "no" },
            "note": "Runoff volume is computed using rainfall depth from max daily rainfall (mm/day), \
                     runoffDepth = C * rainfallDepth, Volume = runoffDepth * Area. \
                     Q_cia_m3_per_hr uses C I A with I from max hourly rainfall (mm/hour). \
                     Recharge pit volume is taken equal to total runoff volume when depth > 3 m bgl. \
                     Pit dimensions assume a rectangular pit with L:B = 2:1 and depth based on volume class."
        },
    }))
}

fn daily_body(sample: &RainfallSample) -> serde_json::Value {
    json!({
        "year": sample.year,
        "max_daily_precip_mm": sample.max_mm,
        "max_daily_precip_date": sample.at,
        "note": "Max daily rainfall depth from Open-Meteo archive (mm/day)"
    })
}

fn hourly_body(sample: &RainfallSample) -> serde_json::Value {
    json!({
        "year": sample.year,
        "max_hourly_precip_mm": sample.max_mm,
        "max_hourly_precip_time": sample.at,
        "note": "Max hourly rainfall intensity from Open-Meteo archive (mm/hour)"
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
