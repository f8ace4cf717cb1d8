//! Groundwater Depth + RWH Sizing Service
//!
//! A read-only HTTP API that:
//! 1. Looks up groundwater depth from the nearest CGWB/WRIS station (local CSV)
//! 2. Fetches annual rainfall maxima from the Open-Meteo archive
//! 3. Derives a rooftop rainwater harvesting design recommendation
//!
//! Usage:
//!   cargo run --release                     # Defaults (port 8001, rwh.toml if present)
//!   cargo run --release -- --port 9000      # Override listen port
//!   cargo run --release -- --config my.toml # Explicit config file
//!
//! Environment:
//!   RWH_PORT, RWH_STATIONS_FILE, RWH_ARCHIVE_URL - config overrides (.env supported)

use rwh_service::config::ServiceConfig;
use rwh_service::endpoint::{self, AppContext};
use rwh_service::logging::{self, DataSource, LogLevel};
use std::env;

fn main() {
    println!("💧 Groundwater Depth + RWH Sizing Service");
    println!("==========================================\n");

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut port_override: Option<u16> = None;
    let mut config_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" => {
                if i + 1 < args.len() {
                    port_override = args[i + 1].parse().ok();
                    i += 2;
                } else {
                    eprintln!("Error: --port requires a port number");
                    std::process::exit(1);
                }
            }
            "--config" => {
                if i + 1 < args.len() {
                    config_path = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --config requires a file path");
                    std::process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!("Usage: {} [--port PORT] [--config PATH]", args[0]);
                std::process::exit(1);
            }
        }
    }

    logging::init_logger(LogLevel::Info, None);

    let mut config = match ServiceConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\n❌ Configuration error: {}\n", e);
            std::process::exit(1);
        }
    };
    if let Some(port) = port_override {
        config.port = port;
    }

    println!("   Station file:  {}", config.stations_file);
    println!("   Archive API:   {}", config.archive_base_url);
    println!("   Timeout:       {} s", config.request_timeout_secs);
    println!("   Default year:  {}", config.default_year);
    println!();
    println!("   GET /gw-depth-india?lat=..&lon=..&max_radius_km=50");
    println!("   GET /rwh-design?rooftop_area_m2=..&rooftop_type=..&lat=..&lon=..");
    println!("   GET /health\n");

    let ctx = match AppContext::new(config) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("\n❌ Startup failed: {}\n", e);
            std::process::exit(1);
        }
    };

    // Warm the catalog so a broken dataset shows up in the startup log.
    // A failure here is per-request, not fatal: loading retries on first use.
    match ctx.catalog.records() {
        Ok(records) => logging::info(
            DataSource::Catalog,
            &format!("Loaded {} station records", records.len()),
        ),
        Err(e) => logging::warn(
            DataSource::Catalog,
            &format!("Station catalog not loaded yet: {}", e),
        ),
    }

    if let Err(e) = endpoint::start_endpoint_server(&ctx) {
        eprintln!("\n❌ Server error: {}\n", e);
        std::process::exit(1);
    }
}
