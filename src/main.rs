//! Climate Observation API - Main Entry Point
//!
//! A long-running HTTP server exposing read-only aggregate queries over
//! a pre-populated climate dataset (daily precipitation and temperature
//! observations from Hawaii weather stations).
//!
//! Usage:
//!   cargo run --release                       # defaults + climate.toml
//!   cargo run --release -- --port 9090        # override listen port
//!   cargo run --release -- --config my.toml   # alternate config file
//!
//! Environment:
//!   DATABASE_PATH - overrides the configured SQLite dataset path

use climate_service::config::{DEFAULT_CONFIG_PATH, ServiceConfig};
use climate_service::{db, endpoint};
use std::env;

fn main() {
    println!("🌦  Climate Observation API");
    println!("===========================\n");

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut config_path = DEFAULT_CONFIG_PATH.to_string();
    let mut port_override: Option<u16> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                if i + 1 < args.len() {
                    config_path = args[i + 1].clone();
                    i += 2;
                } else {
                    eprintln!("Error: --config requires a file path");
                    std::process::exit(1);
                }
            }
            "--port" => {
                if i + 1 < args.len() {
                    port_override = args[i + 1].parse().ok();
                    if port_override.is_none() {
                        eprintln!("Error: --port requires a port number");
                        std::process::exit(1);
                    }
                    i += 2;
                } else {
                    eprintln!("Error: --port requires a port number");
                    std::process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!("Usage: {} [--config PATH] [--port PORT]", args[0]);
                std::process::exit(1);
            }
        }
    }

    // Load configuration (missing file falls back to defaults)
    let mut config = match ServiceConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\n❌ Configuration error: {}\n", e);
            std::process::exit(1);
        }
    };
    if let Some(port) = port_override {
        config.port = port;
    }

    // Validate the dataset before serving: it must exist and carry the
    // measurement and station tables.
    println!("📊 Validating dataset...");
    let db_path = db::resolve_database_path(&config);
    if let Err(e) = db::connect_and_verify(&db_path) {
        eprintln!("\n❌ Dataset validation failed: {}\n", e);
        std::process::exit(1);
    }
    println!("✓ Dataset ready at {}", db_path);
    println!(
        "  Reference date: {} ({}-day precipitation lookback)",
        config.reference_date,
        climate_service::queries::LOOKBACK_DAYS
    );
    println!("  {} request workers, one connection per request\n", config.workers);

    if let Err(e) = endpoint::start_endpoint_server(&config) {
        eprintln!("\n❌ Endpoint server error: {}\n", e);
        std::process::exit(1);
    }
}
