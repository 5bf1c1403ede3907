/// climate_service: read-only HTTP API over the Hawaii climate dataset.
///
/// # Module structure
///
/// ```text
/// climate_service
/// ├── model    — static record types (Measurement, Station, TemperatureSummary)
/// ├── config   — service configuration loader (climate.toml + env overrides)
/// ├── db       — read-only SQLite open/validation with descriptive errors
/// ├── queries  — one function per route's aggregate query
/// ├── endpoint — tiny_http routing, JSON serialization, help page
/// └── fixtures (test only) — in-memory dataset snapshots
/// ```
///
/// The dataset is pre-populated and external; this crate never writes to
/// it. Every HTTP request opens its own connection, so concurrent
/// requests share no state.

/// Public modules
pub mod config;
pub mod db;
pub mod endpoint;
pub mod model;
pub mod queries;

#[cfg(test)]
pub(crate) mod fixtures;
