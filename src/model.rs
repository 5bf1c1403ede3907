/// Shared data types for the climate query service.
///
/// The backing dataset binds to these static record types directly —
/// there is no runtime schema discovery. Column order and names match
/// the `measurement` and `station` tables in the SQLite file.

use serde::{Deserialize, Serialize};

/// Date format used throughout the dataset and the HTTP API.
///
/// Dates are stored as ISO `YYYY-MM-DD` strings, which sort
/// lexicographically in calendar order. All range filters rely on this.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single daily observation row from the `measurement` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measurement {
    /// Station identifier, e.g. "USC00519281".
    pub station: String,
    /// Observation date as an ISO `YYYY-MM-DD` string.
    pub date: String,
    /// Precipitation in inches. NULL in the dataset when not recorded.
    pub prcp: Option<f64>,
    /// Temperature observation in degrees Fahrenheit.
    pub tobs: f64,
}

/// Station metadata row from the `station` table.
///
/// The table carries more columns (latitude, longitude, elevation);
/// only the fields the API serves are bound here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    /// Station identifier referenced by `Measurement::station`.
    pub station: String,
    /// Human-readable station name and location.
    pub name: String,
}

/// One `(date, prcp)` row from the precipitation lookback query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrcpReading {
    pub date: String,
    pub prcp: Option<f64>,
}

/// One `(date, tobs)` row from the most-active-station query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TobsReading {
    pub date: String,
    pub tobs: f64,
}

/// Min/avg/max aggregate over temperature observations in a date range.
///
/// All three fields are `None` when no rows matched the range. The HTTP
/// layer must still serialize a 3-element array in that case — callers
/// get `[null, null, null]`, never a shorter array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSummary {
    pub min: Option<f64>,
    pub avg: Option<f64>,
    pub max: Option<f64>,
}

impl TemperatureSummary {
    /// Serializes as the `[min, avg, max]` array the API promises.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!([self.min, self.avg, self.max])
    }

    /// True when no rows matched (all aggregates NULL).
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.avg.is_none() && self.max.is_none()
    }
}
