/// Query layer: one function per route's aggregate query.
///
/// Each function takes a borrowed connection, runs a single read-only
/// query against the `measurement` or `station` table, and maps rows
/// into the static record types in `model`. No function here writes,
/// caches, or holds state between calls — the HTTP layer opens a fresh
/// connection per request and hands it in.

use chrono::{Duration, NaiveDate};
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::BTreeMap;

use crate::model::{DATE_FORMAT, PrcpReading, TemperatureSummary, TobsReading};

/// Days in the precipitation lookback window.
pub const LOOKBACK_DAYS: i64 = 365;

/// A query against the dataset failed. Point-in-time reads, so there is
/// no retry path — the HTTP layer maps this straight to a 503.
#[derive(Debug)]
pub struct QueryError(rusqlite::Error);

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Dataset query failed: {}", self.0)
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl From<rusqlite::Error> for QueryError {
    fn from(e: rusqlite::Error) -> Self {
        QueryError(e)
    }
}

// ---------------------------------------------------------------------------
// Precipitation
// ---------------------------------------------------------------------------

/// All `(date, prcp)` rows within `LOOKBACK_DAYS` days of the reference
/// date, boundary inclusive, ordered by date ascending. The rowid
/// tiebreak keeps same-date rows in insertion order so the map shaping
/// below is deterministic.
pub fn precipitation_lookback(
    conn: &Connection,
    reference_date: NaiveDate,
) -> Result<Vec<PrcpReading>, QueryError> {
    let window_start = (reference_date - Duration::days(LOOKBACK_DAYS))
        .format(DATE_FORMAT)
        .to_string();

    let mut stmt = conn.prepare(
        "SELECT date, prcp FROM measurement
         WHERE date >= ?1
         ORDER BY date ASC, rowid ASC",
    )?;

    let rows = stmt.query_map(params![window_start], |row| {
        Ok(PrcpReading {
            date: row.get(0)?,
            prcp: row.get(1)?,
        })
    })?;

    rows.collect::<Result<Vec<_>, _>>().map_err(QueryError::from)
}

/// Shapes lookback rows into the date → prcp mapping the API serves.
///
/// Duplicate dates (the dataset has several stations reporting per day)
/// collapse last-write-wins, matching the query's row order. A BTreeMap
/// keeps keys in date order since ISO date strings sort as dates.
pub fn precipitation_by_date(readings: Vec<PrcpReading>) -> BTreeMap<String, Option<f64>> {
    let mut by_date = BTreeMap::new();
    for reading in readings {
        by_date.insert(reading.date, reading.prcp);
    }
    by_date
}

// ---------------------------------------------------------------------------
// Stations
// ---------------------------------------------------------------------------

/// Distinct station identifiers from the `station` table, ordered by id.
pub fn station_ids(conn: &Connection) -> Result<Vec<String>, QueryError> {
    let mut stmt = conn.prepare("SELECT DISTINCT station FROM station ORDER BY station ASC")?;

    let rows = stmt.query_map([], |row| row.get(0))?;

    rows.collect::<Result<Vec<_>, _>>().map_err(QueryError::from)
}

/// Station with the most measurement rows, or `None` for an empty
/// measurement table. Ties break toward the lexicographically smaller
/// station id so repeated calls on the same snapshot agree.
pub fn most_active_station(conn: &Connection) -> Result<Option<String>, QueryError> {
    conn.query_row(
        "SELECT station FROM measurement
         GROUP BY station
         ORDER BY COUNT(*) DESC, station ASC
         LIMIT 1",
        [],
        |row| row.get(0),
    )
    .optional()
    .map_err(QueryError::from)
}

/// All `(date, tobs)` rows for one station, ordered by date.
///
/// Deliberately unfiltered by date: the tobs route reports the most
/// active station's full observation history, not a trailing window.
pub fn station_observations(
    conn: &Connection,
    station: &str,
) -> Result<Vec<TobsReading>, QueryError> {
    let mut stmt = conn.prepare(
        "SELECT date, tobs FROM measurement
         WHERE station = ?1
         ORDER BY date ASC, rowid ASC",
    )?;

    let rows = stmt.query_map(params![station], |row| {
        Ok(TobsReading {
            date: row.get(0)?,
            tobs: row.get(1)?,
        })
    })?;

    rows.collect::<Result<Vec<_>, _>>().map_err(QueryError::from)
}

// ---------------------------------------------------------------------------
// Temperature summary
// ---------------------------------------------------------------------------

/// Min/avg/max of `tobs` over `start <= date <= end`, both inclusive.
///
/// No check that `start <= end`; an inverted range simply matches no
/// rows and yields the all-NULL summary, same as any other empty match.
pub fn temperature_summary(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<TemperatureSummary, QueryError> {
    let start = start.format(DATE_FORMAT).to_string();
    let end = end.format(DATE_FORMAT).to_string();

    conn.query_row(
        "SELECT MIN(tobs), AVG(tobs), MAX(tobs) FROM measurement
         WHERE date >= ?1 AND date <= ?2",
        params![start, end],
        |row| {
            Ok(TemperatureSummary {
                min: row.get(0)?,
                avg: row.get(1)?,
                max: row.get(2)?,
            })
        },
    )
    .map_err(QueryError::from)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
