/// Test fixtures: in-memory snapshots of the climate dataset.
///
/// These mirror the real dataset's schema exactly — `measurement`
/// (station, date, prcp, tobs) and `station` (station, name, plus
/// location columns the service does not bind). Dates are ISO strings,
/// prcp is nullable, and rowid order reflects insertion order.

use rusqlite::{Connection, params};

use crate::model::{Measurement, Station};

/// Applies the dataset schema to a fresh connection.
pub(crate) fn seed_schema(conn: &Connection) {
    conn.execute_batch(
        "CREATE TABLE measurement (
            station TEXT NOT NULL,
            date TEXT NOT NULL,
            prcp REAL,
            tobs REAL NOT NULL
        );

        CREATE TABLE station (
            station TEXT NOT NULL,
            name TEXT NOT NULL,
            latitude REAL,
            longitude REAL,
            elevation REAL
        );",
    )
    .expect("fixture schema should apply");
}

/// Inserts rows in the given order, preserving rowid ordering.
pub(crate) fn seed(conn: &Connection, measurements: &[Measurement], stations: &[Station]) {
    for m in measurements {
        conn.execute(
            "INSERT INTO measurement (station, date, prcp, tobs) VALUES (?1, ?2, ?3, ?4)",
            params![m.station, m.date, m.prcp, m.tobs],
        )
        .expect("fixture measurement should insert");
    }
    for s in stations {
        conn.execute(
            "INSERT INTO station (station, name) VALUES (?1, ?2)",
            params![s.station, s.name],
        )
        .expect("fixture station should insert");
    }
}

pub(crate) fn measurement(station: &str, date: &str, prcp: Option<f64>, tobs: f64) -> Measurement {
    Measurement {
        station: station.to_string(),
        date: date.to_string(),
        prcp,
        tobs,
    }
}

pub(crate) fn station(station: &str, name: &str) -> Station {
    Station {
        station: station.to_string(),
        name: name.to_string(),
    }
}

/// An empty dataset with the right schema.
pub(crate) fn empty_dataset() -> Connection {
    let conn = Connection::open_in_memory().expect("in-memory db should open");
    seed_schema(&conn);
    conn
}

/// Representative two-station dataset.
///
/// Waikiki (USC00522222) is the most active station with four rows,
/// including a duplicate date (2017-01-02) and a row on the exact
/// 365-day lookback boundary for a 2017-08-23 reference (2016-08-23).
/// One row (2016-08-20) falls outside the lookback window.
pub(crate) fn sample_dataset() -> Connection {
    let conn = empty_dataset();
    seed(
        &conn,
        &[
            measurement("USC00522222", "2016-08-20", Some(0.3), 75.0),
            measurement("USC00522222", "2016-08-23", None, 74.0),
            measurement("USC00522222", "2017-01-01", Some(0.08), 70.0),
            measurement("USC00522222", "2017-01-02", Some(0.0), 72.0),
            measurement("USC00522222", "2017-01-02", Some(0.15), 71.0),
            measurement("USC00511111", "2017-01-01", None, 65.0),
        ],
        &[
            station("USC00522222", "WAIKIKI 717.2, HI US"),
            station("USC00511111", "UPPER WAHIAWA 874.3, HI US"),
        ],
    );
    conn
}
