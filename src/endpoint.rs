/// HTTP endpoint for the climate observation API
///
/// Maps the five read-only routes onto the query layer and serializes
/// results to JSON. Every data request opens its own read-only SQLite
/// connection — nothing is shared between requests, so the worker pool
/// needs no synchronization.
///
/// Routes:
/// - GET /                          - HTML help page listing routes
/// - GET /health                    - Service health check
/// - GET /api/v1.0/precipitation    - date -> prcp over the lookback window
/// - GET /api/v1.0/stations         - list of station ids
/// - GET /api/v1.0/tobs             - [date, tobs] pairs, most active station
/// - GET /api/v1.0/{start}          - [min, avg, max] from start to reference
/// - GET /api/v1.0/{start}/{end}    - [min, avg, max] over the closed range

use chrono::NaiveDate;
use rusqlite::Connection;
use std::io::Cursor;
use std::sync::Arc;
use threadpool::ThreadPool;
use tiny_http::{Method, Server};

use crate::config::ServiceConfig;
use crate::db;
use crate::model::DATE_FORMAT;
use crate::queries::{self, QueryError};

const API_PREFIX: &str = "/api/v1.0/";

type HttpResponse = tiny_http::Response<Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// Server loop
// ---------------------------------------------------------------------------

/// Bind the configured address and serve until the process is stopped.
pub fn start_endpoint_server(config: &ServiceConfig) -> Result<(), String> {
    let db_path = db::resolve_database_path(config);
    let addr = format!("{}:{}", config.bind_address, config.port);

    let server = Server::http(&addr)
        .map_err(|e| format!("Failed to start HTTP server on {}: {}", addr, e))?;

    println!("📡 HTTP endpoint listening on http://{}", addr);
    println!("   GET /                         - Help page");
    println!("   GET /api/v1.0/precipitation   - Last year of precipitation data");
    println!("   GET /api/v1.0/stations        - Station ids");
    println!("   GET /api/v1.0/tobs            - Most active station's observations");
    println!("   GET /api/v1.0/{{start}}         - [min, avg, max] temperature from start");
    println!("   GET /api/v1.0/{{start}}/{{end}}   - [min, avg, max] temperature in range\n");

    serve(
        Arc::new(server),
        config.workers,
        db_path,
        config.reference_date,
    );
    Ok(())
}

/// Run the worker pool against an already-bound server. Blocks until the
/// server is shut down. Split from `start_endpoint_server` so tests can
/// bind an ephemeral port first.
pub fn serve(server: Arc<Server>, workers: usize, db_path: String, reference_date: NaiveDate) {
    let workers = workers.max(1);
    let pool = ThreadPool::new(workers);

    for _ in 0..workers {
        let server = Arc::clone(&server);
        let db_path = db_path.clone();

        pool.execute(move || {
            for request in server.incoming_requests() {
                let response = route_request(
                    request.method(),
                    request.url(),
                    &db_path,
                    reference_date,
                );
                if let Err(e) = request.respond(response) {
                    eprintln!("Failed to send response: {}", e);
                }
            }
        });
    }

    pool.join();
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// Dispatch one request. Pure function of method + URL + dataset state,
/// which keeps the whole routing table unit-testable without sockets.
fn route_request(
    method: &Method,
    url: &str,
    db_path: &str,
    reference_date: NaiveDate,
) -> HttpResponse {
    // Flask-style routes ignore the query string entirely.
    let path = url.split('?').next().unwrap_or(url);

    if *method != Method::Get {
        return error_response(405, "Method not allowed; all endpoints are GET only");
    }

    match path {
        "/" => help_page(),
        "/health" => handle_health(),
        "/api/v1.0/precipitation" => {
            with_connection(db_path, |conn| handle_precipitation(conn, reference_date))
        }
        "/api/v1.0/stations" => with_connection(db_path, handle_stations),
        "/api/v1.0/tobs" => with_connection(db_path, handle_tobs),
        _ => match path.strip_prefix(API_PREFIX).and_then(split_range_params) {
            Some((start, end)) => handle_summary(db_path, start, end, reference_date),
            None => not_found(),
        },
    }
}

/// Splits the tail of `/api/v1.0/...` into range parameters: one path
/// segment is an open range, two are a closed range, anything else is
/// not a route.
fn split_range_params(rest: &str) -> Option<(&str, Option<&str>)> {
    if rest.is_empty() {
        return None;
    }
    let mut segments = rest.split('/');
    let start = segments.next().filter(|s| !s.is_empty())?;
    match segments.next() {
        None => Some((start, None)),
        Some(end) if !end.is_empty() && segments.next().is_none() => Some((start, Some(end))),
        _ => None,
    }
}

/// Parse a `YYYY-MM-DD` route parameter.
fn parse_route_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| format!("Invalid date '{}': expected YYYY-MM-DD", raw))
}

/// Open a per-request connection and run one handler against it. A
/// failure to open the dataset or run the query maps to 503 — the store
/// is an external dependency, not a client mistake.
fn with_connection<F>(db_path: &str, handler: F) -> HttpResponse
where
    F: FnOnce(&Connection) -> Result<serde_json::Value, QueryError>,
{
    let conn = match db::open_read_only(db_path) {
        Ok(conn) => conn,
        Err(e) => return error_response(503, &format!("Dataset unavailable: {}", e)),
    };

    match handler(&conn) {
        Ok(json) => create_response(200, json),
        Err(e) => error_response(503, &e.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn handle_health() -> HttpResponse {
    create_response(
        200,
        serde_json::json!({
            "status": "ok",
            "service": "climate_service",
            "version": env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// date -> prcp over the lookback window ending at the reference date.
fn handle_precipitation(
    conn: &Connection,
    reference_date: NaiveDate,
) -> Result<serde_json::Value, QueryError> {
    let readings = queries::precipitation_lookback(conn, reference_date)?;
    let by_date = queries::precipitation_by_date(readings);
    Ok(serde_json::json!(by_date))
}

/// Flat ordered list of station ids.
fn handle_stations(conn: &Connection) -> Result<serde_json::Value, QueryError> {
    let ids = queries::station_ids(conn)?;
    Ok(serde_json::json!(ids))
}

/// `[date, tobs]` pairs for the most active station; an empty dataset
/// yields an empty array rather than an error.
fn handle_tobs(conn: &Connection) -> Result<serde_json::Value, QueryError> {
    let readings = match queries::most_active_station(conn)? {
        Some(station) => queries::station_observations(conn, &station)?,
        None => Vec::new(),
    };

    let pairs: Vec<serde_json::Value> = readings
        .iter()
        .map(|r| serde_json::json!([r.date, r.tobs]))
        .collect();
    Ok(serde_json::Value::Array(pairs))
}

/// `[min, avg, max]` for an open or closed date range. Bad dates are the
/// caller's fault and get a 400 with the offending parameter named.
fn handle_summary(
    db_path: &str,
    start: &str,
    end: Option<&str>,
    reference_date: NaiveDate,
) -> HttpResponse {
    let start = match parse_route_date(start) {
        Ok(date) => date,
        Err(msg) => return error_response(400, &msg),
    };
    let end = match end {
        Some(raw) => match parse_route_date(raw) {
            Ok(date) => date,
            Err(msg) => return error_response(400, &msg),
        },
        None => reference_date,
    };

    with_connection(db_path, |conn| {
        let summary = queries::temperature_summary(conn, start, end)?;
        Ok(summary.to_json())
    })
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

const HELP_HTML: &str = "<html><body>\
<h3>Climate Observation API</h3>\
<p>Available routes:</p>\
<p>Last 12 months of precipitation data, keyed by date:<br>\
/api/v1.0/precipitation</p>\
<p>List of stations in the dataset:<br>\
/api/v1.0/stations</p>\
<p>Dates and temperature observations of the most active station:<br>\
/api/v1.0/tobs</p>\
<p>[min, avg, max] temperature for all dates from the start date:<br>\
/api/v1.0/&lt;start&gt;</p>\
<p>[min, avg, max] temperature for dates between start and end inclusive:<br>\
/api/v1.0/&lt;start&gt;/&lt;end&gt;</p>\
<p>Dates use the YYYY-MM-DD format.</p>\
</body></html>";

fn help_page() -> HttpResponse {
    tiny_http::Response::from_string(HELP_HTML).with_header(
        tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"text/html; charset=utf-8"[..])
            .expect("static header is valid"),
    )
}

fn not_found() -> HttpResponse {
    create_response(
        404,
        serde_json::json!({
            "error": "Not found",
            "available_endpoints": [
                "/",
                "/health",
                "/api/v1.0/precipitation",
                "/api/v1.0/stations",
                "/api/v1.0/tobs",
                "/api/v1.0/{start}",
                "/api/v1.0/{start}/{end}"
            ]
        }),
    )
}

fn error_response(status_code: u16, message: &str) -> HttpResponse {
    create_response(status_code, serde_json::json!({ "error": message }))
}

/// Create HTTP response with JSON body
fn create_response(status_code: u16, json: serde_json::Value) -> HttpResponse {
    let body = serde_json::to_string(&json).unwrap_or_else(|_| "null".to_string());

    tiny_http::Response::from_data(body.into_bytes())
        .with_status_code(tiny_http::StatusCode::from(status_code))
        .with_header(
            tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                .expect("static header is valid"),
        )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
