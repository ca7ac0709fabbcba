//! Static file server for the enriched atlas.
//!
//! Serves the map client and its data files out of a root directory. Large
//! artifacts (the tile archive in particular) are fetched with `Range`
//! requests, so partial content is first-class: a valid range yields a 206
//! with `Content-Range` and a range past EOF yields a 416, while malformed
//! headers fall back to the whole file. Bodies stream straight from disk,
//! so serving the archive never buffers it in memory. Every response carries
//! `Access-Control-Allow-Origin: *` so the data can be consumed from other
//! origins.

use std::ffi::OsStr;
use std::io::SeekFrom;
use std::net::SocketAddr;
use std::path::{Component, Path as StdPath, PathBuf};

use anyhow::{Context, Result};
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio::net::TcpListener;
use tokio_util::io::ReaderStream;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

#[derive(Clone)]
struct ServeState {
    root: PathBuf,
}

/// Build the router: `/` serves the index page, everything else is looked
/// up under the root directory.
pub fn router(root: PathBuf) -> Router {
    Router::new()
        .route("/", get(serve_index))
        .route("/*path", get(serve_path))
        .with_state(ServeState { root })
        .layer(TraceLayer::new_for_http())
}

/// Bind and run the server until it terminates.
pub async fn serve(root: PathBuf, listen: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(listen)
        .await
        .with_context(|| format!("failed to bind {listen}"))?;
    info!(addr = %listen, root = %root.display(), "serving atlas");
    axum::serve(listener, router(root))
        .await
        .context("server terminated")?;
    Ok(())
}

async fn serve_index(State(state): State<ServeState>, headers: HeaderMap) -> Response {
    serve_file(&state.root, "index.html", &headers).await
}

async fn serve_path(
    State(state): State<ServeState>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Response {
    serve_file(&state.root, &path, &headers).await
}

async fn serve_file(root: &StdPath, relative: &str, headers: &HeaderMap) -> Response {
    let Some(mut path) = resolve(root, relative) else {
        return not_found();
    };
    let mut meta = match tokio::fs::metadata(&path).await {
        Ok(meta) => meta,
        Err(_) => return not_found(),
    };
    if meta.is_dir() {
        path.push("index.html");
        meta = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta,
            Err(_) => return not_found(),
        };
    }
    let size = meta.len();

    let range = headers
        .get(header::RANGE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| parse_range(value, size));
    match range {
        Some(RangeOutcome::Slice { start, end }) => {
            partial_response(&path, start, end, size).await
        }
        Some(RangeOutcome::Unsatisfiable) => range_not_satisfiable(size),
        None => full_response(&path, size).await,
    }
}

/// Join a request path onto the root, admitting only normal components.
/// Anything else (parent references, absolute paths, prefixes) is treated
/// as nonexistent.
fn resolve(root: &StdPath, relative: &str) -> Option<PathBuf> {
    let mut path = root.to_path_buf();
    for component in StdPath::new(relative).components() {
        match component {
            Component::Normal(part) => path.push(part),
            _ => return None,
        }
    }
    Some(path)
}

/// What a `Range` header asks for, relative to a file of known size.
#[derive(Debug, PartialEq, Eq)]
enum RangeOutcome {
    Slice { start: u64, end: u64 },
    Unsatisfiable,
}

/// Parse a `bytes=start-end` header against the file size.
///
/// Either bound may be missing: an absent start reads from the first byte,
/// an absent end reads to the last. Ends past the file are clamped. A
/// start past the file, or behind the end, is unsatisfiable. Headers that
/// do not parse at all return `None` and the caller serves the whole file.
fn parse_range(value: &str, size: u64) -> Option<RangeOutcome> {
    let spec = value.strip_prefix("bytes=")?;
    let (start, end) = spec.split_once('-')?;
    let start: u64 = if start.is_empty() {
        0
    } else {
        start.trim().parse().ok()?
    };
    let end: u64 = if end.is_empty() {
        size.saturating_sub(1)
    } else {
        end.trim().parse().ok()?
    };
    let end = end.min(size.saturating_sub(1));
    if start >= size || start > end {
        return Some(RangeOutcome::Unsatisfiable);
    }
    Some(RangeOutcome::Slice { start, end })
}

async fn partial_response(path: &StdPath, start: u64, end: u64, size: u64) -> Response {
    let length = end - start + 1;
    let mut file = match File::open(path).await {
        Ok(file) => file,
        Err(err) => {
            error!(path = %path.display(), %err, "failed to open file");
            return internal_error();
        }
    };
    if let Err(err) = file.seek(SeekFrom::Start(start)).await {
        error!(path = %path.display(), %err, "failed to seek");
        return internal_error();
    }
    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(header::CONTENT_TYPE, content_type_for(path))
        .header(header::CONTENT_LENGTH, length)
        .header(header::CONTENT_RANGE, format!("bytes {start}-{end}/{size}"))
        .header(header::ACCEPT_RANGES, "bytes")
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .body(Body::from_stream(ReaderStream::new(file.take(length))))
        .unwrap_or_else(|_| internal_error())
}

async fn full_response(path: &StdPath, size: u64) -> Response {
    let file = match File::open(path).await {
        Ok(file) => file,
        Err(err) => {
            error!(path = %path.display(), %err, "failed to open file");
            return internal_error();
        }
    };
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for(path))
        .header(header::CONTENT_LENGTH, size)
        .header(header::ACCEPT_RANGES, "bytes")
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .body(Body::from_stream(ReaderStream::new(file)))
        .unwrap_or_else(|_| internal_error())
}

fn not_found() -> Response {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .body(Body::from("File not found"))
        .unwrap_or_else(|_| internal_error())
}

fn range_not_satisfiable(size: u64) -> Response {
    Response::builder()
        .status(StatusCode::RANGE_NOT_SATISFIABLE)
        .header(header::CONTENT_RANGE, format!("bytes */{size}"))
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .body(Body::empty())
        .unwrap_or_else(|_| internal_error())
}

fn internal_error() -> Response {
    let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response
}

fn content_type_for(path: &StdPath) -> &'static str {
    match path.extension().and_then(OsStr::to_str) {
        Some("html") => "text/html; charset=utf-8",
        Some("js") => "application/javascript",
        Some("css") => "text/css",
        Some("json") | Some("geojson") => "application/json",
        Some("png") => "image/png",
        Some("svg") => "image/svg+xml",
        Some("pmtiles") => "application/octet-stream",
        _ => "application/octet-stream",
    }
}
