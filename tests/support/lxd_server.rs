// ABOUTME: Fake LXD daemon serving a subset of the /1.0 REST API on a Unix socket.
// ABOUTME: Backed by shared state so tests can seed aliases and inspect uploads.

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::UnixListener;

#[derive(Debug, Default)]
pub struct LxdState {
    pub aliases: Vec<(String, String)>,
    pub images: Vec<String>,
    /// When set, the upload operation finishes with this error.
    pub upload_error: Option<String>,
    /// When set, POST /1.0/images is rejected synchronously with 400.
    pub reject_upload: Option<String>,

    pub uploads: Vec<UploadRecord>,
    pub wait_queries: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct UploadRecord {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
    pub filename: Option<String>,
}

pub struct FakeLxd {
    pub socket_path: PathBuf,
    pub state: Arc<Mutex<LxdState>>,
    _dir: tempfile::TempDir,
}

impl FakeLxd {
    /// Bind a socket in a fresh temp dir and start serving on the current runtime.
    pub fn start() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let socket_path = dir.path().join("unix.socket");
        let listener = UnixListener::bind(&socket_path).unwrap();
        let state = Arc::new(Mutex::new(LxdState::default()));

        let shared = Arc::clone(&state);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let state = Arc::clone(&shared);
                tokio::spawn(async move {
                    let svc = service_fn(move |req| handle(Arc::clone(&state), req));
                    let _ = hyper::server::conn::http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), svc)
                        .await;
                });
            }
        });

        Self {
            socket_path,
            state,
            _dir: dir,
        }
    }

    pub fn path(&self) -> &Path {
        &self.socket_path
    }
}

fn reply(status: StatusCode, body: Value) -> Result<Response<Full<Bytes>>, Infallible> {
    Ok(Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap())
}

fn sync(metadata: Value) -> Result<Response<Full<Bytes>>, Infallible> {
    reply(
        StatusCode::OK,
        json!({"type": "sync", "status": "Success", "status_code": 200, "metadata": metadata}),
    )
}

fn error(status: StatusCode, message: &str) -> Result<Response<Full<Bytes>>, Infallible> {
    reply(
        status,
        json!({"type": "error", "error": message, "error_code": status.as_u16()}),
    )
}

async fn handle(
    state: Arc<Mutex<LxdState>>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().unwrap_or_default().to_string();
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
    };
    let content_type = header("content-type");
    let filename = header("x-lxd-filename");
    let body = req
        .into_body()
        .collect()
        .await
        .map(|b| b.to_bytes().to_vec())
        .unwrap_or_default();

    let mut state = state.lock();

    match (method, path.as_str()) {
        (Method::GET, "/1.0") => sync(json!({
            "api_version": "1.0",
            "auth": "trusted",
            "environment": {"server_version": "5.21.1", "storage": "zfs"}
        })),
        (Method::GET, "/1.0/images/aliases") => {
            let urls: Vec<String> = state
                .aliases
                .iter()
                .map(|(name, _)| format!("/1.0/images/aliases/{}", urlencoding::encode(name)))
                .collect();
            sync(json!(urls))
        }
        (Method::POST, "/1.0/images/aliases") => {
            let alias: Value = serde_json::from_slice(&body).unwrap_or_default();
            let name = alias["name"].as_str().unwrap_or_default().to_string();
            let target = alias["target"].as_str().unwrap_or_default().to_string();
            if state.aliases.iter().any(|(n, _)| *n == name) {
                return error(StatusCode::CONFLICT, "Alias already exists");
            }
            state.aliases.push((name, target));
            sync(json!({}))
        }
        (Method::POST, "/1.0/images") => {
            if let Some(message) = &state.reject_upload {
                return error(StatusCode::BAD_REQUEST, message);
            }
            state.uploads.push(UploadRecord {
                body,
                content_type,
                filename,
            });
            reply(
                StatusCode::ACCEPTED,
                json!({
                    "type": "async",
                    "status": "Operation created",
                    "status_code": 100,
                    "operation": "/1.0/operations/op-1",
                    "metadata": {"id": "op-1", "class": "task"}
                }),
            )
        }
        (Method::GET, "/1.0/operations/op-1/wait") => {
            state.wait_queries.push(query);
            match &state.upload_error {
                None => sync(json!({"id": "op-1", "status": "Success", "status_code": 200, "err": ""})),
                Some(err) => sync(json!({"id": "op-1", "status": "Failure", "status_code": 400, "err": err})),
            }
        }
        (Method::GET, p) if p.starts_with("/1.0/images/") => {
            let id = p.trim_start_matches("/1.0/images/");
            if state.images.iter().any(|i| i == id) {
                sync(json!({"fingerprint": id}))
            } else {
                error(StatusCode::NOT_FOUND, "Image not found")
            }
        }
        _ => error(StatusCode::NOT_FOUND, "not found"),
    }
}
