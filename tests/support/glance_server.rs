// ABOUTME: Fake Glance v2 image-data endpoint on a local TCP port.
// ABOUTME: Serves configured bytes per image id and records auth headers.

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

#[derive(Debug, Default)]
pub struct GlanceState {
    pub images: HashMap<String, Vec<u8>>,
    pub tokens: Vec<Option<String>>,
    pub request_ids: Vec<Option<String>>,
    pub project_ids: Vec<Option<String>>,
}

pub struct FakeGlance {
    pub addr: SocketAddr,
    pub state: Arc<Mutex<GlanceState>>,
}

impl FakeGlance {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(Mutex::new(GlanceState::default()));

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

        Self { addr, state }
    }

    pub fn endpoint(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn add_image(&self, id: &str, data: &[u8]) {
        self.state.lock().images.insert(id.to_string(), data.to_vec());
    }
}

async fn handle(
    state: Arc<Mutex<GlanceState>>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
    };

    let mut state = state.lock();
    state.tokens.push(header("x-auth-token"));
    state.request_ids.push(header("x-openstack-request-id"));
    state.project_ids.push(header("x-project-id"));

    let id = req
        .uri()
        .path()
        .strip_prefix("/v2/images/")
        .and_then(|rest| rest.strip_suffix("/file"))
        .unwrap_or_default();

    let response = match state.images.get(id) {
        Some(data) if data.is_empty() => Response::builder()
            .status(StatusCode::NO_CONTENT)
            .body(Full::new(Bytes::new())),
        Some(data) => Response::builder()
            .status(StatusCode::OK)
            .header("content-type", "application/octet-stream")
            .body(Full::new(Bytes::from(data.clone()))),
        None => Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Full::new(Bytes::from("image not found"))),
    };
    Ok(response.unwrap())
}

/// A server that promises `claimed` bytes, sends `sent`, then hangs up.
pub async fn start_truncating(claimed: usize, sent: &'static [u8]) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let mut buf = [0u8; 4096];
            let _ = tokio::io::AsyncReadExt::read(&mut stream, &mut buf).await;
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nContent-Type: application/octet-stream\r\n\r\n",
                claimed
            );
            let _ = stream.write_all(head.as_bytes()).await;
            let _ = stream.write_all(sent).await;
            let _ = stream.shutdown().await;
        }
    });

    addr
}
