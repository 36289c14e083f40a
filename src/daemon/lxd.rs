// ABOUTME: LXD REST client speaking HTTP/1.1 over the daemon's Unix socket.
// ABOUTME: Implements AliasOps, ImageOps and DaemonInfo against the /1.0 API.

use super::detection::detect_local;
use super::error::DaemonError;
use super::traits::{
    AliasConfig, AliasError, AliasOps, DaemonInfo, DaemonInfoError, DaemonMetadata, ImageError,
    ImageOps,
};
use super::types::DaemonConfig;
use crate::types::{ImageReference, OperationId};
use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Method, Request, StatusCode};
use hyper_util::rt::TokioIo;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::net::UnixStream;

const API_PREFIX: &str = "/1.0";
const OPERATIONS_PREFIX: &str = "/1.0/operations/";

// =============================================================================
// Wire types
// =============================================================================

/// Standard LXD response envelope.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    operation: String,
    #[serde(default)]
    error: String,
    #[serde(default)]
    metadata: serde_json::Value,
}

/// Metadata of a finished background operation.
#[derive(Debug, Deserialize)]
struct OperationStatus {
    #[serde(default)]
    status: String,
    #[serde(default)]
    status_code: u16,
    #[serde(default)]
    err: String,
}

#[derive(Debug, Default, Deserialize)]
struct ServerInfo {
    #[serde(default)]
    api_version: String,
    #[serde(default)]
    auth: String,
    #[serde(default)]
    environment: ServerEnvironment,
}

#[derive(Debug, Default, Deserialize)]
struct ServerEnvironment {
    #[serde(default)]
    server_version: String,
    #[serde(default)]
    storage: String,
}

/// Status and body of a completed HTTP exchange.
struct RawResponse {
    status: StatusCode,
    body: Bytes,
}

impl RawResponse {
    fn envelope(&self) -> Result<Envelope, String> {
        serde_json::from_slice(&self.body).map_err(|e| format!("invalid response body: {}", e))
    }

    /// Error text reported by the daemon, falling back to the HTTP status.
    fn error_message(&self) -> String {
        match self.envelope() {
            Ok(env) if !env.error.is_empty() => env.error,
            _ => format!("HTTP {}", self.status),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct TransportError(String);

// =============================================================================
// Error Mapping Helpers
// =============================================================================

fn map_alias_create_error(resp: &RawResponse, name: &str) -> AliasError {
    let message = resp.error_message();
    // Older daemons report duplicates as a generic 500 with this text
    if resp.status == StatusCode::CONFLICT || message.contains("already exists") {
        AliasError::AlreadyExists(name.to_string())
    } else {
        AliasError::Api(format!("failed to create alias {}: {}", name, message))
    }
}

fn map_upload_error(resp: &RawResponse, path: &Path) -> ImageError {
    ImageError::UploadFailed(format!("{}: {}", path.display(), resp.error_message()))
}

/// Extract the operation id from a path like `/1.0/operations/<id>`.
fn operation_id(operation: &str) -> Option<OperationId> {
    let id = operation.strip_prefix(OPERATIONS_PREFIX)?;
    if id.is_empty() || id.contains('/') {
        return None;
    }
    Some(OperationId::new(id.to_string()))
}

/// Whole seconds for `?timeout=`, rounded up. Zero would return immediately.
fn wait_timeout_secs(timeout: Duration) -> u64 {
    let secs = timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
    secs.max(1)
}

/// Alias name from a URL like `/1.0/images/aliases/<name>`.
fn alias_name(url: &str) -> String {
    let segment = url.rsplit('/').next().unwrap_or(url);
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

// =============================================================================
// LxdClient
// =============================================================================

/// LXD client over the local Unix socket.
///
/// Each request opens its own connection, so the client is cheap to share
/// across tasks.
#[derive(Debug, Clone)]
pub struct LxdClient {
    socket_path: PathBuf,
    operation_timeout: Duration,
}

impl LxdClient {
    pub fn new(socket_path: impl Into<PathBuf>, operation_timeout: Duration) -> Self {
        Self {
            socket_path: socket_path.into(),
            operation_timeout,
        }
    }

    /// Detect the socket, then ping the daemon to make sure it answers.
    pub async fn connect(config: &DaemonConfig) -> Result<Self, DaemonError> {
        let info = detect_local(Some(config))?;
        tracing::debug!(
            "Using {} LXD socket at {}",
            info.installation,
            info.socket_path.display()
        );
        let client = Self::new(info.socket_path, config.operation_timeout);
        client.ping().await?;
        Ok(client)
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    fn request(
        method: Method,
        uri: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> Result<Request<Full<Bytes>>, TransportError> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(hyper::header::HOST, "lxd");
        if let Some(content_type) = content_type {
            builder = builder.header(hyper::header::CONTENT_TYPE, content_type);
        }
        builder
            .body(Full::new(body))
            .map_err(|e| TransportError(format!("failed to build request: {}", e)))
    }

    async fn send(&self, req: Request<Full<Bytes>>) -> Result<RawResponse, TransportError> {
        let stream = UnixStream::connect(&self.socket_path).await.map_err(|e| {
            TransportError(format!(
                "failed to connect to {}: {}",
                self.socket_path.display(),
                e
            ))
        })?;

        let io = TokioIo::new(stream);

        let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
            .await
            .map_err(|e| TransportError(format!("HTTP handshake failed: {}", e)))?;

        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::warn!("LXD connection error: {}", e);
            }
        });

        let method = req.method().clone();
        let uri = req.uri().clone();
        let resp = sender
            .send_request(req)
            .await
            .map_err(|e| TransportError(format!("{} {} failed: {}", method, uri, e)))?;

        let status = resp.status();
        let body = resp
            .into_body()
            .collect()
            .await
            .map_err(|e| TransportError(format!("failed to read response: {}", e)))?
            .to_bytes();

        tracing::debug!("{} {} -> {}", method, uri, status);
        Ok(RawResponse { status, body })
    }

    async fn get(&self, uri: &str) -> Result<RawResponse, TransportError> {
        self.send(Self::request(Method::GET, uri, Bytes::new(), None)?)
            .await
    }

    /// Block until a background operation finishes, using the daemon's own timeout.
    async fn wait_operation(&self, id: &OperationId) -> Result<OperationStatus, ImageError> {
        let uri = format!(
            "{}{}/wait?timeout={}",
            OPERATIONS_PREFIX,
            id,
            wait_timeout_secs(self.operation_timeout)
        );
        let resp = self
            .get(&uri)
            .await
            .map_err(|e| ImageError::ConnectionFailed(e.to_string()))?;

        if !resp.status.is_success() {
            return Err(ImageError::UploadFailed(format!(
                "waiting for operation {}: {}",
                id,
                resp.error_message()
            )));
        }

        let envelope = resp.envelope().map_err(ImageError::Api)?;
        serde_json::from_value(envelope.metadata)
            .map_err(|e| ImageError::Api(format!("invalid operation metadata: {}", e)))
    }
}

#[async_trait]
impl DaemonInfo for LxdClient {
    async fn info(&self) -> Result<DaemonMetadata, DaemonInfoError> {
        let resp = self
            .get(API_PREFIX)
            .await
            .map_err(|e| DaemonInfoError::ConnectionFailed(e.to_string()))?;

        if !resp.status.is_success() {
            return Err(DaemonInfoError::Api(resp.error_message()));
        }

        let envelope = resp.envelope().map_err(DaemonInfoError::Api)?;
        let info: ServerInfo = serde_json::from_value(envelope.metadata)
            .map_err(|e| DaemonInfoError::Api(format!("invalid server info: {}", e)))?;

        Ok(DaemonMetadata {
            version: info.environment.server_version,
            api_version: info.api_version,
            auth: info.auth,
            storage: info.environment.storage,
        })
    }

    async fn ping(&self) -> Result<(), DaemonInfoError> {
        let resp = self
            .get(API_PREFIX)
            .await
            .map_err(|e| DaemonInfoError::ConnectionFailed(e.to_string()))?;
        if !resp.status.is_success() {
            return Err(DaemonInfoError::Api(resp.error_message()));
        }
        Ok(())
    }
}

#[async_trait]
impl AliasOps for LxdClient {
    async fn alias_list(&self) -> Result<Vec<String>, AliasError> {
        let resp = self
            .get("/1.0/images/aliases")
            .await
            .map_err(|e| AliasError::ConnectionFailed(e.to_string()))?;

        if !resp.status.is_success() {
            return Err(AliasError::Api(format!(
                "failed to list aliases: {}",
                resp.error_message()
            )));
        }

        let envelope = resp.envelope().map_err(AliasError::Api)?;
        // A fresh daemon may answer with null instead of an empty list
        let urls: Vec<String> = match envelope.metadata {
            serde_json::Value::Null => Vec::new(),
            value => serde_json::from_value(value)
                .map_err(|e| AliasError::Api(format!("invalid alias list: {}", e)))?,
        };

        Ok(urls.iter().map(|url| alias_name(url)).collect())
    }

    async fn alias_create(&self, alias: &AliasConfig) -> Result<(), AliasError> {
        let body = serde_json::to_vec(alias)
            .map_err(|e| AliasError::Api(format!("failed to encode alias: {}", e)))?;
        let req = Self::request(
            Method::POST,
            "/1.0/images/aliases",
            Bytes::from(body),
            Some("application/json"),
        )
        .map_err(|e| AliasError::Api(e.to_string()))?;

        let resp = self
            .send(req)
            .await
            .map_err(|e| AliasError::ConnectionFailed(e.to_string()))?;

        if !resp.status.is_success() {
            return Err(map_alias_create_error(&resp, &alias.name));
        }
        Ok(())
    }
}

#[async_trait]
impl ImageOps for LxdClient {
    async fn image_defined(&self, reference: &ImageReference) -> Result<bool, ImageError> {
        let uri = format!(
            "/1.0/images/{}",
            urlencoding::encode(reference.as_str())
        );
        let resp = self
            .get(&uri)
            .await
            .map_err(|e| ImageError::ConnectionFailed(e.to_string()))?;

        if resp.status.is_success() {
            Ok(true)
        } else if resp.status == StatusCode::NOT_FOUND {
            Ok(false)
        } else {
            Err(ImageError::Api(format!(
                "failed to inspect image {}: {}",
                reference,
                resp.error_message()
            )))
        }
    }

    async fn image_upload(&self, path: &Path) -> Result<(), ImageError> {
        let data = tokio::fs::read(path).await.map_err(|e| ImageError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        tracing::debug!("Uploading {} ({} bytes)", path.display(), data.len());

        let mut req = Self::request(
            Method::POST,
            "/1.0/images",
            Bytes::from(data),
            Some("application/octet-stream"),
        )
        .map_err(|e| ImageError::UploadFailed(e.to_string()))?;

        let headers = req.headers_mut();
        headers.insert("x-lxd-public", hyper::header::HeaderValue::from_static("0"));
        if let Some(file_name) = path.file_name().and_then(|n| n.to_str())
            && let Ok(value) = hyper::header::HeaderValue::from_str(file_name)
        {
            headers.insert("x-lxd-filename", value);
        }

        let resp = self
            .send(req)
            .await
            .map_err(|e| ImageError::ConnectionFailed(e.to_string()))?;

        if !resp.status.is_success() {
            return Err(map_upload_error(&resp, path));
        }

        let envelope = resp.envelope().map_err(ImageError::Api)?;
        if envelope.kind != "async" {
            return Ok(());
        }

        let id = operation_id(&envelope.operation).ok_or_else(|| {
            ImageError::Api(format!("unexpected operation path: {}", envelope.operation))
        })?;
        let outcome = self.wait_operation(&id).await?;

        if outcome.status_code != StatusCode::OK.as_u16() {
            let reason = if outcome.err.is_empty() {
                outcome.status
            } else {
                outcome.err
            };
            return Err(ImageError::UploadFailed(format!(
                "{}: {}",
                path.display(),
                reason
            )));
        }

        Ok(())
    }
}
