// ABOUTME: Glance v2 image-data client over plain HTTP/1.1.
// ABOUTME: Streams GET /v2/images/{id}/file into the destination file.

use super::{DownloadError, ImageService};
use crate::types::{ImageReference, RequestContext};
use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::header::{HeaderMap, HeaderValue};
use hyper::{Request, StatusCode, Uri};
use hyper_util::rt::TokioIo;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

/// Image service backed by the Glance v2 API.
#[derive(Debug, Clone)]
pub struct GlanceImageService {
    /// `host:port` to connect to.
    authority: String,
    /// Path prefix of the endpoint, without trailing slash.
    base_path: String,
    /// Token used when the request context carries none.
    default_token: Option<String>,
}

impl GlanceImageService {
    /// Build a client for an endpoint like `http://controller:9292`.
    pub fn new(endpoint: &str, default_token: Option<String>) -> Result<Self, DownloadError> {
        let uri: Uri = endpoint
            .parse()
            .map_err(|e| DownloadError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;

        if uri.scheme_str() != Some("http") {
            return Err(DownloadError::InvalidEndpoint(format!(
                "{}: only http:// endpoints are supported",
                endpoint
            )));
        }

        let authority = uri.authority().ok_or_else(|| {
            DownloadError::InvalidEndpoint(format!("{}: missing host", endpoint))
        })?;
        let port = authority.port_u16().unwrap_or(80);

        Ok(Self {
            authority: format!("{}:{}", authority.host(), port),
            base_path: uri.path().trim_end_matches('/').to_string(),
            default_token,
        })
    }

    fn file_path(&self, reference: &ImageReference) -> String {
        format!(
            "{}/v2/images/{}/file",
            self.base_path,
            urlencoding::encode(reference.as_str())
        )
    }
}

/// Set a header from the request context, leaving it out if empty or not a valid header value.
fn insert_context_header(headers: &mut HeaderMap, name: &'static str, value: Option<&String>) {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return;
    };
    match HeaderValue::from_str(value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(_) => tracing::warn!("Not sending {}: value is not a valid header", name),
    }
}

fn map_status_error(status: StatusCode, reference: &ImageReference, body: &[u8]) -> DownloadError {
    match status.as_u16() {
        404 => DownloadError::NotFound(reference.to_string()),
        401 | 403 => DownloadError::Unauthorized(reference.to_string()),
        code => DownloadError::Status {
            status: code,
            message: String::from_utf8_lossy(body).trim().to_string(),
        },
    }
}

#[async_trait]
impl ImageService for GlanceImageService {
    async fn download(
        &self,
        ctx: &RequestContext,
        reference: &ImageReference,
        dest: &Path,
    ) -> Result<(), DownloadError> {
        let stream = TcpStream::connect(&self.authority).await.map_err(|e| {
            DownloadError::ConnectionFailed(format!("{}: {}", self.authority, e))
        })?;

        let io = TokioIo::new(stream);

        let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
            .await
            .map_err(|e| DownloadError::ConnectionFailed(format!("HTTP handshake failed: {}", e)))?;

        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::warn!("image service connection error: {}", e);
            }
        });

        let mut req = Request::builder()
            .method("GET")
            .uri(self.file_path(reference))
            .header(hyper::header::HOST, &self.authority)
            .body(Empty::<Bytes>::new())
            .map_err(|e| DownloadError::InvalidEndpoint(format!("{}: {}", self.authority, e)))?;

        let token = ctx.auth_token.as_ref().or(self.default_token.as_ref());
        let headers = req.headers_mut();
        insert_context_header(headers, "x-openstack-request-id", Some(&ctx.request_id));
        insert_context_header(headers, "x-auth-token", token);
        insert_context_header(headers, "x-project-id", ctx.project_id.as_ref());

        let resp = sender
            .send_request(req)
            .await
            .map_err(|e| DownloadError::ConnectionFailed(format!("request failed: {}", e)))?;

        let status = resp.status();
        if status == StatusCode::NO_CONTENT {
            return Err(DownloadError::NoData(reference.to_string()));
        }
        if !status.is_success() {
            let body = resp
                .into_body()
                .collect()
                .await
                .map(|b| b.to_bytes())
                .unwrap_or_default();
            return Err(map_status_error(status, reference, &body));
        }

        let expected = resp
            .headers()
            .get(hyper::header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        let write_error = |source: std::io::Error| DownloadError::Write {
            path: dest.display().to_string(),
            source,
        };

        let mut file = tokio::fs::File::create(dest).await.map_err(write_error)?;
        let mut body = resp.into_body();
        let mut received: u64 = 0;

        while let Some(frame) = body.frame().await {
            let frame = frame.map_err(|e| {
                DownloadError::ConnectionFailed(format!("failed to read image data: {}", e))
            })?;
            if let Some(data) = frame.data_ref() {
                file.write_all(data).await.map_err(write_error)?;
                received += data.len() as u64;
            }
        }
        file.flush().await.map_err(write_error)?;

        if let Some(expected) = expected
            && expected != received
        {
            return Err(DownloadError::Truncated { expected, received });
        }

        tracing::debug!(
            "Downloaded image {} ({} bytes) to {}",
            reference,
            received,
            dest.display()
        );
        Ok(())
    }
}
