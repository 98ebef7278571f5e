//! HTTP front end for the verification service
//!
//! Routes:
//! - `GET|POST /api/verify-carrier` and `GET|POST /verify-dot-mc`
//! - `GET /health`
//! - `OPTIONS *` for CORS preflight

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::fetch::SnapshotSource;
use crate::service::{VerificationService, VerifyResponse};

pub const VERIFY_PATHS: &[&str] = &["/api/verify-carrier", "/verify-dot-mc"];
pub const HEALTH_PATH: &str = "/health";

fn with_cors(mut resp: Response<Full<Bytes>>) -> Response<Full<Bytes>> {
    let headers = resp.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("GET, POST, OPTIONS"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("authorization, x-client-info, apikey, content-type"),
    );
    resp
}

fn json_response(verify: VerifyResponse) -> Response<Full<Bytes>> {
    let body = serde_json::to_vec(&verify.body).unwrap_or_default();
    let mut resp = Response::new(Full::new(Bytes::from(body)));
    *resp.status_mut() = verify.status;
    resp.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    with_cors(resp)
}

fn empty_response(status: StatusCode) -> Response<Full<Bytes>> {
    let mut resp = Response::new(Full::new(Bytes::new()));
    *resp.status_mut() = status;
    with_cors(resp)
}

/// Route one request. Never fails: every outcome is a well-formed response.
pub async fn route<S: SnapshotSource>(
    service: &VerificationService<S>,
    method: &Method,
    path: &str,
    query: Option<&str>,
    body: &[u8],
) -> Response<Full<Bytes>> {
    if *method == Method::OPTIONS {
        return empty_response(StatusCode::NO_CONTENT);
    }

    if path == HEALTH_PATH {
        return json_response(VerifyResponse {
            status: StatusCode::OK,
            body: json!({ "status": "ok" }),
        });
    }

    if !VERIFY_PATHS.contains(&path) {
        return json_response(VerifyResponse::error(StatusCode::NOT_FOUND, "Not found"));
    }

    match *method {
        Method::GET | Method::POST => json_response(service.handle(query, body).await),
        _ => json_response(VerifyResponse::error(
            StatusCode::METHOD_NOT_ALLOWED,
            "Use GET or POST",
        )),
    }
}

async fn handle_request<S: SnapshotSource>(
    service: Arc<VerificationService<S>>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(str::to_string);
    debug!(%method, %path, "request");

    let body = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            error!(error = %e, "failed to read request body");
            return Ok(json_response(VerifyResponse::error(
                StatusCode::BAD_REQUEST,
                "Could not read request body",
            )));
        }
    };

    Ok(route(&service, &method, &path, query.as_deref(), &body).await)
}

/// Accept connections until ctrl-c.
pub async fn serve<S>(addr: SocketAddr, service: VerificationService<S>) -> std::io::Result<()>
where
    S: SnapshotSource + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "carrier verification service listening");

    let service = Arc::new(service);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        let (stream, peer) = tokio::select! {
            accepted = listener.accept() => accepted?,
            _ = &mut shutdown => {
                info!("shutting down");
                return Ok(());
            }
        };

        let service = Arc::clone(&service);
        tokio::spawn(async move {
            let conn = http1::Builder::new().serve_connection(
                TokioIo::new(stream),
                service_fn(move |req| handle_request(Arc::clone(&service), req)),
            );
            if let Err(e) = conn.await {
                debug!(%peer, error = %e, "connection closed with error");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::identifiers::LookupKey;

    struct Unreachable;

    impl SnapshotSource for Unreachable {
        async fn fetch_snapshot(&self, _key: &LookupKey) -> Result<String, FetchError> {
            Err(FetchError::Transport("connection refused".to_string()))
        }
    }

    async fn body_json(resp: Response<Full<Bytes>>) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_both_paths_route_to_service() {
        let service = VerificationService::new(Unreachable);
        for path in VERIFY_PATHS {
            let resp = route(&service, &Method::GET, path, Some("dot=1234567"), b"").await;
            assert_eq!(resp.status(), StatusCode::OK);
            assert_eq!(resp.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
            assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");
            let json = body_json(resp).await;
            assert_eq!(json["found"], false);
            assert!(json["error"].as_str().is_some_and(|e| e.contains("connection refused")));
        }
    }

    #[tokio::test]
    async fn test_preflight_and_health() {
        let service = VerificationService::new(Unreachable);
        let resp = route(&service, &Method::OPTIONS, "/api/verify-carrier", None, b"").await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(resp.headers().contains_key(ACCESS_CONTROL_ALLOW_METHODS));

        let resp = route(&service, &Method::GET, HEALTH_PATH, None, b"").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_unknown_path_and_method() {
        let service = VerificationService::new(Unreachable);
        let resp = route(&service, &Method::GET, "/nope", None, b"").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = route(&service, &Method::DELETE, "/verify-dot-mc", None, b"").await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
