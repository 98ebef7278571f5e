//! Carrier verification service
//!
//! Transport-agnostic: takes the query string and body bytes, returns a
//! status and a JSON body. [`crate::server`] wires it to hyper.
//!
//! Outcomes:
//! - bad input: 400 with `{"error": ...}`
//! - SAFER unreachable / timed out / non-2xx: 200, `found: false`, `error` set
//! - page says no such carrier: 200, `found: false`, no `error`
//! - page parsed: 200 with the full record
//! - extraction task failed: 500 with a generic message

use hyper::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::assembler::assemble;
use crate::cache::SnapshotCache;
use crate::error::{RequestError, ServiceError};
use crate::fetch::SnapshotSource;
use crate::identifiers::CarrierIds;
use crate::record::{NotFound, Verification};

/// Turns a snapshot page plus the request's MC and DOT into an outcome.
pub type Extractor = fn(&str, &str, &str) -> Verification;

/// MC/DOT as sent by clients: JSON bodies carry either strings or numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum IdInput {
    Text(String),
    Number(u64),
}

impl IdInput {
    fn into_string(self) -> String {
        match self {
            IdInput::Text(s) => s,
            IdInput::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct VerifyBody {
    #[serde(default, alias = "mcNumber", alias = "mc_number")]
    mc: Option<IdInput>,
    #[serde(default, alias = "dotNumber", alias = "dot_number", alias = "usdot")]
    dot: Option<IdInput>,
}

/// Raw identifiers pulled from the query string and body
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VerifyParams {
    pub mc: Option<String>,
    pub dot: Option<String>,
}

impl VerifyParams {
    /// Merge query parameters and an optional JSON body; a non-blank query
    /// value wins per field.
    pub fn from_request(query: Option<&str>, body: &[u8]) -> Result<Self, RequestError> {
        let mut params = VerifyParams::default();

        if let Some(query) = query {
            for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
                let value = value.trim();
                if value.is_empty() {
                    continue;
                }
                match key.as_ref() {
                    "mc" | "mcNumber" | "mc_number" => params.mc = Some(value.to_string()),
                    "dot" | "dotNumber" | "dot_number" | "usdot" => {
                        params.dot = Some(value.to_string())
                    }
                    _ => {}
                }
            }
        }

        if !body.iter().all(u8::is_ascii_whitespace) {
            let body: VerifyBody = serde_json::from_slice(body)?;
            if params.mc.is_none() {
                params.mc = body.mc.map(IdInput::into_string);
            }
            if params.dot.is_none() {
                params.dot = body.dot.map(IdInput::into_string);
            }
        }

        Ok(params)
    }

    pub fn validate(&self) -> Result<CarrierIds, RequestError> {
        CarrierIds::parse(self.mc.as_deref(), self.dot.as_deref())
    }
}

/// Status plus JSON body, ready for any transport
#[derive(Debug, Clone, PartialEq)]
pub struct VerifyResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl VerifyResponse {
    fn ok(verification: &Verification) -> Self {
        let body = serde_json::to_value(verification)
            .unwrap_or_else(|e| json!({ "error": e.to_string() }));
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }
}

pub struct VerificationService<S> {
    source: S,
    cache: SnapshotCache,
    extract: Extractor,
}

impl<S: SnapshotSource> VerificationService<S> {
    pub fn new(source: S) -> Self {
        Self::with_cache(source, SnapshotCache::default())
    }

    pub fn with_cache(source: S, cache: SnapshotCache) -> Self {
        Self {
            source,
            cache,
            extract: assemble,
        }
    }

    /// Replace the page-to-outcome step (defaults to [`assemble`]).
    pub fn with_extractor(mut self, extract: Extractor) -> Self {
        self.extract = extract;
        self
    }

    /// Full request cycle: parse, validate, verify, shape the response.
    pub async fn handle(&self, query: Option<&str>, body: &[u8]) -> VerifyResponse {
        let ids = match VerifyParams::from_request(query, body).and_then(|p| p.validate()) {
            Ok(ids) => ids,
            Err(e) => {
                warn!(error = %e, "rejected verification request");
                return VerifyResponse::error(e.status(), e.to_string());
            }
        };

        match self.verify(&ids).await {
            Ok(verification) => VerifyResponse::ok(&verification),
            Err(e) => VerifyResponse::error(e.status(), e.to_string()),
        }
    }

    /// Look up one carrier. Transport failures come back as an "unavailable"
    /// outcome, not as an error.
    pub async fn verify(&self, ids: &CarrierIds) -> Result<Verification, ServiceError> {
        let key = ids.lookup_key();

        let html = match self.cache.get(&key) {
            Some(html) => {
                debug!(lookup = %key, "snapshot served from cache");
                html
            }
            None => match self.source.fetch_snapshot(&key).await {
                Ok(html) => {
                    self.cache.insert(key.clone(), &html);
                    html
                }
                Err(e) => {
                    warn!(lookup = %key, error = %e, "SAFER fetch failed");
                    return Ok(Verification::NotFound(
                        NotFound::new(ids.mc_number(), ids.dot_number())
                            .with_error(e.to_string()),
                    ));
                }
            },
        };

        let extract = self.extract;
        let mc = ids.mc.clone().unwrap_or_default();
        let dot = ids.dot.clone().unwrap_or_default();
        let verification = tokio::task::spawn_blocking(move || extract(&html, &mc, &dot))
            .await
            .map_err(|e| {
                error!(lookup = %key, error = %e, "snapshot extraction failed");
                ServiceError::Internal(e.to_string())
            })?;

        info!(lookup = %key, found = verification.is_found(), "verification complete");
        Ok(verification)
    }
}
