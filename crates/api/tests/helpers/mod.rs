#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use bytes::Bytes;
use http_body_util::BodyExt;
use tower::ServiceExt;

use tandem_doh_api::{edge_routes, worker_routes, EdgeState, WorkerState};
use tandem_doh_application::{
    DohTransport, ForwardQueryUseCase, ProbeUpstreamUseCase, ProbeWorkerUseCase, RandomSource,
    RelayQueryUseCase, UpstreamSelector, WireResponse,
};
use tandem_doh_domain::config::UpstreamConfig;
use tandem_doh_domain::RelayError;

/// What the stub transport does when invoked.
pub enum StubBehavior {
    Respond { status: u16, body: Bytes },
    /// Respond after sleeping, to make measured latency observable.
    RespondSlow {
        status: u16,
        body: Bytes,
        delay: Duration,
    },
    Fail(String),
}

/// Recording transport stub: counts calls and captures the last URL/body so
/// tests can assert on verbatim passthrough and on "no upstream call made".
pub struct StubTransport {
    behavior: StubBehavior,
    pub calls: AtomicU64,
    pub last_url: Mutex<Option<String>>,
    pub last_body: Mutex<Option<Bytes>>,
}

impl StubTransport {
    pub fn new(behavior: StubBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: AtomicU64::new(0),
            last_url: Mutex::new(None),
            last_body: Mutex::new(None),
        })
    }

    pub fn responding(status: u16, body: &'static [u8]) -> Arc<Self> {
        Self::new(StubBehavior::Respond {
            status,
            body: Bytes::from_static(body),
        })
    }

    pub fn failing(reason: &str) -> Arc<Self> {
        Self::new(StubBehavior::Fail(reason.to_string()))
    }

    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_url(&self) -> Option<String> {
        self.last_url.lock().unwrap().clone()
    }

    async fn run(&self, url: &str) -> Result<WireResponse, RelayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_url.lock().unwrap() = Some(url.to_string());
        match &self.behavior {
            StubBehavior::Respond { status, body } => Ok(WireResponse {
                status: *status,
                body: body.clone(),
            }),
            StubBehavior::RespondSlow {
                status,
                body,
                delay,
            } => {
                tokio::time::sleep(*delay).await;
                Ok(WireResponse {
                    status: *status,
                    body: body.clone(),
                })
            }
            StubBehavior::Fail(reason) => Err(RelayError::transport(url, reason)),
        }
    }
}

#[async_trait]
impl DohTransport for StubTransport {
    async fn get(&self, url: &str) -> Result<WireResponse, RelayError> {
        self.run(url).await
    }

    async fn post(&self, url: &str, body: Bytes) -> Result<WireResponse, RelayError> {
        *self.last_body.lock().unwrap() = Some(body);
        self.run(url).await
    }
}

/// Deterministic random source: always picks index 0.
pub struct FirstIndex;

impl RandomSource for FirstIndex {
    fn pick_index(&self, _len: usize) -> usize {
        0
    }
}

/// Worker-tier app over a single stub-backed upstream.
pub fn worker_app(transport: Arc<dyn DohTransport>, upstream_url: &str) -> Router {
    let upstream = UpstreamConfig {
        urls: vec![upstream_url.to_string()],
        ..Default::default()
    };
    let state = WorkerState {
        forward_query: Arc::new(ForwardQueryUseCase::new(
            transport.clone(),
            UpstreamSelector::new(Arc::new(FirstIndex)),
            upstream.clone(),
            false,
        )),
        probe_upstream: Arc::new(ProbeUpstreamUseCase::new(
            transport,
            UpstreamSelector::new(Arc::new(FirstIndex)),
            upstream,
            false,
        )),
        proxy_id: "tandem-doh-worker/test".to_string(),
    };
    worker_routes(state)
}

/// Edge-tier app forwarding to a stub-backed worker.
pub fn edge_app(transport: Arc<dyn DohTransport>, worker_base: &str) -> Router {
    let state = EdgeState {
        relay_query: Arc::new(RelayQueryUseCase::new(
            transport.clone(),
            format!("{worker_base}/dns-query"),
            false,
        )),
        probe_worker: Arc::new(ProbeWorkerUseCase::new(
            transport,
            format!("{worker_base}/healthz"),
            false,
        )),
        proxy_id: "tandem-doh-edge/test".to_string(),
    };
    edge_routes(state)
}

/// Transport that drives a real router, so the edge tier can be tested
/// end-to-end against the worker tier's actual routing and handlers.
pub struct RouterTransport {
    router: Router,
}

impl RouterTransport {
    pub fn new(router: Router) -> Arc<Self> {
        Arc::new(Self { router })
    }

    async fn dispatch(&self, request: Request<Body>) -> Result<WireResponse, RelayError> {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status().as_u16();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        Ok(WireResponse { status, body })
    }
}

#[async_trait]
impl DohTransport for RouterTransport {
    async fn get(&self, url: &str) -> Result<WireResponse, RelayError> {
        let request = Request::builder()
            .method("GET")
            .uri(path_and_query(url))
            .body(Body::empty())
            .unwrap();
        self.dispatch(request).await
    }

    async fn post(&self, url: &str, body: Bytes) -> Result<WireResponse, RelayError> {
        let request = Request::builder()
            .method("POST")
            .uri(path_and_query(url))
            .header("content-type", "application/dns-message")
            .body(Body::from(body))
            .unwrap();
        self.dispatch(request).await
    }
}

/// `https://host/path?query` → `/path?query`.
fn path_and_query(url: &str) -> String {
    let after_scheme = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    match after_scheme.find('/') {
        Some(i) => after_scheme[i..].to_string(),
        None => "/".to_string(),
    }
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}
