use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::{header, HeaderMap, HeaderValue, StatusCode, Uri},
    response::{Html, IntoResponse, Json, Response},
};
use tracing::instrument;

use tandem_doh_application::{ForwardOutcome, QueryPayload, RelayPayload, WorkerProbe};
use tandem_doh_domain::health::utc_timestamp;
use tandem_doh_domain::{EdgeHealthReport, WorkerHealthReport};

use crate::errors::RelayFailure;
use crate::state::{EdgeState, WorkerState};

/// Content type for DNS-over-HTTPS messages (RFC 8484 §6).
pub const DNS_MESSAGE_CONTENT_TYPE: &str = "application/dns-message";

const X_DOH_UPSTREAM: &str = "x-doh-upstream";
const X_DOH_PROXY: &str = "x-doh-proxy";

pub async fn dashboard() -> Html<&'static str> {
    Html(include_str!("../../../web/static/index.html"))
}

pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "not found").into_response()
}

/// Pull the `dns` parameter out of a raw, still-encoded query string.
///
/// The standard `Query` extractor percent-decodes values, which would break
/// the verbatim-passthrough contract: the value must reach the next hop
/// byte-for-byte as the client sent it. First occurrence wins; an empty
/// value counts as missing.
fn raw_dns_param(raw_query: Option<&str>) -> Option<&str> {
    raw_query?
        .split('&')
        .find_map(|pair| pair.strip_prefix("dns="))
        .filter(|value| !value.is_empty())
}

fn missing_dns_param() -> Response {
    (
        StatusCode::BAD_REQUEST,
        "missing 'dns' query parameter (base64url DNS message)",
    )
        .into_response()
}

/// Relay the next hop's status and body byte-exact, normalizing the content
/// type and stamping the proxy identification headers.
fn relay_response(outcome: ForwardOutcome, proxy_id: &str) -> Response {
    let status = StatusCode::from_u16(outcome.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut response = (status, outcome.body).into_response();

    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(DNS_MESSAGE_CONTENT_TYPE),
    );
    if let Ok(value) = HeaderValue::from_str(&outcome.upstream_url) {
        headers.insert(X_DOH_UPSTREAM, value);
    }
    if let Ok(value) = HeaderValue::from_str(proxy_id) {
        headers.insert(X_DOH_PROXY, value);
    }
    response
}

/// Origin of the serving request.
///
/// HTTP/2 carries the authority in the request URI rather than a `Host`
/// header, so the URI is consulted first and the header is the HTTP/1.1
/// fallback. The scheme honors `X-Forwarded-Proto` when a fronting proxy
/// supplies one.
fn request_origin(uri: &Uri, headers: &HeaderMap) -> (String, String) {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .or_else(|| uri.scheme_str())
        .unwrap_or("http");
    let host = uri
        .authority()
        .map(|authority| authority.as_str())
        .or_else(|| headers.get(header::HOST).and_then(|v| v.to_str().ok()))
        .unwrap_or("localhost");
    let base = format!("{scheme}://{host}");
    let endpoint = format!("{base}/dns-query");
    (base, endpoint)
}

pub async fn worker_query_get(
    State(state): State<WorkerState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Response, RelayFailure> {
    let Some(dns) = raw_dns_param(raw_query.as_deref()) else {
        return Ok(missing_dns_param());
    };

    let outcome = state
        .forward_query
        .execute(QueryPayload::Get {
            dns: dns.to_string(),
        })
        .await?;
    Ok(relay_response(outcome, &state.proxy_id))
}

pub async fn worker_query_post(
    State(state): State<WorkerState>,
    body: Bytes,
) -> Result<Response, RelayFailure> {
    let outcome = state.forward_query.execute(QueryPayload::Post { body }).await?;
    Ok(relay_response(outcome, &state.proxy_id))
}

/// Worker health: one timed DoH lookup against one selected upstream.
///
/// Answers 200 only when the probe classified `ok`; a reachable but failing
/// upstream (`degraded`) and a transport failure (`error`) both answer 502,
/// always with the full JSON payload.
#[instrument(skip_all, name = "worker_health")]
pub async fn worker_health(
    State(state): State<WorkerState>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let probe = state.probe_upstream.execute().await;
    let (worker_base, doh_endpoint) = request_origin(&uri, &headers);
    let report = WorkerHealthReport::compose(worker_base, doh_endpoint, probe);

    let status = if report.status.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };
    (status, Json(report)).into_response()
}

pub async fn edge_query_get(
    State(state): State<EdgeState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Response, RelayFailure> {
    // Same inbound contract as the worker: reject before forwarding.
    if raw_dns_param(raw_query.as_deref()).is_none() {
        return Ok(missing_dns_param());
    }

    let outcome = state
        .relay_query
        .execute(RelayPayload::Get {
            raw_query: raw_query.unwrap_or_default(),
        })
        .await?;
    Ok(relay_response(outcome, &state.proxy_id))
}

pub async fn edge_query_post(
    State(state): State<EdgeState>,
    body: Bytes,
) -> Result<Response, RelayFailure> {
    let outcome = state.relay_query.execute(RelayPayload::Post { body }).await?;
    Ok(relay_response(outcome, &state.proxy_id))
}

/// Edge health: time the worker's health endpoint, merge its payload with
/// the edge hop's own measurement, and mirror the worker's HTTP status. A
/// worker that cannot be reached at all answers 502 with `status: "error"`.
#[instrument(skip_all, name = "edge_health")]
pub async fn edge_health(State(state): State<EdgeState>) -> Response {
    match state.probe_worker.execute().await {
        WorkerProbe::Responded {
            http_status,
            snapshot,
            edge_latency_ms,
        } => {
            let report =
                EdgeHealthReport::merge(snapshot, http_status, edge_latency_ms, utc_timestamp());
            let status = StatusCode::from_u16(http_status).unwrap_or(StatusCode::BAD_GATEWAY);
            (status, Json(report)).into_response()
        }
        WorkerProbe::Unreachable { error } => {
            let report = EdgeHealthReport::transport_failure(&error, utc_timestamp());
            (StatusCode::BAD_GATEWAY, Json(report)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_dns_param_takes_first_match_verbatim() {
        assert_eq!(
            raw_dns_param(Some("dns=AAAA%2B&ct=x&dns=BBBB")),
            Some("AAAA%2B")
        );
        assert_eq!(raw_dns_param(Some("ct=x&dns=QQ")), Some("QQ"));
    }

    #[test]
    fn test_raw_dns_param_missing_or_empty() {
        assert_eq!(raw_dns_param(None), None);
        assert_eq!(raw_dns_param(Some("")), None);
        assert_eq!(raw_dns_param(Some("ct=x")), None);
        assert_eq!(raw_dns_param(Some("dns=")), None);
        // A bare `dns` with no `=` is not a value either.
        assert_eq!(raw_dns_param(Some("dns")), None);
    }

    #[test]
    fn test_request_origin_defaults() {
        let uri = Uri::from_static("/healthz");
        let headers = HeaderMap::new();
        let (base, endpoint) = request_origin(&uri, &headers);
        assert_eq!(base, "http://localhost");
        assert_eq!(endpoint, "http://localhost/dns-query");
    }

    #[test]
    fn test_request_origin_honors_forwarded_proto() {
        let uri = Uri::from_static("/healthz");
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("doh.example.net"));
        headers.insert("x-forwarded-proto", HeaderValue::from_static("https"));
        let (base, endpoint) = request_origin(&uri, &headers);
        assert_eq!(base, "https://doh.example.net");
        assert_eq!(endpoint, "https://doh.example.net/dns-query");
    }

    #[test]
    fn test_request_origin_prefers_uri_authority() {
        // HTTP/2 requests carry the authority in the URI, with no Host
        // header at all.
        let uri = Uri::from_static("https://h2.example.net/healthz");
        let headers = HeaderMap::new();
        let (base, endpoint) = request_origin(&uri, &headers);
        assert_eq!(base, "https://h2.example.net");
        assert_eq!(endpoint, "https://h2.example.net/dns-query");

        let mut with_host = HeaderMap::new();
        with_host.insert(header::HOST, HeaderValue::from_static("stale.example.net"));
        let (base, _) = request_origin(&uri, &with_host);
        assert_eq!(base, "https://h2.example.net");
    }
}
