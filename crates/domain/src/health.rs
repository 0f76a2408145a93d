use serde::{Deserialize, Serialize};

/// Ternary health classification.
///
/// `ok` means the probed hop was reached and answered with a success status;
/// `degraded` means it was reached but answered with a failure status;
/// `error` means the probe never completed (transport failure).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Degraded,
    Error,
}

impl HealthStatus {
    /// Classification policy for a reachable upstream: `ok` iff the HTTP
    /// status is below 400.
    pub fn from_upstream_status(status: u16) -> Self {
        if status < 400 {
            Self::Ok
        } else {
            Self::Degraded
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Degraded => "degraded",
            Self::Error => "error",
        }
    }

    pub fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current UTC time as RFC 3339 with millisecond precision and a `Z` suffix.
pub fn utc_timestamp() -> String {
    chrono::Utc::now()
        .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Raw outcome of one synthetic DoH lookup against an upstream.
///
/// A transport failure leaves the numeric fields unset; a completed exchange
/// records the HTTP status and wall-clock latency whatever the status was.
#[derive(Debug, Clone)]
pub struct UpstreamProbe {
    pub upstream_url: String,
    pub upstream_status: Option<u16>,
    pub latency_ms: Option<u64>,
    pub error: Option<String>,
    pub checked_at: String,
}

impl UpstreamProbe {
    pub fn classify(&self) -> HealthStatus {
        if self.error.is_some() {
            return HealthStatus::Error;
        }
        match self.upstream_status {
            Some(status) => HealthStatus::from_upstream_status(status),
            None => HealthStatus::Error,
        }
    }
}

/// Health payload published by the worker tier.
///
/// Numeric fields serialize as explicit `null` when the probe failed, so
/// consumers always see the full schema.
#[derive(Debug, Clone, Serialize)]
pub struct WorkerHealthReport {
    pub status: HealthStatus,
    pub worker_base: String,
    pub doh_endpoint: String,
    pub upstream_url: String,
    pub upstream_status: Option<u16>,
    pub latency_ms: Option<u64>,
    /// Same value as `latency_ms`, kept under its older name.
    pub upstream_latency_ms: Option<u64>,
    pub message: String,
    pub checked_at: String,
}

impl WorkerHealthReport {
    pub fn compose(worker_base: String, doh_endpoint: String, probe: UpstreamProbe) -> Self {
        let status = probe.classify();
        let message = match status {
            HealthStatus::Ok => format!(
                "upstream answered HTTP {} in {} ms",
                probe.upstream_status.unwrap_or_default(),
                probe.latency_ms.unwrap_or_default()
            ),
            HealthStatus::Degraded => format!(
                "upstream returned HTTP {}",
                probe.upstream_status.unwrap_or_default()
            ),
            HealthStatus::Error => format!(
                "health probe failed: {}",
                probe.error.as_deref().unwrap_or("no response")
            ),
        };

        Self {
            status,
            worker_base,
            doh_endpoint,
            upstream_url: probe.upstream_url,
            upstream_status: probe.upstream_status,
            latency_ms: probe.latency_ms,
            upstream_latency_ms: probe.latency_ms,
            message,
            checked_at: probe.checked_at,
        }
    }
}

/// Lenient mirror of the worker health payload as seen by the edge.
///
/// Every field is optional; a worker payload that fails to parse at all is
/// replaced by `Self::default()` so the edge never fails its own health
/// check over a malformed body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkerHealthSnapshot {
    pub status: Option<String>,
    pub worker_base: Option<String>,
    pub doh_endpoint: Option<String>,
    pub upstream_url: Option<String>,
    pub upstream_status: Option<u16>,
    pub latency_ms: Option<u64>,
    pub upstream_latency_ms: Option<u64>,
    pub message: Option<String>,
    pub checked_at: Option<String>,
}

/// Health payload published by the edge tier: the worker's fields merged
/// with the edge hop's own measurement.
#[derive(Debug, Clone, Serialize)]
pub struct EdgeHealthReport {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_base: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doh_endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_url: Option<String>,
    pub upstream_status: Option<u16>,
    pub latency_ms: Option<u64>,
    pub upstream_latency_ms: Option<u64>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked_at: Option<String>,
    pub edge_latency_ms: Option<u64>,
    /// Historical field name; existing dashboards read the edge timestamp
    /// from here.
    pub arvan_checked_at: String,
}

impl EdgeHealthReport {
    /// Merge the worker's (possibly partial) payload with the edge hop
    /// measurement, field by field.
    ///
    /// `status` and `message` fall back to values derived from the worker's
    /// HTTP status when the snapshot lacks them; everything else passes
    /// through as-is.
    pub fn merge(
        snapshot: WorkerHealthSnapshot,
        worker_http_status: u16,
        edge_latency_ms: u64,
        checked_at: String,
    ) -> Self {
        let fallback = HealthStatus::from_upstream_status(worker_http_status);
        let status = snapshot
            .status
            .unwrap_or_else(|| fallback.as_str().to_string());
        let message = snapshot.message.unwrap_or_else(|| match fallback {
            HealthStatus::Ok => "worker health check succeeded".to_string(),
            _ => format!("worker health endpoint returned HTTP {worker_http_status}"),
        });

        Self {
            status,
            worker_base: snapshot.worker_base,
            doh_endpoint: snapshot.doh_endpoint,
            upstream_url: snapshot.upstream_url,
            upstream_status: snapshot.upstream_status,
            latency_ms: snapshot.latency_ms,
            upstream_latency_ms: snapshot.upstream_latency_ms,
            message,
            checked_at: snapshot.checked_at,
            edge_latency_ms: Some(edge_latency_ms),
            arvan_checked_at: checked_at,
        }
    }

    /// Report for a worker that could not be reached at all.
    pub fn transport_failure(error: &str, checked_at: String) -> Self {
        Self {
            status: HealthStatus::Error.as_str().to_string(),
            worker_base: None,
            doh_endpoint: None,
            upstream_url: None,
            upstream_status: None,
            latency_ms: None,
            upstream_latency_ms: None,
            message: format!("worker health check failed: {error}"),
            checked_at: None,
            edge_latency_ms: None,
            arvan_checked_at: checked_at,
        }
    }
}
