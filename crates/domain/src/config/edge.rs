use serde::{Deserialize, Serialize};

/// Edge tier configuration: where the worker hop lives.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EdgeConfig {
    /// Base URL of the worker relay, without a trailing path.
    #[serde(default)]
    pub worker_url: Option<String>,
}

impl EdgeConfig {
    /// Query endpoint on the worker (`{base}/dns-query`).
    pub fn worker_query_url(&self) -> Option<String> {
        self.worker_base().map(|base| format!("{base}/dns-query"))
    }

    /// Health endpoint on the worker (`{base}/healthz`).
    pub fn worker_health_url(&self) -> Option<String> {
        self.worker_base().map(|base| format!("{base}/healthz"))
    }

    fn worker_base(&self) -> Option<&str> {
        let base = self.worker_url.as_deref()?.trim().trim_end_matches('/');
        if base.is_empty() {
            None
        } else {
            Some(base)
        }
    }
}
