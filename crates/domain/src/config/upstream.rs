use serde::{Deserialize, Serialize};

/// Upstream resolver configuration for the worker tier.
///
/// `urls` (multi-value) takes priority over `url` (single value); when both
/// are empty after trimming, the built-in public resolver pool applies.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    #[serde(default)]
    pub urls: Vec<String>,

    #[serde(default)]
    pub url: Option<String>,

    /// Overall timeout for one outbound HTTP exchange, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            urls: Vec::new(),
            url: None,
            timeout: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}

/// One DoH resolver the worker can forward to. The name only shows up in
/// logs and diagnostics; the base URL is the query endpoint without the
/// `?dns=` parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamEndpoint {
    pub name: String,
    pub base_url: String,
}

impl UpstreamEndpoint {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
        }
    }
}

/// Built-in resolver pool used when no upstream is configured.
pub fn default_endpoints() -> Vec<UpstreamEndpoint> {
    vec![
        UpstreamEndpoint::new("cloudflare", "https://cloudflare-dns.com/dns-query"),
        UpstreamEndpoint::new("google", "https://dns.google/dns-query"),
        UpstreamEndpoint::new("adguard", "https://dns.adguard-dns.com/dns-query"),
    ]
}

/// Ordered, non-empty set of candidate upstreams for one request.
///
/// Resolved fresh from the immutable config wherever a pick is needed; the
/// pool itself carries no health or selection state.
#[derive(Debug, Clone)]
pub struct UpstreamPool {
    endpoints: Vec<UpstreamEndpoint>,
}

impl UpstreamPool {
    /// Resolve the candidate pool from configuration.
    ///
    /// Priority: multi-value list, then single value, then the built-in
    /// defaults. Entries are trimmed and empty segments dropped; a source
    /// that ends up empty falls through to the next one. Sources never
    /// merge.
    pub fn resolve(config: &UpstreamConfig) -> Self {
        let cleaned: Vec<&str> = config
            .urls
            .iter()
            .map(|u| u.trim())
            .filter(|u| !u.is_empty())
            .collect();

        if !cleaned.is_empty() {
            let endpoints = cleaned
                .iter()
                .enumerate()
                .map(|(i, url)| UpstreamEndpoint::new(format!("env-{}", i + 1), *url))
                .collect();
            return Self { endpoints };
        }

        if let Some(url) = config.url.as_deref() {
            let trimmed = url.trim();
            if !trimmed.is_empty() {
                return Self {
                    endpoints: vec![UpstreamEndpoint::new("env-single", trimmed)],
                };
            }
        }

        Self {
            endpoints: default_endpoints(),
        }
    }

    /// Build a pool directly from endpoints; callers own the non-empty
    /// invariant.
    pub fn from_endpoints(endpoints: Vec<UpstreamEndpoint>) -> Self {
        Self { endpoints }
    }

    pub fn endpoints(&self) -> &[UpstreamEndpoint] {
        &self.endpoints
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

/// Split a comma-separated URL list, trimming entries and dropping empties.
pub fn split_url_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}
