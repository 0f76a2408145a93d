use thiserror::Error;

/// Errors surfaced by the relay core.
///
/// Client input problems (missing `dns` parameter, unsupported method) are
/// answered directly at the HTTP layer and never become a `RelayError`;
/// non-success upstream HTTP statuses are relayed as data, not errors. The
/// only failure the core propagates is the outbound hop not completing.
#[derive(Error, Debug, Clone)]
pub enum RelayError {
    #[error("transport error calling {url}: {reason}")]
    Transport { url: String, reason: String },
}

impl RelayError {
    pub fn transport(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Transport {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}
