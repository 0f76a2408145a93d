use std::sync::Arc;

use tandem_doh_domain::config::upstream::default_endpoints;
use tandem_doh_domain::{UpstreamEndpoint, UpstreamPool};

use crate::ports::RandomSource;

/// Uniform random upstream selection.
///
/// Stateless across picks: every call draws a fresh index from the injected
/// random source, so each endpoint keeps the same marginal probability
/// regardless of history. Used identically by the query path and the health
/// probe.
pub struct UpstreamSelector {
    random: Arc<dyn RandomSource>,
}

impl UpstreamSelector {
    pub fn new(random: Arc<dyn RandomSource>) -> Self {
        Self { random }
    }

    pub fn pick(&self, pool: &UpstreamPool) -> UpstreamEndpoint {
        if pool.is_empty() {
            // Last-resort guard; resolved pools always fall back to the
            // built-in defaults before getting here.
            return default_endpoints().remove(0);
        }
        let index = self.random.pick_index(pool.len()).min(pool.len() - 1);
        pool.endpoints()[index].clone()
    }
}
