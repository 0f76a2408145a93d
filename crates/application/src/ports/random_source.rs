/// Source of unbiased random indices for upstream selection.
///
/// Injected rather than drawn from a global RNG so tests can substitute a
/// seeded or table-driven source; the production adapter uses `fastrand`.
pub trait RandomSource: Send + Sync {
    /// Index in `[0, len)` with uniform marginal probability.
    fn pick_index(&self, len: usize) -> usize;
}
