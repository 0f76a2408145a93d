use tandem_doh_application::RandomSource;

/// `fastrand`-backed random source.
///
/// Draws from the thread-local generator, so nothing is shared or locked
/// across request tasks.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSource;

impl ThreadRngSource {
    pub fn new() -> Self {
        Self
    }
}

impl RandomSource for ThreadRngSource {
    fn pick_index(&self, len: usize) -> usize {
        fastrand::usize(..len.max(1))
    }
}
