mod doh_transport;
mod random_source;

pub use doh_transport::{DohTransport, WireResponse};
pub use random_source::RandomSource;
