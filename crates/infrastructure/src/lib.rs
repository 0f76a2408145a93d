//! Tandem DoH Infrastructure Layer
pub mod http;
pub mod random;

pub use http::{ReqwestTransport, DNS_MESSAGE_CONTENT_TYPE};
pub use random::ThreadRngSource;
