mod client;

pub use client::{ReqwestTransport, DNS_MESSAGE_CONTENT_TYPE};
