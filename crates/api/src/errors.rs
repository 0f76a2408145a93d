use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tandem_doh_domain::RelayError;

/// Transport failures become `502 Bad Gateway` with a plain-text body
/// naming the underlying error. Everything else on the query path is
/// relayed, not translated.
pub struct RelayFailure(pub RelayError);

impl From<RelayError> for RelayFailure {
    fn from(err: RelayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for RelayFailure {
    fn into_response(self) -> Response {
        (StatusCode::BAD_GATEWAY, format!("DoH relay error: {}", self.0)).into_response()
    }
}
