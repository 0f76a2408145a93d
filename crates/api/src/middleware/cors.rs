use axum::{
    extract::Request,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Stamp the CORS triple onto every response and short-circuit `OPTIONS`
/// preflights with `204 No Content`.
///
/// `tower-http`'s CORS layer only emits `Allow-Methods` on preflights; the
/// contract here is that all three headers appear on every response, 404s
/// and errors included, so the headers are set by hand after the inner
/// service runs.
pub async fn cors_and_preflight(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        apply_cors(&mut response);
        return response;
    }

    let mut response = next.run(request).await;
    apply_cors(&mut response);
    response
}

fn apply_cors(response: &mut Response) {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
}
