use axum::http::{HeaderName, Method};
use tower_http::cors::{Any, CorsLayer};

/// Headers the browser clients send alongside their function calls.
pub const ALLOWED_HEADERS: [&str; 4] = ["authorization", "x-client-info", "apikey", "content-type"];

/// CORS policy shared by every public endpoint: any origin may call.
///
/// `OPTIONS` requests are answered by the layer itself with an empty body,
/// so handlers never see preflights.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(ALLOWED_HEADERS.map(HeaderName::from_static))
}
