use axum::body::Body;
use tower_http::auth::require_authorization::Bearer;
use tower_http::validate_request::ValidateRequestHeaderLayer;

/// Bearer-token validation for the v1 API. Requests without a matching
/// `Authorization: Bearer <token>` header are rejected with 401 before
/// they reach a handler.
pub fn auth_layer(token: &str) -> ValidateRequestHeaderLayer<Bearer<Body>> {
    ValidateRequestHeaderLayer::bearer(token)
}
