use axum::{
    extract::Request,
    http::{HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::cors::CorsLayer;

// Preflights are answered before routing, for any path, with a fixed
// permissive header set.
pub async fn preflight(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return (
            StatusCode::OK,
            [
                (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
                (
                    header::ACCESS_CONTROL_ALLOW_HEADERS,
                    "Authorization, Content-Type",
                ),
                (header::ACCESS_CONTROL_ALLOW_METHODS, "POST"),
            ],
        )
            .into_response();
    }

    next.run(request).await
}

// Normal API responses are only exposed to the single configured origin.
pub fn cors_layer(
    allowed_origin: &str,
) -> Result<CorsLayer, axum::http::header::InvalidHeaderValue> {
    let origin: HeaderValue = allowed_origin.parse()?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]))
}
