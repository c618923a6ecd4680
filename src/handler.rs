use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_macros::debug_handler;

use std::sync::Arc;

use crate::dto::{ErrorResponse, SendEmailRequest};
use crate::service::MailService;

#[debug_handler]
pub async fn send_email(
    State(service): State<Arc<MailService>>,
    Json(payload): Json<SendEmailRequest>,
) -> Response {
    tracing::debug!("Received contact request: {:?}", payload);

    match service.send_email(payload).await {
        Ok(r) => (StatusCode::OK, Json(r)).into_response(),
        Err(e) => {
            tracing::error!("Failed to send email: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[debug_handler]
pub async fn health_check() -> Response {
    (StatusCode::OK, "Hello from contact service!").into_response()
}

#[cfg(test)]
mod tests {
    use crate::config::{Config, MailerCredentials};
    use crate::service::MailService;

    use axum::{
        Router,
        body::Body,
        http::{Method, Request, StatusCode, header},
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_config() -> Config {
        Config {
            smtp_relay: "127.0.0.1".to_string(),
            smtp_port: 1,
            allowed_origin: "http://localhost:3000".to_string(),
            port: 5000,
        }
    }

    fn app(credentials: MailerCredentials) -> Router {
        let config = test_config();
        let cors = crate::cors::cors_layer(&config.allowed_origin).unwrap();
        let service = Arc::new(MailService::new(config, credentials));
        crate::build_router(service, cors)
    }

    fn post_request(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/send-email")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn missing_credentials_return_fixed_error() {
        let app = app(MailerCredentials {
            account_email: None,
            account_password: None,
        });

        let response = app
            .oneshot(post_request(
                r#"{"email": "a@b.com", "subject": "Hi", "message": "Hello"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(
            body,
            serde_json::json!({"error": "Email credentials not configured."})
        );
    }

    #[tokio::test]
    async fn missing_credentials_ignore_request_contents() {
        let app = app(MailerCredentials {
            account_email: Some("owner@example.com".to_string()),
            account_password: None,
        });

        let response = app.oneshot(post_request("{}")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(
            body,
            serde_json::json!({"error": "Email credentials not configured."})
        );
    }

    #[tokio::test]
    async fn absent_fields_are_accepted_and_attempted() {
        let app = app(MailerCredentials {
            account_email: Some("owner@example.com".to_string()),
            account_password: Some("app-password".to_string()),
        });

        // No schema rejection: the empty payload reaches the send path and
        // fails there, as a server-side error rather than a 4xx.
        let response = app.oneshot(post_request("{}")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        let error = body["error"].as_str().unwrap();
        assert!(!error.is_empty());
    }

    #[tokio::test]
    async fn transport_failure_maps_to_json_error() {
        let app = app(MailerCredentials {
            account_email: Some("owner@example.com".to_string()),
            account_password: Some("app-password".to_string()),
        });

        let response = app
            .oneshot(post_request(
                r#"{"email": "a@b.com", "subject": "Hi", "message": "Hello"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        let error = body["error"].as_str().unwrap();
        assert!(!error.is_empty());
    }

    #[tokio::test]
    async fn health_check_responds() {
        let app = app(MailerCredentials {
            account_email: None,
            account_password: None,
        });

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn preflight_is_handled_before_routing() {
        let app = app(MailerCredentials {
            account_email: None,
            account_password: None,
        });

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/no/such/route")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "*"
        );
    }
}
