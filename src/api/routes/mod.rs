pub mod health;

use axum::http::{header, HeaderValue, Method};
use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::middleware::{request_logger, security_headers};
use crate::api::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = build_cors(state.config.cors.frontend_origin.as_deref());

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // API routes, not yet implemented:
        // .nest("/api/users", users::router())
        // .nest("/api/products", products::router())
        // .nest("/api/orders", orders::router())
        // .nest("/api/wallet", wallet::router())
        // .nest("/api/subscriptions", subscriptions::router())
        .layer(axum::middleware::from_fn(request_logger))
        .layer(axum::middleware::from_fn(security_headers))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn build_cors(frontend_origin: Option<&str>) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    match frontend_origin {
        None | Some("*") => cors.allow_origin(Any),
        Some(origin) => match origin.parse::<HeaderValue>() {
            Ok(value) => cors.allow_origin(value),
            Err(_) => {
                tracing::warn!(origin, "FRONTEND_URL is not a valid origin, allowing any");
                cors.allow_origin(Any)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::infrastructure::{Config, CorsConfig, Database, DatabaseConfig, ServerConfig};

    // The pool is lazy, so a router over a dead database config still serves
    // everything that does not touch a connection.
    fn test_router_with_origin(frontend_origin: Option<&str>) -> Router {
        let database = DatabaseConfig {
            host: "localhost".into(),
            port: 1,
            name: "kitchen4u".into(),
            user: "api".into(),
            password: "secret".into(),
        };
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 0,
            },
            database: database.clone(),
            cors: CorsConfig {
                frontend_origin: frontend_origin.map(String::from),
            },
        };
        let db = Database::connect(&database);
        create_router(AppState::new(db, config))
    }

    fn test_router() -> Router {
        test_router_with_origin(None)
    }

    async fn allow_origin_for(frontend_origin: Option<&str>) -> Option<String> {
        let response = test_router_with_origin(frontend_origin)
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(header::ORIGIN, "https://app.kitchen4u.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|value| value.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_health_endpoint_returns_ok() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_security_headers_applied() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
        assert_eq!(headers[header::REFERRER_POLICY], "no-referrer");
    }

    #[tokio::test]
    async fn test_readiness_without_database_is_503() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/ready")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_cors_unset_origin_allows_any() {
        assert_eq!(allow_origin_for(None).await.as_deref(), Some("*"));
    }

    #[tokio::test]
    async fn test_cors_wildcard_origin_allows_any() {
        assert_eq!(allow_origin_for(Some("*")).await.as_deref(), Some("*"));
    }

    #[tokio::test]
    async fn test_cors_configured_origin_is_echoed() {
        assert_eq!(
            allow_origin_for(Some("https://app.kitchen4u.example"))
                .await
                .as_deref(),
            Some("https://app.kitchen4u.example")
        );
    }

    #[tokio::test]
    async fn test_cors_unparsable_origin_falls_back_to_any() {
        assert_eq!(
            allow_origin_for(Some("https://bad\norigin")).await.as_deref(),
            Some("*")
        );
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/api/users")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
