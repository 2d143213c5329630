use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod auth;
mod config;
mod db;
mod error;
mod handlers;
mod models;
mod report;

use auth::rate_limit::RateLimitState;
use config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
    pub rate_limiter: RateLimitState,
}

fn router(state: AppState) -> Router {
    // Auth routes with rate limiting
    let auth_routes = Router::new()
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/refresh", post(handlers::auth::refresh))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::rate_limit::rate_limit_auth,
        ));

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .merge(auth_routes);

    let protected_routes = Router::new()
        .route("/api/me", get(handlers::auth::me))
        // Daily progress
        .route("/api/progress", post(handlers::progress::upsert_progress))
        .route("/api/progress", get(handlers::progress::list_progress))
        .route(
            "/api/progress/daily",
            get(handlers::progress::get_daily_progress),
        )
        .route(
            "/api/progress/photo",
            get(handlers::progress::get_progress_photo),
        )
        // Reports
        .route(
            "/api/reports/monthly",
            get(handlers::reports::monthly_report),
        )
        .route(
            "/api/reports/weight-trend",
            get(handlers::reports::weight_trend),
        )
        // Auth actions requiring a session
        .route("/api/auth/logout", post(handlers::auth::logout))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    let allowed_origins: Vec<axum::http::HeaderValue> = {
        let mut origins = vec![state
            .config
            .frontend_url
            .parse::<axum::http::HeaderValue>()
            .expect("FRONTEND_URL must be a valid origin")];
        // In dev, also allow LAN access (e.g. testing from another device)
        if let Ok(extra) = std::env::var("CORS_EXTRA_ORIGINS") {
            for o in extra.split(',') {
                if let Ok(hv) = o.trim().parse::<axum::http::HeaderValue>() {
                    origins.push(hv);
                }
            }
        }
        origins
    };
    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fitlog_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env());

    // Database
    let db = db::create_pool(&config.database_url).await;

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations applied");

    let rate_limiter = RateLimitState::new();
    auth::rate_limit::spawn_cleanup_worker(rate_limiter.clone());

    let state = AppState {
        db,
        config: config.clone(),
        rate_limiter,
    };

    let app = router(state);

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    // Use into_make_service_with_connect_info to provide client IP for rate limiting
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::util::ServiceExt;

    fn test_state() -> AppState {
        let config = Arc::new(Config {
            database_url: "postgres://localhost/fitlog_test".into(),
            host: "127.0.0.1".into(),
            port: 0,
            frontend_url: "http://localhost:3000".into(),
            jwt_secret: "test-secret-do-not-use".into(),
            jwt_access_ttl_secs: 900,
            jwt_refresh_ttl_secs: 604_800,
        });
        // Lazy pool: no connection is made until a query runs, and these
        // tests only hit routes that never touch the database.
        let db = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .expect("lazy pool");
        AppState {
            db,
            config,
            rate_limiter: RateLimitState::new(),
        }
    }

    #[tokio::test]
    async fn health_endpoint_is_public() {
        let app = router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "fitlog-api");
    }

    #[tokio::test]
    async fn protected_routes_require_bearer_token() {
        let app = router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/reports/monthly?year=2024&month=3")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let app = router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/me")
                    .header("Authorization", "Bearer not-a-jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
