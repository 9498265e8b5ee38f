//! GrantFlow API Gateway
//!
//! The main entry point for all external API requests.
//! Handles:
//! - Authentication and authorization
//! - Rate limiting
//! - Request routing
//! - Observability (logging, metrics, tracing)

mod handlers;
mod middleware;

use axum::{
    extract::FromRef,
    routing::{delete, get, patch, post},
    Router,
};
use grantflow_common::{
    auth::JwtManager,
    config::AppConfig,
    db::{DbPool, Repository},
    email,
    metrics,
};
use grantflow_mentorship::{MentorDirectory, MentorshipService, NotificationService, SessionLog};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, Level};

/// Application state shared across handlers
#[derive(Clone, FromRef)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DbPool,
    pub jwt: Arc<JwtManager>,
    pub directory: MentorDirectory,
    pub mentorship: MentorshipService,
    pub sessions: SessionLog,
    pub notifications: NotificationService,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(true)
        .json()
        .init();

    info!("Starting GrantFlow API Gateway v{}", grantflow_common::VERSION);

    // Load configuration
    let config = AppConfig::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        e
    })?;

    let config = Arc::new(config);

    // Initialize metrics
    metrics::register_metrics();

    if config.observability.metrics_port > 0 {
        let metrics_addr = SocketAddr::from(([0, 0, 0, 0], config.observability.metrics_port));
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(metrics_addr)
            .install()?;
        info!("Prometheus exporter listening on {}", metrics_addr);
    }

    // Initialize database connection
    info!("Connecting to database...");
    let db = DbPool::new(&config.database).await?;

    // Wire up the domain services with explicit dependencies
    let jwt_secret = config
        .auth
        .jwt_secret
        .clone()
        .ok_or_else(|| grantflow_common::AppError::Configuration {
            message: "auth.jwt_secret is required".to_string(),
        })?;
    let jwt = Arc::new(JwtManager::new(&jwt_secret, config.auth.jwt_expiration_secs));

    let repo = Repository::new(db.clone());
    let mailer = email::create_mailer(&config.email);

    let notifications = NotificationService::new(repo.clone());
    let state = AppState {
        config: config.clone(),
        db,
        jwt,
        directory: MentorDirectory::new(repo.clone()),
        mentorship: MentorshipService::new(repo.clone(), notifications.clone(), mailer.clone()),
        sessions: SessionLog::new(repo, notifications.clone(), mailer),
        notifications,
    };

    // Build the router
    let app = create_router(state.clone());

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    // API routes
    let api_routes = Router::new()
        // Health endpoints (no auth)
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))

        // Mentor directory
        .route("/mentors", get(handlers::mentors::list_mentors))

        // Mentorship lifecycle
        .route("/mentorship/request", post(handlers::mentorship::request_mentorship))
        .route("/mentorship/match", post(handlers::mentorship::create_match))
        .route("/mentorship/matches", get(handlers::mentorship::list_matches))
        .route("/mentorship/matches/{id}/accept", post(handlers::mentorship::accept_request))
        .route("/mentorship/matches/{id}/reject", post(handlers::mentorship::reject_request))
        .route("/mentorship/matches/{id}/withdraw", post(handlers::mentorship::withdraw_request))

        // Session logging
        .route(
            "/mentorship/matches/{id}/sessions",
            post(handlers::sessions::log_session).get(handlers::sessions::list_sessions),
        )

        // Notifications
        .route("/notifications", get(handlers::notifications::list_notifications))
        .route("/notifications/{id}/read", patch(handlers::notifications::mark_read))
        .route("/notifications/read-all", patch(handlers::notifications::mark_all_read))
        .route("/notifications/{id}", delete(handlers::notifications::delete_notification));

    let mut router = Router::new().nest("/v1", api_routes);

    // Rate limiting (global token bucket)
    if state.config.rate_limit.enabled {
        let limiter = middleware::rate_limit::create_rate_limiter(
            state.config.rate_limit.requests_per_second,
            state.config.rate_limit.burst,
        );
        router = router.layer(axum::middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit::rate_limit_middleware,
        ));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(request_id)
        .layer(propagate_id)
        .with_state(state)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
