pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use axum::{
    Router,
    http::Method,
    routing::{MethodRouter, get},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use state::AppState;
use types::ApiError;

/// Unsupported verbs on a route get 405 with `Allow` and a JSON error body.
fn only(allow: &'static str, router: MethodRouter<Arc<AppState>>) -> MethodRouter<Arc<AppState>> {
    router.fallback(move |method: Method| async move { ApiError::method_not_allowed(&method, allow) })
}

/// JSON API, mounted both at the root and under `/api`.
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/zones", only("GET", get(handlers::get_zones)))
        .route(
            "/orders",
            only(
                "GET, POST",
                get(handlers::get_orders).post(handlers::create_order),
            ),
        )
        .route("/ledger", only("GET", get(handlers::get_ledger)))
        .route(
            "/webhooks/payment-provider",
            only("POST", axum::routing::post(handlers::payment_webhook)),
        )
        .route("/health", only("GET", get(handlers::health_check)))
}

fn page_routes() -> Router<Arc<AppState>> {
    use handlers::pages;

    Router::new()
        .route("/", get(pages::root))
        .route("/book", get(pages::book))
        .route("/schedule", get(pages::schedule))
        .route("/review", get(pages::review).post(pages::review_submit))
        .route("/success", get(pages::success))
        .route("/cancel", get(pages::cancel))
}

/// Complete application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(api_routes())
        .nest("/api", api_routes())
        .merge(page_routes())
        .with_state(state)
        // stateless, added after with_state
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}

/// Start HTTP Gateway server
pub async fn run_server(host: &str, port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = build_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to bind to {}: {} (port {} may already be in use)",
            addr,
            e,
            port
        )
    })?;

    tracing::info!("Gateway listening on http://{}", addr);
    tracing::info!("API Docs: http://{}/docs", addr);
    tracing::info!("Booking flow: http://{}/book", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
