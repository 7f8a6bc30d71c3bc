use api_client::{AnalyticsApi, AnalyticsClient};
use axum::{
    routing::{get, post},
    Router,
};
use configuration::{DashboardConfig, Settings, WidgetConfig};
use std::sync::Arc;
use store::CurrencyStore;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod chart;
pub mod dashboard;
pub mod detail;
pub mod error;
pub mod handlers;
pub mod render;
pub mod widget;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub store: CurrencyStore,
    pub api: Arc<dyn AnalyticsApi>,
    pub widget: WidgetConfig,
    pub dashboard: DashboardConfig,
}

impl AppState {
    /// State with an empty, never-loaded store.
    pub fn new(api: Arc<dyn AnalyticsApi>, widget: WidgetConfig, dashboard: DashboardConfig) -> Self {
        Self {
            store: CurrencyStore::new(),
            api,
            widget,
            dashboard,
        }
    }
}

/// Every page, fragment and JSON route of the dashboard.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/", get(handlers::index_page))
        .route("/currency", get(handlers::currency_page))
        .route("/fragments/symbols", get(handlers::symbols_fragment))
        .route("/fragments/cards", get(handlers::cards_fragment))
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/symbols", get(handlers::api_symbols))
        .route("/api/symbols/refresh", post(handlers::api_refresh_symbols))
        .route("/api/currency", get(handlers::api_currency))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Builds the backend client from `settings` and serves the dashboard until
/// Ctrl+C.
pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let api = AnalyticsClient::new(&settings.backend)?;
    tracing::info!(backend = %api.base_url(), "Using analytics backend.");

    let state = Arc::new(AppState::new(
        Arc::new(api),
        settings.widget.clone(),
        settings.dashboard.clone(),
    ));
    let app = build_router(state);

    let addr = settings.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Web server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Web server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler.");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
