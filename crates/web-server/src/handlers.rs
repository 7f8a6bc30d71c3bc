use crate::chart::RiskExposureChart;
use crate::detail::{ensure_loaded, load_detail, DetailQuery};
use crate::error::{lookup_status, AppError};
use crate::widget::{self, WidgetEmbed};
use crate::{dashboard, render, AppState};
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
    Json,
};
use core_types::CurrencySentiment;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use store::StoreSnapshot;

/// DOM id of the market widget container on the detail page.
pub const WIDGET_CONTAINER_ID: &str = "market-widget";

#[derive(Debug, Default, Deserialize)]
pub struct SymbolFilter {
    pub symbol: Option<String>,
}

// ============================================================================
// HTML PAGE HANDLERS (HTMX)
// ============================================================================

/// # GET /
pub async fn index_page() -> impl IntoResponse {
    Html(render::dashboard_page())
}

/// # GET /fragments/symbols
/// The dashboard mount: one symbols load, then the selector and card grid.
pub async fn symbols_fragment(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<SymbolFilter>,
) -> impl IntoResponse {
    let view = dashboard::load_dashboard(&state.store, state.api.as_ref(), filter.symbol).await;
    Html(render::render_dashboard(&view))
}

/// # GET /fragments/cards
/// Re-filters the card grid from the store. Never fetches.
pub async fn cards_fragment(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<SymbolFilter>,
) -> impl IntoResponse {
    let cards = dashboard::filter_cards(&state.store.reader(), filter.symbol.as_deref()).await;
    Html(render::render_card_grid(&cards))
}

/// # GET /currency?currency=...
pub async fn currency_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DetailQuery>,
) -> Response {
    if query.currency.as_deref().is_some_and(|c| !c.is_empty()) {
        ensure_loaded(&state.store, state.api.as_ref(), state.dashboard.detail_fallback_fetch).await;
    }

    let view = match load_detail(&state.store.reader(), state.api.as_ref(), query.currency.as_deref()).await {
        Ok(view) => view,
        Err(e) => {
            return (lookup_status(&e), Html(render::error_page(&e.to_string()))).into_response();
        }
    };

    let widget_html = match WidgetEmbed::new(&view.record.currency, &state.widget) {
        Ok(embed) => embed.render(WIDGET_CONTAINER_ID),
        Err(e) => {
            tracing::warn!(currency = %view.record.currency, error = %e, "Could not configure market widget.");
            widget::empty_container(WIDGET_CONTAINER_ID)
        }
    };
    Html(render::detail_page(&view, &widget_html)).into_response()
}

// ============================================================================
// API HANDLERS (JSON)
// ============================================================================

/// # GET /api/symbols
/// The store as it currently stands.
pub async fn api_symbols(State(state): State<Arc<AppState>>) -> Json<StoreSnapshot> {
    Json(state.store.reader().snapshot().await)
}

/// # POST /api/symbols/refresh
pub async fn api_refresh_symbols(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StoreSnapshot>, AppError> {
    state.store.load(state.api.as_ref()).await?;
    Ok(Json(state.store.reader().snapshot().await))
}

#[derive(Debug, Serialize)]
pub struct CurrencyDetailResponse {
    pub record: CurrencySentiment,
    pub risk_exposure: Option<RiskExposureChart>,
}

/// # GET /api/currency?currency=...
pub async fn api_currency(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DetailQuery>,
) -> Result<Json<CurrencyDetailResponse>, AppError> {
    let view = load_detail(&state.store.reader(), state.api.as_ref(), query.currency.as_deref()).await?;
    Ok(Json(CurrencyDetailResponse {
        record: view.record,
        risk_exposure: view.exposure,
    }))
}
