//! The symbols list view: one card per currency plus a selector.

use api_client::AnalyticsApi;
use core_types::format::to_fixed;
use core_types::{BadgeVariant, CurrencySentiment};
use store::{CommitOutcome, CurrencyStore, CurrencyStoreReader};

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolCard {
    pub currency: String,
    pub badge_label: String,
    pub badge_variant: BadgeVariant,
    /// `daily_low` with four decimals.
    pub headline: String,
    pub detail_href: String,
}

impl SymbolCard {
    pub fn from_record(record: &CurrencySentiment) -> Self {
        Self {
            currency: record.currency.clone(),
            badge_label: record.sentiment.to_uppercase(),
            badge_variant: BadgeVariant::for_summary(&record.sentiment),
            headline: to_fixed(record.daily_low, 4),
            detail_href: detail_href(&record.currency),
        }
    }
}

/// Link to the detail page of `currency`, with the identifier query-encoded.
pub fn detail_href(currency: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(currency.as_bytes()).collect();
    format!("/currency?currency={}", encoded)
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView {
    /// Shown from mount until the load settles.
    Loading,
    Loaded {
        /// Every identifier in store order, for the selector.
        options: Vec<String>,
        selected: Option<String>,
        cards: Vec<SymbolCard>,
    },
    /// Terminal for this mount. There is no retry.
    Failed { message: String },
}

impl DashboardView {
    pub fn loaded(records: &[CurrencySentiment], selected: Option<String>) -> Self {
        let selected = selected.filter(|s| !s.is_empty());
        DashboardView::Loaded {
            options: records.iter().map(|r| r.currency.clone()).collect(),
            cards: cards_for(records, selected.as_deref()),
            selected,
        }
    }
}

/// Cards in store order, narrowed to `selected` when one is given.
pub fn cards_for(records: &[CurrencySentiment], selected: Option<&str>) -> Vec<SymbolCard> {
    records
        .iter()
        .filter(|r| selected.is_none_or(|s| s.is_empty() || r.currency == s))
        .map(SymbolCard::from_record)
        .collect()
}

/// Runs the single symbols load of a dashboard mount and builds the view
/// from whatever the store holds afterwards.
pub async fn load_dashboard(
    store: &CurrencyStore,
    api: &dyn AnalyticsApi,
    selected: Option<String>,
) -> DashboardView {
    match store.load(api).await {
        Ok(outcome) => {
            if let CommitOutcome::Stale { ticket, current } = outcome {
                tracing::debug!(ticket, current, "Rendering newer data than this load fetched.");
            }
            let snapshot = store.reader().snapshot().await;
            DashboardView::loaded(&snapshot.data, selected)
        }
        Err(e) => {
            tracing::error!(error = ?e, "Error fetching symbol sentiment data.");
            DashboardView::Failed {
                message: format!("Failed to load currency data: {}", e),
            }
        }
    }
}

/// Re-renders the card grid from the store without fetching.
pub async fn filter_cards(reader: &CurrencyStoreReader, selected: Option<&str>) -> Vec<SymbolCard> {
    let snapshot = reader.snapshot().await;
    cards_for(&snapshot.data, selected)
}
