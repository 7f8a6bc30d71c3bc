//! The detail view for a single currency.

use crate::chart::RiskExposureChart;
use api_client::AnalyticsApi;
use core_types::format::{to_fixed, widget_symbol};
use core_types::{BadgeVariant, CurrencySentiment, RiskExposureRequest};
use serde::Deserialize;
use store::{CurrencyStore, CurrencyStoreReader, LookupError};

/// Query string of `/currency` and `/api/currency`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailQuery {
    pub currency: Option<String>,
}

/// The "Risk Profile" panel, every value preformatted.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfilePanel {
    pub predicted_price: String,
    pub overall_sentiment: String,
    pub average_sentiment_score: String,
    pub total_news: String,
    pub daily_high: String,
    pub daily_low: String,
}

impl ProfilePanel {
    pub fn from_record(record: &CurrencySentiment) -> Self {
        Self {
            predicted_price: format!("${}", to_fixed(record.predicted_price, 4)),
            overall_sentiment: record.overall_sentiment.clone(),
            average_sentiment_score: to_fixed(record.average_sentiment_score, 2),
            total_news: record.total_news.to_string(),
            daily_high: format!("${}", to_fixed(record.daily_high, 4)),
            daily_low: format!("${}", to_fixed(record.daily_low, 4)),
        }
    }

    /// Label/value rows in display order.
    pub fn rows(&self) -> [(&'static str, &str); 6] {
        [
            ("Predicted Price", self.predicted_price.as_str()),
            ("Overall Sentiment", self.overall_sentiment.as_str()),
            ("Average Sentiment Score", self.average_sentiment_score.as_str()),
            ("Total News Articles", self.total_news.as_str()),
            ("Daily High", self.daily_high.as_str()),
            ("Daily Low", self.daily_low.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewsEntry {
    pub text: String,
    /// "Sentiment: <label> (<score>)"
    pub badge_label: String,
    pub badge_variant: BadgeVariant,
}

#[derive(Debug, Clone)]
pub struct DetailView {
    pub record: CurrencySentiment,
    pub widget_symbol: String,
    pub profile: ProfilePanel,
    pub news: Vec<NewsEntry>,
    /// `None` when the exposure request failed or returned unusable figures.
    pub exposure: Option<RiskExposureChart>,
}

impl DetailView {
    pub fn new(record: CurrencySentiment, exposure: Option<RiskExposureChart>) -> Self {
        let news = record
            .news_items
            .iter()
            .map(|item| NewsEntry {
                text: item.text.clone(),
                badge_label: format!(
                    "Sentiment: {} ({})",
                    item.sentiment,
                    to_fixed(item.sentiment_score, 2)
                ),
                badge_variant: BadgeVariant::for_news(&item.sentiment),
            })
            .collect();

        Self {
            widget_symbol: widget_symbol(&record.currency),
            profile: ProfilePanel::from_record(&record),
            news,
            exposure,
            record,
        }
    }

    pub fn title(&self) -> String {
        format!("{} Details", self.record.currency)
    }
}

/// Runs one symbols load when fallback fetching is enabled and the store has
/// never been populated. A failed load is logged and otherwise ignored; the
/// lookup that follows reports the miss.
pub async fn ensure_loaded(store: &CurrencyStore, api: &dyn AnalyticsApi, fallback_fetch: bool) {
    if !fallback_fetch || store.reader().is_populated().await {
        return;
    }
    tracing::info!("Currency store is empty; loading symbols for the detail view.");
    if let Err(e) = store.load(api).await {
        tracing::error!(error = ?e, "Error fetching symbol sentiment data.");
    }
}

/// Resolves `currency` against the store and, on a hit, issues the single
/// risk-exposure request for it.
pub async fn load_detail(
    reader: &CurrencyStoreReader,
    api: &dyn AnalyticsApi,
    currency: Option<&str>,
) -> Result<DetailView, LookupError> {
    let record = reader.resolve(currency).await?;
    let exposure = fetch_exposure(api, &record).await;
    Ok(DetailView::new(record, exposure))
}

async fn fetch_exposure(api: &dyn AnalyticsApi, record: &CurrencySentiment) -> Option<RiskExposureChart> {
    let request = RiskExposureRequest::for_record(record);
    let exposure = match api.fetch_risk_exposure(&request).await {
        Ok(exposure) => exposure,
        Err(e) => {
            tracing::warn!(asset = %request.asset, error = ?e, "Error fetching risk exposure.");
            return None;
        }
    };

    match RiskExposureChart::from_exposure(&exposure) {
        Ok(chart) => Some(chart),
        Err(e) => {
            tracing::warn!(asset = %request.asset, error = %e, "Unusable risk exposure figures.");
            None
        }
    }
}
