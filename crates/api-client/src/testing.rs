//! In-memory `AnalyticsApi` for tests in this and downstream crates.

use crate::{AnalyticsApi, ApiError};
use async_trait::async_trait;
use core_types::{CurrencySentiment, NewsItem, RiskExposure, RiskExposureRequest};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A scripted backend that records every call it receives.
///
/// `None` for either payload makes the matching call fail with a 503.
#[derive(Default)]
pub struct FakeAnalytics {
    symbols: Mutex<Option<Vec<CurrencySentiment>>>,
    exposure: Mutex<Option<RiskExposure>>,
    symbol_calls: AtomicUsize,
    exposure_requests: Mutex<Vec<RiskExposureRequest>>,
}

impl FakeAnalytics {
    pub fn new(symbols: Vec<CurrencySentiment>) -> Self {
        Self {
            symbols: Mutex::new(Some(symbols)),
            ..Self::default()
        }
    }

    /// A backend on which every call fails.
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn with_exposure(self, exposure: RiskExposure) -> Self {
        *self.exposure.lock().unwrap() = Some(exposure);
        self
    }

    pub fn set_symbols(&self, symbols: Option<Vec<CurrencySentiment>>) {
        *self.symbols.lock().unwrap() = symbols;
    }

    pub fn symbol_calls(&self) -> usize {
        self.symbol_calls.load(Ordering::SeqCst)
    }

    pub fn exposure_requests(&self) -> Vec<RiskExposureRequest> {
        self.exposure_requests.lock().unwrap().clone()
    }

    fn unavailable() -> ApiError {
        ApiError::Status {
            status: 503,
            body: "fake backend unavailable".to_string(),
        }
    }
}

#[async_trait]
impl AnalyticsApi for FakeAnalytics {
    async fn fetch_symbols(&self) -> Result<Vec<CurrencySentiment>, ApiError> {
        self.symbol_calls.fetch_add(1, Ordering::SeqCst);
        self.symbols.lock().unwrap().clone().ok_or_else(Self::unavailable)
    }

    async fn fetch_risk_exposure(
        &self,
        request: &RiskExposureRequest,
    ) -> Result<RiskExposure, ApiError> {
        self.exposure_requests.lock().unwrap().push(request.clone());
        self.exposure.lock().unwrap().clone().ok_or_else(Self::unavailable)
    }
}

/// A fully populated record with two news items.
pub fn sample_record(currency: &str, daily_high: f64) -> CurrencySentiment {
    CurrencySentiment {
        currency: currency.to_string(),
        predicted_price: daily_high - 0.0028,
        daily_high,
        daily_low: daily_high - 0.0077,
        sentiment: "Neutral".to_string(),
        company_name: format!("{} desk", currency),
        news_items: vec![
            NewsItem {
                text: format!("{} steady ahead of data", currency),
                sentiment: "positive".to_string(),
                sentiment_score: 0.812,
            },
            NewsItem {
                text: format!("{} pressured by yields", currency),
                sentiment: "negative".to_string(),
                sentiment_score: -0.457,
            },
        ],
        total_news: 14,
        overall_sentiment: "positive".to_string(),
        average_sentiment_score: 0.1775,
        risk_assessment: format!("{} risk is moderate.", currency),
    }
}

/// The exposure figures used throughout the test suites.
pub fn sample_exposure() -> RiskExposure {
    RiskExposure {
        buy_volume_usd: "100.50".to_string(),
        sell_volume_usd: "60.25".to_string(),
        net_exposure: "40.25".to_string(),
    }
}
