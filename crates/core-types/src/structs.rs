use crate::error::CoreError;
use crate::format::parse_float_prefix;
use serde::{Deserialize, Serialize};

/// The backend wraps every payload in a `{ "data": ... }` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// A single headline with its externally computed sentiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub text: String,
    pub sentiment: String,
    pub sentiment_score: f64,
}

/// Sentiment, prediction and risk summary for one currency pair, as returned
/// by `GET /symbols`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencySentiment {
    /// Unique identifier, e.g. "EUR/USD".
    pub currency: String,
    pub predicted_price: f64,
    pub daily_high: f64,
    pub daily_low: f64,
    #[serde(default)]
    pub sentiment: String,
    #[serde(default)]
    pub company_name: String,
    /// Backend order is relevance order and must be kept.
    #[serde(default, alias = "news_item")]
    pub news_items: Vec<NewsItem>,
    /// Supplied independently of `news_items`; the two need not agree.
    #[serde(default)]
    pub total_news: u64,
    #[serde(default)]
    pub overall_sentiment: String,
    #[serde(default)]
    pub average_sentiment_score: f64,
    #[serde(default, alias = "risk_assesment")]
    pub risk_assessment: String,
}

/// Body of `POST /riskexposure`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskExposureRequest {
    pub asset: String,
    pub price: f64,
}

impl RiskExposureRequest {
    /// Builds the request the detail view issues for a record: its identifier
    /// priced at the daily high.
    pub fn for_record(record: &CurrencySentiment) -> Self {
        Self {
            asset: record.currency.clone(),
            price: record.daily_high,
        }
    }
}

/// Volume and exposure figures, serialized by the backend as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskExposure {
    pub buy_volume_usd: String,
    pub sell_volume_usd: String,
    pub net_exposure: String,
}

/// `RiskExposure` with every figure parsed to a USD amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParsedExposure {
    pub buy_volume_usd: f64,
    pub sell_volume_usd: f64,
    pub net_exposure: f64,
}

impl RiskExposure {
    pub fn parse(&self) -> Result<ParsedExposure, CoreError> {
        Ok(ParsedExposure {
            buy_volume_usd: parse_field("buy_volume_usd", &self.buy_volume_usd)?,
            sell_volume_usd: parse_field("sell_volume_usd", &self.sell_volume_usd)?,
            net_exposure: parse_field("net_exposure", &self.net_exposure)?,
        })
    }
}

fn parse_field(field: &'static str, value: &str) -> Result<f64, CoreError> {
    parse_float_prefix(value).ok_or_else(|| CoreError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}
