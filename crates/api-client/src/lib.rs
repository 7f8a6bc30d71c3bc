use async_trait::async_trait;
use configuration::BackendConfig;
use core_types::{CurrencySentiment, DataEnvelope, RiskExposure, RiskExposureRequest};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

pub mod error;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;

// --- Public API ---
pub use error::ApiError;

/// Path of the symbol sentiment listing.
pub const SYMBOLS_PATH: &str = "/symbols";
/// Path of the per-asset risk exposure calculation.
pub const RISK_EXPOSURE_PATH: &str = "/riskexposure";

/// The abstract interface to the analytics backend.
/// The views only ever talk to this trait, so the HTTP implementation can be
/// swapped for a fake in tests.
#[async_trait]
pub trait AnalyticsApi: Send + Sync {
    /// `GET /symbols`: every currency record the backend currently knows.
    async fn fetch_symbols(&self) -> Result<Vec<CurrencySentiment>, ApiError>;

    /// `POST /riskexposure`: buy/sell volume and net exposure for one asset.
    async fn fetch_risk_exposure(
        &self,
        request: &RiskExposureRequest,
    ) -> Result<RiskExposure, ApiError>;
}

/// A concrete implementation of `AnalyticsApi` over plain HTTP.
#[derive(Clone)]
pub struct AnalyticsClient {
    client: reqwest::Client,
    base_url: String,
}

impl AnalyticsClient {
    pub fn new(config: &BackendConfig) -> Result<Self, ApiError> {
        reqwest::Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {}", config.base_url, e)))?;

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        tracing::debug!(url = %url, "GET");
        let response = self.client.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        tracing::debug!(url = %url, "POST");
        let response = self.client.post(&url).json(body).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            serde_json::from_str::<T>(&text).map_err(|e| ApiError::Deserialization(e.to_string()))
        } else {
            Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            })
        }
    }
}

#[async_trait]
impl AnalyticsApi for AnalyticsClient {
    async fn fetch_symbols(&self) -> Result<Vec<CurrencySentiment>, ApiError> {
        let envelope: DataEnvelope<Vec<CurrencySentiment>> = self.get_json(SYMBOLS_PATH).await?;
        tracing::debug!(count = envelope.data.len(), "Fetched symbol sentiment data.");
        Ok(envelope.data)
    }

    async fn fetch_risk_exposure(
        &self,
        request: &RiskExposureRequest,
    ) -> Result<RiskExposure, ApiError> {
        let envelope: DataEnvelope<RiskExposure> =
            self.post_json(RISK_EXPOSURE_PATH, request).await?;
        Ok(envelope.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    async fn spawn_backend(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client_for(base_url: &str) -> AnalyticsClient {
        AnalyticsClient::new(&BackendConfig {
            base_url: base_url.to_string(),
            timeout_secs: Some(5),
        })
        .unwrap()
    }

    fn symbols_payload() -> Value {
        json!({
            "data": [
                {
                    "currency": "EUR/USD",
                    "predicted_price": 1.0923,
                    "daily_high": 1.0951,
                    "daily_low": 1.0874,
                    "sentiment": "Neutral",
                    "company_name": "Euro",
                    "news_items": [],
                    "total_news": 3,
                    "overall_sentiment": "neutral",
                    "average_sentiment_score": 0.01,
                    "risk_assessment": "Low"
                },
                {
                    "currency": "GBP/USD",
                    "predicted_price": 1.2701,
                    "daily_high": 1.2744,
                    "daily_low": 1.2655,
                    "sentiment": "Bearish",
                    "company_name": "Pound",
                    "news_items": [],
                    "total_news": 5,
                    "overall_sentiment": "negative",
                    "average_sentiment_score": -0.3,
                    "risk_assessment": "High"
                }
            ]
        })
    }

    #[tokio::test]
    async fn test_fetch_symbols_unwraps_envelope() {
        let router = Router::new().route("/symbols", get(|| async { Json(symbols_payload()) }));
        let base = spawn_backend(router).await;

        let symbols = client_for(&base).fetch_symbols().await.unwrap();
        assert_eq!(symbols.len(), 2);
        assert_eq!(symbols[0].currency, "EUR/USD");
        assert_eq!(symbols[1].currency, "GBP/USD");
        assert_eq!(symbols[1].daily_low, 1.2655);
    }

    #[tokio::test]
    async fn test_fetch_risk_exposure_posts_asset_and_price() {
        let received: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();
        let router = Router::new().route(
            "/riskexposure",
            post(move |Json(body): Json<Value>| {
                let sink = sink.clone();
                async move {
                    sink.lock().unwrap().push(body);
                    Json(json!({
                        "data": {
                            "buy_volume_usd": "100.50",
                            "sell_volume_usd": "60.25",
                            "net_exposure": "40.25"
                        }
                    }))
                }
            }),
        );
        let base = spawn_backend(router).await;

        let request = RiskExposureRequest {
            asset: "EUR/USD".to_string(),
            price: 1.0951,
        };
        let exposure = client_for(&base).fetch_risk_exposure(&request).await.unwrap();
        assert_eq!(exposure.buy_volume_usd, "100.50");
        assert_eq!(exposure.net_exposure, "40.25");

        let bodies = received.lock().unwrap();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0], json!({"asset": "EUR/USD", "price": 1.0951}));
    }

    #[tokio::test]
    async fn test_non_success_status_is_reported() {
        let router = Router::new().route(
            "/symbols",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model offline") }),
        );
        let base = spawn_backend(router).await;

        let err = client_for(&base).fetch_symbols().await.unwrap_err();
        match err {
            ApiError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "model offline");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_deserialization_error() {
        let router = Router::new().route("/symbols", get(|| async { "not json" }));
        let base = spawn_backend(router).await;

        let err = client_for(&base).fetch_symbols().await.unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_a_request_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client_for(&format!("http://{}", addr))
            .fetch_symbols()
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Request(_)));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = client_for("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.endpoint(SYMBOLS_PATH), "http://localhost:8080/symbols");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let result = AnalyticsClient::new(&BackendConfig {
            base_url: "localhost".to_string(),
            timeout_secs: None,
        });
        assert!(matches!(result, Err(ApiError::InvalidBaseUrl(_))));
    }
}
