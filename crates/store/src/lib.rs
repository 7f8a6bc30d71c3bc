//! # Currency Store
//!
//! The single in-memory collection of `CurrencySentiment` records shared by
//! the dashboard and detail views.
//!
//! - **One writer**: only [`CurrencyStore::commit`] (and [`CurrencyStore::load`],
//!   which wraps it) changes the collection, always by wholesale replacement.
//! - **Many readers**: views get a [`CurrencyStoreReader`], which cannot write.
//! - **Fenced loads**: every load takes a [`LoadTicket`] before its request
//!   goes out. A response is committed only if no newer load has committed
//!   already, so a slow stale response never overwrites fresher data.
//!
//! Nothing ever populates the store implicitly. A lookup against a store that
//! has never been loaded fails with [`LookupError::NotFound`].

use api_client::{AnalyticsApi, ApiError};
use chrono::{DateTime, Utc};
use core_types::CurrencySentiment;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

pub mod error;

pub use error::LookupError;

/// Permission to commit the result of one symbols load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What happened to a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The records replaced the collection.
    Applied { generation: u64, count: usize },
    /// A newer load had already committed; the records were dropped.
    Stale { ticket: u64, current: u64 },
}

/// Point-in-time view of the collection.
#[derive(Debug, Clone, Serialize)]
pub struct StoreSnapshot {
    /// Generation of the load that produced `data`; 0 when never loaded.
    pub generation: u64,
    pub loaded_at: Option<DateTime<Utc>>,
    pub data: Arc<Vec<CurrencySentiment>>,
}

impl StoreSnapshot {
    pub fn is_populated(&self) -> bool {
        self.generation > 0
    }
}

#[derive(Debug, Default)]
struct StoreInner {
    records: Arc<Vec<CurrencySentiment>>,
    generation: u64,
    loaded_at: Option<DateTime<Utc>>,
}

/// Owner of the shared collection. Cloning shares the same collection.
#[derive(Debug, Clone, Default)]
pub struct CurrencyStore {
    inner: Arc<RwLock<StoreInner>>,
    next_ticket: Arc<AtomicU64>,
}

impl CurrencyStore {
    /// An empty, never-loaded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A read-only handle onto this store.
    pub fn reader(&self) -> CurrencyStoreReader {
        CurrencyStoreReader {
            inner: self.inner.clone(),
        }
    }

    /// Reserves the next load generation. Take the ticket before issuing the
    /// request whose result it will commit.
    pub fn begin_load(&self) -> LoadTicket {
        LoadTicket {
            generation: self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1,
        }
    }

    /// Replaces the whole collection with `records`, unless a load with a
    /// newer ticket has already committed.
    pub async fn commit(&self, ticket: LoadTicket, records: Vec<CurrencySentiment>) -> CommitOutcome {
        let mut inner = self.inner.write().await;

        if ticket.generation <= inner.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = inner.generation,
                "Dropping stale symbols response."
            );
            return CommitOutcome::Stale {
                ticket: ticket.generation,
                current: inner.generation,
            };
        }

        let count = records.len();
        inner.records = Arc::new(records);
        inner.generation = ticket.generation;
        inner.loaded_at = Some(Utc::now());

        tracing::info!(generation = ticket.generation, count, "Currency store replaced.");
        CommitOutcome::Applied {
            generation: ticket.generation,
            count,
        }
    }

    /// Fetches `/symbols` once and commits the result. No retry.
    pub async fn load(&self, api: &dyn AnalyticsApi) -> Result<CommitOutcome, ApiError> {
        let ticket = self.begin_load();
        let records = api.fetch_symbols().await?;
        Ok(self.commit(ticket, records).await)
    }
}

/// Read-only access to the shared collection.
#[derive(Debug, Clone)]
pub struct CurrencyStoreReader {
    inner: Arc<RwLock<StoreInner>>,
}

impl CurrencyStoreReader {
    pub async fn snapshot(&self) -> StoreSnapshot {
        let inner = self.inner.read().await;
        StoreSnapshot {
            generation: inner.generation,
            loaded_at: inner.loaded_at,
            data: inner.records.clone(),
        }
    }

    pub async fn generation(&self) -> u64 {
        self.inner.read().await.generation
    }

    pub async fn is_populated(&self) -> bool {
        self.generation().await > 0
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// First record whose identifier matches exactly (case-sensitive).
    pub async fn find(&self, currency: &str) -> Option<CurrencySentiment> {
        let inner = self.inner.read().await;
        inner.records.iter().find(|r| r.currency == currency).cloned()
    }

    /// Resolves the detail view's `currency` parameter against the collection.
    pub async fn resolve(&self, currency: Option<&str>) -> Result<CurrencySentiment, LookupError> {
        let currency = match currency {
            Some(c) if !c.is_empty() => c,
            _ => return Err(LookupError::MissingCurrency),
        };

        match self.find(currency).await {
            Some(record) => Ok(record),
            None => {
                let generation = self.generation().await;
                if generation == 0 {
                    tracing::debug!(currency = %currency, "Lookup against a store that was never loaded.");
                } else {
                    tracing::debug!(currency = %currency, generation, "Currency not in store.");
                }
                Err(LookupError::NotFound(currency.to_string()))
            }
        }
    }
}
