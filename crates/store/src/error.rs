use thiserror::Error;

/// Why a detail lookup produced no record. The messages are shown to users verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("No currency specified")]
    MissingCurrency,

    /// Carries the requested identifier for logging; the message does not.
    #[error("Currency details not found")]
    NotFound(String),
}
