pub mod enums;
pub mod error;
pub mod format;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::BadgeVariant;
pub use error::CoreError;
pub use structs::{
    CurrencySentiment, DataEnvelope, NewsItem, ParsedExposure, RiskExposure, RiskExposureRequest,
};
