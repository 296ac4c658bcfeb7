// Registry projection core: search, classify and aggregate property records
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod portfolio;
pub mod search;
pub mod status;
pub mod store;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use error::Error;
pub use export::{format_amount, ExportFormat, Exporter, DEFAULT_CURRENCY_SYMBOL};
pub use models::{
    FractionalShares, Owner, OwnerVerification, PropertyRecord, PropertyStatus, RegistrySnapshot,
    StageState, TransactionRecord, VerificationStage,
};
pub use portfolio::{
    aggregate, owner_metrics, verification_progress_percent, AggregateMetrics, OwnerMetrics,
    StatusShare,
};
pub use search::{search, PropertyFilter, SearchQuery};
pub use status::{classify, classify_raw, StatusClass, TrustLevel};
pub use store::{JsonFileSource, PropertySource, PropertyStore, StaticSource};

/// Result type alias for everything that touches the outside world
pub type Result<T> = std::result::Result<T, Error>;
