//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (database, external provider) and how driving adapters invoke the domain.
//! Each trait exposes strongly typed errors so adapters map their failures
//! into predictable variants instead of returning `anyhow::Result`.

pub mod caption_provider;
pub mod caption_repository;
pub mod credit_ledger;
pub mod generation;
pub mod profile_query;
pub mod usage_log;

pub use self::caption_provider::{CaptionProvider, CaptionProviderError};
pub use self::caption_repository::{CaptionRepository, CaptionStorageError};
pub use self::credit_ledger::{CreditCheck, CreditLedger, CreditLedgerError};
pub use self::generation::{CaptionGeneration, GenerationOutcome};
pub use self::profile_query::{ProfileQuery, ProfileStoreError};
pub use self::usage_log::{UsageLog, UsageLogError};

#[cfg(test)]
pub use self::caption_provider::MockCaptionProvider;
#[cfg(test)]
pub use self::caption_repository::MockCaptionRepository;
#[cfg(test)]
pub use self::credit_ledger::MockCreditLedger;
#[cfg(test)]
pub use self::profile_query::MockProfileQuery;
#[cfg(test)]
pub use self::usage_log::MockUsageLog;
