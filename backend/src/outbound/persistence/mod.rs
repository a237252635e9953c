//! Persistence adapters for the storage ports.
//!
//! The Diesel adapters back the ports with PostgreSQL; [`MemoryStore`] backs
//! them with a process-local map for tests and the `--in-memory` run mode.

mod diesel_caption_repository;
mod diesel_credit_ledger;
mod diesel_profile_query;
mod diesel_usage_log;
mod memory;
mod models;
mod pool;
mod schema;

pub use diesel_caption_repository::DieselCaptionRepository;
pub use diesel_credit_ledger::DieselCreditLedger;
pub use diesel_profile_query::DieselProfileQuery;
pub use diesel_usage_log::DieselUsageLog;
pub use memory::MemoryStore;
pub use pool::{DbPool, PoolConfig, PoolError};
