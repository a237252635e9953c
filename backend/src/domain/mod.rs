//! Domain primitives, aggregates, and services.
//!
//! Purpose: define strongly typed domain entities and the generation pipeline
//! orchestration, independent of any transport or storage framework. Inbound
//! adapters map [`Error`] to protocol envelopes; outbound adapters implement
//! the traits in [`ports`].

pub mod error;
pub mod generation;
pub mod generation_service;
pub mod ports;
pub mod prompt;
pub mod response;
pub mod user;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::generation::{
    CaptionRecord, GenerationRequest, GenerationRequestError, GenerationResult, UsageLogEntry,
};
pub use self::generation_service::GenerationService;
pub use self::prompt::{Prompt, build_prompt};
pub use self::response::{ResponseParseError, parse_generation};
pub use self::user::{SubscriptionTier, UserId, UserIdError, UserProfile};

/// Convenient API result alias.
pub type ApiResult<T> = Result<T, Error>;
