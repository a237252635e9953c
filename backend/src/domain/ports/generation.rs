//! Driving port for the generation pipeline.
//!
//! The HTTP boundary only ever talks to this trait; the orchestration behind
//! it is free to change without touching the adapters.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::generation::{GenerationRequest, GenerationResult};

/// Result of a successful end-to-end pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    /// Id of the stored caption record; absent when archival storage failed
    /// (persistence is best-effort and does not gate success).
    pub record_id: Option<Uuid>,
    pub result: GenerationResult,
    /// Balance after the credit commit.
    pub credits_remaining: i32,
}

/// Run the credit-gated generation pipeline for one validated request.
#[async_trait]
pub trait CaptionGeneration: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationOutcome, Error>;
}
