//! Credit-gated generation pipeline orchestration.
//!
//! The service sequences validate → credit check → prompt → provider → parse
//! → credit commit → persist → usage log. Credits are committed only after a
//! structurally valid result exists: the commit step consumes a
//! [`BillableGeneration`], which can only be constructed from a successfully
//! parsed provider reply, so the ordering is enforced by the types rather than
//! by convention.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, warn};

use crate::domain::Error;
use crate::domain::generation::{CaptionRecord, GenerationRequest, GenerationResult, UsageLogEntry};
use crate::domain::ports::{
    CaptionGeneration, CaptionProvider, CaptionProviderError, CaptionRepository, CreditLedger,
    CreditLedgerError, GenerationOutcome, UsageLog,
};
use crate::domain::prompt::build_prompt;
use crate::domain::response::parse_generation;

/// Proof that a structurally valid result exists. Constructed in exactly one
/// place, after the parse step, and consumed by the commit step.
struct BillableGeneration(GenerationResult);

/// Orchestrator over the driven ports.
#[derive(Clone)]
pub struct GenerationService<L, P, R, U> {
    ledger: Arc<L>,
    provider: Arc<P>,
    captions: Arc<R>,
    usage: Arc<U>,
}

impl<L, P, R, U> GenerationService<L, P, R, U> {
    /// Create a new service with the given port implementations.
    pub fn new(ledger: Arc<L>, provider: Arc<P>, captions: Arc<R>, usage: Arc<U>) -> Self {
        Self {
            ledger,
            provider,
            captions,
            usage,
        }
    }
}

fn map_ledger_error(error: CreditLedgerError) -> Error {
    match error {
        CreditLedgerError::Unavailable { message } => {
            Error::service_unavailable(format!("credit ledger unavailable: {message}"))
        }
        CreditLedgerError::Query { message } => {
            Error::internal(format!("credit ledger error: {message}"))
        }
        // Exhaustion is handled at the commit call site; reaching here from a
        // check would be an adapter contract violation.
        CreditLedgerError::Exhausted { user_id } => {
            Error::internal(format!("unexpected credit exhaustion for user {user_id}"))
        }
    }
}

fn map_provider_error(error: CaptionProviderError) -> Error {
    match error {
        CaptionProviderError::Timeout { message } => {
            Error::bad_gateway(format!("caption provider timed out: {message}"))
        }
        CaptionProviderError::Transport { message } => {
            Error::bad_gateway(format!("caption provider unreachable: {message}"))
        }
        CaptionProviderError::Upstream { status, message } => {
            Error::bad_gateway(format!("caption provider returned {status}: {message}"))
        }
    }
}

impl<L, P, R, U> GenerationService<L, P, R, U>
where
    L: CreditLedger,
    P: CaptionProvider,
    R: CaptionRepository,
    U: UsageLog,
{
    /// Generate the reply and parse it into a billable result. No credit has
    /// been spent when this returns an error.
    async fn produce(&self, request: &GenerationRequest) -> Result<BillableGeneration, Error> {
        let prompt = build_prompt(request);
        let raw = self
            .provider
            .complete(&prompt)
            .await
            .map_err(map_provider_error)?;

        let result = parse_generation(&raw).map_err(|err| {
            error!(user_id = %request.user_id(), %err, "provider reply failed to parse");
            Error::internal("failed to parse provider response")
        })?;

        if result.captions.len() != usize::from(request.slide_count()) {
            warn!(
                requested = request.slide_count(),
                received = result.captions.len(),
                "provider returned a caption count differing from the request"
            );
        }

        Ok(BillableGeneration(result))
    }

    /// Spend the credit, then persist and log on a best-effort basis.
    async fn commit_and_record(
        &self,
        request: &GenerationRequest,
        billable: BillableGeneration,
    ) -> Result<GenerationOutcome, Error> {
        let BillableGeneration(result) = billable;

        let credits_remaining = match self.ledger.commit(request.user_id()).await {
            Ok(balance) => balance,
            Err(CreditLedgerError::Exhausted { user_id }) => {
                // Lost a concurrent commit race after the check passed. The
                // generation stays unbilled; surface a generic server error
                // rather than a second charge or a misleading quota error.
                error!(%user_id, "credit commit raced to zero after successful generation");
                return Err(Error::internal("generation could not be billed"));
            }
            Err(err) => return Err(map_ledger_error(err)),
        };

        let record = CaptionRecord::new(request, &result);
        let record_id = match self.captions.store(&record).await {
            Ok(()) => Some(record.id),
            Err(err) => {
                warn!(user_id = %request.user_id(), %err, "caption record store failed; continuing");
                None
            }
        };

        let entry = UsageLogEntry::generation(request);
        if let Err(err) = self.usage.append(&entry).await {
            warn!(user_id = %request.user_id(), %err, "usage log append failed; continuing");
        }

        Ok(GenerationOutcome {
            record_id,
            result,
            credits_remaining,
        })
    }
}

#[async_trait]
impl<L, P, R, U> CaptionGeneration for GenerationService<L, P, R, U>
where
    L: CreditLedger,
    P: CaptionProvider,
    R: CaptionRepository,
    U: UsageLog,
{
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationOutcome, Error> {
        let check = self
            .ledger
            .check(request.user_id())
            .await
            .map_err(map_ledger_error)?;
        if !check.allowed {
            return Err(Error::forbidden("no credits remaining")
                .with_details(json!({ "creditsRemaining": check.balance })));
        }

        let billable = self.produce(&request).await?;
        self.commit_and_record(&request, billable).await
    }
}
