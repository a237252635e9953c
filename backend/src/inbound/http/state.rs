//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{CaptionGeneration, CaptionRepository, ProfileQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub generation: Arc<dyn CaptionGeneration>,
    pub captions: Arc<dyn CaptionRepository>,
    pub profiles: Arc<dyn ProfileQuery>,
}

impl HttpState {
    /// Construct state from port implementations.
    pub fn new(
        generation: Arc<dyn CaptionGeneration>,
        captions: Arc<dyn CaptionRepository>,
        profiles: Arc<dyn ProfileQuery>,
    ) -> Self {
        Self {
            generation,
            captions,
            profiles,
        }
    }
}
