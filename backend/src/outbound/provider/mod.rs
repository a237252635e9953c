//! Outbound adapter for the hosted caption model.

mod dto;
mod http_client;

pub use http_client::{ChatCompletionClient, SamplingOptions};
