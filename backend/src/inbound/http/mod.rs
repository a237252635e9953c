//! Inbound HTTP adapter: handlers, DTOs, and error mapping.

pub mod auth;
pub mod captions;
pub mod error;
pub mod generate;
pub mod health;
pub mod session;
pub mod state;
pub mod users;
pub(crate) mod validation;

pub use crate::domain::ApiResult;
