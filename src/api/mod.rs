//! Remote API contract: endpoint table, wire DTOs, and the typed client.

pub mod client;
pub mod dto;
pub mod endpoint;

pub use client::{decode, ApiClient};
pub use dto::*;
pub use endpoint::Endpoint;
