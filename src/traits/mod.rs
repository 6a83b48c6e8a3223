//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP client operations (GET, POST, PUT, DELETE)
//! - [`KeyValueStore`] - Persisted local key-value state
//! - [`Clock`] - Current time, replaceable in tests

pub mod clock;
pub mod http;
pub mod store;

pub use clock::{Clock, SystemClock};
pub use http::{Headers, HttpClient, HttpError, Method, Response};
pub use store::{KeyValueStore, StoreError};
