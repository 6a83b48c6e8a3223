//! Mock implementations for testing.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with configurable responses and request recording
//! - [`InMemoryStore`] - In-memory key-value storage
//! - [`ManualClock`] - Clock advanced by hand

pub mod clock;
pub mod http;
pub mod store;

pub use clock::ManualClock;
pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use store::InMemoryStore;
