//! classbook - client data layer for a school-management service
//!
//! Repositories talk to the school REST API, cache schedule and news
//! responses locally, and feed observable view state to presentation code.
//!
//! This library exposes modules for use in integration tests and the CLI.

pub mod adapters;
pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod session;
pub mod traits;
pub mod view_state;
