//! Error handling for the school client.
//!
//! - **Error Categories**: High-level classification for handling decisions
//! - **`ClientError`**: what went wrong talking to the server or local storage
//! - **`RepoResult`**: the tagged outcome repositories hand to view state
//!
//! | Kind | Category | Retryable |
//! |------|----------|-----------|
//! | Unauthenticated | Auth | No |
//! | Transport | Network | Yes |
//! | Http 5xx / 408 / 429 | Server | Yes |
//! | Http other | Auth / User | No |
//! | Decode | Client | No |
//! | Domain | User | No |
//! | Storage | Storage | No |

mod category;
mod client_error;
mod repo_result;

pub use category::ErrorCategory;
pub use client_error::{ClientError, ClientResult};
pub use repo_result::RepoResult;
