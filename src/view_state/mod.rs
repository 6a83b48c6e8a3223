//! Observable state for presentation code.
//!
//! Each holder owns one [`ViewState`] behind a watch channel and exposes
//! intent methods that return immediately. The intent runs as a task owned
//! by the holder and publishes its outcome when the repository answers.
//!
//! ```text
//! screen --intent--> holder --spawn--> repository --> api --> server
//!   ^                  |
//!   +---- watch -------+
//! ```
//!
//! ## Components
//!
//! - [`StateHolder`]: lanes, generations, and task ownership shared by all holders
//! - [`AuthHolder`], [`UserHolder`], [`ScheduleHolder`], [`NewsHolder`],
//!   [`GradeHolder`], [`LessonHolder`]: one per resource family
//! - [`validation`]: checks run before a write is sent

mod auth;
mod grade;
mod holder;
mod lesson;
mod news;
mod schedule;
mod state;
mod user;
pub mod validation;

pub use auth::AuthHolder;
pub use grade::GradeHolder;
pub use holder::{Lane, StateHolder};
pub use lesson::LessonHolder;
pub use news::NewsHolder;
pub use schedule::ScheduleHolder;
pub use state::{OperationResult, ViewState};
pub use user::UserHolder;
pub use validation::ValidationError;
