//! UI-facing models derived from the wire DTOs.
//!
//! Views never see the server schema directly: repositories and holders map
//! each DTO into one of these shapes before publishing it.

pub mod grade;
pub mod lesson;
pub mod news;
pub mod schedule;
pub mod user;

pub use grade::{GradeColor, GradeSummary, GradeUi, SubjectAverage};
pub use lesson::{sort_lessons, LessonUi};
pub use news::NewsUi;
pub use schedule::{LessonSlot, ScheduleUi};
pub use user::UserUi;
