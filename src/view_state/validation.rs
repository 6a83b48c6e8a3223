//! Input checks run before a write reaches the repository.

use thiserror::Error;

use crate::api::{CreateScheduleRequest, GradeDto, LessonDto, UpdateGradeRequest, MAX_LESSONS_PER_DAY};

/// Lowest grade the school scale allows.
pub const MIN_GRADE: i32 = 2;

/// Highest grade the school scale allows.
pub const MAX_GRADE: i32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Grade must be between 2 and 5, got {0}")]
    GradeOutOfRange(i32),

    #[error("A day has at most 9 lessons, got {0}")]
    TooManyLessons(usize),

    #[error("Every lesson needs a room: {lessons} lessons but {offices} rooms")]
    OfficeMismatch { lessons: usize, offices: usize },

    #[error("Lesson number must be between 1 and 9, got {0}")]
    LessonNumberOutOfRange(i32),

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

pub fn grade_value(value: i32) -> Result<(), ValidationError> {
    if (MIN_GRADE..=MAX_GRADE).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::GradeOutOfRange(value))
    }
}

pub fn grade(grade: &GradeDto) -> Result<(), ValidationError> {
    grade_value(grade.grade_value)?;
    not_blank("Student", &grade.student_id)?;
    not_blank("Subject", &grade.subject_name)
}

pub fn grade_update(request: &UpdateGradeRequest) -> Result<(), ValidationError> {
    match request.grade_value {
        Some(value) => grade_value(value),
        None => Ok(()),
    }
}

pub fn schedule(request: &CreateScheduleRequest) -> Result<(), ValidationError> {
    not_blank("Class", &request.class_name)?;
    if request.lessons.len() > MAX_LESSONS_PER_DAY {
        return Err(ValidationError::TooManyLessons(request.lessons.len()));
    }
    if request.office.len() != request.lessons.len() {
        return Err(ValidationError::OfficeMismatch {
            lessons: request.lessons.len(),
            offices: request.office.len(),
        });
    }
    Ok(())
}

pub fn lesson(lesson: &LessonDto) -> Result<(), ValidationError> {
    not_blank("Class", &lesson.class_name)?;
    not_blank("Subject", &lesson.subject_name)?;
    if !(1..=MAX_LESSONS_PER_DAY as i32).contains(&lesson.lesson_number) {
        return Err(ValidationError::LessonNumberOutOfRange(lesson.lesson_number));
    }
    Ok(())
}

pub fn not_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Empty(field))
    } else {
        Ok(())
    }
}
