//! Grade display models and aggregation.

use chrono::NaiveDate;
use serde::Serialize;

use crate::api::{GradeDto, GradeType};

// ============================================================================
// Grade Color
// ============================================================================

/// Display colour of a grade value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeColor {
    Green,
    LightGreen,
    Amber,
    Red,
    /// Anything outside 2..=5
    Gray,
}

impl GradeColor {
    /// Map a grade value to its colour. Total over `i32`.
    pub fn for_value(value: i32) -> Self {
        match value {
            5 => GradeColor::Green,
            4 => GradeColor::LightGreen,
            3 => GradeColor::Amber,
            2 => GradeColor::Red,
            _ => GradeColor::Gray,
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            GradeColor::Green => "#4CAF50",
            GradeColor::LightGreen => "#8BC34A",
            GradeColor::Amber => "#FFC107",
            GradeColor::Red => "#F44336",
            GradeColor::Gray => "#9E9E9E",
        }
    }
}

// ============================================================================
// Grade
// ============================================================================

/// A grade ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeUi {
    pub grade_id: Option<String>,
    pub student_id: String,
    pub student_name: Option<String>,
    pub teacher_name: Option<String>,
    pub subject_name: String,
    pub class_name: String,
    pub grade_value: i32,
    pub grade_type: GradeType,
    pub comment: Option<String>,
    pub lesson_date: NaiveDate,
    pub color: GradeColor,
}

impl From<GradeDto> for GradeUi {
    fn from(dto: GradeDto) -> Self {
        Self {
            color: GradeColor::for_value(dto.grade_value),
            grade_id: dto.grade_id,
            student_id: dto.student_id,
            student_name: dto.student_name,
            teacher_name: dto.teacher_name,
            subject_name: dto.subject_name,
            class_name: dto.class_name,
            grade_value: dto.grade_value,
            grade_type: dto.grade_type,
            comment: dto.comment.filter(|c| !c.trim().is_empty()),
            lesson_date: dto.lesson_date,
        }
    }
}

impl GradeUi {
    /// "12.09.2024"
    pub fn formatted_date(&self) -> String {
        self.lesson_date.format("%d.%m.%Y").to_string()
    }
}

// ============================================================================
// Summary
// ============================================================================

/// Average of one subject's grades.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectAverage {
    pub subject_name: String,
    pub average: f64,
    pub count: usize,
}

/// A list of grades with its averages.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GradeSummary {
    pub grades: Vec<GradeUi>,
    /// Arithmetic mean of all values, 0.0 when there are none
    pub average_grade: f64,
    /// Per-subject averages in order of first appearance
    pub by_subject: Vec<SubjectAverage>,
}

impl GradeSummary {
    pub fn from_dtos(dtos: Vec<GradeDto>) -> Self {
        Self::new(dtos.into_iter().map(GradeUi::from).collect())
    }

    pub fn new(grades: Vec<GradeUi>) -> Self {
        let average_grade = mean(grades.iter().map(|g| g.grade_value));

        let mut by_subject: Vec<SubjectAverage> = Vec::new();
        for grade in &grades {
            if by_subject
                .iter()
                .any(|s| s.subject_name == grade.subject_name)
            {
                continue;
            }
            let values: Vec<i32> = grades
                .iter()
                .filter(|g| g.subject_name == grade.subject_name)
                .map(|g| g.grade_value)
                .collect();
            by_subject.push(SubjectAverage {
                subject_name: grade.subject_name.clone(),
                count: values.len(),
                average: mean(values.into_iter()),
            });
        }

        Self {
            grades,
            average_grade,
            by_subject,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.grades.is_empty()
    }

    /// Average rounded to two decimals for display.
    pub fn formatted_average(&self) -> String {
        format!("{:.2}", self.average_grade)
    }
}

fn mean(values: impl Iterator<Item = i32>) -> f64 {
    let (sum, count) = values.fold((0i64, 0usize), |(sum, count), v| (sum + v as i64, count + 1));
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}
