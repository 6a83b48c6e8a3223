//! Timetable lesson display model.

use serde::Serialize;

use crate::api::{DayOfWeek, LessonDto};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonUi {
    pub lesson_id: Option<String>,
    pub class_name: String,
    pub day: DayOfWeek,
    pub lesson_number: i32,
    pub subject_name: String,
    pub teacher_name: Option<String>,
    pub room: Option<String>,
    /// "08:30-09:15", "08:30-" or `None` when no times are known
    pub time_range: Option<String>,
}

impl From<LessonDto> for LessonUi {
    fn from(dto: LessonDto) -> Self {
        let start = dto.start_time.as_deref().map(short_time);
        let end = dto.end_time.as_deref().map(short_time);
        let time_range = match (start, end) {
            (Some(start), Some(end)) => Some(format!("{}-{}", start, end)),
            (Some(start), None) => Some(format!("{}-", start)),
            (None, Some(end)) => Some(format!("-{}", end)),
            (None, None) => None,
        };
        Self {
            lesson_id: dto.lesson_id,
            class_name: dto.class_name,
            day: dto.day_of_week,
            lesson_number: dto.lesson_number,
            subject_name: dto.subject_name,
            teacher_name: dto.teacher_name,
            room: dto.room.filter(|r| !r.trim().is_empty()),
            time_range,
        }
    }
}

/// "08:30:00" -> "08:30"
fn short_time(raw: &str) -> &str {
    let raw = raw.trim();
    match raw.match_indices(':').nth(1) {
        Some((second_colon, _)) => &raw[..second_colon],
        None => raw,
    }
}

/// Lessons ordered by day, then lesson number.
pub fn sort_lessons(lessons: &mut [LessonUi]) {
    lessons.sort_by_key(|l| (l.day, l.lesson_number));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(number: i32, start: Option<&str>, end: Option<&str>) -> LessonDto {
        LessonDto {
            lesson_id: None,
            class_name: "7B".to_string(),
            day_of_week: DayOfWeek::Tuesday,
            week_number: None,
            lesson_number: number,
            subject_name: "Art".to_string(),
            teacher_id: None,
            teacher_name: None,
            room: Some(" ".to_string()),
            start_time: start.map(str::to_string),
            end_time: end.map(str::to_string),
        }
    }

    #[test]
    fn test_time_range() {
        let ui = LessonUi::from(lesson(1, Some("08:30:00"), Some("09:15:00")));
        assert_eq!(ui.time_range.as_deref(), Some("08:30-09:15"));
        assert!(ui.room.is_none());

        let ui = LessonUi::from(lesson(1, Some("08:30"), None));
        assert_eq!(ui.time_range.as_deref(), Some("08:30-"));

        let ui = LessonUi::from(lesson(1, None, None));
        assert!(ui.time_range.is_none());
    }

    #[test]
    fn test_sort_lessons() {
        let mut lessons = vec![
            LessonUi::from(lesson(3, None, None)),
            LessonUi::from(LessonDto {
                day_of_week: DayOfWeek::Monday,
                ..lesson(5, None, None)
            }),
            LessonUi::from(lesson(1, None, None)),
        ];
        sort_lessons(&mut lessons);
        let order: Vec<_> = lessons.iter().map(|l| (l.day, l.lesson_number)).collect();
        assert_eq!(
            order,
            vec![
                (DayOfWeek::Monday, 5),
                (DayOfWeek::Tuesday, 1),
                (DayOfWeek::Tuesday, 3)
            ]
        );
    }
}
