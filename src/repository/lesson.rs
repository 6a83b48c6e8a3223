//! Timetable lessons. Not cached.

use std::sync::Arc;

use crate::api::{ApiClient, DayOfWeek, LessonDto};
use crate::error::RepoResult;
use crate::models::{sort_lessons, LessonUi};
use crate::session::SessionStore;

#[derive(Debug)]
pub struct LessonRepository {
    api: ApiClient,
    session: Arc<SessionStore>,
}

impl LessonRepository {
    pub fn new(api: ApiClient, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    /// Lessons of a class on a day, ordered by lesson number.
    pub async fn get_lessons(&self, class_name: &str, day: DayOfWeek) -> RepoResult<Vec<LessonUi>> {
        self.api
            .get_lessons(class_name, day)
            .await
            .map(|dtos| {
                let mut lessons: Vec<LessonUi> = dtos.into_iter().map(LessonUi::from).collect();
                sort_lessons(&mut lessons);
                lessons
            })
            .into()
    }

    pub async fn create_lesson(&self, lesson: &LessonDto) -> RepoResult<String> {
        let token = self.session.token();
        self.api.create_lesson(token.as_deref(), lesson).await.into()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Fixture;
    use super::*;
    use crate::adapters::mock::MockResponse;
    use crate::session::Role;
    use serde_json::json;

    #[tokio::test]
    async fn test_lessons_sorted_by_number() {
        let fx = Fixture::new();
        fx.http.set_default_response(MockResponse::json(json!([
            {"className": "7B", "dayOfWeek": "monday", "lessonNumber": 3, "subjectName": "Art"},
            {"className": "7B", "dayOfWeek": "monday", "lessonNumber": 1, "subjectName": "Math",
             "startTime": "08:30:00", "endTime": "09:15:00"}
        ])));

        let lessons = fx
            .repos
            .lesson
            .get_lessons("7B", DayOfWeek::Monday)
            .await
            .into_result()
            .unwrap();

        assert_eq!(lessons[0].subject_name, "Math");
        assert_eq!(lessons[0].time_range.as_deref(), Some("08:30-09:15"));
        assert_eq!(
            fx.http.last_request().unwrap().url,
            Fixture::url("/lessons?className=7B&dayOfWeek=monday")
        );
    }

    #[tokio::test]
    async fn test_create_lesson() {
        let fx = Fixture::signed_in(Role::Admin);
        fx.http.set_default_response(MockResponse::status(201, ""));
        let lesson: LessonDto = serde_json::from_value(json!({
            "className": "7B", "dayOfWeek": "friday", "lessonNumber": 2, "subjectName": "Music"
        }))
        .unwrap();

        let result = fx.repos.lesson.create_lesson(&lesson).await;

        assert_eq!(result, RepoResult::Success("Lesson created".to_string()));
        assert_eq!(
            fx.http.last_request().unwrap().authorization(),
            Some("Bearer T1")
        );
    }
}
