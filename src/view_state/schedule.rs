//! Timetable screen state.

use std::sync::Arc;

use super::holder::StateHolder;
use super::validation;
use crate::api::{CreateScheduleRequest, DayOfWeek};
use crate::models::ScheduleUi;
use crate::repository::ScheduleRepository;

#[derive(Debug)]
pub struct ScheduleHolder {
    core: StateHolder<Vec<ScheduleUi>>,
    repo: Arc<ScheduleRepository>,
}

impl std::ops::Deref for ScheduleHolder {
    type Target = StateHolder<Vec<ScheduleUi>>;

    fn deref(&self) -> &Self::Target {
        &self.core
    }
}

impl ScheduleHolder {
    pub fn new(repo: Arc<ScheduleRepository>) -> Self {
        Self {
            core: StateHolder::new(Vec::new()),
            repo,
        }
    }

    /// One class on one day.
    pub fn load_schedule(&self, class_name: &str, day: DayOfWeek) {
        let repo = Arc::clone(&self.repo);
        let class_name = class_name.to_string();
        self.core.load(
            async move { repo.get_schedule(&class_name, day).await },
            |state, cached| {
                state.is_stale = cached.is_stale();
                state.data = cached.data.into_iter().collect();
            },
        );
    }

    /// Every class on one day.
    pub fn load_by_day(&self, day: DayOfWeek) {
        let repo = Arc::clone(&self.repo);
        self.core.load(
            async move { repo.get_schedules_by_day(day).await },
            |state, cached| {
                state.is_stale = cached.is_stale();
                state.data = cached.data;
            },
        );
    }

    pub fn load_all(&self) {
        let repo = Arc::clone(&self.repo);
        self.core
            .load(async move { repo.get_all_schedules().await }, |state, cached| {
                state.is_stale = cached.is_stale();
                state.data = cached.data;
            });
    }

    pub fn add_schedule(&self, request: CreateScheduleRequest) {
        if let Err(e) = validation::schedule(&request) {
            self.core.reject(e.to_string());
            return;
        }
        let repo = Arc::clone(&self.repo);
        self.core
            .write(async move { repo.add_schedule(&request).await }, |_| {});
    }

    pub fn delete_schedule(&self, schedule_id: &str) {
        let repo = Arc::clone(&self.repo);
        let id = schedule_id.to_string();
        let removed = id.clone();
        self.core.write(
            async move { repo.delete_schedule(&id).await },
            move |state| state.data.retain(|s| s.schedule_id != removed),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::MockResponse;
    use crate::repository::test_support::Fixture;
    use crate::session::Role;
    use crate::view_state::OperationResult;
    use serde_json::json;
    use std::time::Duration;

    fn day_json(day: &str, subject: &str) -> serde_json::Value {
        json!([{
            "scheduleId": format!("S-{}", day), "className": "7B", "day": day,
            "lessons": [subject], "office": ["101"]
        }])
    }

    #[tokio::test(start_paused = true)]
    async fn test_racing_loads_publish_the_later_call() {
        let fx = Fixture::new();
        fx.http.set_response(
            &Fixture::url("/schedule/monday"),
            MockResponse::json(day_json("monday", "Math")).after(Duration::from_millis(300)),
        );
        fx.http.set_response(
            &Fixture::url("/schedule/tuesday"),
            MockResponse::json(day_json("tuesday", "Art")).after(Duration::from_millis(20)),
        );
        let holder = ScheduleHolder::new(Arc::clone(&fx.repos.schedule));

        holder.load_by_day(DayOfWeek::Monday);
        holder.load_by_day(DayOfWeek::Tuesday);
        holder.settle().await;

        let state = holder.state();
        assert!(!state.is_loading);
        assert_eq!(state.data.len(), 1);
        assert_eq!(state.data[0].day, DayOfWeek::Tuesday);
    }

    #[tokio::test]
    async fn test_cache_fallback_marks_stale() {
        let fx = Fixture::new();
        fx.http
            .set_default_response(MockResponse::json(day_json("monday", "Math")));
        let holder = ScheduleHolder::new(Arc::clone(&fx.repos.schedule));

        holder.load_by_day(DayOfWeek::Monday);
        holder.settle().await;
        assert!(!holder.state().is_stale);

        fx.http.set_default_response(MockResponse::offline());
        holder.load_by_day(DayOfWeek::Monday);
        holder.settle().await;

        let state = holder.state();
        assert!(state.is_stale);
        assert_eq!(state.error, None);
        assert_eq!(state.data[0].slots[0].subject, "Math");
    }

    #[tokio::test]
    async fn test_invalid_schedule_is_rejected_locally() {
        let fx = Fixture::signed_in(Role::Admin);
        let holder = ScheduleHolder::new(Arc::clone(&fx.repos.schedule));

        holder.add_schedule(CreateScheduleRequest {
            class_name: "7B".to_string(),
            day: DayOfWeek::Monday,
            lessons: vec!["Math".to_string(); 10],
            office: vec!["101".to_string(); 10],
        });
        holder.settle().await;

        assert_eq!(
            holder.take_operation_result(),
            Some(OperationResult::Failure(
                "A day has at most 9 lessons, got 10".to_string()
            ))
        );
        assert_eq!(fx.http.request_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_removes_row() {
        let fx = Fixture::signed_in(Role::Admin);
        fx.http.set_response(
            &Fixture::url("/schedule/monday"),
            MockResponse::json(day_json("monday", "Math")),
        );
        fx.http.set_response(
            &Fixture::url("/schedule/S-monday"),
            MockResponse::json(json!({"message": "Deleted"})),
        );
        let holder = ScheduleHolder::new(Arc::clone(&fx.repos.schedule));
        holder.load_by_day(DayOfWeek::Monday);
        holder.settle().await;

        holder.delete_schedule("S-monday");
        holder.settle().await;

        let state = holder.state();
        assert!(state.data.is_empty());
        assert_eq!(
            state.operation_result,
            Some(OperationResult::Success("Deleted".to_string()))
        );
    }
}
