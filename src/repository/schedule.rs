//! Class schedules, cached for 30 minutes by default.

use std::sync::Arc;

use crate::api::{ApiClient, CreateScheduleRequest, DayOfWeek, Endpoint, ScheduleDto};
use crate::cache::{Cached, ResponseCache};
use crate::error::RepoResult;
use crate::models::ScheduleUi;
use crate::session::SessionStore;

#[derive(Debug)]
pub struct ScheduleRepository {
    api: ApiClient,
    session: Arc<SessionStore>,
    cache: ResponseCache,
}

impl ScheduleRepository {
    pub fn new(api: ApiClient, session: Arc<SessionStore>, cache: ResponseCache) -> Self {
        Self {
            api,
            session,
            cache,
        }
    }

    /// One class's schedule for one day; `None` when the server has none.
    pub async fn get_schedule(
        &self,
        class_name: &str,
        day: DayOfWeek,
    ) -> RepoResult<Cached<Option<ScheduleUi>>> {
        let endpoint = Endpoint::ScheduleForClassDay {
            class_name: class_name.to_string(),
            day,
        };
        let key = format!("class:{}:{}", class_name, day);
        super::cached_fetch::<Option<ScheduleDto>>(&self.api, &self.cache, &endpoint, &key)
            .await
            .map(|cached| cached.map(|dto| dto.map(ScheduleUi::from)))
    }

    /// Every class's schedule for `day`.
    pub async fn get_schedules_by_day(&self, day: DayOfWeek) -> RepoResult<Cached<Vec<ScheduleUi>>> {
        let key = format!("day:{}", day);
        self.fetch_list(&Endpoint::SchedulesByDay(day), &key).await
    }

    pub async fn get_all_schedules(&self) -> RepoResult<Cached<Vec<ScheduleUi>>> {
        self.fetch_list(&Endpoint::AllSchedules, "all").await
    }

    pub async fn add_schedule(&self, request: &CreateScheduleRequest) -> RepoResult<String> {
        let token = self.session.token();
        let result = self.api.add_schedule(token.as_deref(), request).await;
        super::invalidate_on_success(&self.cache, result).await
    }

    pub async fn delete_schedule(&self, schedule_id: &str) -> RepoResult<String> {
        let token = self.session.token();
        let result = self.api.delete_schedule(token.as_deref(), schedule_id).await;
        super::invalidate_on_success(&self.cache, result).await
    }

    /// Drop every cached schedule response.
    pub async fn clear_cache(&self) -> RepoResult<usize> {
        super::storage_result(self.cache.clear().await)
    }

    /// Drop expired schedule responses.
    pub async fn purge_expired(&self) -> RepoResult<usize> {
        super::storage_result(self.cache.purge_expired().await)
    }

    async fn fetch_list(&self, endpoint: &Endpoint, key: &str) -> RepoResult<Cached<Vec<ScheduleUi>>> {
        super::cached_fetch::<Option<Vec<ScheduleDto>>>(&self.api, &self.cache, endpoint, key)
            .await
            .map(|cached| {
                cached.map(|dtos| {
                    dtos.unwrap_or_default()
                        .into_iter()
                        .map(ScheduleUi::from)
                        .collect()
                })
            })
    }
}
