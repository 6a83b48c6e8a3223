//! Repositories: the boundary between view state and the remote API.
//!
//! Every operation returns a [`RepoResult`]; no error type escapes. Schedule
//! and news reads are cached and fall back to a fresh cache entry when the
//! network call fails. Successful writes clear the resource's cache
//! namespace.

pub mod auth;
pub mod grade;
pub mod lesson;
pub mod news;
pub mod schedule;
pub mod user;

pub use auth::{AuthRepository, PersistedSession, TOKEN_KEY, USER_LOGIN_KEY};
pub use grade::GradeRepository;
pub use lesson::LessonRepository;
pub use news::NewsRepository;
pub use schedule::ScheduleRepository;
pub use user::UserRepository;

use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::api::{decode, ApiClient, Endpoint};
use crate::cache::{Cached, DataOrigin, ResponseCache};
use crate::config::ClientConfig;
use crate::error::{ClientResult, RepoResult};
use crate::session::SessionStore;
use crate::traits::{Clock, HttpClient, KeyValueStore};

/// Cache namespace for schedule responses.
pub const SCHEDULE_NAMESPACE: &str = "schedule";

/// Cache namespace for news responses.
pub const NEWS_NAMESPACE: &str = "news";

/// Every repository, wired to one API client, session, and store.
#[derive(Debug, Clone)]
pub struct Repositories {
    pub auth: Arc<AuthRepository>,
    pub user: Arc<UserRepository>,
    pub schedule: Arc<ScheduleRepository>,
    pub news: Arc<NewsRepository>,
    pub grade: Arc<GradeRepository>,
    pub lesson: Arc<LessonRepository>,
}

impl Repositories {
    pub fn new(
        config: &ClientConfig,
        http: Arc<dyn HttpClient>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        session: Arc<SessionStore>,
    ) -> Self {
        let api = ApiClient::new(&config.base_url, http);
        let schedule_cache = ResponseCache::new(
            Arc::clone(&store),
            Arc::clone(&clock),
            SCHEDULE_NAMESPACE,
            config.schedule_ttl,
        );
        let news_cache = ResponseCache::new(
            Arc::clone(&store),
            clock,
            NEWS_NAMESPACE,
            config.news_ttl,
        );

        Self {
            auth: Arc::new(AuthRepository::new(
                api.clone(),
                Arc::clone(&session),
                store,
            )),
            user: Arc::new(UserRepository::new(api.clone(), Arc::clone(&session))),
            schedule: Arc::new(ScheduleRepository::new(
                api.clone(),
                Arc::clone(&session),
                schedule_cache,
            )),
            news: Arc::new(NewsRepository::new(
                api.clone(),
                Arc::clone(&session),
                news_cache,
            )),
            grade: Arc::new(GradeRepository::new(api.clone(), Arc::clone(&session))),
            lesson: Arc::new(LessonRepository::new(api, session)),
        }
    }
}

/// Network first, cache second.
///
/// On success the raw body is cached under `key`. On any failure (transport,
/// status, envelope, or decoding) a fresh entry for the same key is served
/// instead; without one the original failure is returned.
pub(crate) async fn cached_fetch<T: DeserializeOwned>(
    api: &ApiClient,
    cache: &ResponseCache,
    endpoint: &Endpoint,
    key: &str,
) -> RepoResult<Cached<T>> {
    let failure = match api.fetch_raw(endpoint, None, None).await {
        Ok(text) => match decode::<T>(&text) {
            Ok(data) => {
                if let Err(e) = cache.put(key, &text).await {
                    tracing::warn!(namespace = cache.namespace(), key, error = %e, "failed to cache response");
                }
                return RepoResult::Success(Cached::fresh(data));
            }
            Err(e) => e,
        },
        Err(e) => e,
    };

    match cache.get_fresh(key).await {
        Ok(Some(entry)) => match decode::<T>(&entry.payload) {
            Ok(data) => {
                tracing::warn!(
                    namespace = cache.namespace(),
                    key,
                    error = %failure,
                    category = %failure.category(),
                    cached_at = %entry.cached_at,
                    "serving cached response"
                );
                RepoResult::Success(Cached {
                    data,
                    origin: DataOrigin::Cache {
                        cached_at: entry.cached_at,
                    },
                })
            }
            Err(e) => {
                tracing::warn!(namespace = cache.namespace(), key, error = %e, "cached response unreadable");
                failure.into()
            }
        },
        Ok(None) => {
            tracing::warn!(
                namespace = cache.namespace(),
                key,
                error = %failure,
                category = %failure.category(),
                "request failed, no cached response"
            );
            failure.into()
        }
        Err(e) => {
            tracing::warn!(namespace = cache.namespace(), key, error = %e, "cache read failed");
            failure.into()
        }
    }
}

/// Finish a write: clear the namespace on success.
pub(crate) async fn invalidate_on_success(
    cache: &ResponseCache,
    result: ClientResult<String>,
) -> RepoResult<String> {
    match result {
        Ok(message) => {
            if let Err(e) = cache.clear().await {
                tracing::warn!(namespace = cache.namespace(), error = %e, "failed to clear cache");
            }
            RepoResult::Success(message)
        }
        Err(e) => {
            tracing::warn!(
                namespace = cache.namespace(),
                error = %e,
                category = %e.category(),
                code = e.error_code(),
                "write failed"
            );
            e.into()
        }
    }
}

/// Map a cache maintenance call into a [`RepoResult`].
pub(crate) fn storage_result<T>(result: Result<T, crate::traits::StoreError>) -> RepoResult<T> {
    result.map_err(crate::error::ClientError::from).into()
}
