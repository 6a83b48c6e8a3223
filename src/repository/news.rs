//! News feed, cached for 10 minutes by default.

use std::sync::Arc;

use crate::api::{ApiClient, Endpoint, NewsDto};
use crate::cache::{Cached, ResponseCache};
use crate::error::{ClientError, RepoResult};
use crate::models::NewsUi;
use crate::session::SessionStore;

#[derive(Debug)]
pub struct NewsRepository {
    api: ApiClient,
    session: Arc<SessionStore>,
    cache: ResponseCache,
}

impl NewsRepository {
    pub fn new(api: ApiClient, session: Arc<SessionStore>, cache: ResponseCache) -> Self {
        Self {
            api,
            session,
            cache,
        }
    }

    pub async fn get_all_news(&self) -> RepoResult<Cached<Vec<NewsUi>>> {
        self.fetch_list(&Endpoint::ListNews, "all").await
    }

    /// Search titles and descriptions. A blank query lists everything.
    pub async fn search_news(&self, query: &str) -> RepoResult<Cached<Vec<NewsUi>>> {
        let query = query.trim();
        if query.is_empty() {
            return self.get_all_news().await;
        }
        let key = format!("search:{}", query);
        self.fetch_list(&Endpoint::SearchNews(query.to_string()), &key)
            .await
    }

    /// Publish a post authored by the signed-in user.
    pub async fn add_news(
        &self,
        title: &str,
        description: &str,
        url: Option<&str>,
    ) -> RepoResult<String> {
        let snapshot = self.session.snapshot();
        let (Some(token), Some(user_id)) = (
            snapshot.auth_token.filter(|t| !t.is_empty()),
            snapshot.user_id,
        ) else {
            return ClientError::Unauthenticated.into();
        };

        let news = NewsDto {
            news_id: None,
            user_id,
            title: title.trim().to_string(),
            description: description.to_string(),
            url: url.map(str::trim).filter(|u| !u.is_empty()).map(str::to_string),
            created_at: None,
        };
        let result = self.api.add_news(Some(&token), &news).await;
        super::invalidate_on_success(&self.cache, result).await
    }

    pub async fn delete_news(&self, news_id: &str) -> RepoResult<String> {
        let token = self.session.token();
        let result = self.api.delete_news(token.as_deref(), news_id).await;
        super::invalidate_on_success(&self.cache, result).await
    }

    /// Drop every cached news response.
    pub async fn clear_cache(&self) -> RepoResult<usize> {
        super::storage_result(self.cache.clear().await)
    }

    /// Drop expired news responses.
    pub async fn purge_expired(&self) -> RepoResult<usize> {
        super::storage_result(self.cache.purge_expired().await)
    }

    async fn fetch_list(&self, endpoint: &Endpoint, key: &str) -> RepoResult<Cached<Vec<NewsUi>>> {
        super::cached_fetch::<Option<Vec<NewsDto>>>(&self.api, &self.cache, endpoint, key)
            .await
            .map(|cached| {
                cached.map(|dtos| dtos.unwrap_or_default().into_iter().map(NewsUi::from).collect())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Fixture;
    use super::*;
    use crate::adapters::mock::MockResponse;
    use crate::session::Role;
    use crate::traits::KeyValueStore;
    use chrono::Duration;
    use serde_json::json;

    fn feed() -> serde_json::Value {
        json!([
            {"newsId": "N1", "userId": "U1", "title": "Exam week", "description": "Bring pencils"},
            {"newsId": "N2", "userId": "U1", "title": "Sports day", "description": "Friday"}
        ])
    }

    #[tokio::test]
    async fn test_news_ttl_is_ten_minutes() {
        let fx = Fixture::new();
        fx.http.set_default_response(MockResponse::json(feed()));
        fx.repos.news.get_all_news().await;
        fx.http.set_default_response(MockResponse::offline());

        fx.clock.advance(Duration::minutes(9));
        let cached = fx.repos.news.get_all_news().await.into_result().unwrap();
        assert_eq!(cached.data.len(), 2);
        assert!(cached.is_stale());

        fx.clock.advance(Duration::minutes(1));
        assert!(fx.repos.news.get_all_news().await.is_error());
    }

    #[tokio::test]
    async fn test_search_is_encoded_and_cached_per_query() {
        let fx = Fixture::new();
        fx.http.set_default_response(MockResponse::json(json!([])));

        fx.repos.news.search_news(" exam week ").await;

        assert_eq!(
            fx.http.last_request().unwrap().url,
            Fixture::url("/news/search/exam%20week")
        );
        assert!(fx
            .store
            .get("cache:news:search:exam week")
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_search_cache_keeps_query_case() {
        let fx = Fixture::new();
        fx.http.set_default_response(MockResponse::json(feed()));
        fx.repos.news.search_news("Exam").await;
        fx.http.set_default_response(MockResponse::offline());

        let other_case = fx.repos.news.search_news("exam").await;
        let same_case = fx.repos.news.search_news("Exam").await;

        assert!(other_case.is_error());
        assert!(same_case.into_result().unwrap().is_stale());
        assert!(fx.store.get("cache:news:search:Exam").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_blank_search_lists_all() {
        let fx = Fixture::new();
        fx.http.set_default_response(MockResponse::json(feed()));

        let cached = fx.repos.news.search_news("   ").await.into_result().unwrap();

        assert_eq!(cached.data.len(), 2);
        assert_eq!(fx.http.last_request().unwrap().url, Fixture::url("/news"));
    }

    #[tokio::test]
    async fn test_add_news_uses_session_author() {
        let fx = Fixture::signed_in(Role::Teacher);
        fx.http.set_default_response(MockResponse::json(feed()));
        fx.repos.news.get_all_news().await;

        fx.http.set_default_response(MockResponse::status(201, ""));
        let result = fx
            .repos
            .news
            .add_news("  Trip ", "Museum on Monday", Some(""))
            .await;

        assert_eq!(result, RepoResult::Success("News added".to_string()));
        let sent = fx.http.last_request().unwrap();
        let body: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"userId": "U1", "title": "Trip", "description": "Museum on Monday"})
        );
        assert!(fx.store.get("cache:news:all").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_news_requires_session() {
        let fx = Fixture::new();
        let result = fx.repos.news.add_news("Trip", "", None).await;
        assert_eq!(result, RepoResult::error("Unauthenticated"));
        assert_eq!(fx.http.request_count(), 0);
    }

    #[tokio::test]
    async fn test_domain_error_on_delete() {
        let fx = Fixture::signed_in(Role::Student);
        fx.http.set_default_response(MockResponse::json(
            json!({"success": false, "message": "Only the author can delete"}),
        ));

        let result = fx.repos.news.delete_news("N1").await;

        assert_eq!(result, RepoResult::error("Only the author can delete"));
    }
}
