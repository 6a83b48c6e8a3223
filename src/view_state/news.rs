//! News feed screen state.

use std::sync::Arc;

use super::holder::StateHolder;
use super::validation;
use crate::models::NewsUi;
use crate::repository::NewsRepository;

#[derive(Debug)]
pub struct NewsHolder {
    core: StateHolder<Vec<NewsUi>>,
    repo: Arc<NewsRepository>,
}

impl std::ops::Deref for NewsHolder {
    type Target = StateHolder<Vec<NewsUi>>;

    fn deref(&self) -> &Self::Target {
        &self.core
    }
}

impl NewsHolder {
    pub fn new(repo: Arc<NewsRepository>) -> Self {
        Self {
            core: StateHolder::new(Vec::new()),
            repo,
        }
    }

    pub fn load_news(&self) {
        let repo = Arc::clone(&self.repo);
        self.core
            .load(async move { repo.get_all_news().await }, |state, cached| {
                state.is_stale = cached.is_stale();
                state.data = cached.data;
            });
    }

    pub fn search(&self, query: &str) {
        let repo = Arc::clone(&self.repo);
        let query = query.to_string();
        self.core
            .load(async move { repo.search_news(&query).await }, |state, cached| {
                state.is_stale = cached.is_stale();
                state.data = cached.data;
            });
    }

    pub fn add_news(&self, title: &str, description: &str, url: Option<&str>) {
        if let Err(e) = validation::not_blank("Title", title) {
            self.core.reject(e.to_string());
            return;
        }
        let repo = Arc::clone(&self.repo);
        let (title, description) = (title.to_string(), description.to_string());
        let url = url.map(str::to_string);
        self.core.write(
            async move { repo.add_news(&title, &description, url.as_deref()).await },
            |_| {},
        );
    }

    pub fn delete_news(&self, news_id: &str) {
        let repo = Arc::clone(&self.repo);
        let id = news_id.to_string();
        let removed = id.clone();
        self.core.write(
            async move { repo.delete_news(&id).await },
            move |state| {
                state
                    .data
                    .retain(|n| n.news_id.as_deref() != Some(removed.as_str()))
            },
        );
    }
}
