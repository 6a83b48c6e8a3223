//! Lesson list screen state.

use std::sync::Arc;

use super::holder::StateHolder;
use super::validation;
use crate::api::{DayOfWeek, LessonDto};
use crate::models::LessonUi;
use crate::repository::LessonRepository;

#[derive(Debug)]
pub struct LessonHolder {
    core: StateHolder<Vec<LessonUi>>,
    repo: Arc<LessonRepository>,
}

impl std::ops::Deref for LessonHolder {
    type Target = StateHolder<Vec<LessonUi>>;

    fn deref(&self) -> &Self::Target {
        &self.core
    }
}

impl LessonHolder {
    pub fn new(repo: Arc<LessonRepository>) -> Self {
        Self {
            core: StateHolder::new(Vec::new()),
            repo,
        }
    }

    pub fn load_lessons(&self, class_name: &str, day: DayOfWeek) {
        let repo = Arc::clone(&self.repo);
        let class_name = class_name.to_string();
        self.core.load(
            async move { repo.get_lessons(&class_name, day).await },
            |state, lessons| state.data = lessons,
        );
    }

    pub fn create_lesson(&self, lesson: LessonDto) {
        if let Err(e) = validation::lesson(&lesson) {
            self.core.reject(e.to_string());
            return;
        }
        let repo = Arc::clone(&self.repo);
        self.core
            .write(async move { repo.create_lesson(&lesson).await }, |_| {});
    }
}
