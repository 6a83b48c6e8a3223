//! Grade book screen state.

use std::sync::Arc;

use super::holder::StateHolder;
use super::validation;
use crate::api::{ClassGradesFilter, GradeDto, MyGradesFilter, UpdateGradeRequest};
use crate::models::{GradeColor, GradeSummary};
use crate::repository::GradeRepository;

#[derive(Debug)]
pub struct GradeHolder {
    core: StateHolder<GradeSummary>,
    repo: Arc<GradeRepository>,
}

impl std::ops::Deref for GradeHolder {
    type Target = StateHolder<GradeSummary>;

    fn deref(&self) -> &Self::Target {
        &self.core
    }
}

impl GradeHolder {
    pub fn new(repo: Arc<GradeRepository>) -> Self {
        Self {
            core: StateHolder::new(GradeSummary::default()),
            repo,
        }
    }

    pub fn load_my_grades(&self, filter: MyGradesFilter) {
        let repo = Arc::clone(&self.repo);
        self.core
            .load(async move { repo.get_my_grades(&filter).await }, |state, summary| {
                state.data = summary
            });
    }

    pub fn load_class_grades(&self, filter: ClassGradesFilter) {
        let repo = Arc::clone(&self.repo);
        self.core.load(
            async move { repo.get_class_grades(&filter).await },
            |state, summary| state.data = summary,
        );
    }

    pub fn add_grade(&self, grade: GradeDto) {
        if let Err(e) = validation::grade(&grade) {
            self.core.reject(e.to_string());
            return;
        }
        let repo = Arc::clone(&self.repo);
        self.core
            .write(async move { repo.add_grade(&grade).await }, |_| {});
    }

    pub fn update_grade(&self, grade_id: &str, request: UpdateGradeRequest) {
        if let Err(e) = validation::grade_update(&request) {
            self.core.reject(e.to_string());
            return;
        }
        let repo = Arc::clone(&self.repo);
        let id = grade_id.to_string();
        let updated = id.clone();
        let applied = request.clone();
        self.core.write(
            async move { repo.update_grade(&id, &request).await },
            move |state| {
                let mut grades = std::mem::take(&mut state.data.grades);
                for grade in grades
                    .iter_mut()
                    .filter(|g| g.grade_id.as_deref() == Some(updated.as_str()))
                {
                    if let Some(value) = applied.grade_value {
                        grade.grade_value = value;
                        grade.color = GradeColor::for_value(value);
                    }
                    if let Some(grade_type) = applied.grade_type {
                        grade.grade_type = grade_type;
                    }
                    if let Some(comment) = &applied.comment {
                        grade.comment = Some(comment.clone());
                    }
                }
                state.data = GradeSummary::new(grades);
            },
        );
    }

    pub fn delete_grade(&self, grade_id: &str) {
        let repo = Arc::clone(&self.repo);
        let id = grade_id.to_string();
        let removed = id.clone();
        self.core.write(
            async move { repo.delete_grade(&id).await },
            move |state| {
                let mut grades = std::mem::take(&mut state.data.grades);
                grades.retain(|g| g.grade_id.as_deref() != Some(removed.as_str()));
                state.data = GradeSummary::new(grades);
            },
        );
    }
}
