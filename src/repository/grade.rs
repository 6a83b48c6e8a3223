//! Grade records. Not cached.
//!
//! Values are passed through as given; range checks belong to the view
//! state layer.

use std::sync::Arc;

use crate::api::{ApiClient, ClassGradesFilter, GradeDto, MyGradesFilter, UpdateGradeRequest};
use crate::error::RepoResult;
use crate::models::GradeSummary;
use crate::session::SessionStore;

#[derive(Debug)]
pub struct GradeRepository {
    api: ApiClient,
    session: Arc<SessionStore>,
}

impl GradeRepository {
    pub fn new(api: ApiClient, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    pub async fn add_grade(&self, grade: &GradeDto) -> RepoResult<String> {
        let token = self.session.token();
        let result = self.api.add_grade(token.as_deref(), grade).await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, student_id = %grade.student_id, "failed to add grade");
        }
        result.into()
    }

    /// The signed-in student's grades with averages.
    pub async fn get_my_grades(&self, filter: &MyGradesFilter) -> RepoResult<GradeSummary> {
        let token = self.session.token();
        self.api
            .get_my_grades(token.as_deref(), filter)
            .await
            .map(GradeSummary::from_dtos)
            .into()
    }

    pub async fn get_class_grades(&self, filter: &ClassGradesFilter) -> RepoResult<GradeSummary> {
        let token = self.session.token();
        self.api
            .get_class_grades(token.as_deref(), filter)
            .await
            .map(GradeSummary::from_dtos)
            .into()
    }

    pub async fn update_grade(
        &self,
        grade_id: &str,
        request: &UpdateGradeRequest,
    ) -> RepoResult<String> {
        let token = self.session.token();
        self.api
            .update_grade(token.as_deref(), grade_id, request)
            .await
            .into()
    }

    pub async fn delete_grade(&self, grade_id: &str) -> RepoResult<String> {
        let token = self.session.token();
        self.api.delete_grade(token.as_deref(), grade_id).await.into()
    }
}
