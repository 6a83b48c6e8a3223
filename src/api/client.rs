//! Typed client for the school REST API.
//!
//! The client holds no session state: callers pass the bearer token for each
//! call, and endpoints that require one fail with
//! [`ClientError::Unauthenticated`] before anything is sent.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use crate::error::{ClientError, ClientResult};
use crate::traits::{Headers, HttpClient};

use super::dto::{
    AuthResponse, ClassGradesFilter, CreateScheduleRequest, DayOfWeek, GradeDto, LessonDto,
    LoginRequest, MessageResponse, MyGradesFilter, NewsDto, RegisterRequest, UpdateGradeRequest,
    UpdateUserRequest, UserProfileDto,
};
use super::endpoint::Endpoint;

/// Client for the school REST API.
#[derive(Clone)]
pub struct ApiClient {
    /// Base URL without trailing slash
    base_url: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(base_url: &str, http: Arc<dyn HttpClient>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of an endpoint.
    pub fn url(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    /// Send a request and return the body text of a successful response.
    ///
    /// Non-2xx statuses become [`ClientError::Http`]; a 2xx JSON body with
    /// `"success": false` becomes [`ClientError::Domain`].
    pub async fn fetch_raw(
        &self,
        endpoint: &Endpoint,
        token: Option<&str>,
        body: Option<String>,
    ) -> ClientResult<String> {
        let mut headers = Headers::new();
        headers.insert("Accept".to_string(), "application/json".to_string());
        if endpoint.requires_auth() {
            let token = token
                .filter(|t| !t.is_empty())
                .ok_or(ClientError::Unauthenticated)?;
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }

        let url = self.url(endpoint);
        tracing::debug!(method = %endpoint.method(), %url, "api request");

        let response = self
            .http
            .send(endpoint.method(), &url, body.as_deref(), &headers)
            .await?;

        if !response.is_success() {
            tracing::debug!(status = response.status, %url, "api request failed");
            let body = String::from_utf8_lossy(&response.body);
            return Err(ClientError::from_status(response.status, &body));
        }

        let text = response
            .text()
            .map_err(|e| ClientError::Decode(format!("response is not UTF-8: {}", e)))?;

        check_envelope(&text)?;
        Ok(text)
    }

    /// Send a request and decode the JSON response into `T`.
    pub async fn call<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        token: Option<&str>,
        body: Option<String>,
    ) -> ClientResult<T> {
        let text = self.fetch_raw(endpoint, token, body).await?;
        decode(&text)
    }

    /// Fetch a list. A `null` or empty body is an empty list.
    async fn call_list<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        token: Option<&str>,
    ) -> ClientResult<Vec<T>> {
        let list: Option<Vec<T>> = self.call(endpoint, token, None).await?;
        Ok(list.unwrap_or_default())
    }

    /// Send a write request and return the server's confirmation text.
    ///
    /// Write endpoints answer with anything from an empty body to the created
    /// record; only a `message` field is used, otherwise `fallback`.
    async fn confirm(
        &self,
        endpoint: &Endpoint,
        token: Option<&str>,
        body: Option<String>,
        fallback: &str,
    ) -> ClientResult<String> {
        let text = self.fetch_raw(endpoint, token, body).await?;
        Ok(serde_json::from_str::<MessageResponse>(&text)
            .ok()
            .and_then(|r| r.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string()))
    }

    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<AuthResponse> {
        self.call(&Endpoint::Register, None, Some(to_body(request)?))
            .await
    }

    pub async fn login(&self, request: &LoginRequest) -> ClientResult<AuthResponse> {
        self.call(&Endpoint::Login, None, Some(to_body(request)?))
            .await
    }

    pub async fn get_user(&self, token: Option<&str>, user_id: &str) -> ClientResult<UserProfileDto> {
        self.call(&Endpoint::UserById(user_id.to_string()), token, None)
            .await
    }

    pub async fn get_user_info(&self, token: Option<&str>) -> ClientResult<UserProfileDto> {
        self.call(&Endpoint::UserInfo, token, None).await
    }

    pub async fn update_user(
        &self,
        token: Option<&str>,
        login: &str,
        request: &UpdateUserRequest,
    ) -> ClientResult<String> {
        self.confirm(
            &Endpoint::UpdateUser(login.to_string()),
            token,
            Some(to_body(request)?),
            "Profile updated",
        )
        .await
    }

    pub async fn add_news(&self, token: Option<&str>, news: &NewsDto) -> ClientResult<String> {
        self.confirm(&Endpoint::AddNews, token, Some(to_body(news)?), "News added")
            .await
    }

    pub async fn delete_news(&self, token: Option<&str>, news_id: &str) -> ClientResult<String> {
        self.confirm(
            &Endpoint::DeleteNews(news_id.to_string()),
            token,
            None,
            "News deleted",
        )
        .await
    }

    pub async fn add_schedule(
        &self,
        token: Option<&str>,
        request: &CreateScheduleRequest,
    ) -> ClientResult<String> {
        self.confirm(
            &Endpoint::AddSchedule,
            token,
            Some(to_body(request)?),
            "Schedule added",
        )
        .await
    }

    pub async fn delete_schedule(&self, token: Option<&str>, schedule_id: &str) -> ClientResult<String> {
        self.confirm(
            &Endpoint::DeleteSchedule(schedule_id.to_string()),
            token,
            None,
            "Schedule deleted",
        )
        .await
    }

    pub async fn add_grade(&self, token: Option<&str>, grade: &GradeDto) -> ClientResult<String> {
        self.confirm(&Endpoint::AddGrade, token, Some(to_body(grade)?), "Grade added")
            .await
    }

    pub async fn get_my_grades(
        &self,
        token: Option<&str>,
        filter: &MyGradesFilter,
    ) -> ClientResult<Vec<GradeDto>> {
        self.call_list(&Endpoint::MyGrades(filter.clone()), token)
            .await
    }

    pub async fn get_class_grades(
        &self,
        token: Option<&str>,
        filter: &ClassGradesFilter,
    ) -> ClientResult<Vec<GradeDto>> {
        self.call_list(&Endpoint::ClassGrades(filter.clone()), token)
            .await
    }

    pub async fn update_grade(
        &self,
        token: Option<&str>,
        grade_id: &str,
        request: &UpdateGradeRequest,
    ) -> ClientResult<String> {
        self.confirm(
            &Endpoint::UpdateGrade(grade_id.to_string()),
            token,
            Some(to_body(request)?),
            "Grade updated",
        )
        .await
    }

    pub async fn delete_grade(&self, token: Option<&str>, grade_id: &str) -> ClientResult<String> {
        self.confirm(
            &Endpoint::DeleteGrade(grade_id.to_string()),
            token,
            None,
            "Grade deleted",
        )
        .await
    }

    pub async fn get_lessons(&self, class_name: &str, day: DayOfWeek) -> ClientResult<Vec<LessonDto>> {
        self.call_list(
            &Endpoint::LessonsByClassDay {
                class_name: class_name.to_string(),
                day,
            },
            None,
        )
        .await
    }

    pub async fn create_lesson(&self, token: Option<&str>, lesson: &LessonDto) -> ClientResult<String> {
        self.confirm(&Endpoint::CreateLesson, token, Some(to_body(lesson)?), "Lesson created")
            .await
    }
}

/// Decode a response body. An empty body decodes as JSON `null`.
pub fn decode<T: DeserializeOwned>(text: &str) -> ClientResult<T> {
    let text = if text.trim().is_empty() { "null" } else { text };
    serde_json::from_str(text).map_err(|e| ClientError::Decode(e.to_string()))
}

/// Reject 2xx bodies of the form `{"success": false, "message": ...}`.
fn check_envelope(text: &str) -> ClientResult<()> {
    let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(text) else {
        return Ok(());
    };
    if map.get("success").and_then(|s| s.as_bool()) == Some(false) {
        let message = map
            .get("message")
            .or_else(|| map.get("error"))
            .and_then(|m| m.as_str())
            .unwrap_or("Request rejected by server");
        return Err(ClientError::Domain(message.to_string()));
    }
    Ok(())
}

fn to_body<T: Serialize>(value: &T) -> ClientResult<String> {
    serde_json::to_string(value).map_err(|e| ClientError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::traits::{HttpError, Method};

    const BASE: &str = "http://school.test";

    fn client(mock: &MockHttpClient) -> ApiClient {
        ApiClient::new(BASE, Arc::new(mock.clone()))
    }

    #[tokio::test]
    async fn test_authenticated_endpoint_without_token_sends_nothing() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::json(serde_json::json!([])));

        let result = client(&mock).get_user_info(None).await;

        assert!(matches!(result, Err(ClientError::Unauthenticated)));
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_bearer_header_is_attached() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::json(serde_json::json!({"message": "ok"})));

        let message = client(&mock).delete_news(Some("T1"), "N1").await.unwrap();

        assert_eq!(message, "ok");
        let request = mock.last_request().unwrap();
        assert_eq!(request.method, Method::Delete);
        assert_eq!(request.url, "http://school.test/news/N1");
        assert_eq!(request.authorization(), Some("Bearer T1"));
    }

    #[tokio::test]
    async fn test_public_endpoint_has_no_auth_header() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::json(serde_json::json!([])));

        let lessons = client(&mock)
            .get_lessons("7B", DayOfWeek::Monday)
            .await
            .unwrap();

        assert!(lessons.is_empty());
        assert_eq!(mock.last_request().unwrap().authorization(), None);
    }

    #[tokio::test]
    async fn test_failure_classification() {
        let mock = MockHttpClient::new();
        let api = client(&mock);

        mock.set_default_response(MockResponse::Error(HttpError::Timeout("30s".into())));
        assert!(matches!(
            api.get_lessons("7B", DayOfWeek::Monday).await,
            Err(ClientError::Transport(HttpError::Timeout(_)))
        ));

        mock.set_default_response(MockResponse::status(503, ""));
        assert!(matches!(
            api.get_lessons("7B", DayOfWeek::Monday).await,
            Err(ClientError::Http { status: 503, .. })
        ));

        mock.set_default_response(MockResponse::json(serde_json::json!({"lessons": 3})));
        assert!(matches!(
            api.get_lessons("7B", DayOfWeek::Monday).await,
            Err(ClientError::Decode(_))
        ));

        mock.set_default_response(MockResponse::json(
            serde_json::json!({"success": false, "message": "Wrong password"}),
        ));
        let result = api
            .login(&LoginRequest {
                email: "m.znakin@mail.ru".into(),
                password: "nope".into(),
            })
            .await;
        assert!(matches!(result, Err(ClientError::Domain(ref m)) if m == "Wrong password"));
    }

    #[tokio::test]
    async fn test_empty_write_response_uses_fallback_message() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::status(204, ""));

        let message = client(&mock).delete_grade(Some("T1"), "G1").await.unwrap();
        assert_eq!(message, "Grade deleted");
    }

    #[tokio::test]
    async fn test_created_record_response_uses_fallback_message() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::json(serde_json::json!({"lessonId": "L9"})));

        let lesson: LessonDto = serde_json::from_value(serde_json::json!({
            "className": "7B", "dayOfWeek": "monday", "lessonNumber": 1, "subjectName": "Art"
        }))
        .unwrap();
        let message = client(&mock).create_lesson(Some("T1"), &lesson).await.unwrap();
        assert_eq!(message, "Lesson created");
    }

    #[test]
    fn test_decode_empty_body_as_null() {
        let value: Option<Vec<GradeDto>> = decode("").unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_null_grade_and_lesson_lists_are_empty() {
        let mock = MockHttpClient::new();
        mock.set_response(&format!("{}/grades/my", BASE), MockResponse::status(200, "null"));
        mock.set_response(&format!("{}/grades/class", BASE), MockResponse::status(200, ""));
        mock.set_response(&format!("{}/lessons", BASE), MockResponse::status(200, "null"));
        let api = client(&mock);

        let mine = api
            .get_my_grades(Some("T1"), &MyGradesFilter::default())
            .await
            .unwrap();
        let class = api
            .get_class_grades(Some("T1"), &ClassGradesFilter::default())
            .await
            .unwrap();
        let lessons = api.get_lessons("7B", DayOfWeek::Monday).await.unwrap();

        assert!(mine.is_empty());
        assert!(class.is_empty());
        assert!(lessons.is_empty());
    }

    #[tokio::test]
    async fn test_non_utf8_error_body_keeps_status() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Success(crate::traits::Response::new(
            401,
            bytes::Bytes::from_static(&[0xff, 0xfe, 0xfd]),
        )));

        let err = client(&mock).get_user_info(Some("T1")).await.unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert!(err.requires_reauth());
    }
}
