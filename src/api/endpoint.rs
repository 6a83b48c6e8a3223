//! Declarative table of every remote operation.

use crate::traits::Method;

use super::dto::{ClassGradesFilter, DayOfWeek, MyGradesFilter};

/// One remote operation with its path parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Register,
    Login,
    UserById(String),
    UserInfo,
    UpdateUser(String),
    AddNews,
    ListNews,
    SearchNews(String),
    DeleteNews(String),
    AddSchedule,
    ScheduleForClassDay { class_name: String, day: DayOfWeek },
    SchedulesByDay(DayOfWeek),
    AllSchedules,
    DeleteSchedule(String),
    AddGrade,
    MyGrades(MyGradesFilter),
    ClassGrades(ClassGradesFilter),
    UpdateGrade(String),
    DeleteGrade(String),
    LessonsByClassDay { class_name: String, day: DayOfWeek },
    CreateLesson,
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::Register
            | Endpoint::Login
            | Endpoint::AddNews
            | Endpoint::AddSchedule
            | Endpoint::AddGrade
            | Endpoint::CreateLesson => Method::Post,
            Endpoint::UpdateUser(_) | Endpoint::UpdateGrade(_) => Method::Put,
            Endpoint::DeleteNews(_) | Endpoint::DeleteSchedule(_) | Endpoint::DeleteGrade(_) => {
                Method::Delete
            }
            Endpoint::UserById(_)
            | Endpoint::UserInfo
            | Endpoint::ListNews
            | Endpoint::SearchNews(_)
            | Endpoint::ScheduleForClassDay { .. }
            | Endpoint::SchedulesByDay(_)
            | Endpoint::AllSchedules
            | Endpoint::MyGrades(_)
            | Endpoint::ClassGrades(_)
            | Endpoint::LessonsByClassDay { .. } => Method::Get,
        }
    }

    /// Whether the request must carry `Authorization: Bearer <token>`.
    pub fn requires_auth(&self) -> bool {
        !matches!(
            self,
            Endpoint::Register
                | Endpoint::Login
                | Endpoint::ListNews
                | Endpoint::SearchNews(_)
                | Endpoint::ScheduleForClassDay { .. }
                | Endpoint::SchedulesByDay(_)
                | Endpoint::AllSchedules
                | Endpoint::LessonsByClassDay { .. }
        )
    }

    /// Path and query string, with parameters percent-encoded.
    pub fn path(&self) -> String {
        match self {
            Endpoint::Register => "/register".to_string(),
            Endpoint::Login => "/login".to_string(),
            Endpoint::UserById(id) => format!("/user/{}", encode(id)),
            Endpoint::UserInfo => "/user/info".to_string(),
            Endpoint::UpdateUser(login) => format!("/user/{}", encode(login)),
            Endpoint::AddNews | Endpoint::ListNews => "/news".to_string(),
            Endpoint::SearchNews(query) => format!("/news/search/{}", encode(query)),
            Endpoint::DeleteNews(id) => format!("/news/{}", encode(id)),
            Endpoint::AddSchedule => "/schedule/create".to_string(),
            Endpoint::ScheduleForClassDay { class_name, day } => {
                format!("/{}/{}", encode(class_name), day)
            }
            Endpoint::SchedulesByDay(day) => format!("/schedule/{}", day),
            Endpoint::AllSchedules => "/schedule".to_string(),
            Endpoint::DeleteSchedule(id) => format!("/schedule/{}", encode(id)),
            Endpoint::AddGrade => "/grades".to_string(),
            Endpoint::MyGrades(filter) => with_query(
                "/grades/my",
                &[
                    ("subject", filter.subject.clone()),
                    ("startDate", filter.start_date.map(|d| d.to_string())),
                    ("endDate", filter.end_date.map(|d| d.to_string())),
                ],
            ),
            Endpoint::ClassGrades(filter) => with_query(
                "/grades/class",
                &[
                    ("className", filter.class_name.clone()),
                    ("subject", filter.subject.clone()),
                ],
            ),
            Endpoint::UpdateGrade(id) | Endpoint::DeleteGrade(id) => {
                format!("/grades/{}", encode(id))
            }
            Endpoint::LessonsByClassDay { class_name, day } => with_query(
                "/lessons",
                &[
                    ("className", Some(class_name.clone())),
                    ("dayOfWeek", Some(day.to_string())),
                ],
            ),
            Endpoint::CreateLesson => "/lessons".to_string(),
        }
    }
}

fn encode(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// Append non-empty parameters as a query string.
fn with_query(path: &str, params: &[(&str, Option<String>)]) -> String {
    let query: Vec<String> = params
        .iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| format!("{}={}", key, encode(v)))
        })
        .collect();
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query.join("&"))
    }
}
