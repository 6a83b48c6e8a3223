//! Wire DTOs mirroring the server's JSON schema.
//!
//! Field names are camelCase on the wire and enums are lowercase strings.
//! There is exactly one DTO per resource; request bodies reuse them where
//! the shapes match.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::session::Role;

/// Maximum number of lessons (and rooms) in one schedule day.
pub const MAX_LESSONS_PER_DAY: usize = 9;

/// Deserialize an id sent either as a string or as an integer.
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer")
        }

        fn visit_str<E>(self, value: &str) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_string<E>(self, value: String) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

/// Optional variant of [`deserialize_id`]; `null` becomes `None`.
pub(crate) fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "deserialize_id")] String);

    Option::<Wrapper>::deserialize(deserializer).map(|opt| opt.map(|Wrapper(id)| id))
}

/// School days. Sunday has no lessons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 6] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
        }
    }
}

impl std::fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DayOfWeek {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        DayOfWeek::ALL
            .into_iter()
            .find(|day| day.as_str() == lower || day.as_str()[..3] == lower)
            .ok_or_else(|| format!("'{}' is not a school day", s))
    }
}

/// Kind of work a grade was given for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeType {
    Homework,
    Test,
    Exam,
    Classwork,
}

impl GradeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GradeType::Homework => "homework",
            GradeType::Test => "test",
            GradeType::Exam => "exam",
            GradeType::Classwork => "classwork",
        }
    }
}

/// POST /login
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /register
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub surname: String,
    #[serde(rename = "class")]
    pub class_name: String,
    pub school: String,
    pub role: Role,
}

/// Response of /login and /register.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub user_id: String,
    pub role: Role,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
}

/// Server-side user record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileDto {
    #[serde(deserialize_with = "deserialize_id")]
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub surname: String,
    #[serde(rename = "class", default)]
    pub class_name: String,
    #[serde(default)]
    pub school: String,
    pub role: Role,
    #[serde(
        default,
        deserialize_with = "deserialize_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub teacher_id: Option<String>,
}

/// PUT /user/{login}. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(rename = "class", skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
}

/// A news post. Also the body of POST /news (without id and timestamp).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewsDto {
    #[serde(
        default,
        alias = "id",
        deserialize_with = "deserialize_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub news_id: Option<String>,
    #[serde(deserialize_with = "deserialize_id")]
    pub user_id: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// One class's lessons for one day; `lessons[i]` takes place in `office[i]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDto {
    #[serde(default, alias = "id", deserialize_with = "deserialize_id")]
    pub schedule_id: String,
    pub class_name: String,
    pub day: DayOfWeek,
    #[serde(default)]
    pub lessons: Vec<String>,
    #[serde(default)]
    pub office: Vec<String>,
}

/// POST /schedule/create
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleRequest {
    pub class_name: String,
    pub day: DayOfWeek,
    pub lessons: Vec<String>,
    pub office: Vec<String>,
}

/// A grade record. Also the body of POST /grades (without id and timestamps).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GradeDto {
    #[serde(
        default,
        alias = "id",
        deserialize_with = "deserialize_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub grade_id: Option<String>,
    #[serde(deserialize_with = "deserialize_id")]
    pub student_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
    #[serde(deserialize_with = "deserialize_id")]
    pub teacher_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_name: Option<String>,
    pub subject_name: String,
    pub class_name: String,
    pub grade_value: i32,
    pub grade_type: GradeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub lesson_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// PUT /grades/{gradeId}. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGradeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade_value: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade_type: Option<GradeType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// A timetable lesson. Also the body of POST /lessons.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LessonDto {
    #[serde(
        default,
        alias = "id",
        deserialize_with = "deserialize_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub lesson_id: Option<String>,
    pub class_name: String,
    pub day_of_week: DayOfWeek,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_number: Option<i32>,
    pub lesson_number: i32,
    pub subject_name: String,
    #[serde(
        default,
        deserialize_with = "deserialize_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub teacher_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

/// Confirmation body returned by write endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Filters for GET /grades/my.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MyGradesFilter {
    pub subject: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Filters for GET /grades/class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassGradesFilter {
    pub class_name: Option<String>,
    pub subject: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_parsing() {
        assert_eq!("Monday".parse::<DayOfWeek>(), Ok(DayOfWeek::Monday));
        assert_eq!("sat".parse::<DayOfWeek>(), Ok(DayOfWeek::Saturday));
        assert!("sunday".parse::<DayOfWeek>().is_err());
    }

    #[test]
    fn test_grade_wire_format() {
        let json = serde_json::json!({
            "gradeId": "G1",
            "studentId": "S1",
            "teacherId": "T7",
            "teacherName": "Anna Petrova",
            "subjectName": "Math",
            "className": "10A",
            "gradeValue": 5,
            "gradeType": "test",
            "lessonDate": "2024-09-02"
        });
        let grade: GradeDto = serde_json::from_value(json).unwrap();
        assert_eq!(grade.grade_type, GradeType::Test);
        assert_eq!(grade.lesson_date, NaiveDate::from_ymd_opt(2024, 9, 2).unwrap());
        assert!(grade.comment.is_none());
    }

    #[test]
    fn test_profile_uses_class_key() {
        let json = serde_json::json!({
            "userId": "U1",
            "email": "m.znakin@mail.ru",
            "name": "Mikhail",
            "surname": "Znakin",
            "class": "11B",
            "school": "Lyceum 2",
            "role": "admin"
        });
        let profile: UserProfileDto = serde_json::from_value(json).unwrap();
        assert_eq!(profile.class_name, "11B");
        assert_eq!(profile.role, Role::Admin);
    }

    #[test]
    fn test_update_request_skips_absent_fields() {
        let request = UpdateUserRequest {
            school: Some("Lyceum 2".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"school": "Lyceum 2"})
        );
    }

    #[test]
    fn test_news_accepts_numeric_id_alias() {
        let json = serde_json::json!({
            "id": 17, "userId": 3, "title": "Exam week", "description": "..."
        });
        let news: NewsDto = serde_json::from_value(json).unwrap();
        assert_eq!(news.news_id.as_deref(), Some("17"));
        assert_eq!(news.user_id, "3");
    }

    #[test]
    fn test_optional_id_null() {
        let json = serde_json::json!({
            "className": "7B", "dayOfWeek": "monday", "lessonNumber": 2,
            "subjectName": "Art", "teacherId": null
        });
        let lesson: LessonDto = serde_json::from_value(json).unwrap();
        assert!(lesson.teacher_id.is_none());
        assert!(lesson.lesson_id.is_none());
    }
}
