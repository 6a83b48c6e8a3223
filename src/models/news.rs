//! News display model.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;

use crate::api::NewsDto;

/// Longest preview shown in lists, in characters.
pub const PREVIEW_CHARS: usize = 120;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsUi {
    pub news_id: Option<String>,
    pub author_id: String,
    pub title: String,
    pub description: String,
    pub url: Option<String>,
    /// Parsed creation time; `None` when absent or unparseable
    pub created_at: Option<DateTime<Utc>>,
}

impl From<NewsDto> for NewsUi {
    fn from(dto: NewsDto) -> Self {
        Self {
            created_at: dto.created_at.as_deref().and_then(parse_timestamp),
            news_id: dto.news_id,
            author_id: dto.user_id,
            title: dto.title.trim().to_string(),
            description: dto.description,
            url: dto.url.filter(|u| !u.trim().is_empty()),
        }
    }
}

impl NewsUi {
    /// Description cut to [`PREVIEW_CHARS`] with an ellipsis.
    pub fn preview(&self) -> String {
        let text = self.description.trim();
        if text.chars().count() <= PREVIEW_CHARS {
            return text.to_string();
        }
        let cut: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", cut.trim_end())
    }
}

/// Accepts RFC 3339 and the server's zone-less `YYYY-MM-DDTHH:MM:SS` form.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}
