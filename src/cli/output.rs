//! Plain-text rendering of published view state.
//!
//! Renderers return strings so they can be tested; `print_*` helpers write
//! them to stdout.

use crate::models::{GradeSummary, NewsUi, ScheduleUi, UserUi};
use crate::view_state::ViewState;

/// Line width for separators.
const LINE_WIDTH: usize = 60;

/// A title underlined with a rule.
///
/// ```text
/// SCHEDULE MONDAY
/// ════════════════════════════════════════════════════════════
/// ```
pub fn header(title: &str) -> String {
    format!("{}\n{}\n", title, "═".repeat(LINE_WIDTH))
}

/// Notice appended when data came from the local cache.
pub const STALE_NOTICE: &str = "  ! Offline: showing cached data";

pub fn render_schedules(title: &str, state: &ViewState<Vec<ScheduleUi>>) -> String {
    let mut out = header(title);
    if state.data.is_empty() {
        out.push_str("  No lessons\n");
    }
    for schedule in &state.data {
        out.push_str(&format!("{}\n", schedule.class_name));
        for slot in &schedule.slots {
            let room = slot.room.as_deref().unwrap_or("-");
            out.push_str(&format!("  {}. {:<24} {}\n", slot.number, slot.subject, room));
        }
    }
    push_footer(&mut out, state.is_stale);
    out
}

pub fn render_news(state: &ViewState<Vec<NewsUi>>) -> String {
    let mut out = header("NEWS");
    if state.data.is_empty() {
        out.push_str("  No news\n");
    }
    for item in &state.data {
        match item.created_at {
            Some(at) => out.push_str(&format!("{} ({})\n", item.title, at.format("%d.%m.%Y"))),
            None => out.push_str(&format!("{}\n", item.title)),
        }
        let preview = item.preview();
        if !preview.is_empty() {
            out.push_str(&format!("  {}\n", preview));
        }
        if let Some(url) = &item.url {
            out.push_str(&format!("  {}\n", url));
        }
    }
    push_footer(&mut out, state.is_stale);
    out
}

pub fn render_grades(summary: &GradeSummary) -> String {
    let mut out = header("GRADES");
    if summary.is_empty() {
        out.push_str("  No grades\n");
        return out;
    }
    for grade in &summary.grades {
        out.push_str(&format!(
            "  {}  {:<16} {}  {}\n",
            grade.formatted_date(),
            grade.subject_name,
            grade.grade_value,
            grade.grade_type.as_str()
        ));
    }
    out.push('\n');
    for subject in &summary.by_subject {
        out.push_str(&format!(
            "  {:<16} avg {:.2} ({} grades)\n",
            subject.subject_name, subject.average, subject.count
        ));
    }
    out.push_str(&format!("  Overall average: {}\n", summary.formatted_average()));
    out
}

pub fn render_user(user: &UserUi) -> String {
    let mut out = header(&user.full_name);
    out.push_str(&format!("  E-mail: {}\n", user.email));
    out.push_str(&format!("  Role:   {}\n", user.role));
    if !user.class_name.is_empty() {
        out.push_str(&format!("  Class:  {}\n", user.class_name));
    }
    if !user.school.is_empty() {
        out.push_str(&format!("  School: {}\n", user.school));
    }
    out
}

fn push_footer(out: &mut String, is_stale: bool) {
    if is_stale {
        out.push_str(STALE_NOTICE);
        out.push('\n');
    }
}
