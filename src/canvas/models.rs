//! Canonical Canvas record shapes
//!
//! Stable projections of the Canvas REST shapes, decoupled from upstream
//! field names and casing. Built fresh per request, never mutated.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub course_code: String,
    pub term: String,
    pub enrollment_term_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_at: Option<DateTime<Utc>>,
    pub workflow_state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_students: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_format: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unlock_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_at: Option<DateTime<Utc>>,
    pub points_possible: f64,
    pub grading_type: String,
    pub submission_types: Vec<String>,
    pub has_submitted_submissions: bool,
    pub course_id: i64,
    pub html_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz_id: Option<i64>,
    pub published: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementAuthor {
    pub id: i64,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub message: String,
    pub posted_at: DateTime<Utc>,
    pub author: AnnouncementAuthor,
    pub html_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_state: Option<String>,
}

impl Announcement {
    /// Anything Canvas has not explicitly marked read counts as unread.
    pub fn is_unread(&self) -> bool {
        !matches!(self.read_state.as_deref(), Some("read"))
    }
}

/// Lists fetched for the dashboard snapshot. Unread counts are derived later
/// at assembly time, never taken from upstream.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasDashboard {
    pub courses: Vec<Course>,
    pub upcoming_assignments: Vec<Assignment>,
    pub recent_announcements: Vec<Announcement>,
}
