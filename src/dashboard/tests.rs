//! Aggregator tests against stub sources.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

use super::models::DashboardData;
use super::services::{
    CanvasSource, CyrideSource, DashboardService, OutlookSource, WorkdaySource,
};
use crate::auth::models::User;
use crate::canvas::models::{Announcement, AnnouncementAuthor, CanvasDashboard};
use crate::common::UpstreamError;
use crate::cyride::models::CyrideDashboard;
use crate::outlook::models::{Email, OutlookDashboard};
use crate::workday::models::{Notification, StudentRecord, WorkdayDashboard};

fn test_user() -> User {
    User {
        id: "u-1".to_string(),
        email: "jdoe123@iastate.edu".to_string(),
        name: "Jane Doe".to_string(),
        university_id: "jdoe123".to_string(),
        profile_picture: None,
    }
}

fn announcement(id: i64, read_state: Option<&str>) -> Announcement {
    Announcement {
        id,
        title: format!("Announcement {}", id),
        message: "body".to_string(),
        posted_at: Utc::now(),
        author: AnnouncementAuthor {
            id: 1,
            display_name: "Prof".to_string(),
            avatar_image_url: None,
        },
        html_url: String::new(),
        read_state: read_state.map(|s| s.to_string()),
    }
}

fn email(id: &str, is_read: bool) -> Email {
    Email {
        id: id.to_string(),
        subject: "subject".to_string(),
        body_preview: String::new(),
        received_date_time: Utc::now(),
        from: None,
        to_recipients: Vec::new(),
        importance: "high".to_string(),
        is_read,
        has_attachments: false,
        flag: None,
        web_link: String::new(),
    }
}

fn notification(id: &str, read: bool) -> Notification {
    Notification {
        id: id.to_string(),
        title: "title".to_string(),
        message: "message".to_string(),
        kind: "info".to_string(),
        priority: "low".to_string(),
        created_at: Utc::now(),
        read_at: read.then(Utc::now),
        action_required: false,
        action_url: None,
        category: "general".to_string(),
    }
}

struct StubCanvas {
    fail: bool,
}

#[async_trait]
impl CanvasSource for StubCanvas {
    async fn dashboard_data(
        &self,
        _user: &User,
        _access_token: &str,
    ) -> Result<CanvasDashboard, UpstreamError> {
        if self.fail {
            return Err(UpstreamError::Decode("bad payload".to_string()));
        }
        Ok(CanvasDashboard {
            courses: Vec::new(),
            upcoming_assignments: Vec::new(),
            recent_announcements: vec![
                announcement(1, None),
                announcement(2, Some("read")),
                announcement(3, Some("unread")),
            ],
        })
    }
}

struct StubOutlook {
    fail: bool,
}

#[async_trait]
impl OutlookSource for StubOutlook {
    async fn dashboard_data(
        &self,
        _user: &User,
        _access_token: &str,
    ) -> Result<OutlookDashboard, UpstreamError> {
        if self.fail {
            return Err(UpstreamError::Status(reqwest::StatusCode::UNAUTHORIZED));
        }
        Ok(OutlookDashboard {
            important_emails: vec![email("a", false), email("b", true), email("c", false)],
            upcoming_events: Vec::new(),
        })
    }
}

struct StubWorkday {
    fail: bool,
}

#[async_trait]
impl WorkdaySource for StubWorkday {
    async fn dashboard_data(
        &self,
        user: &User,
        _access_token: &str,
    ) -> Result<WorkdayDashboard, UpstreamError> {
        if self.fail {
            return Err(UpstreamError::Decode("unavailable".to_string()));
        }
        Ok(WorkdayDashboard {
            notifications: vec![notification("1", false), notification("2", true)],
            action_items: Vec::new(),
            tuition_fees: Vec::new(),
            student_record: StudentRecord::fallback(user),
        })
    }
}

struct StubCyride {
    fail: bool,
}

#[async_trait]
impl CyrideSource for StubCyride {
    async fn dashboard_data(
        &self,
        _user: &User,
        _access_token: &str,
    ) -> Result<CyrideDashboard, UpstreamError> {
        if self.fail {
            return Err(UpstreamError::Status(
                reqwest::StatusCode::SERVICE_UNAVAILABLE,
            ));
        }
        Ok(CyrideDashboard::default())
    }
}

fn service(
    canvas_fail: bool,
    outlook_fail: bool,
    workday_fail: bool,
    cyride_fail: bool,
) -> DashboardService {
    DashboardService::new(
        Arc::new(StubCanvas { fail: canvas_fail }),
        Arc::new(StubOutlook { fail: outlook_fail }),
        Arc::new(StubWorkday { fail: workday_fail }),
        Arc::new(StubCyride { fail: cyride_fail }),
    )
}

async fn snapshot(service: &DashboardService) -> DashboardData {
    service.build_snapshot(&test_user(), "token").await
}

#[tokio::test]
async fn one_failed_source_does_not_affect_the_others() {
    let data = snapshot(&service(false, true, false, false)).await;

    // Outlook falls back to empty.
    assert!(data.outlook.data.important_emails.is_empty());
    assert_eq!(data.outlook.unread_important_emails, 0);

    // The rest are intact.
    assert_eq!(data.canvas.data.recent_announcements.len(), 3);
    assert_eq!(data.workday.data.notifications.len(), 2);
}

#[tokio::test]
async fn all_sources_failing_still_yields_a_complete_snapshot() {
    let data = snapshot(&service(true, true, true, true)).await;

    let value = serde_json::to_value(&data).unwrap();
    for key in ["user", "canvas", "outlook", "workday", "cyride"] {
        assert!(value.get(key).is_some(), "missing section {}", key);
    }

    // Workday fallback keeps the caller's identity.
    assert_eq!(data.workday.data.student_record.student_id, "jdoe123");
    assert_eq!(value["canvas"]["unreadAnnouncements"], 0);
}

#[tokio::test]
async fn unread_counts_are_derived_from_fetched_records() {
    let data = snapshot(&service(false, false, false, false)).await;

    // Announcements 1 (no state) and 3 (explicit unread) count; 2 does not.
    assert_eq!(data.canvas.unread_announcements, 2);
    // Emails a and c are unread.
    assert_eq!(data.outlook.unread_important_emails, 2);
    // Notification 1 has no read_at.
    assert_eq!(data.workday.unread_notifications, 1);
}

#[tokio::test]
async fn snapshot_serializes_sections_flat() {
    let data = snapshot(&service(false, false, false, false)).await;
    let value = serde_json::to_value(&data).unwrap();

    assert!(value["canvas"]["recentAnnouncements"].is_array());
    assert!(value["outlook"]["importantEmails"].is_array());
    assert!(value["workday"]["studentRecord"]["studentId"].is_string());
    assert!(value["cyride"]["favoriteRoutes"].is_array());
}
