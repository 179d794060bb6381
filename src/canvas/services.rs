//! Canvas upstream client
//!
//! Wraps the Canvas REST API behind narrow accessors. Read failures of any
//! kind (transport, status, decode) degrade to empty lists; the failure is
//! logged at the boundary and never reaches the caller.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use futures::{stream, StreamExt};
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use super::models::{Announcement, AnnouncementAuthor, Assignment, CanvasDashboard, Course};
use crate::auth::models::User;
use crate::common::config::CanvasConfig;
use crate::common::{ensure_success, UpstreamError};
use crate::dashboard::services::CanvasSource;

/// Cap on concurrent per-course requests during composite fan-out. Fan-out
/// width otherwise grows with the user's enrollment count.
const COURSE_FANOUT_LIMIT: usize = 8;

const ASSIGNMENTS_PER_PAGE: u32 = 50;
const ANNOUNCEMENTS_PER_PAGE: u32 = 20;
const RECENT_ANNOUNCEMENTS_CAP: usize = 10;

// ---- Upstream wire shapes ----

#[derive(Debug, Deserialize)]
struct TermWire {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CourseWire {
    id: i64,
    name: String,
    course_code: String,
    #[serde(default)]
    term: Option<TermWire>,
    enrollment_term_id: i64,
    #[serde(default)]
    start_at: Option<DateTime<Utc>>,
    #[serde(default)]
    end_at: Option<DateTime<Utc>>,
    workflow_state: String,
    #[serde(default)]
    total_students: Option<i64>,
    #[serde(default)]
    course_format: Option<String>,
}

impl From<CourseWire> for Course {
    fn from(wire: CourseWire) -> Self {
        Course {
            id: wire.id,
            name: wire.name,
            course_code: wire.course_code,
            term: wire.term.and_then(|t| t.name).unwrap_or_default(),
            enrollment_term_id: wire.enrollment_term_id,
            start_at: wire.start_at,
            end_at: wire.end_at,
            workflow_state: wire.workflow_state,
            total_students: wire.total_students,
            course_format: wire.course_format,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AssignmentWire {
    id: i64,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    due_at: Option<DateTime<Utc>>,
    #[serde(default)]
    unlock_at: Option<DateTime<Utc>>,
    #[serde(default)]
    lock_at: Option<DateTime<Utc>>,
    #[serde(default)]
    points_possible: Option<f64>,
    grading_type: String,
    #[serde(default)]
    submission_types: Vec<String>,
    #[serde(default)]
    has_submitted_submissions: bool,
    course_id: i64,
    html_url: String,
    #[serde(default)]
    quiz_id: Option<i64>,
    #[serde(default)]
    published: bool,
}

impl From<AssignmentWire> for Assignment {
    fn from(wire: AssignmentWire) -> Self {
        Assignment {
            id: wire.id,
            name: wire.name,
            description: wire.description,
            due_at: wire.due_at,
            unlock_at: wire.unlock_at,
            lock_at: wire.lock_at,
            points_possible: wire.points_possible.unwrap_or(0.0),
            grading_type: wire.grading_type,
            submission_types: wire.submission_types,
            has_submitted_submissions: wire.has_submitted_submissions,
            course_id: wire.course_id,
            html_url: wire.html_url,
            quiz_id: wire.quiz_id,
            published: wire.published,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AuthorWire {
    id: i64,
    display_name: String,
    #[serde(default)]
    avatar_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnnouncementWire {
    id: i64,
    title: String,
    message: String,
    posted_at: DateTime<Utc>,
    author: AuthorWire,
    html_url: String,
    #[serde(default)]
    read_state: Option<String>,
}

impl From<AnnouncementWire> for Announcement {
    fn from(wire: AnnouncementWire) -> Self {
        Announcement {
            id: wire.id,
            title: wire.title,
            message: wire.message,
            posted_at: wire.posted_at,
            author: AnnouncementAuthor {
                id: wire.author.id,
                display_name: wire.author.display_name,
                avatar_image_url: wire.author.avatar_image_url,
            },
            html_url: wire.html_url,
            read_state: wire.read_state,
        }
    }
}

// ---- Service ----

pub struct CanvasService {
    base_url: String,
    api_key: String,
    http: Client,
}

impl CanvasService {
    pub fn new(config: CanvasConfig, http: Client) -> Self {
        Self {
            base_url: config.base_url,
            api_key: config.api_key,
            http,
        }
    }

    /// Active student enrollments. Empty on any upstream failure.
    pub async fn courses(&self) -> Vec<Course> {
        match self.fetch_courses().await {
            Ok(courses) => courses,
            Err(e) => {
                warn!(error = %e, "failed to fetch Canvas courses");
                Vec::new()
            }
        }
    }

    /// Assignments for one course. Empty on any upstream failure.
    pub async fn assignments(&self, course_id: i64) -> Vec<Assignment> {
        match self.fetch_assignments(course_id).await {
            Ok(assignments) => assignments,
            Err(e) => {
                warn!(error = %e, course_id, "failed to fetch Canvas assignments");
                Vec::new()
            }
        }
    }

    /// Announcements for one course. Empty on any upstream failure.
    pub async fn announcements(&self, course_id: i64) -> Vec<Announcement> {
        match self.fetch_announcements(course_id).await {
            Ok(announcements) => announcements,
            Err(e) => {
                warn!(error = %e, course_id, "failed to fetch Canvas announcements");
                Vec::new()
            }
        }
    }

    /// Assignments due within the next seven days across all courses,
    /// soonest first. Fans out one request per course with a concurrency cap.
    pub async fn upcoming_assignments(&self) -> Vec<Assignment> {
        let course_ids: Vec<i64> = self.courses().await.iter().map(|c| c.id).collect();
        let all: Vec<Assignment> =
            stream::iter(course_ids.into_iter().map(|id| self.assignments(id)))
                .buffer_unordered(COURSE_FANOUT_LIMIT)
                .collect::<Vec<Vec<Assignment>>>()
                .await
                .into_iter()
                .flatten()
                .collect();
        filter_upcoming(all, Utc::now())
    }

    /// Announcements posted within the last seven days across all courses,
    /// newest first, capped at ten.
    pub async fn recent_announcements(&self) -> Vec<Announcement> {
        let course_ids: Vec<i64> = self.courses().await.iter().map(|c| c.id).collect();
        let all: Vec<Announcement> =
            stream::iter(course_ids.into_iter().map(|id| self.announcements(id)))
                .buffer_unordered(COURSE_FANOUT_LIMIT)
                .collect::<Vec<Vec<Announcement>>>()
                .await
                .into_iter()
                .flatten()
                .collect();
        filter_recent(all, Utc::now())
    }

    async fn fetch_courses(&self) -> Result<Vec<Course>, UpstreamError> {
        let url = format!("{}/api/v1/courses", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(&[
                ("enrollment_type", "student"),
                ("enrollment_state", "active"),
                ("include[]", "term"),
                ("include[]", "total_scores"),
            ])
            .send()
            .await?;
        let wires: Vec<CourseWire> = ensure_success(response)?
            .json()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))?;
        Ok(wires.into_iter().map(Course::from).collect())
    }

    async fn fetch_assignments(&self, course_id: i64) -> Result<Vec<Assignment>, UpstreamError> {
        let url = format!("{}/api/v1/courses/{}/assignments", self.base_url, course_id);
        let per_page = ASSIGNMENTS_PER_PAGE.to_string();
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(&[
                ("include[]", "submission"),
                ("per_page", per_page.as_str()),
            ])
            .send()
            .await?;
        let wires: Vec<AssignmentWire> = ensure_success(response)?
            .json()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))?;
        Ok(wires.into_iter().map(Assignment::from).collect())
    }

    async fn fetch_announcements(
        &self,
        course_id: i64,
    ) -> Result<Vec<Announcement>, UpstreamError> {
        let url = format!("{}/api/v1/announcements", self.base_url);
        let context_code = format!("course_{course_id}");
        let per_page = ANNOUNCEMENTS_PER_PAGE.to_string();
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(&[
                ("context_codes[]", context_code.as_str()),
                ("per_page", per_page.as_str()),
            ])
            .send()
            .await?;
        let wires: Vec<AnnouncementWire> = ensure_success(response)?
            .json()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))?;
        Ok(wires.into_iter().map(Announcement::from).collect())
    }
}

#[async_trait]
impl CanvasSource for CanvasService {
    async fn dashboard_data(
        &self,
        _user: &User,
        _access_token: &str,
    ) -> Result<CanvasDashboard, UpstreamError> {
        let (courses, upcoming_assignments, recent_announcements) = tokio::join!(
            self.courses(),
            self.upcoming_assignments(),
            self.recent_announcements(),
        );
        Ok(CanvasDashboard {
            courses,
            upcoming_assignments,
            recent_announcements,
        })
    }
}

// ---- Pure window filters, split out for tests ----

/// Keep assignments due in `[now, now + 7d]`, sorted ascending by due time.
/// Undated assignments are dropped.
fn filter_upcoming(assignments: Vec<Assignment>, now: DateTime<Utc>) -> Vec<Assignment> {
    let horizon = now + Duration::days(7);
    let mut upcoming: Vec<Assignment> = assignments
        .into_iter()
        .filter(|a| a.due_at.map_or(false, |due| due >= now && due <= horizon))
        .collect();
    upcoming.sort_by_key(|a| a.due_at);
    upcoming
}

/// Keep announcements posted within the last seven days, newest first,
/// capped at ten.
fn filter_recent(announcements: Vec<Announcement>, now: DateTime<Utc>) -> Vec<Announcement> {
    let cutoff = now - Duration::days(7);
    let mut recent: Vec<Announcement> = announcements
        .into_iter()
        .filter(|a| a.posted_at >= cutoff)
        .collect();
    recent.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));
    recent.truncate(RECENT_ANNOUNCEMENTS_CAP);
    recent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::CanvasConfig;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn assignment(id: i64, due_at: Option<DateTime<Utc>>) -> Assignment {
        Assignment {
            id,
            name: format!("Assignment {id}"),
            description: None,
            due_at,
            unlock_at: None,
            lock_at: None,
            points_possible: 10.0,
            grading_type: "points".to_string(),
            submission_types: vec!["online_upload".to_string()],
            has_submitted_submissions: false,
            course_id: 1,
            html_url: format!("https://canvas.example.edu/assignments/{id}"),
            quiz_id: None,
            published: true,
        }
    }

    fn announcement(id: i64, posted_at: DateTime<Utc>) -> Announcement {
        Announcement {
            id,
            title: format!("Announcement {id}"),
            message: "body".to_string(),
            posted_at,
            author: AnnouncementAuthor {
                id: 7,
                display_name: "Prof".to_string(),
                avatar_image_url: None,
            },
            html_url: format!("https://canvas.example.edu/announcements/{id}"),
            read_state: None,
        }
    }

    #[test]
    fn upcoming_window_keeps_only_next_seven_days_sorted() {
        let now = Utc::now();
        let input = vec![
            assignment(1, Some(now - Duration::days(1))),
            assignment(2, Some(now + Duration::hours(1))),
            assignment(3, Some(now + Duration::days(7) - Duration::hours(1))),
            assignment(4, Some(now + Duration::days(8))),
            assignment(5, None),
        ];

        let result = filter_upcoming(input, now);

        assert_eq!(
            result.iter().map(|a| a.id).collect::<Vec<_>>(),
            vec![2, 3]
        );
    }

    #[test]
    fn upcoming_sorts_ascending_by_due_time() {
        let now = Utc::now();
        let input = vec![
            assignment(1, Some(now + Duration::days(5))),
            assignment(2, Some(now + Duration::hours(2))),
            assignment(3, Some(now + Duration::days(2))),
        ];

        let result = filter_upcoming(input, now);

        assert_eq!(
            result.iter().map(|a| a.id).collect::<Vec<_>>(),
            vec![2, 3, 1]
        );
    }

    #[test]
    fn recent_announcements_windowed_capped_and_descending() {
        let now = Utc::now();
        // 15 announcements spread over the last 10 days; 12 fall inside the
        // seven-day window.
        let input: Vec<Announcement> = (0..15)
            .map(|i| announcement(i, now - Duration::hours(i * 16)))
            .collect();

        let result = filter_recent(input, now);

        assert_eq!(result.len(), RECENT_ANNOUNCEMENTS_CAP);
        let cutoff = now - Duration::days(7);
        assert!(result.iter().all(|a| a.posted_at >= cutoff));
        assert!(result
            .windows(2)
            .all(|pair| pair[0].posted_at >= pair[1].posted_at));
    }

    #[test]
    fn announcement_without_read_state_is_unread() {
        let now = Utc::now();
        assert!(announcement(1, now).is_unread());
        let mut read = announcement(2, now);
        read.read_state = Some("read".to_string());
        assert!(!read.is_unread());
    }

    fn service(base_url: String) -> CanvasService {
        CanvasService::new(
            CanvasConfig {
                base_url,
                api_key: "test-key".to_string(),
            },
            Client::new(),
        )
    }

    #[tokio::test]
    async fn courses_map_upstream_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/courses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": 42,
                    "name": "Operating Systems",
                    "course_code": "CS 352",
                    "term": { "name": "Fall 2026" },
                    "enrollment_term_id": 9,
                    "start_at": "2026-08-24T00:00:00Z",
                    "end_at": null,
                    "workflow_state": "available",
                    "total_students": 120
                }
            ])))
            .mount(&server)
            .await;

        let courses = service(server.uri()).courses().await;

        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].id, 42);
        assert_eq!(courses[0].course_code, "CS 352");
        assert_eq!(courses[0].term, "Fall 2026");
        assert_eq!(courses[0].total_students, Some(120));
    }

    #[tokio::test]
    async fn upcoming_assignments_fan_out_merges_all_courses() {
        let server = MockServer::start().await;
        let due = (Utc::now() + Duration::days(2)).to_rfc3339();

        Mock::given(method("GET"))
            .and(path("/api/v1/courses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": 1,
                    "name": "Operating Systems",
                    "course_code": "CS 352",
                    "enrollment_term_id": 9,
                    "workflow_state": "available"
                },
                {
                    "id": 2,
                    "name": "Databases",
                    "course_code": "CS 363",
                    "enrollment_term_id": 9,
                    "workflow_state": "available"
                }
            ])))
            .mount(&server)
            .await;
        for course_id in [1, 2] {
            Mock::given(method("GET"))
                .and(path(format!("/api/v1/courses/{course_id}/assignments")))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                    {
                        "id": course_id * 100,
                        "name": "Homework",
                        "due_at": due,
                        "grading_type": "points",
                        "course_id": course_id,
                        "html_url": "https://canvas.example.edu/hw"
                    }
                ])))
                .mount(&server)
                .await;
        }

        let upcoming = service(server.uri()).upcoming_assignments().await;

        let mut ids: Vec<i64> = upcoming.iter().map(|a| a.id).collect();
        ids.sort();
        assert_eq!(ids, vec![100, 200]);
    }

    #[tokio::test]
    async fn upstream_error_degrades_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/courses"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        assert!(service(server.uri()).courses().await.is_empty());
    }

    #[tokio::test]
    async fn malformed_shape_fails_closed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/courses"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{ "id": "not-a-number", "name": 3 }])),
            )
            .mount(&server)
            .await;

        assert!(service(server.uri()).courses().await.is_empty());
    }
}
