//! Canonical Workday record shapes

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::models::User;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub priority: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
    pub action_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
    pub category: String,
}

impl Notification {
    pub fn is_unread(&self) -> bool {
        self.read_at.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionItem {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub status: String,
    pub priority: String,
    pub action_url: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TuitionFee {
    pub term: String,
    pub amount: f64,
    pub due_date: DateTime<Utc>,
    pub status: String,
    pub description: String,
    pub fee_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordHold {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub reason: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution_instructions: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub enrollment_status: String,
    pub academic_level: String,
    pub major: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpa: Option<f64>,
    pub credit_hours: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_graduation_date: Option<String>,
    pub holds: Vec<RecordHold>,
}

impl StudentRecord {
    /// Minimal record carrying only the identity fields, used when the
    /// full record is unavailable.
    pub fn fallback(user: &User) -> Self {
        StudentRecord {
            student_id: user.university_id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            enrollment_status: "active".to_string(),
            academic_level: "undergraduate".to_string(),
            major: String::new(),
            gpa: None,
            credit_hours: 0,
            expected_graduation_date: None,
            holds: Vec::new(),
        }
    }
}

/// Lists and record fetched for the dashboard snapshot; the unread count is
/// derived at assembly time from `read_at`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkdayDashboard {
    pub notifications: Vec<Notification>,
    pub action_items: Vec<ActionItem>,
    pub tuition_fees: Vec<TuitionFee>,
    pub student_record: StudentRecord,
}

impl WorkdayDashboard {
    pub fn fallback(user: &User) -> Self {
        WorkdayDashboard {
            notifications: Vec::new(),
            action_items: Vec::new(),
            tuition_fees: Vec::new(),
            student_record: StudentRecord::fallback(user),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_without_read_at_is_unread() {
        let n = Notification {
            id: "1".to_string(),
            title: "t".to_string(),
            message: "m".to_string(),
            kind: "info".to_string(),
            priority: "low".to_string(),
            created_at: Utc::now(),
            read_at: None,
            action_required: false,
            action_url: None,
            category: "general".to_string(),
        };
        assert!(n.is_unread());
        let read = Notification {
            read_at: Some(Utc::now()),
            ..n
        };
        assert!(!read.is_unread());
    }

    #[test]
    fn kind_serializes_as_type() {
        let n = Notification {
            id: "1".to_string(),
            title: "t".to_string(),
            message: "m".to_string(),
            kind: "warning".to_string(),
            priority: "high".to_string(),
            created_at: Utc::now(),
            read_at: None,
            action_required: true,
            action_url: Some("https://example.edu".to_string()),
            category: "financial".to_string(),
        };
        let value = serde_json::to_value(&n).unwrap();
        assert_eq!(value["type"], "warning");
        assert_eq!(value["actionRequired"], true);
        assert!(value.get("readAt").is_none());
    }
}
