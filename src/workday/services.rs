//! Workday upstream client
//!
//! The university has not yet opened a student-facing Workday API, so this
//! service serves representative records shaped like the real ones. The
//! handler and dashboard contracts are final; only the data source will
//! change when the API becomes available.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tracing::info;

use super::models::{
    ActionItem, Notification, RecordHold, StudentRecord, TuitionFee, WorkdayDashboard,
};
use crate::auth::models::User;
use crate::common::UpstreamError;
use crate::dashboard::services::WorkdaySource;

pub struct WorkdayService;

impl WorkdayService {
    pub fn new() -> Self {
        Self
    }

    pub async fn notifications(&self, _user: &User) -> Vec<Notification> {
        let now = Utc::now();
        vec![
            Notification {
                id: "1".to_string(),
                title: "Tuition Payment Reminder".to_string(),
                message: "Your fall semester tuition payment is due in 5 days.".to_string(),
                kind: "warning".to_string(),
                priority: "high".to_string(),
                created_at: now,
                read_at: None,
                action_required: true,
                action_url: Some("https://workday.iastate.edu/payments".to_string()),
                category: "financial".to_string(),
            },
            Notification {
                id: "2".to_string(),
                title: "Registration Open".to_string(),
                message: "Spring course registration opens tomorrow at 8:00 AM.".to_string(),
                kind: "info".to_string(),
                priority: "medium".to_string(),
                created_at: now - Duration::days(1),
                read_at: None,
                action_required: false,
                action_url: None,
                category: "academic".to_string(),
            },
        ]
    }

    pub async fn action_items(&self, _user: &User) -> Vec<ActionItem> {
        let now = Utc::now();
        vec![
            ActionItem {
                id: "1".to_string(),
                title: "Complete FERPA Consent Form".to_string(),
                description:
                    "You need to complete the FERPA consent form to access your academic records."
                        .to_string(),
                kind: "form".to_string(),
                due_date: Some(now + Duration::days(7)),
                status: "pending".to_string(),
                priority: "high".to_string(),
                action_url: "https://workday.iastate.edu/forms/ferpa".to_string(),
                category: "Academic Records".to_string(),
            },
            ActionItem {
                id: "2".to_string(),
                title: "Approve Course Schedule".to_string(),
                description:
                    "Review and approve your proposed course schedule for next semester."
                        .to_string(),
                kind: "approval".to_string(),
                due_date: Some(now + Duration::days(14)),
                status: "pending".to_string(),
                priority: "medium".to_string(),
                action_url: "https://workday.iastate.edu/schedule".to_string(),
                category: "Course Planning".to_string(),
            },
        ]
    }

    pub async fn tuition_fees(&self, _user: &User) -> Vec<TuitionFee> {
        let due = Utc::now() + Duration::days(5);
        vec![
            TuitionFee {
                term: "Fall 2024".to_string(),
                amount: 8475.00,
                due_date: due,
                status: "pending".to_string(),
                description: "Full-time undergraduate tuition and fees".to_string(),
                fee_type: "tuition".to_string(),
                payment_url: Some("https://workday.iastate.edu/payments".to_string()),
            },
            TuitionFee {
                term: "Fall 2024".to_string(),
                amount: 1250.00,
                due_date: due,
                status: "pending".to_string(),
                description: "On-campus housing and meal plan".to_string(),
                fee_type: "housing".to_string(),
                payment_url: Some("https://workday.iastate.edu/payments".to_string()),
            },
        ]
    }

    pub async fn student_record(&self, user: &User) -> StudentRecord {
        StudentRecord {
            student_id: user.university_id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            enrollment_status: "active".to_string(),
            academic_level: "undergraduate".to_string(),
            major: "Computer Science".to_string(),
            gpa: Some(3.7),
            credit_hours: 120,
            expected_graduation_date: Some("2025-05-15".to_string()),
            holds: vec![RecordHold {
                id: "1".to_string(),
                kind: "Financial".to_string(),
                description: "Outstanding balance on account".to_string(),
                reason: "Tuition payment overdue".to_string(),
                created_at: Utc::now(),
                resolution_instructions: Some(
                    "Please contact the Bursar's office to resolve this hold.".to_string(),
                ),
            }],
        }
    }

    pub async fn mark_notification_read(
        &self,
        user: &User,
        notification_id: &str,
    ) -> Result<(), UpstreamError> {
        info!(
            user_id = %user.id,
            notification_id,
            "marking notification as read"
        );
        Ok(())
    }
}

impl Default for WorkdayService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkdaySource for WorkdayService {
    async fn dashboard_data(
        &self,
        user: &User,
        _access_token: &str,
    ) -> Result<WorkdayDashboard, UpstreamError> {
        let (notifications, action_items, tuition_fees, student_record) = tokio::join!(
            self.notifications(user),
            self.action_items(user),
            self.tuition_fees(user),
            self.student_record(user),
        );
        Ok(WorkdayDashboard {
            notifications,
            action_items,
            tuition_fees,
            student_record,
        })
    }
}
