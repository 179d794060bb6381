//! Dashboard snapshot shapes
//!
//! Each section wraps one upstream's dashboard payload. Unread counts are
//! computed here at assembly, from the fetched records, rather than taken
//! from the upstream.

use serde::Serialize;

use crate::auth::models::User;
use crate::canvas::models::CanvasDashboard;
use crate::cyride::models::CyrideDashboard;
use crate::outlook::models::OutlookDashboard;
use crate::workday::models::WorkdayDashboard;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasSection {
    #[serde(flatten)]
    pub data: CanvasDashboard,
    pub unread_announcements: usize,
}

impl CanvasSection {
    pub fn from_fetch(data: CanvasDashboard) -> Self {
        let unread_announcements = data
            .recent_announcements
            .iter()
            .filter(|a| a.is_unread())
            .count();
        CanvasSection {
            data,
            unread_announcements,
        }
    }

    pub fn fallback() -> Self {
        CanvasSection {
            data: CanvasDashboard::default(),
            unread_announcements: 0,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlookSection {
    #[serde(flatten)]
    pub data: OutlookDashboard,
    pub unread_important_emails: usize,
}

impl OutlookSection {
    pub fn from_fetch(data: OutlookDashboard) -> Self {
        let unread_important_emails = data
            .important_emails
            .iter()
            .filter(|e| !e.is_read)
            .count();
        OutlookSection {
            data,
            unread_important_emails,
        }
    }

    pub fn fallback() -> Self {
        OutlookSection {
            data: OutlookDashboard::default(),
            unread_important_emails: 0,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkdaySection {
    #[serde(flatten)]
    pub data: WorkdayDashboard,
    pub unread_notifications: usize,
}

impl WorkdaySection {
    pub fn from_fetch(data: WorkdayDashboard) -> Self {
        let unread_notifications = data
            .notifications
            .iter()
            .filter(|n| n.is_unread())
            .count();
        WorkdaySection {
            data,
            unread_notifications,
        }
    }

    /// The fallback still carries the caller's identity in the student
    /// record so the client never renders an empty profile.
    pub fn fallback(user: &User) -> Self {
        WorkdaySection {
            data: WorkdayDashboard::fallback(user),
            unread_notifications: 0,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CyrideSection {
    #[serde(flatten)]
    pub data: CyrideDashboard,
}

impl CyrideSection {
    pub fn from_fetch(data: CyrideDashboard) -> Self {
        CyrideSection { data }
    }

    pub fn fallback() -> Self {
        CyrideSection {
            data: CyrideDashboard::default(),
        }
    }
}

/// The assembled snapshot. Every section is always present; a failed
/// upstream contributes its fallback rather than removing the key.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub user: User,
    pub canvas: CanvasSection,
    pub outlook: OutlookSection,
    pub workday: WorkdaySection,
    pub cyride: CyrideSection,
}
