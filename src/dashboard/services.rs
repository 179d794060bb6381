//! Dashboard aggregation
//!
//! One trait per upstream so the aggregator can be exercised against mock
//! sources. The snapshot settles all four fetches; a failure in one never
//! cancels the others or the request.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use super::models::{
    CanvasSection, CyrideSection, DashboardData, OutlookSection, WorkdaySection,
};
use crate::auth::models::User;
use crate::canvas::models::CanvasDashboard;
use crate::common::UpstreamError;
use crate::cyride::models::CyrideDashboard;
use crate::outlook::models::OutlookDashboard;
use crate::workday::models::WorkdayDashboard;

#[async_trait]
pub trait CanvasSource: Send + Sync {
    async fn dashboard_data(
        &self,
        user: &User,
        access_token: &str,
    ) -> Result<CanvasDashboard, UpstreamError>;
}

#[async_trait]
pub trait OutlookSource: Send + Sync {
    async fn dashboard_data(
        &self,
        user: &User,
        access_token: &str,
    ) -> Result<OutlookDashboard, UpstreamError>;
}

#[async_trait]
pub trait WorkdaySource: Send + Sync {
    async fn dashboard_data(
        &self,
        user: &User,
        access_token: &str,
    ) -> Result<WorkdayDashboard, UpstreamError>;
}

#[async_trait]
pub trait CyrideSource: Send + Sync {
    async fn dashboard_data(
        &self,
        user: &User,
        access_token: &str,
    ) -> Result<CyrideDashboard, UpstreamError>;
}

pub struct DashboardService {
    canvas: Arc<dyn CanvasSource>,
    outlook: Arc<dyn OutlookSource>,
    workday: Arc<dyn WorkdaySource>,
    cyride: Arc<dyn CyrideSource>,
}

impl DashboardService {
    pub fn new(
        canvas: Arc<dyn CanvasSource>,
        outlook: Arc<dyn OutlookSource>,
        workday: Arc<dyn WorkdaySource>,
        cyride: Arc<dyn CyrideSource>,
    ) -> Self {
        Self {
            canvas,
            outlook,
            workday,
            cyride,
        }
    }

    /// Fetch all four upstreams concurrently and assemble the snapshot,
    /// substituting per-section fallbacks for failures.
    pub async fn build_snapshot(&self, user: &User, access_token: &str) -> DashboardData {
        let (canvas, outlook, workday, cyride) = tokio::join!(
            self.canvas.dashboard_data(user, access_token),
            self.outlook.dashboard_data(user, access_token),
            self.workday.dashboard_data(user, access_token),
            self.cyride.dashboard_data(user, access_token),
        );

        let canvas = match canvas {
            Ok(data) => CanvasSection::from_fetch(data),
            Err(e) => {
                warn!(error = %e, "canvas dashboard fetch failed");
                CanvasSection::fallback()
            }
        };
        let outlook = match outlook {
            Ok(data) => OutlookSection::from_fetch(data),
            Err(e) => {
                warn!(error = %e, "outlook dashboard fetch failed");
                OutlookSection::fallback()
            }
        };
        let workday = match workday {
            Ok(data) => WorkdaySection::from_fetch(data),
            Err(e) => {
                warn!(error = %e, "workday dashboard fetch failed");
                WorkdaySection::fallback(user)
            }
        };
        let cyride = match cyride {
            Ok(data) => CyrideSection::from_fetch(data),
            Err(e) => {
                warn!(error = %e, "cyride dashboard fetch failed");
                CyrideSection::fallback()
            }
        };

        DashboardData {
            user: user.clone(),
            canvas,
            outlook,
            workday,
            cyride,
        }
    }
}
