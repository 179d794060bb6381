// Application state shared across all modules

use std::sync::Arc;

use super::config::AppConfig;
use crate::auth::oauth::MicrosoftOAuth;
use crate::auth::token::TokenCodec;
use crate::canvas::services::CanvasService;
use crate::cyride::services::CyrideService;
use crate::dashboard::services::DashboardService;
use crate::outlook::services::OutlookService;
use crate::workday::services::WorkdayService;

/// Per-process services and configuration. Everything here is immutable
/// after startup; requests carry their own identity and upstream token.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub token_codec: Arc<TokenCodec>,
    pub oauth: Arc<MicrosoftOAuth>,
    pub canvas: Arc<CanvasService>,
    pub outlook: Arc<OutlookService>,
    pub workday: Arc<WorkdayService>,
    pub cyride: Arc<CyrideService>,
    pub dashboard: Arc<DashboardService>,
}
