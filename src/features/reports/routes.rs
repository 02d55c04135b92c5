use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::features::reports::dtos::MAX_IMAGE_SIZE;
use crate::features::reports::handlers;
use crate::features::reports::services::ReportService;

/// Create routes for the reports feature
///
/// All routes are public; the status endpoint has no auth.
pub fn routes(report_service: Arc<ReportService>) -> Router {
    Router::new()
        .route(
            "/api/reports",
            get(handlers::list_reports)
                .post(handlers::submit_report)
                .fallback(handlers::reports_method_not_allowed)
                // Allow body size up to MAX_IMAGE_SIZE + buffer for multipart overhead
                .layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE + 1024 * 1024)),
        )
        .route(
            "/api/reports/status",
            post(handlers::update_report_status).fallback(handlers::status_method_not_allowed),
        )
        .with_state(report_service)
}
