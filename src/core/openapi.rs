use utoipa::{Modify, OpenApi};

use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::shared::types::ErrorResponseDoc;

#[derive(OpenApi)]
#[openapi(
    paths(
        reports_handlers::report_handler::submit_report,
        reports_handlers::report_handler::list_reports,
        reports_handlers::report_handler::update_report_status,
    ),
    components(
        schemas(
            // Shared
            ErrorResponseDoc,
            // Reports
            reports_models::ReportStatus,
            reports_dtos::SubmitReportForm,
            reports_dtos::SubmitReportResponseDto,
            reports_dtos::SubmitReportResponseDoc,
            reports_dtos::ReportResponseDto,
            reports_dtos::ReportListDto,
            reports_dtos::ReportListResponseDoc,
            reports_dtos::UpdateReportStatusDto,
            reports_dtos::StatusChangeDto,
            reports_dtos::StatusUpdateDataDto,
            reports_dtos::StatusUpdateResponseDoc,
        )
    ),
    tags(
        (name = "reports", description = "Citizen problem reports and their status"),
    )
)]
pub struct ApiDoc;

pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
