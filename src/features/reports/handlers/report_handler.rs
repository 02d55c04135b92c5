use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::reports::dtos::{
    ImageUpload, ReportListDto, ReportListResponseDoc, StatusUpdateDataDto,
    StatusUpdateResponseDoc, SubmitReportDto, SubmitReportForm, SubmitReportResponseDoc,
    SubmitReportResponseDto, UpdateReportStatusDto, IMAGE_TOO_LARGE_MESSAGE,
};
use crate::features::reports::services::ReportService;
use crate::shared::types::{ApiResponse, ErrorResponseDoc};

/// Submit a new problem report
///
/// Accepts multipart/form-data with:
/// - `description`: at least 10 characters (required)
/// - `location`: free-form address or coordinates (required)
/// - `image`: JPEG, PNG or GIF up to 5MB (optional)
///
/// No authentication; anyone may submit.
#[utoipa::path(
    post,
    path = "/api/reports",
    tag = "reports",
    request_body(
        content = SubmitReportForm,
        content_type = "multipart/form-data",
        description = "Report form with optional image",
    ),
    responses(
        (status = 201, description = "Report submitted", body = SubmitReportResponseDoc),
        (status = 400, description = "Validation error", body = ErrorResponseDoc),
        (status = 500, description = "Storage error", body = ErrorResponseDoc)
    )
)]
pub async fn submit_report(
    State(service): State<Arc<ReportService>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<ApiResponse<SubmitReportResponseDto>>)> {
    let mut multipart = multipart.map_err(|e| {
        debug!("Rejected submission body: {}", e);
        AppError::BadRequest(format!("Expected a multipart form: {}", e))
    })?;

    let mut description = String::new();
    let mut location = String::new();
    let mut image: Option<ImageUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(read_error)? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "description" => {
                description = field.text().await.map_err(read_error)?;
            }
            "location" => {
                location = field.text().await.map_err(read_error)?;
            }
            "image" => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let file_name = field.file_name().unwrap_or("").to_string();
                let data = field.bytes().await.map_err(read_error)?;

                // An untouched file input still sends an empty part
                if file_name.is_empty() && data.is_empty() {
                    continue;
                }

                image = Some(ImageUpload {
                    file_name,
                    content_type,
                    data: data.to_vec(),
                });
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let dto = SubmitReportDto::new(&description, &location, image);
    let created = service.submit(dto).await.inspect_err(|e| {
        tracing::warn!("Report submission rejected: {}", e);
    })?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Report submitted successfully!",
            created,
        )),
    ))
}

fn read_error(e: axum::extract::multipart::MultipartError) -> AppError {
    debug!("Failed to read multipart data: {}", e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::Validation(IMAGE_TOO_LARGE_MESSAGE.to_string())
    } else {
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    }
}

/// List all reports, newest first
///
/// Each report carries a display-ready image path (placeholder when the
/// upload is missing) and a formatted creation date. Failures still return
/// an empty `data` list.
#[utoipa::path(
    get,
    path = "/api/reports",
    tag = "reports",
    responses(
        (status = 200, description = "All reports", body = ReportListResponseDoc),
        (status = 500, description = "Storage error", body = ReportListResponseDoc)
    )
)]
pub async fn list_reports(
    State(service): State<Arc<ReportService>>,
) -> (StatusCode, Json<ApiResponse<ReportListDto>>) {
    match service.list().await {
        Ok(list) => (
            StatusCode::OK,
            Json(ApiResponse::success("Reports fetched successfully", list)),
        ),
        Err(e) => {
            let (status, message) = e.status_and_message();
            (
                status,
                Json(ApiResponse::failure_with(message, ReportListDto::default())),
            )
        }
    }
}

/// Change a report's status
///
/// Any of the four statuses may be set from any other. Setting the current
/// status again succeeds with `changed: false`.
///
/// This endpoint is not authenticated.
#[utoipa::path(
    post,
    path = "/api/reports/status",
    tag = "reports",
    request_body = UpdateReportStatusDto,
    responses(
        (status = 200, description = "Status updated or already set", body = StatusUpdateResponseDoc),
        (status = 400, description = "Missing or invalid fields", body = ErrorResponseDoc),
        (status = 404, description = "Report not found", body = ErrorResponseDoc),
        (status = 500, description = "Storage error", body = ErrorResponseDoc)
    )
)]
pub async fn update_report_status(
    State(service): State<Arc<ReportService>>,
    AppJson(dto): AppJson<UpdateReportStatusDto>,
) -> Result<Json<ApiResponse<StatusUpdateDataDto>>> {
    let change = service.update_status(&dto).await?;

    let message = if change.changed {
        "Status updated successfully".to_string()
    } else {
        format!("Status is already set to {}", change.new_status)
    };

    Ok(Json(ApiResponse::success(
        message,
        StatusUpdateDataDto { data: change },
    )))
}

pub async fn reports_method_not_allowed() -> AppError {
    AppError::MethodNotAllowed(
        "Invalid request method. Use POST to submit a report or GET to list reports.".to_string(),
    )
}

pub async fn status_method_not_allowed() -> AppError {
    AppError::MethodNotAllowed("Invalid request method. Only POST is allowed.".to_string())
}
