use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{normalize_status, Report, ReportStatus};
use crate::shared::validation::INTEGER_ID_REGEX;

/// Allowed declared content types for report images
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/gif"];

/// Maximum image size in bytes (5MB)
pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

pub const INVALID_IMAGE_TYPE_MESSAGE: &str =
    "Image upload failed: Invalid file type. Only JPEG, PNG, and GIF images are allowed.";

pub const IMAGE_TOO_LARGE_MESSAGE: &str =
    "Image upload failed: File size exceeds maximum limit of 5MB.";

pub fn is_image_type_allowed(content_type: &str) -> bool {
    let content_type = content_type.trim().to_ascii_lowercase();
    ALLOWED_IMAGE_TYPES.contains(&content_type.as_str())
}

/// Get file extension from content type
pub fn get_extension_from_content_type(content_type: &str) -> Option<&'static str> {
    match content_type.trim().to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

/// Detect JPEG, PNG or GIF from the leading bytes
pub fn sniff_image_type(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if data.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some("image/png")
    } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        Some("image/gif")
    } else {
        None
    }
}

/// Submit report form for OpenAPI documentation.
/// The handler reads the multipart stream directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct SubmitReportForm {
    /// Problem description, at least 10 characters
    #[schema(example = "Broken streetlight on main road")]
    pub description: String,
    /// Address or "Lat: x, Lng: y"
    #[schema(example = "Main Road, Block A")]
    pub location: String,
    /// Optional JPEG, PNG or GIF image, at most 5MB
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub image: Option<String>,
}

/// An uploaded image as received from the client
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Client-supplied name, only consulted for its extension
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl ImageUpload {
    /// Type first, then size
    pub fn validate(&self) -> Result<()> {
        let declared_ok = is_image_type_allowed(&self.content_type);
        if !declared_ok || sniff_image_type(&self.data).is_none() {
            return Err(AppError::Validation(INVALID_IMAGE_TYPE_MESSAGE.to_string()));
        }

        if self.data.len() > MAX_IMAGE_SIZE {
            return Err(AppError::Validation(IMAGE_TOO_LARGE_MESSAGE.to_string()));
        }

        Ok(())
    }
}

/// Submission as typed by the client, trimmed but not yet escaped.
///
/// Lengths are checked on this text; escaping happens when the row is built.
#[derive(Debug, Clone, Validate)]
pub struct SubmitReportDto {
    #[validate(length(min = 10, message = "Description must be at least 10 characters long."))]
    pub description: String,

    #[validate(length(min = 1, message = "Location is required."))]
    pub location: String,

    pub image: Option<ImageUpload>,
}

impl SubmitReportDto {
    pub fn new(description: &str, location: &str, image: Option<ImageUpload>) -> Self {
        Self {
            description: description.trim().to_string(),
            location: location.trim().to_string(),
            image,
        }
    }

    /// Runs every check in a fixed order and reports the first failure
    pub fn check(&self) -> Result<()> {
        if self.description.is_empty() {
            return Err(AppError::Validation("Description is required.".to_string()));
        }

        if let Err(errors) = self.validate() {
            let message = first_error_message(&errors, &["description", "location"])
                .unwrap_or_else(|| errors.to_string());
            return Err(AppError::Validation(message));
        }

        if let Some(image) = &self.image {
            image.validate()?;
        }

        Ok(())
    }
}

fn first_error_message(errors: &ValidationErrors, field_order: &[&str]) -> Option<String> {
    let field_errors = errors.field_errors();
    field_order.iter().find_map(|field| {
        field_errors
            .get(*field)
            .and_then(|errs| errs.first())
            .and_then(|e| e.message.as_ref())
            .map(|m| m.to_string())
    })
}

/// Payload of a successful submission
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitReportResponseDto {
    pub report_id: i64,
}

/// A report as shown on the dashboard
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
    pub id: i64,
    pub description: String,
    /// Public image path, or the placeholder
    #[schema(example = "assets/images/report_5f0c_1705314600.jpg")]
    pub image: String,
    pub location: String,
    #[schema(example = "Pending")]
    pub status: String,
    #[schema(example = "2024-01-15 10:30:00")]
    pub created_at: String,
    #[schema(example = "January 15, 2024 10:30 AM")]
    pub created_at_formatted: String,
}

impl ReportResponseDto {
    /// `image` is the already-resolved public path
    pub fn from_report(report: Report, image: String) -> Self {
        Self {
            id: report.id,
            description: report.description,
            image,
            location: report.location,
            status: normalize_status(&report.status),
            created_at: format_timestamp(&report.created_at),
            created_at_formatted: format_display_date(&report.created_at),
        }
    }
}

pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// "January 15, 2024 10:30 AM"
pub fn format_display_date(at: &DateTime<Utc>) -> String {
    at.format("%B %-d, %Y %-I:%M %p").to_string()
}

/// Payload of the report list, present on success and failure
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ReportListDto {
    pub data: Vec<ReportResponseDto>,
    pub count: usize,
}

impl From<Vec<ReportResponseDto>> for ReportListDto {
    fn from(data: Vec<ReportResponseDto>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

/// Request body for a status change.
///
/// Fields are loosely typed so that missing or malformed values produce the
/// specific messages below instead of a generic JSON rejection.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateReportStatusDto {
    /// Positive integer, as a number or numeric string
    #[schema(value_type = i64, example = 1)]
    pub report_id: Option<serde_json::Value>,
    #[schema(value_type = String, example = "In Progress")]
    pub status: Option<serde_json::Value>,
}

/// Status change request that passed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidStatusUpdate {
    pub report_id: i64,
    pub status: ReportStatus,
}

impl UpdateReportStatusDto {
    pub fn parse(&self) -> Result<ValidStatusUpdate> {
        let (Some(raw_id), Some(raw_status)) = (&self.report_id, &self.status) else {
            return Err(AppError::Validation(
                "Missing required fields: report_id and status are required".to_string(),
            ));
        };
        if raw_id.is_null() || raw_status.is_null() {
            return Err(AppError::Validation(
                "Missing required fields: report_id and status are required".to_string(),
            ));
        }

        let report_id = parse_report_id(raw_id)
            .filter(|id| *id > 0)
            .ok_or_else(|| AppError::Validation("Invalid report ID".to_string()))?;

        let status = raw_status
            .as_str()
            .and_then(|s| ReportStatus::from_label(s.trim()))
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "Invalid status. Allowed values: {}",
                    ReportStatus::allowed_values()
                ))
            })?;

        Ok(ValidStatusUpdate { report_id, status })
    }
}

fn parse_report_id(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => {
            let s = s.trim();
            if INTEGER_ID_REGEX.is_match(s) {
                s.trim_start_matches('+').parse().ok()
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Outcome of a status change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusChangeDto {
    pub report_id: i64,
    pub old_status: String,
    pub new_status: String,
    pub changed: bool,
}

/// Payload of a successful status update, serialised under `data`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusUpdateDataDto {
    pub data: StatusChangeDto,
}

/// Response bodies for OpenAPI documentation
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct SubmitReportResponseDoc {
    pub success: bool,
    #[schema(example = "Report submitted successfully!")]
    pub message: String,
    pub report_id: Option<i64>,
}

#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct ReportListResponseDoc {
    pub success: bool,
    #[schema(example = "Reports fetched successfully")]
    pub message: String,
    pub data: Vec<ReportResponseDto>,
    pub count: usize,
}

#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct StatusUpdateResponseDoc {
    pub success: bool,
    #[schema(example = "Status updated successfully")]
    pub message: String,
    pub data: Option<StatusChangeDto>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];

    fn validation_message(result: Result<()>) -> String {
        match result {
            Err(AppError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_short_description_rejected() {
        let dto = SubmitReportDto::new("  too short ", "Main Road", None);
        assert_eq!(dto.description, "too short");
        assert_eq!(
            validation_message(dto.check()),
            "Description must be at least 10 characters long."
        );
    }

    #[test]
    fn test_empty_description_rejected() {
        let dto = SubmitReportDto::new("   ", "", None);
        assert_eq!(validation_message(dto.check()), "Description is required.");
    }

    #[test]
    fn test_description_checked_before_location() {
        let dto = SubmitReportDto::new("short", "", None);
        assert_eq!(
            validation_message(dto.check()),
            "Description must be at least 10 characters long."
        );
    }

    #[test]
    fn test_missing_location_rejected() {
        let dto = SubmitReportDto::new("Broken streetlight on main road", "  ", None);
        assert_eq!(validation_message(dto.check()), "Location is required.");
    }

    #[test]
    fn test_description_length_ignores_escaping() {
        let markup = SubmitReportDto::new("  <<<<<  ", "Main Road", None);
        assert_eq!(
            validation_message(markup.check()),
            "Description must be at least 10 characters long."
        );

        let backslashes = SubmitReportDto::new(r"\a\b\c\d\e", "Main Road", None);
        assert_eq!(backslashes.description.chars().count(), 10);
        assert!(backslashes.check().is_ok());
    }

    #[test]
    fn test_description_length_counts_characters() {
        // Ten characters, more than ten bytes
        let dto = SubmitReportDto::new("ĉĉĉĉĉĉĉĉĉĉ", "Sukkur", None);
        assert!(dto.check().is_ok());
    }

    #[test]
    fn test_image_type_checked_by_declaration_and_content() {
        let declared_wrong = ImageUpload {
            file_name: "a.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            data: PNG_BYTES.to_vec(),
        };
        assert_eq!(
            validation_message(declared_wrong.validate()),
            INVALID_IMAGE_TYPE_MESSAGE
        );

        let content_wrong = ImageUpload {
            file_name: "a.png".to_string(),
            content_type: "image/png".to_string(),
            data: b"<?php echo 1; ?>".to_vec(),
        };
        assert_eq!(
            validation_message(content_wrong.validate()),
            INVALID_IMAGE_TYPE_MESSAGE
        );
    }

    #[test]
    fn test_image_size_limit() {
        let mut data = PNG_BYTES.to_vec();
        data.resize(MAX_IMAGE_SIZE, 0);
        let at_limit = ImageUpload {
            file_name: "a.png".to_string(),
            content_type: "image/png".to_string(),
            data,
        };
        assert!(at_limit.validate().is_ok());

        let mut over = at_limit.clone();
        over.data.push(0);
        assert_eq!(validation_message(over.validate()), IMAGE_TOO_LARGE_MESSAGE);
    }

    #[test]
    fn test_sniff_image_type() {
        assert_eq!(sniff_image_type(&[0xFF, 0xD8, 0xFF, 0xE0]), Some("image/jpeg"));
        assert_eq!(sniff_image_type(PNG_BYTES), Some("image/png"));
        assert_eq!(sniff_image_type(b"GIF89a...."), Some("image/gif"));
        assert_eq!(sniff_image_type(b""), None);
    }

    #[test]
    fn test_extension_from_content_type() {
        assert_eq!(get_extension_from_content_type("image/jpg"), Some("jpg"));
        assert_eq!(get_extension_from_content_type("IMAGE/PNG"), Some("png"));
        assert_eq!(get_extension_from_content_type("image/webp"), None);
    }

    #[test]
    fn test_date_formatting() {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(format_timestamp(&at), "2024-01-15 10:30:00");
        assert_eq!(format_display_date(&at), "January 15, 2024 10:30 AM");

        let evening = Utc.with_ymd_and_hms(2024, 3, 5, 21, 7, 0).unwrap();
        assert_eq!(format_display_date(&evening), "March 5, 2024 9:07 PM");
    }

    fn status_update(report_id: serde_json::Value, status: serde_json::Value) -> UpdateReportStatusDto {
        UpdateReportStatusDto {
            report_id: Some(report_id),
            status: Some(status),
        }
    }

    #[test]
    fn test_parse_status_update() {
        let parsed = status_update(json!(3), json!(" Resolved ")).parse().unwrap();
        assert_eq!(
            parsed,
            ValidStatusUpdate {
                report_id: 3,
                status: ReportStatus::Resolved
            }
        );

        let from_string = status_update(json!("12"), json!("In Progress")).parse().unwrap();
        assert_eq!(from_string.report_id, 12);
    }

    #[test]
    fn test_parse_status_update_missing_fields() {
        let dto = UpdateReportStatusDto {
            report_id: Some(json!(1)),
            status: None,
        };
        assert_eq!(
            validation_message(dto.parse().map(|_| ())),
            "Missing required fields: report_id and status are required"
        );
    }

    #[test]
    fn test_parse_status_update_invalid_id() {
        for id in [json!(0), json!(-4), json!("abc"), json!(1.5), json!(true)] {
            assert_eq!(
                validation_message(status_update(id, json!("Pending")).parse().map(|_| ())),
                "Invalid report ID"
            );
        }
    }

    #[test]
    fn test_parse_status_update_invalid_status() {
        for status in [json!("pending"), json!("Done"), json!(3)] {
            assert_eq!(
                validation_message(status_update(json!(1), status).parse().map(|_| ())),
                "Invalid status. Allowed values: Pending, In Progress, Resolved, Closed"
            );
        }
    }

    #[test]
    fn test_report_response_from_report() {
        let report = Report {
            id: 9,
            description: "Overflowing drain near market".to_string(),
            image: None,
            location: "Lat: 27.7, Lng: 68.8".to_string(),
            status: "in progress".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
        };

        let dto = ReportResponseDto::from_report(report, "assets/images/placeholder.png".to_string());

        assert_eq!(dto.status, "In progress");
        assert_eq!(dto.created_at, "2024-01-15 10:30:00");
        assert_eq!(dto.created_at_formatted, "January 15, 2024 10:30 AM");
        assert_eq!(dto.image, "assets/images/placeholder.png");
    }
}
