use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::reports::dtos::{
    ReportListDto, ReportResponseDto, StatusChangeDto, SubmitReportDto, SubmitReportResponseDto,
    UpdateReportStatusDto,
};
use crate::features::reports::models::CreateReport;
use crate::features::reports::repositories::ReportRepository;
use crate::modules::storage::ImageStore;
use crate::shared::sanitize::sanitize_text;

/// Service for report submission, listing and status changes
pub struct ReportService {
    repository: Arc<dyn ReportRepository>,
    images: Arc<ImageStore>,
}

impl ReportService {
    pub fn new(repository: Arc<dyn ReportRepository>, images: Arc<ImageStore>) -> Self {
        Self { repository, images }
    }

    /// Validate and store a new report.
    ///
    /// The image is written before the row is inserted, and removed again if
    /// the insert fails, so no row points at a missing upload and no upload
    /// is left without a row.
    pub async fn submit(&self, dto: SubmitReportDto) -> Result<SubmitReportResponseDto> {
        dto.check()?;

        let image = match &dto.image {
            Some(upload) => Some(self.images.save(upload).await?),
            None => None,
        };

        let data = CreateReport {
            description: sanitize_text(&dto.description),
            location: sanitize_text(&dto.location),
            image,
        };

        let report_id = match self.repository.insert(&data).await {
            Ok(id) => id,
            Err(e) => {
                if let Some(name) = &data.image {
                    self.images.remove(name).await;
                }
                return Err(e);
            }
        };

        tracing::info!(
            "Report submitted: id={}, with_image={}",
            report_id,
            data.image.is_some()
        );

        Ok(SubmitReportResponseDto { report_id })
    }

    /// Every report, newest first, with display fields derived.
    /// Image presence is checked on disk on every call.
    pub async fn list(&self) -> Result<ReportListDto> {
        let reports = self.repository.list_newest_first().await?;

        let mut data = Vec::with_capacity(reports.len());
        for report in reports {
            let image = self.images.public_url(report.image.as_deref()).await;
            data.push(ReportResponseDto::from_report(report, image));
        }

        Ok(data.into())
    }

    /// Move a report to a new status. Setting the current status again is a
    /// successful no-op with `changed = false`.
    pub async fn update_status(&self, dto: &UpdateReportStatusDto) -> Result<StatusChangeDto> {
        let update = dto.parse()?;

        let current = self
            .repository
            .find_status(update.report_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Report not found".to_string()))?;

        let new_status = update.status.as_str().to_string();

        if current == new_status {
            return Ok(StatusChangeDto {
                report_id: update.report_id,
                old_status: current,
                new_status,
                changed: false,
            });
        }

        let updated = self
            .repository
            .update_status(update.report_id, update.status)
            .await?;
        if updated == 0 {
            // Row vanished between lookup and update
            return Err(AppError::NotFound("Report not found".to_string()));
        }

        tracing::info!(
            "Report {} status changed from {} to {}",
            update.report_id,
            current,
            new_status
        );

        Ok(StatusChangeDto {
            report_id: update.report_id,
            old_status: current,
            new_status,
            changed: true,
        })
    }
}
