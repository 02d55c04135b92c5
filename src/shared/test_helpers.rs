use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::core::config::ImageStorageConfig;
use crate::core::error::{AppError, Result};
use crate::features::reports::models::{CreateReport, Report, ReportStatus};
use crate::features::reports::repositories::ReportRepository;
use crate::features::reports::{routes, ReportService};
use crate::modules::storage::ImageStore;

pub const PLACEHOLDER: &str = "assets/images/placeholder.png";

/// Smallest byte string that sniffs as PNG
pub fn png_bytes() -> Vec<u8> {
    vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0]
}

pub fn image_store_in(dir: &Path) -> ImageStore {
    ImageStore::new(ImageStorageConfig {
        images_dir: dir.to_path_buf(),
        public_path: "assets/images".to_string(),
        placeholder: PLACEHOLDER.to_string(),
    })
}

pub fn seeded_report(id: i64, status: &str, created_at: DateTime<Utc>) -> Report {
    Report {
        id,
        description: format!("Seeded report number {}", id),
        image: None,
        location: "Main Road, Block A".to_string(),
        status: status.to_string(),
        created_at,
    }
}

/// Report router over the given repository, with images under `dir`
pub fn test_server(repository: Arc<dyn ReportRepository>, dir: &Path) -> TestServer {
    let service = Arc::new(ReportService::new(
        repository,
        Arc::new(image_store_in(dir)),
    ));
    TestServer::new(routes(service)).unwrap()
}

/// In-memory stand-in for the reports table
#[derive(Default)]
pub struct InMemoryReportRepository {
    reports: Mutex<Vec<Report>>,
    update_calls: AtomicUsize,
}

impl InMemoryReportRepository {
    pub fn with_reports(reports: Vec<Report>) -> Self {
        Self {
            reports: Mutex::new(reports),
            update_calls: AtomicUsize::new(0),
        }
    }

    pub fn snapshot(&self) -> Vec<Report> {
        self.reports.lock().unwrap().clone()
    }

    /// Number of status writes that reached storage
    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReportRepository for InMemoryReportRepository {
    async fn insert(&self, data: &CreateReport) -> Result<i64> {
        let mut reports = self.reports.lock().unwrap();
        let id = reports.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        reports.push(Report {
            id,
            description: data.description.clone(),
            image: data.image.clone(),
            location: data.location.clone(),
            status: ReportStatus::Pending.as_str().to_string(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn list_newest_first(&self) -> Result<Vec<Report>> {
        let mut reports = self.snapshot();
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(reports)
    }

    async fn find_status(&self, id: i64) -> Result<Option<String>> {
        Ok(self
            .reports
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.status.clone()))
    }

    async fn update_status(&self, id: i64, status: ReportStatus) -> Result<u64> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        let mut reports = self.reports.lock().unwrap();
        match reports.iter_mut().find(|r| r.id == id) {
            Some(report) => {
                report.status = status.as_str().to_string();
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

/// Repository whose every call fails like an unreachable database
pub struct FailingReportRepository;

fn unavailable() -> AppError {
    AppError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl ReportRepository for FailingReportRepository {
    async fn insert(&self, _data: &CreateReport) -> Result<i64> {
        Err(unavailable())
    }

    async fn list_newest_first(&self) -> Result<Vec<Report>> {
        Err(unavailable())
    }

    async fn find_status(&self, _id: i64) -> Result<Option<String>> {
        Err(unavailable())
    }

    async fn update_status(&self, _id: i64, _status: ReportStatus) -> Result<u64> {
        Err(unavailable())
    }
}
