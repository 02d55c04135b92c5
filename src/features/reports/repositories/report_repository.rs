use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{CreateReport, Report, ReportStatus};

/// Persistence for reports.
///
/// Each call is one atomic statement; concurrent writers are serialised by
/// the database alone.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Insert a `Pending` report and return its id
    async fn insert(&self, data: &CreateReport) -> Result<i64>;

    /// All reports, `created_at` descending, ties newest id first
    async fn list_newest_first(&self) -> Result<Vec<Report>>;

    /// Raw stored status, `None` when the report does not exist
    async fn find_status(&self, id: i64) -> Result<Option<String>>;

    /// Returns the number of rows updated (0 or 1)
    async fn update_status(&self, id: i64, status: ReportStatus) -> Result<u64>;
}

/// PostgreSQL-backed report repository
pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    async fn insert(&self, data: &CreateReport) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO reports (description, image, location, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&data.description)
        .bind(&data.image)
        .bind(&data.location)
        .bind(ReportStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert report: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn list_newest_first(&self) -> Result<Vec<Report>> {
        sqlx::query_as::<_, Report>(
            r#"
            SELECT id, description, image, location, status, created_at
            FROM reports
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list reports: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn find_status(&self, id: i64) -> Result<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT status FROM reports WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to look up report {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    async fn update_status(&self, id: i64, status: ReportStatus) -> Result<u64> {
        let result = sqlx::query("UPDATE reports SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update status of report {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected())
    }
}
