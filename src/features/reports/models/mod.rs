mod report;

pub use report::{normalize_status, CreateReport, Report, ReportStatus};
