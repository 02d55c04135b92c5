//! Citizen problem reports.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/reports` | No | Submit a report (multipart, optional image) |
//! | GET | `/api/reports` | No | List all reports, newest first |
//! | POST | `/api/reports/status` | No | Change a report's status |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::PgReportRepository;
pub use routes::routes;
pub use services::ReportService;
