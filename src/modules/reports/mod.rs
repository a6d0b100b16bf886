pub mod controllers;
pub mod models;
pub mod services;

pub use models::{CohortMember, CohortStats};
pub use services::ReportService;
