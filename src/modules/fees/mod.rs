pub mod models;
pub mod repositories;

pub use models::FeePlan;
pub use repositories::{FeePlanStore, PgFeePlanRepository};
