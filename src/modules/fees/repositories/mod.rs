pub mod fee_plan_repository;

pub use fee_plan_repository::{FeePlanStore, PgFeePlanRepository};
