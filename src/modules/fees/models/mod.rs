pub mod fee_plan;

pub use fee_plan::FeePlan;
