pub mod cohort_stats;

pub use cohort_stats::{CohortMember, CohortStats, LevelOutstanding};
