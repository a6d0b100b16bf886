pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{OutstandingFilter, OutstandingStudent, StudentBalance, TuitionStatus};
pub use repositories::{BalanceRow, LedgerStore, PgLedgerRepository};
pub use services::{BalanceCalculator, LedgerService};
