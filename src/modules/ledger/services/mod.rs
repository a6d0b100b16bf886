pub mod balance_calculator;
pub mod ledger_service;

pub use balance_calculator::BalanceCalculator;
pub use ledger_service::{LedgerService, StudentLedger};
