pub mod fees;
pub mod health;
pub mod ledger;
pub mod payments;
pub mod reports;
