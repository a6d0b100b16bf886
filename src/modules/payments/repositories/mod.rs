pub mod payment_repository;

pub use payment_repository::{PaymentStore, PgPaymentRepository};
