pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{NewPayment, PaymentMethod, PaymentRecord, PaymentStatus, PaymentType};
pub use repositories::{PaymentStore, PgPaymentRepository};
pub use services::PaymentService;
