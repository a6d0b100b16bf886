pub mod payment;

pub use payment::{
    NewPayment, PaymentMethod, PaymentRecord, PaymentStatus, PaymentType, PaymentWithStudent,
};
