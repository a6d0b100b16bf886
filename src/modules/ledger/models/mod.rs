pub mod outstanding;
pub mod student_balance;

pub use outstanding::{
    AmountBracket, OutstandingFilter, OutstandingStudent, Priority, UNASSIGNED_LEVEL,
};
pub use student_balance::{StudentBalance, TuitionStatus};
