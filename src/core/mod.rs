pub mod currency;
pub mod error;
pub mod locale;

pub use currency::Fcfa;
pub use error::{AppError, Result};
