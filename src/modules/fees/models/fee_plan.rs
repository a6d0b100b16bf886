use crate::core::{AppError, Fcfa, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Annual fee schedule applicable to a student, keyed by school level.
///
/// Fee plans are maintained by class/level configuration; the ledger only
/// reads them. The annual fee is a whole number of FCFA and never negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeePlan {
    /// Level name, e.g. "CE1" or "Maternelle"
    pub level_name: String,

    /// Annual tuition for the level, FCFA
    pub annual_fee: Decimal,
}

impl FeePlan {
    /// Create a fee plan, rejecting malformed amounts at the boundary
    pub fn new(level_name: String, annual_fee: Decimal) -> Result<Self> {
        if level_name.trim().is_empty() {
            return Err(AppError::validation("Level name cannot be empty"));
        }

        Fcfa::validate_amount(annual_fee).map_err(AppError::Validation)?;

        Ok(Self {
            level_name,
            annual_fee,
        })
    }
}
