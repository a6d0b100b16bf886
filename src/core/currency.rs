use rust_decimal::Decimal;

/// Monetary rules for the CFA franc, the single currency of the system.
///
/// FCFA has no minor unit: every amount is an integer number of francs
/// (decimal scale 0).
pub struct Fcfa;

impl Fcfa {
    /// Decimal scale for FCFA amounts (no decimal places)
    pub const SCALE: u32 = 0;

    /// Rounds a decimal value to a whole number of francs
    pub fn round(amount: Decimal) -> Decimal {
        amount.round_dp(Self::SCALE)
    }

    /// Validates that a decimal value is a well-formed FCFA amount
    pub fn validate_amount(amount: Decimal) -> Result<(), String> {
        if amount.scale() > Self::SCALE {
            return Err(format!(
                "FCFA amounts must have no decimal places, got scale {}",
                amount.scale()
            ));
        }

        if amount < Decimal::ZERO {
            return Err("FCFA amount cannot be negative".to_string());
        }

        Ok(())
    }

    /// Smallest representable unit (one franc)
    pub fn smallest_unit() -> Decimal {
        Decimal::ONE
    }
}
