use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where a student stands against the annual fee.
///
/// "En retard" means no confirmed payment exists yet — the records carry no
/// due date, so lateness is a proxy for "nothing paid at all", not a true
/// overdue-by-date classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TuitionStatus {
    #[serde(rename = "À jour")]
    UpToDate,

    #[serde(rename = "Partiel")]
    Partial,

    #[serde(rename = "En retard")]
    Late,
}

impl std::fmt::Display for TuitionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TuitionStatus::UpToDate => write!(f, "À jour"),
            TuitionStatus::Partial => write!(f, "Partiel"),
            TuitionStatus::Late => write!(f, "En retard"),
        }
    }
}

impl std::str::FromStr for TuitionStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "À jour" => Ok(TuitionStatus::UpToDate),
            "Partiel" => Ok(TuitionStatus::Partial),
            "En retard" => Ok(TuitionStatus::Late),
            _ => Err(format!("Invalid tuition status: {}", s)),
        }
    }
}

/// Derived financial position of one student. Recomputed on every read,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentBalance {
    pub student_id: String,

    /// Annual fee from the student's fee plan
    pub total_fees: Decimal,

    /// Sum of confirmed payment amounts
    pub paid_amount: Decimal,

    /// `max(total_fees - paid_amount, 0)`; overpayment clamps to zero and
    /// is not tracked as credit
    pub outstanding_amount: Decimal,

    pub payment_status: TuitionStatus,
}

impl StudentBalance {
    /// Share of the annual fee already paid, in [0, 1]. A zero-fee plan
    /// counts as fully paid.
    pub fn paid_ratio(&self) -> Decimal {
        if self.total_fees.is_zero() {
            return Decimal::ONE;
        }
        (self.paid_amount / self.total_fees).min(Decimal::ONE)
    }
}
