use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::student_balance::StudentBalance;

/// Level bucket used when a student has no class or level assigned
pub const UNASSIGNED_LEVEL: &str = "Non défini";

/// Follow-up priority bands for the outstanding-payments list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "Élevée")]
    High,

    #[serde(rename = "Moyenne")]
    Medium,

    #[serde(rename = "Faible")]
    Low,
}

impl Priority {
    /// Band an outstanding amount: 300 000 FCFA and up is high priority,
    /// 150 000 and up is medium, anything below is low.
    pub fn for_outstanding(outstanding: Decimal) -> Self {
        if outstanding >= Decimal::new(300000, 0) {
            Priority::High
        } else if outstanding >= Decimal::new(150000, 0) {
            Priority::Medium
        } else {
            Priority::Low
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::High => write!(f, "Élevée"),
            Priority::Medium => write!(f, "Moyenne"),
            Priority::Low => write!(f, "Faible"),
        }
    }
}

/// Outstanding-amount brackets offered by the list filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmountBracket {
    /// Below 100 000 FCFA
    Low,
    /// 100 000 to 300 000 FCFA (exclusive)
    Medium,
    /// 300 000 FCFA and above
    High,
}

impl AmountBracket {
    pub fn contains(&self, outstanding: Decimal) -> bool {
        let low = Decimal::new(100000, 0);
        let high = Decimal::new(300000, 0);
        match self {
            AmountBracket::Low => outstanding < low,
            AmountBracket::Medium => outstanding >= low && outstanding < high,
            AmountBracket::High => outstanding >= high,
        }
    }
}

impl std::str::FromStr for AmountBracket {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "low" => Ok(AmountBracket::Low),
            "medium" => Ok(AmountBracket::Medium),
            "high" => Ok(AmountBracket::High),
            _ => Err(format!("Invalid amount bracket: {}", s)),
        }
    }
}

/// Filter for the outstanding-students listing. Level matching is exact and
/// case-sensitive.
#[derive(Debug, Clone, Default)]
pub struct OutstandingFilter {
    pub level: Option<String>,
    pub bracket: Option<AmountBracket>,
}

impl OutstandingFilter {
    pub fn matches(&self, student: &OutstandingStudent) -> bool {
        if let Some(level) = &self.level {
            if student.level_name.as_deref() != Some(level.as_str()) {
                return false;
            }
        }

        if let Some(bracket) = &self.bracket {
            if !bracket.contains(student.balance.outstanding_amount) {
                return false;
            }
        }

        true
    }
}

/// One student row of the outstanding-payments listing: identity, class
/// assignment, and the attached balance fields.
#[derive(Debug, Clone)]
pub struct OutstandingStudent {
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub class_name: Option<String>,
    pub level_name: Option<String>,
    pub balance: StudentBalance,
}

impl OutstandingStudent {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Level bucket for grouping, falling back to the unassigned label
    pub fn level_bucket(&self) -> &str {
        self.level_name.as_deref().unwrap_or(UNASSIGNED_LEVEL)
    }

    pub fn priority(&self) -> Priority {
        Priority::for_outstanding(self.balance.outstanding_amount)
    }
}
