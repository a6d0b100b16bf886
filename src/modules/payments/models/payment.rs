use crate::core::{AppError, Fcfa, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a payment was made.
///
/// The French labels are the persisted vocabulary of the school's records;
/// they are the wire format for both the database and the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "Espèces")]
    Cash,

    #[serde(rename = "Mobile Money")]
    MobileMoney,

    #[serde(rename = "Virement Bancaire")]
    BankTransfer,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "Espèces"),
            PaymentMethod::MobileMoney => write!(f, "Mobile Money"),
            PaymentMethod::BankTransfer => write!(f, "Virement Bancaire"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Espèces" => Ok(PaymentMethod::Cash),
            "Mobile Money" => Ok(PaymentMethod::MobileMoney),
            "Virement Bancaire" => Ok(PaymentMethod::BankTransfer),
            _ => Err(format!("Invalid payment method: {}", s)),
        }
    }
}

/// What the payment is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PaymentType {
    #[serde(rename = "Inscription")]
    Enrollment,

    #[serde(rename = "Scolarité")]
    Tuition,

    #[serde(rename = "Cantine")]
    Cafeteria,

    #[serde(rename = "Transport")]
    Transport,

    #[serde(rename = "Fournitures")]
    Supplies,

    #[serde(rename = "Autre")]
    Other,
}

impl PaymentType {
    /// Standard amount pre-filled by the submission form. Tuition varies by
    /// level and Other is free-form, so both default to zero. A suggestion
    /// only, never enforced.
    pub fn default_amount(&self) -> Decimal {
        match self {
            PaymentType::Enrollment => Decimal::new(50000, 0),
            PaymentType::Cafeteria => Decimal::new(25000, 0),
            PaymentType::Transport => Decimal::new(15000, 0),
            PaymentType::Supplies => Decimal::new(20000, 0),
            PaymentType::Tuition | PaymentType::Other => Decimal::ZERO,
        }
    }

    pub fn all() -> [PaymentType; 6] {
        [
            PaymentType::Enrollment,
            PaymentType::Tuition,
            PaymentType::Cafeteria,
            PaymentType::Transport,
            PaymentType::Supplies,
            PaymentType::Other,
        ]
    }
}

impl std::fmt::Display for PaymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentType::Enrollment => write!(f, "Inscription"),
            PaymentType::Tuition => write!(f, "Scolarité"),
            PaymentType::Cafeteria => write!(f, "Cantine"),
            PaymentType::Transport => write!(f, "Transport"),
            PaymentType::Supplies => write!(f, "Fournitures"),
            PaymentType::Other => write!(f, "Autre"),
        }
    }
}

impl std::str::FromStr for PaymentType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Inscription" => Ok(PaymentType::Enrollment),
            "Scolarité" => Ok(PaymentType::Tuition),
            "Cantine" => Ok(PaymentType::Cafeteria),
            "Transport" => Ok(PaymentType::Transport),
            "Fournitures" => Ok(PaymentType::Supplies),
            "Autre" => Ok(PaymentType::Other),
            _ => Err(format!("Invalid payment type: {}", s)),
        }
    }
}

/// Payment record status
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Money received and verified; only confirmed payments count toward
    /// a student's paid total
    #[serde(rename = "Confirmé")]
    Confirmed,

    /// Recorded but awaiting verification
    #[serde(rename = "En attente")]
    Pending,

    /// Voided before confirmation
    #[serde(rename = "Annulé")]
    Cancelled,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Confirmed => write!(f, "Confirmé"),
            PaymentStatus::Pending => write!(f, "En attente"),
            PaymentStatus::Cancelled => write!(f, "Annulé"),
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Confirmé" => Ok(PaymentStatus::Confirmed),
            "En attente" => Ok(PaymentStatus::Pending),
            "Annulé" => Ok(PaymentStatus::Cancelled),
            _ => Err(format!("Invalid payment status: {}", s)),
        }
    }
}

/// A single payment event: an append-only fact.
///
/// Records are never edited after creation. The only legal mutations are the
/// status transitions Pending -> Confirmed and Pending -> Cancelled, and hard
/// deletion through an explicit administrative action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Unique payment ID (UUID)
    pub id: String,

    /// Student the payment belongs to
    pub student_id: String,

    /// Amount paid, FCFA, strictly positive
    pub amount: Decimal,

    /// Payment method
    pub method: PaymentMethod,

    /// Fee category
    pub payment_type: PaymentType,

    /// Calendar date the money changed hands
    pub payment_date: NaiveDate,

    /// Free text describing the covered period, e.g. "1ère tranche"
    pub period_description: Option<String>,

    /// External reference (receipt or transfer number)
    pub reference_number: Option<String>,

    /// Record status
    pub status: PaymentStatus,

    /// Payer's phone number, required for Mobile Money
    pub mobile_number: Option<String>,

    /// Bank reference details, required for bank transfers
    pub bank_details: Option<String>,

    /// Free-form notes
    pub notes: Option<String>,

    /// Record creation timestamp
    #[serde(skip_deserializing)]
    pub created_at: Option<DateTime<Utc>>,

    /// Last status-change timestamp
    #[serde(skip_deserializing)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// User-entered payment submission, validated before any store call
#[derive(Debug, Clone, Deserialize)]
pub struct NewPayment {
    pub student_id: String,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub payment_type: PaymentType,
    pub payment_date: NaiveDate,
    #[serde(default)]
    pub period_description: Option<String>,
    #[serde(default)]
    pub reference_number: Option<String>,
    /// Submissions default to Confirmed (money handed over at the desk);
    /// Pending is accepted for payments awaiting verification. Cancelled is
    /// not a legal creation status.
    #[serde(default)]
    pub status: Option<PaymentStatus>,
    #[serde(default)]
    pub mobile_number: Option<String>,
    #[serde(default)]
    pub bank_details: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewPayment {
    /// Local precondition checks for the submission flow.
    ///
    /// Runs entirely before any network call; a failure here never reaches
    /// the store.
    pub fn validate(&self) -> Result<()> {
        if self.student_id.trim().is_empty() {
            return Err(AppError::validation("Student ID cannot be empty"));
        }

        if self.amount <= Decimal::ZERO {
            return Err(AppError::validation("Amount must be greater than zero"));
        }

        Fcfa::validate_amount(self.amount).map_err(AppError::Validation)?;

        if self.method == PaymentMethod::MobileMoney
            && self
                .mobile_number
                .as_deref()
                .map_or(true, |n| n.trim().is_empty())
        {
            return Err(AppError::validation(
                "Mobile number is required for Mobile Money payments",
            ));
        }

        if self.method == PaymentMethod::BankTransfer
            && self
                .bank_details
                .as_deref()
                .map_or(true, |d| d.trim().is_empty())
        {
            return Err(AppError::validation(
                "Bank details are required for bank transfers",
            ));
        }

        if self.status == Some(PaymentStatus::Cancelled) {
            return Err(AppError::validation(
                "A payment cannot be created as cancelled",
            ));
        }

        Ok(())
    }
}

impl PaymentRecord {
    /// Build a record from a validated submission
    pub fn from_submission(submission: NewPayment) -> Result<Self> {
        submission.validate()?;

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            student_id: submission.student_id,
            amount: submission.amount,
            method: submission.method,
            payment_type: submission.payment_type,
            payment_date: submission.payment_date,
            period_description: submission.period_description,
            reference_number: submission.reference_number,
            status: submission.status.unwrap_or(PaymentStatus::Confirmed),
            mobile_number: submission.mobile_number,
            bank_details: submission.bank_details,
            notes: submission.notes,
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        })
    }

    /// Apply a status transition.
    ///
    /// Only Pending records may move, and only to Confirmed or Cancelled.
    pub fn transition_to(&mut self, new_status: PaymentStatus) -> Result<()> {
        if self.status != PaymentStatus::Pending {
            return Err(AppError::validation(format!(
                "Cannot change status of a payment that is already {}",
                self.status
            )));
        }

        if new_status == PaymentStatus::Pending {
            return Err(AppError::validation(
                "A pending payment can only be confirmed or cancelled",
            ));
        }

        self.status = new_status;
        self.updated_at = Some(Utc::now());
        Ok(())
    }

    /// Check if the payment counts toward a student's paid total
    pub fn is_confirmed(&self) -> bool {
        self.status == PaymentStatus::Confirmed
    }
}

/// Payment joined with the paying student's identity, for the dashboard
/// listing and the payments CSV export
#[derive(Debug, Clone, Serialize)]
pub struct PaymentWithStudent {
    #[serde(flatten)]
    pub payment: PaymentRecord,

    /// Student name, None when the student has since been deleted
    pub student_name: Option<String>,

    pub class_name: Option<String>,

    pub level_name: Option<String>,
}
