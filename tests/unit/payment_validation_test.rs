/// Unit tests for the payment submission validation rules
///
/// Validates:
/// - amount must be strictly positive and a whole number of FCFA
/// - Mobile Money requires a mobile number, bank transfers a bank reference
/// - a payment can never be created as cancelled
/// - status transitions are legal only from "En attente"

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use ecolage::modules::payments::models::{
    NewPayment, PaymentMethod, PaymentRecord, PaymentStatus, PaymentType,
};

fn submission() -> NewPayment {
    NewPayment {
        student_id: "stu-401".to_string(),
        amount: dec!(250000),
        method: PaymentMethod::Cash,
        payment_type: PaymentType::Tuition,
        payment_date: NaiveDate::from_ymd_opt(2025, 10, 5).unwrap(),
        period_description: Some("1ère tranche".to_string()),
        reference_number: None,
        status: None,
        mobile_number: None,
        bank_details: None,
        notes: None,
    }
}

#[test]
fn test_valid_cash_submission() {
    let record = PaymentRecord::from_submission(submission()).expect("valid submission");

    assert_eq!(record.student_id, "stu-401");
    assert_eq!(record.amount, dec!(250000));
    // Cash handed over at the desk defaults to confirmed
    assert_eq!(record.status, PaymentStatus::Confirmed);
}

#[test]
fn test_zero_amount_rejected() {
    let mut s = submission();
    s.amount = dec!(0);
    assert!(s.validate().is_err());
}

#[test]
fn test_negative_amount_rejected() {
    let mut s = submission();
    s.amount = dec!(-10000);
    assert!(s.validate().is_err());
}

#[test]
fn test_fractional_francs_rejected() {
    let mut s = submission();
    s.amount = dec!(250000.50);
    assert!(s.validate().is_err());
}

#[test]
fn test_blank_student_id_rejected() {
    let mut s = submission();
    s.student_id = "   ".to_string();
    assert!(s.validate().is_err());
}

#[test]
fn test_mobile_money_requires_number() {
    let mut s = submission();
    s.method = PaymentMethod::MobileMoney;

    assert!(s.validate().is_err(), "missing number must be rejected");

    s.mobile_number = Some("  ".to_string());
    assert!(s.validate().is_err(), "blank number must be rejected");

    s.mobile_number = Some("+229 97 12 34 56".to_string());
    assert!(s.validate().is_ok());
}

#[test]
fn test_bank_transfer_requires_reference() {
    let mut s = submission();
    s.method = PaymentMethod::BankTransfer;

    assert!(s.validate().is_err(), "missing reference must be rejected");

    s.bank_details = Some("Ecobank ref 2025-3310".to_string());
    assert!(s.validate().is_ok());
}

#[test]
fn test_cash_needs_no_extra_fields() {
    let s = submission();
    assert_eq!(s.method, PaymentMethod::Cash);
    assert!(s.validate().is_ok());
}

#[test]
fn test_cancelled_creation_rejected() {
    let mut s = submission();
    s.status = Some(PaymentStatus::Cancelled);
    assert!(s.validate().is_err());
}

#[test]
fn test_pending_creation_allowed() {
    let mut s = submission();
    s.status = Some(PaymentStatus::Pending);

    let record = PaymentRecord::from_submission(s).expect("pending submission");
    assert_eq!(record.status, PaymentStatus::Pending);
}

#[test]
fn test_transition_matrix() {
    let make_pending = || {
        let mut s = submission();
        s.status = Some(PaymentStatus::Pending);
        PaymentRecord::from_submission(s).unwrap()
    };

    // En attente -> Confirmé
    let mut record = make_pending();
    assert!(record.transition_to(PaymentStatus::Confirmed).is_ok());
    assert_eq!(record.status, PaymentStatus::Confirmed);

    // En attente -> Annulé
    let mut record = make_pending();
    assert!(record.transition_to(PaymentStatus::Cancelled).is_ok());
    assert_eq!(record.status, PaymentStatus::Cancelled);

    // En attente -> En attente is not a transition
    let mut record = make_pending();
    assert!(record.transition_to(PaymentStatus::Pending).is_err());

    // Confirmed and cancelled records are immutable
    let mut record = make_pending();
    record.transition_to(PaymentStatus::Confirmed).unwrap();
    assert!(record.transition_to(PaymentStatus::Cancelled).is_err());

    let mut record = make_pending();
    record.transition_to(PaymentStatus::Cancelled).unwrap();
    assert!(record.transition_to(PaymentStatus::Confirmed).is_err());
}

#[test]
fn test_validation_failure_reports_the_field() {
    let mut s = submission();
    s.method = PaymentMethod::MobileMoney;

    let err = s.validate().unwrap_err();
    assert!(err.to_string().contains("Mobile"));
}
