/// Unit tests for the CSV exports
///
/// The exports are a compatibility contract with existing spreadsheet
/// imports: fixed French headers, every data field double-quoted,
/// dd/mm/yyyy dates and no-break-space digit grouping.

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use ecolage::modules::ledger::models::{OutstandingStudent, StudentBalance, TuitionStatus};
use ecolage::modules::payments::models::{
    PaymentMethod, PaymentRecord, PaymentStatus, PaymentType, PaymentWithStudent,
};
use ecolage::modules::reports::services::csv_export;

fn joined_payment() -> PaymentWithStudent {
    PaymentWithStudent {
        payment: PaymentRecord {
            id: "pay-1".to_string(),
            student_id: "stu-1".to_string(),
            amount: dec!(250000),
            method: PaymentMethod::MobileMoney,
            payment_type: PaymentType::Tuition,
            payment_date: NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
            period_description: Some("1ère tranche".to_string()),
            reference_number: Some("MM-88210".to_string()),
            status: PaymentStatus::Confirmed,
            mobile_number: Some("+229 97 12 34 56".to_string()),
            bank_details: None,
            notes: None,
            created_at: None,
            updated_at: None,
        },
        student_name: Some("Awa Diallo".to_string()),
        class_name: Some("CE1 A".to_string()),
        level_name: Some("CE1".to_string()),
    }
}

fn outstanding_student() -> OutstandingStudent {
    OutstandingStudent {
        student_id: "stu-1".to_string(),
        first_name: "Awa".to_string(),
        last_name: "Diallo".to_string(),
        class_name: Some("CE1 A".to_string()),
        level_name: Some("CE1".to_string()),
        balance: StudentBalance {
            student_id: "stu-1".to_string(),
            total_fees: dec!(400000),
            paid_amount: dec!(250000),
            outstanding_amount: dec!(150000),
            payment_status: TuitionStatus::Partial,
        },
    }
}

#[test]
fn test_payments_csv_header_row() {
    let csv = csv_export::payments_csv(&[]);
    assert_eq!(
        csv,
        "Date,Élève,Classe,Type,Montant,Méthode,Référence,Statut"
    );
}

#[test]
fn test_payments_csv_row_formatting() {
    let csv = csv_export::payments_csv(&[joined_payment()]);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);

    // dd/mm/yyyy date, French labels, grouped amount, every field quoted
    assert_eq!(
        lines[1],
        "\"07/03/2025\",\"Awa Diallo\",\"CE1 A\",\"Scolarité\",\"250\u{a0}000\",\"Mobile Money\",\"MM-88210\",\"Confirmé\""
    );
}

#[test]
fn test_payments_csv_missing_student_is_blank() {
    let mut item = joined_payment();
    item.student_name = None;
    item.class_name = None;
    item.payment.reference_number = None;

    let csv = csv_export::payments_csv(&[item]);
    let data_row = csv.lines().nth(1).unwrap();

    assert!(data_row.contains("\"\",\"\",\"Scolarité\""));
    assert!(data_row.contains("\"\",\"Confirmé\""));
}

#[test]
fn test_embedded_quotes_are_doubled() {
    let mut item = joined_payment();
    item.student_name = Some("Jean \"JP\" Perrin".to_string());

    let csv = csv_export::payments_csv(&[item]);
    assert!(csv.contains("\"Jean \"\"JP\"\" Perrin\""));
}

#[test]
fn test_outstanding_csv_header_row() {
    let csv = csv_export::outstanding_csv(&[]);
    assert_eq!(
        csv,
        "Élève,Classe,Niveau,Montant dû,Total frais,Montant payé,Pourcentage payé"
    );
}

#[test]
fn test_outstanding_csv_row_formatting() {
    let csv = csv_export::outstanding_csv(&[outstanding_student()]);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);

    // 250 000 of 400 000 paid rounds to 63%
    assert_eq!(
        lines[1],
        "\"Awa Diallo\",\"CE1 A\",\"CE1\",\"150\u{a0}000\",\"400\u{a0}000\",\"250\u{a0}000\",\"63%\""
    );
}

#[test]
fn test_outstanding_csv_multiple_rows_keep_order() {
    let mut second = outstanding_student();
    second.first_name = "Malik".to_string();
    second.last_name = "Sow".to_string();

    let csv = csv_export::outstanding_csv(&[outstanding_student(), second]);
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("\"Awa Diallo\""));
    assert!(lines[2].starts_with("\"Malik Sow\""));
}

#[test]
fn test_csv_output_is_deterministic() {
    let rows = [joined_payment(), joined_payment()];
    assert_eq!(
        csv_export::payments_csv(&rows),
        csv_export::payments_csv(&rows)
    );
}
