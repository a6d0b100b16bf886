use crate::core::locale;
use crate::modules::ledger::models::OutstandingStudent;
use crate::modules::payments::models::PaymentWithStudent;

/// CSV serialization for the finance exports.
///
/// The output format is a compatibility contract with existing spreadsheet
/// imports: one unquoted header row, every data field double-quoted,
/// dd/mm/yyyy dates and French digit grouping.

const PAYMENTS_HEADERS: [&str; 8] = [
    "Date",
    "Élève",
    "Classe",
    "Type",
    "Montant",
    "Méthode",
    "Référence",
    "Statut",
];

const OUTSTANDING_HEADERS: [&str; 7] = [
    "Élève",
    "Classe",
    "Niveau",
    "Montant dû",
    "Total frais",
    "Montant payé",
    "Pourcentage payé",
];

/// Quote one CSV field, doubling any embedded quotes
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn row(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| quote(f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Serialize the payments listing
pub fn payments_csv(payments: &[PaymentWithStudent]) -> String {
    let mut lines = Vec::with_capacity(payments.len() + 1);
    lines.push(PAYMENTS_HEADERS.join(","));

    for item in payments {
        let p = &item.payment;
        lines.push(row(&[
            locale::format_date_fr(p.payment_date),
            item.student_name.clone().unwrap_or_default(),
            item.class_name.clone().unwrap_or_default(),
            p.payment_type.to_string(),
            locale::format_number_fr(p.amount),
            p.method.to_string(),
            p.reference_number.clone().unwrap_or_default(),
            p.status.to_string(),
        ]));
    }

    lines.join("\n")
}

/// Serialize the outstanding-students listing
pub fn outstanding_csv(students: &[OutstandingStudent]) -> String {
    let mut lines = Vec::with_capacity(students.len() + 1);
    lines.push(OUTSTANDING_HEADERS.join(","));

    for student in students {
        let balance = &student.balance;
        lines.push(row(&[
            student.full_name(),
            student.class_name.clone().unwrap_or_default(),
            student.level_name.clone().unwrap_or_default(),
            locale::format_number_fr(balance.outstanding_amount),
            locale::format_number_fr(balance.total_fees),
            locale::format_number_fr(balance.paid_amount),
            locale::format_percent_rounded(balance.paid_ratio()),
        ]));
    }

    lines.join("\n")
}
