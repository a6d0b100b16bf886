use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// French-locale display conventions shared by the dashboard responses and
/// the CSV exports. Downstream spreadsheet imports expect day/month/year
/// dates and space-grouped amounts, so the formats here are a compatibility
/// contract, not a cosmetic choice.

/// Thousands separator for French number formatting (no-break space)
const GROUP_SEPARATOR: char = '\u{a0}';

/// Format a calendar date as dd/mm/yyyy
pub fn format_date_fr(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Format a decimal amount with French digit grouping: `1250000` -> `1 250 000`.
///
/// FCFA amounts carry no decimals; any fractional part is rendered after a
/// comma so that malformed inputs stay visible instead of being silently
/// truncated.
pub fn format_number_fr(amount: Decimal) -> String {
    let text = amount.to_string();
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };

    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        let remaining = digits.len() - i;
        if i > 0 && remaining % 3 == 0 {
            grouped.push(GROUP_SEPARATOR);
        }
        grouped.push(*c);
    }

    match frac_part {
        Some(f) => format!("{}{},{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// Format an FCFA amount for display, e.g. `250 000 FCFA`
pub fn format_fcfa(amount: Decimal) -> String {
    format!("{} FCFA", format_number_fr(amount))
}

/// Format a ratio in [0, 1] as a whole-number percentage, e.g. `63%`.
///
/// Half rounds away from zero, matching how the dashboard has always
/// displayed progress percentages.
pub fn format_percent_rounded(ratio: Decimal) -> String {
    let percent = (ratio * Decimal::from(100))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    format!("{}%", percent)
}

/// Format a ratio in [0, 1] as a percentage with one decimal, e.g. `62,5%`
pub fn format_percent_fr(ratio: Decimal) -> String {
    let percent = (ratio * Decimal::from(100)).round_dp(1);
    // One-decimal display even for whole values, comma as decimal mark
    let value = percent.to_f64().unwrap_or(0.0);
    format!("{:.1}%", value).replace('.', ",")
}
