use colored::{ColoredString, Colorize};

use crate::models::TransactionType;

/// Format a float as a dollar amount with thousands separators: $1,234.56
pub fn money(val: f64) -> String {
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if val < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{dec_part}")
}

/// Outcomes render negative and red, incomes green.
pub fn signed_money(kind: TransactionType, value: f64) -> ColoredString {
    match kind {
        TransactionType::Income => money(value).green(),
        TransactionType::Outcome => money(-value).red(),
    }
}
