//! Number, money and date formatting in the ru-RU convention.
//!
//! Digit groups are separated by U+00A0, the decimal separator is a comma,
//! and unit symbols follow the number after another U+00A0.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const NBSP: char = '\u{a0}';
pub const DATE_PATTERN: &str = "%d.%m.%Y";
pub const DATETIME_PATTERN: &str = "%d.%m.%Y %H:%M";

/// Display settings for currency and dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Locale {
    /// ISO 4217 code used for budgets.
    pub currency: String,
    /// `chrono` strftime pattern for dates.
    pub date_format: String,
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            currency: "RUB".to_string(),
            date_format: DATE_PATTERN.to_string(),
        }
    }
}

impl Locale {
    #[must_use]
    pub fn currency(&self, amount: f64) -> String {
        format_currency(amount, &self.currency)
    }

    #[must_use]
    pub fn date(&self, date: NaiveDate) -> String {
        date.format(&self.date_format).to_string()
    }
}

#[must_use]
pub fn currency_symbol(code: &str) -> &str {
    match code {
        "RUB" => "₽",
        "USD" => "$",
        "EUR" => "€",
        other => other,
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.chars().count();
    let mut out = String::with_capacity(len + len / 3 * 2);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(NBSP);
        }
        out.push(c);
    }
    out
}

/// Round to `max_frac` digits, then drop trailing zeros down to `min_frac`.
fn format_decimal(value: f64, min_frac: usize, max_frac: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = format!("{:.*}", max_frac, value.abs());
    let (whole, frac) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let mut frac = frac.to_string();
    while frac.len() > min_frac && frac.ends_with('0') {
        frac.pop();
    }

    let mut out = String::new();
    let is_zero = rounded.chars().all(|c| c == '0' || c == '.');
    if value < 0.0 && !is_zero {
        out.push('-');
    }
    out.push_str(&group_thousands(whole));
    if !frac.is_empty() {
        out.push(',');
        out.push_str(&frac);
    }
    out
}

/// `1500000.5, "RUB"` becomes `1 500 000,5 ₽` (with non-breaking spaces).
#[must_use]
pub fn format_currency(amount: f64, currency: &str) -> String {
    format!(
        "{}{NBSP}{}",
        format_decimal(amount, 0, 2),
        currency_symbol(currency)
    )
}

/// Fixed number of fraction digits.
#[must_use]
pub fn format_number(value: f64, decimals: usize) -> String {
    format_decimal(value, decimals, decimals)
}

/// `fraction` is a ratio: `0.5` renders as `50,0 %`.
#[must_use]
pub fn format_percent(fraction: f64, decimals: usize) -> String {
    format!("{}{NBSP}%", format_decimal(fraction * 100.0, decimals, decimals))
}

/// Whole-number progress value (0..=100) as shown in tables.
#[must_use]
pub fn format_progress(progress: u8) -> String {
    format!("{progress}%")
}

#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_PATTERN).to_string()
}

#[must_use]
pub fn format_datetime(at: DateTime<Utc>) -> String {
    at.format(DATETIME_PATTERN).to_string()
}

/// Relative wording for dates within a week of `today`, else the plain date.
#[must_use]
pub fn format_relative_date(date: NaiveDate, today: NaiveDate) -> String {
    let days = (today - date).num_days();
    match days {
        0 => "Сегодня".to_string(),
        1 => "Вчера".to_string(),
        -1 => "Завтра".to_string(),
        2..=7 => format!("{days} дн. назад"),
        -7..=-2 => format!("Через {} дн.", -days),
        _ => format_date(date),
    }
}

/// Rounded share of `completed` in `total`, as a whole percent.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
#[must_use]
pub fn completion_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (completed as f64 / total as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_and_suffixes() {
        assert_eq!(format_currency(15_000_000.0, "RUB"), "15\u{a0}000\u{a0}000\u{a0}₽");
        assert_eq!(format_currency(1234.5, "USD"), "1\u{a0}234,5\u{a0}$");
        assert_eq!(format_currency(0.126, "EUR"), "0,13\u{a0}€");
        assert_eq!(format_currency(999.0, "KZT"), "999\u{a0}KZT");
        assert_eq!(format_currency(-2500.0, "RUB"), "-2\u{a0}500\u{a0}₽");
    }

    #[test]
    fn currency_keeps_digits_past_u64_range() {
        assert_eq!(
            format_currency(1e20, "RUB"),
            "100\u{a0}000\u{a0}000\u{a0}000\u{a0}000\u{a0}000\u{a0}000\u{a0}₽"
        );
        assert_eq!(format_currency(-0.001, "RUB"), "0\u{a0}₽");
    }

    #[test]
    fn number_and_percent() {
        assert_eq!(format_number(1234.567, 0), "1\u{a0}235");
        assert_eq!(format_number(12.5, 2), "12,50");
        assert_eq!(format_percent(0.5, 1), "50,0\u{a0}%");
        assert_eq!(format_progress(50), "50%");
    }

    #[test]
    fn dates() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(format_date(d), "15.01.2024");
        let at = d.and_hms_opt(9, 5, 0).unwrap().and_utc();
        assert_eq!(format_datetime(at), "15.01.2024 09:05");
        assert_eq!(Locale::default().date(d), "15.01.2024");
    }

    #[test]
    fn relative_dates() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        assert_eq!(format_relative_date(today, today), "Сегодня");
        assert_eq!(format_relative_date(today.pred_opt().unwrap(), today), "Вчера");
        assert_eq!(
            format_relative_date(NaiveDate::from_ymd_opt(2024, 6, 7).unwrap(), today),
            "3 дн. назад"
        );
        assert_eq!(
            format_relative_date(NaiveDate::from_ymd_opt(2024, 6, 13).unwrap(), today),
            "Через 3 дн."
        );
        assert_eq!(
            format_relative_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), today),
            "01.01.2024"
        );
    }

    #[test]
    fn completion_percent_rounds() {
        assert_eq!(completion_percent(0, 0), 0);
        assert_eq!(completion_percent(1, 3), 33);
        assert_eq!(completion_percent(2, 3), 67);
    }
}
