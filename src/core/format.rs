//! Display formatting for amounts and rates (en-US conventions)

fn display_prefix(code: &str) -> String {
    match code {
        "USD" => "$".to_string(),
        "EUR" => "€".to_string(),
        "GBP" => "£".to_string(),
        "JPY" => "¥".to_string(),
        "CNY" => "CN¥".to_string(),
        "CAD" => "CA$".to_string(),
        "AUD" => "A$".to_string(),
        other => format!("{other} "),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats `amount` as money in `code`, always with two fraction digits.
pub fn format_currency(amount: f64, code: &str) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    // Rounding can turn a tiny negative into zero
    let sign = if amount < 0.0 && fixed != "0.00" {
        "-"
    } else {
        ""
    };
    format!(
        "{sign}{}{}.{fraction}",
        display_prefix(code),
        group_thousands(whole)
    )
}

pub fn format_rate(rate: f64) -> String {
    format!("{rate:.4}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(92.0, "EUR"), "€92.00");
        assert_eq!(format_currency(1234567.891, "USD"), "$1,234,567.89");
        assert_eq!(format_currency(15000.0, "JPY"), "¥15,000.00");
        assert_eq!(format_currency(710.0, "CNY"), "CN¥710.00");
        assert_eq!(format_currency(136.5, "CAD"), "CA$136.50");
        assert_eq!(format_currency(0.885, "CHF"), "CHF 0.89");
        assert_eq!(format_currency(999.999, "GBP"), "£1,000.00");
        assert_eq!(format_currency(-12.5, "AUD"), "-A$12.50");
        assert_eq!(format_currency(-0.001, "USD"), "$0.00");
        assert_eq!(format_currency(5.0, "XYZ"), "XYZ 5.00");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(0.92), "0.9200");
        assert_eq!(format_rate(151.234567), "151.2346");
    }
}
