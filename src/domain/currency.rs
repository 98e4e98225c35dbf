//! Currency formatting for dashboard annotations.

/// Format a dollar amount with thousands separators and exactly two
/// decimal places, e.g. `$2,297,200.86`. Negative amounts render as
/// `-$1,234.50`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return format!("${value}");
    }

    let cents = (value.abs() * 100.0).round() as u128;
    let dollars = cents / 100;
    let remainder = cents % 100;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };

    format!("{sign}${}.{remainder:02}", group_thousands(dollars))
}

fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
