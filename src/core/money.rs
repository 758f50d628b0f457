/// Rounds a currency amount to the nearest whole unit. Only used when a value
/// leaves the engine; intermediate sums stay unrounded.
pub fn round_currency(amount: f64) -> i64 {
    amount.round() as i64
}

/// Formats an amount as whole dollars with thousands separators, e.g. `$12,000`.
pub fn format_currency(amount: f64) -> String {
    let rounded = round_currency(amount);
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}
