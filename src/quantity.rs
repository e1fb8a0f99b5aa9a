//! Shorthand amount parsing (`5k`, `3.5m`, `2b`, `1t`).

/// Parse an operator-entered amount into a whole number.
///
/// An optional single-letter suffix scales the value (`k`, `m`, `b`, `t`,
/// case-insensitive). The result is floored. Returns `None` for anything that
/// is not a finite positive number or does not fit in `u64`.
pub fn parse_quantity(input: &str) -> Option<u64> {
    let s = input.trim().to_ascii_lowercase();
    let (number, multiplier) = match s.chars().last()? {
        'k' => (&s[..s.len() - 1], 1e3),
        'm' => (&s[..s.len() - 1], 1e6),
        'b' => (&s[..s.len() - 1], 1e9),
        't' => (&s[..s.len() - 1], 1e12),
        _ => (s.as_str(), 1.0),
    };

    let value = number.trim().parse::<f64>().ok()?;
    if !value.is_finite() || value <= 0.0 {
        return None;
    }

    let scaled = (value * multiplier).floor();
    if scaled >= u64::MAX as f64 {
        return None;
    }
    Some(scaled as u64)
}

/// Format an integer amount with `,` thousands separators.
pub fn group_thousands(value: i128) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
