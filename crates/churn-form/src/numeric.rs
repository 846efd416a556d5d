//! Text-to-number coercion with browser semantics.
//!
//! Form inputs hand over raw text. Numbers are read the way `parseInt` and
//! `parseFloat` read them: leading whitespace is skipped, the longest numeric
//! prefix wins, and anything unreadable becomes NaN (`None` here).

pub fn parse_int(text: &str) -> Option<i64> {
    let rest = text.trim_start();
    let (negative, rest) = split_sign(rest);
    let (radix, rest) = match rest.get(..2) {
        Some("0x") | Some("0X") => (16, &rest[2..]),
        _ => (10, rest),
    };
    let digits: String = rest.chars().take_while(|ch| ch.is_digit(radix)).collect();
    if digits.is_empty() {
        return None;
    }
    let magnitude = i128::from_str_radix(&digits, radix).ok()?;
    let value = if negative { -magnitude } else { magnitude };
    i64::try_from(value).ok()
}

pub fn parse_float(text: &str) -> Option<f64> {
    let rest = text.trim_start();
    let (negative, rest) = split_sign(rest);
    let sign = if negative { -1.0 } else { 1.0 };
    if rest.starts_with("Infinity") {
        return Some(sign * f64::INFINITY);
    }

    let bytes = rest.as_bytes();
    let int_end = count_digits(bytes, 0);
    let mut frac_end = int_end;
    if bytes.get(int_end) == Some(&b'.') {
        frac_end = count_digits(bytes, int_end + 1);
    }
    let has_int = int_end > 0;
    let has_frac = frac_end > int_end + 1;
    if !has_int && !has_frac {
        return None;
    }

    let mut literal = String::new();
    literal.push_str(if has_int { &rest[..int_end] } else { "0" });
    if has_frac {
        literal.push('.');
        literal.push_str(&rest[int_end + 1..frac_end]);
    }

    if matches!(bytes.get(frac_end), Some(b'e') | Some(b'E')) {
        let mut exp_start = frac_end + 1;
        if matches!(bytes.get(exp_start), Some(b'+') | Some(b'-')) {
            exp_start += 1;
        }
        let exp_end = count_digits(bytes, exp_start);
        if exp_end > exp_start {
            literal.push('e');
            literal.push_str(&rest[frac_end + 1..exp_end]);
        }
    }

    literal.parse::<f64>().ok().map(|value| sign * value)
}

/// `Number.prototype.toFixed(2)`: exact halfway cases go to the larger
/// magnitude, so `-0.125` becomes `-0.13`.
pub fn to_fixed_2(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    // A binary float sits exactly halfway between two hundredths only when its
    // fraction is an odd multiple of 1/8 (0.125, 0.375, ...).
    if value == 0.0 {
        return "0.00".to_string();
    }
    let magnitude = value.abs();
    let eighths = magnitude * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 != 0.0 {
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{sign}{:.2}", magnitude + 0.001);
    }
    format!("{:.2}", value)
}

fn split_sign(text: &str) -> (bool, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = text.strip_prefix('+') {
        (false, rest)
    } else {
        (false, text)
    }
}

fn count_digits(bytes: &[u8], start: usize) -> usize {
    let mut index = start;
    while bytes.get(index).is_some_and(u8::is_ascii_digit) {
        index += 1;
    }
    index
}
