//! Number formatting and parsing shared by the dashboard views and the CLI.
//!
//! The backend hands out raw floats and stringly-typed volumes; these helpers
//! turn them into the exact text the views display.

/// Enough fraction digits to print any finite `f64` exactly.
const EXACT_FRACTION_DIGITS: usize = 1100;

/// Formats `value` with exactly `digits` fraction digits. Ties round away
/// from zero on the exact decimal value, so `0.125` gives `0.13` while
/// `1.005` (stored just below) gives `1.00`.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() };
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let (int_part, frac_part) = round_half_away(value, digits);
    if frac_part.is_empty() {
        format!("{sign}{int_part}")
    } else {
        format!("{sign}{int_part}.{frac_part}")
    }
}

/// Rounds the magnitude of a finite `value` to `digits` fraction digits,
/// half away from zero. Returns the integer and fraction digit strings.
fn round_half_away(value: f64, digits: usize) -> (String, String) {
    let digits = digits.min(EXACT_FRACTION_DIGITS);
    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, value.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut kept: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(digits))
        .collect();
    if frac_part.as_bytes().get(digits).is_some_and(|&d| d >= b'5') {
        let mut carry = true;
        for d in kept.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            kept.insert(0, b'1');
        }
    }

    let split = kept.len() - digits;
    let to_string = |bytes: &[u8]| bytes.iter().map(|&b| char::from(b)).collect::<String>();
    (to_string(&kept[..split]), to_string(&kept[split..]))
}

/// Formats `value` the way an en-US locale does: thousands grouped with
/// commas, at most three fraction digits, trailing zeros dropped.
pub fn format_locale(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞".to_string() } else { "-∞".to_string() };
    }

    let sign = if value.is_sign_negative() { "-" } else { "" };
    let (int_part, frac_part) = round_half_away(value, 3);
    let frac = frac_part.trim_end_matches('0');
    let grouped = group_thousands(&int_part);

    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}

/// Dollar amount as shown in chart tooltips, e.g. `$1,250.5`.
pub fn format_usd(value: f64) -> String {
    format!("${}", format_locale(value))
}

fn group_thousands(int_part: &str) -> String {
    let len = int_part.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Parses the longest numeric prefix of `input`, ignoring leading whitespace
/// and any trailing garbage (`"12.5usd"` gives `12.5`). Returns `None` when
/// there is no numeric prefix at all.
pub fn parse_float_prefix(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let mantissa_start = end;

    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - mantissa_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - (end + 1);
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }

    if mantissa_digits == 0 {
        if s[mantissa_start..].starts_with("Infinity") {
            let negative = bytes.first() == Some(&b'-');
            return Some(if negative { f64::NEG_INFINITY } else { f64::INFINITY });
        }
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

/// Symbol handed to the market widget: the identifier with its first `/`
/// removed (`EUR/USD` becomes `EURUSD`).
pub fn widget_symbol(currency: &str) -> String {
    currency.replacen('/', "", 1)
}
