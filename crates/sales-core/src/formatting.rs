/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use sales_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5, 1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let factor = 10_f64.powi(decimals as i32);
    let rounded = (value.abs() * factor).round() / factor;
    // Avoid printing "-0" for values that round to zero.
    let negative = value < 0.0 && rounded != 0.0;

    let text = format!("{:.prec$}", rounded, prec = decimals as usize);
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Short form used for bar labels: `950`, `1.2k`, `3.4M`, `1.1B`.
///
/// # Examples
///
/// ```
/// use sales_core::formatting::format_compact;
///
/// assert_eq!(format_compact(950.0), "950");
/// assert_eq!(format_compact(1_250.0), "1.2k");
/// assert_eq!(format_compact(-3_400_000.0), "-3.4M");
/// ```
pub fn format_compact(value: f64) -> String {
    let abs = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };
    if abs >= 1e9 {
        format!("{sign}{:.1}B", truncate_to_tenth(abs / 1e9))
    } else if abs >= 1e6 {
        format!("{sign}{:.1}M", truncate_to_tenth(abs / 1e6))
    } else if abs >= 1e3 {
        format!("{sign}{:.1}k", truncate_to_tenth(abs / 1e3))
    } else {
        format_number(value, 0)
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn truncate_to_tenth(v: f64) -> f64 {
    (v * 10.0).floor() / 10.0
}

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let remainder = s.len() % 3;
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i != 0 && i % 3 == remainder {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
