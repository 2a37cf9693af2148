/// Date cell: shown as stored, `-` when missing.
pub fn format_date(raw: Option<&str>) -> String {
    match raw {
        Some(d) if !d.trim().is_empty() => d.to_string(),
        _ => "-".to_string(),
    }
}

/// Liters/price cell: exactly three decimals, `0.000` when missing.
pub fn format_decimal(raw: Option<f64>) -> String {
    match raw {
        Some(v) if v.is_finite() => format!("{v:.3}"),
        _ => "0.000".to_string(),
    }
}

/// Odometer cell. A zero or missing reading shows as `-`.
pub fn format_odometer(raw: Option<i64>) -> String {
    match raw {
        Some(km) if km != 0 => km.to_string(),
        _ => "-".to_string(),
    }
}

/// Total cost of a fill-up, two decimals. Never persisted.
pub fn compute_total(litros: Option<f64>, precio: Option<f64>) -> String {
    let total = litros.unwrap_or(0.0) * precio.unwrap_or(0.0);
    if total.is_finite() {
        format!("{total:.2}")
    } else {
        "0.00".to_string()
    }
}

/// Format a float as a dollar amount with thousands separators: $1,234.56
pub fn money(val: f64) -> String {
    let negative = val < 0.0;
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((&cents, "00"));

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if negative {
        format!("-${with_commas}.{dec_part}")
    } else {
        format!("${with_commas}.{dec_part}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(Some("2024-01-01")), "2024-01-01");
        assert_eq!(format_date(Some("")), "-");
        assert_eq!(format_date(None), "-");
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(Some(40.1)), "40.100");
        assert_eq!(format_decimal(Some(1.5)), "1.500");
        assert_eq!(format_decimal(None), "0.000");
        assert_eq!(format_decimal(Some(f64::NAN)), "0.000");
    }

    #[test]
    fn test_format_odometer() {
        assert_eq!(format_odometer(Some(12345)), "12345");
        assert_eq!(format_odometer(Some(0)), "-");
        assert_eq!(format_odometer(None), "-");
    }

    #[test]
    fn test_compute_total() {
        assert_eq!(compute_total(Some(40.123), Some(1.556)), "62.43");
        assert_eq!(compute_total(Some(10.0), Some(2.5)), "25.00");
        assert_eq!(compute_total(None, Some(2.5)), "0.00");
    }

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(1234.56), "$1,234.56");
        assert_eq!(money(-500.00), "-$500.00");
        assert_eq!(money(0.0), "$0.00");
        assert_eq!(money(1000000.99), "$1,000,000.99");
    }
}
