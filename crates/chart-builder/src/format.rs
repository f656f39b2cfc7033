//! Display formatting for text-value tiles and pie slice labels

/// Formats a raw value for a text-value tile: round to at most one decimal
/// place, drop a trailing `.0`, group integer digits with commas.
/// `1234.56` becomes `"1,234.6"` and `1234.0` becomes `"1,234"`.
pub fn format_value(value: f64) -> String {
    let negative = value < 0.0;
    // scale to tenths so the integer/decimal split happens after rounding
    let scaled = (value.abs() * 10.0).round() as u64;
    let int_part = scaled / 10;
    let tenths = scaled % 10;

    let mut out = group_thousands(int_part);
    if tenths > 0 {
        out.push('.');
        out.push_str(&tenths.to_string());
    }
    if negative && scaled > 0 {
        out.insert(0, '-');
    }
    out
}

fn group_thousands(mut n: u64) -> String {
    if n < 1000 {
        return n.to_string();
    }
    let mut groups = Vec::new();
    while n >= 1000 {
        groups.push(format!("{:03}", n % 1000));
        n /= 1000;
    }
    let mut out = n.to_string();
    for group in groups.iter().rev() {
        out.push(',');
        out.push_str(group);
    }
    out
}

/// Strips the reporting prefix and suffix from a case-count indicator name:
/// the first `" Cases"` and the first `"CC. "` occurrence are removed, and
/// nothing else (exact substring removal, no trimming). `" Cases"` goes
/// first so that removing the prefix cannot expose a new `" Cases"` match
/// at the start of the name.
pub fn strip_case_label(name: &str) -> String {
    name.replacen(" Cases", "", 1).replacen("CC. ", "", 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_decimal_with_grouping() {
        assert_eq!(format_value(1234.56), "1,234.6");
        assert_eq!(format_value(1234567.04), "1,234,567");
        assert_eq!(format_value(999.96), "1,000");
    }

    #[test]
    fn test_integers_drop_the_decimal() {
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(7.0), "7");
        assert_eq!(format_value(1234.0), "1,234");
    }

    #[test]
    fn test_small_and_negative_values() {
        assert_eq!(format_value(0.25), "0.3");
        assert_eq!(format_value(-1234.56), "-1,234.6");
        assert_eq!(format_value(-0.01), "0");
    }

    #[test]
    fn test_case_label_stripping() {
        assert_eq!(strip_case_label("CC. Cases Alpha"), "Alpha");
        assert_eq!(strip_case_label("CC. Active Cases"), "Active");
        assert_eq!(strip_case_label("Recovered"), "Recovered");
        // only the first occurrence of each substring is removed
        assert_eq!(strip_case_label("CC. CC. Cases"), "CC.");
    }
}
