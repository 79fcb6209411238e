/// Dollar amount with thousands separators: $1,234.56
pub fn money(val: f64) -> String {
    let sign = if val < 0.0 { "-" } else { "" };
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let digits: Vec<char> = int_part.chars().rev().collect();
    let mut grouped = String::new();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }
    let int_with_commas: String = grouped.chars().rev().collect();

    format!("{sign}${int_with_commas}.{dec_part}")
}

/// Confidence score as a whole percentage: 0.95 → "95%"
pub fn percent(confidence: f64) -> String {
    format!("{:.0}%", confidence * 100.0)
}
