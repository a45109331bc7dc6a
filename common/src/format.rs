//! 表示用の数値フォーマット

/// 3桁区切りの数値（"1,234.57"）
pub fn format_number(value: f64, decimal_places: usize) -> String {
    let formatted = format!("{:.*}", decimal_places, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// 比率 (0.0-1.0) をパーセント表示
pub fn format_percentage(ratio: f64, decimal_places: usize) -> String {
    format!("{:.*}%", decimal_places, ratio * 100.0)
}

/// 通貨記号付きの金額（小数2桁）
///
/// 未知の通貨コードはそのまま接頭辞にする。
pub fn format_currency(amount: f64, currency: &str) -> String {
    if amount.is_nan() {
        return "N/A".to_string();
    }
    let symbol = match currency {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "TWD" => "NT$",
        other => other,
    };
    let number = format_number(amount, 2);
    match number.strip_prefix('-') {
        Some(abs) => format!("-{}{}", symbol, abs),
        None => format!("{}{}", symbol, number),
    }
}
