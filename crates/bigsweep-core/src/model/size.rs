/// Size formatting and parsing, human-readable byte counts.
///
/// All internal sizes are `u64` bytes. Units are decimal (1 KB = 1000 B),
/// the same convention as the 100 MB default threshold, so a threshold
/// typed as `100MB` means exactly `100_000_000` bytes.

const KB: u64 = 1_000;
const MB: u64 = KB * 1_000;
const GB: u64 = MB * 1_000;
const TB: u64 = GB * 1_000;

/// Format a byte count into a human-readable string with appropriate unit.
pub fn format_size(bytes: u64) -> String {
    let b = bytes as f64;
    if bytes < KB {
        format!("{bytes} B")
    } else if bytes < MB {
        format!("{:.1} KB", b / KB as f64)
    } else if bytes < GB {
        format!("{:.1} MB", b / MB as f64)
    } else if bytes < TB {
        format!("{:.2} GB", b / GB as f64)
    } else {
        format!("{:.2} TB", b / TB as f64)
    }
}

/// Format a file count with thousand separators.
pub fn format_count(count: u64) -> String {
    let s = count.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Parse a size such as `100MB`, `1.5 G`, `750k` or `123456`.
///
/// Suffixes are case-insensitive; the trailing `B` is optional. Returns
/// `None` for anything that is not a non-negative finite size.
pub fn parse_size(input: &str) -> Option<u64> {
    let s = input.trim();
    let split = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(s.len());
    let (number, unit) = s.split_at(split);
    if number.is_empty() {
        return None;
    }

    let multiplier = match unit.trim().to_ascii_uppercase().as_str() {
        "" | "B" => 1,
        "K" | "KB" => KB,
        "M" | "MB" => MB,
        "G" | "GB" => GB,
        "T" | "TB" => TB,
        _ => return None,
    };

    if let Ok(whole) = number.parse::<u64>() {
        return whole.checked_mul(multiplier);
    }
    let value: f64 = number.parse().ok()?;
    let bytes = value * multiplier as f64;
    if !bytes.is_finite() || bytes < 0.0 || bytes > u64::MAX as f64 {
        return None;
    }
    Some(bytes.round() as u64)
}
