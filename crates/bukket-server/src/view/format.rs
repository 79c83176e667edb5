//! Value formatting for pages.

use jiff::Timestamp;

const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Formats a byte count with binary units and one decimal.
///
/// ```rust
/// use bukket_server::view::human_size;
///
/// assert_eq!(human_size(1), "1 Byte");
/// assert_eq!(human_size(1536), "1.5 KB");
/// ```
pub fn human_size(size: u64) -> String {
    if size == 1 {
        return "1 Byte".to_owned();
    }
    if size < 1024 {
        return format!("{size} Bytes");
    }

    let mut value = size as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let formatted = format!("{value:.1}");
    let formatted = formatted.strip_suffix(".0").unwrap_or(&formatted);
    format!("{formatted} {}", UNITS[unit])
}

/// Formats an optional timestamp, using an empty string when absent.
pub fn timestamp(value: Option<Timestamp>) -> String {
    value
        .map(|ts| ts.strftime("%a, %d %b %Y %H:%M:%S GMT").to_string())
        .unwrap_or_default()
}
