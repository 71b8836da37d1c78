use super::colors::{ACCENT_PRIMARY, ACCENT_SECONDARY, ACCENT_WARNING};
use ratatui::style::Color;

const MEDIUM_SIZE: u64 = 50 * 1024 * 1024;
const LARGE_SIZE: u64 = 500 * 1024 * 1024;

/// Formats a byte count with binary units, e.g. `512 B`, `1.5 KB`, `3.0 GB`
pub fn format_file_size(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    if bytes < UNIT {
        return format!("{} B", bytes);
    }

    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }
    let suffix = ['K', 'M', 'G', 'T', 'P', 'E'][exp];
    format!("{:.1} {}B", bytes as f64 / div as f64, suffix)
}

/// Colour tier for a size: red above 500 MiB, orange above 50 MiB, green otherwise
pub fn size_color(bytes: u64) -> Color {
    if bytes > LARGE_SIZE {
        ACCENT_PRIMARY
    } else if bytes > MEDIUM_SIZE {
        ACCENT_WARNING
    } else {
        ACCENT_SECONDARY
    }
}

/// First and one-past-last row to draw so the cursor stays near the middle
pub fn visible_window(cursor: usize, len: usize, height: usize) -> (usize, usize) {
    let height = height.max(1);
    let mut top = cursor.saturating_sub(height / 2);
    let mut bottom = top + height;
    if bottom > len {
        bottom = len;
        top = bottom.saturating_sub(height);
    }
    (top, bottom)
}

/// Keeps the tail of a path that is wider than `max` characters
pub fn truncate_left(text: &str, max: usize) -> String {
    let count = text.chars().count();
    if count <= max || max == 0 {
        return text.to_string();
    }
    let tail: String = text.chars().skip(count - max + 1).collect();
    format!("…{}", tail)
}
