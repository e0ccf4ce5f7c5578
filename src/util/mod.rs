use std::sync::atomic::{AtomicUsize, Ordering};

pub mod assets;
pub mod config;
pub mod persistence;

static ID_COUNTER: AtomicUsize = AtomicUsize::new(1);

pub fn generate_id(prefix: &str) -> String {
    let value = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{value}")
}

/// Formats a Taka amount with thousands separators, e.g. `৳1,250`.
pub fn format_taka(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if rounded < 0 { "-" } else { "" };
    format!("{sign}৳{grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_per_prefix() {
        assert_ne!(generate_id("toast"), generate_id("toast"));
    }

    #[test]
    fn taka_amounts_are_grouped() {
        assert_eq!(format_taka(80.0), "৳80");
        assert_eq!(format_taka(3990.0), "৳3,990");
        assert_eq!(format_taka(1_250_000.4), "৳1,250,000");
        assert_eq!(format_taka(-110.0), "-৳110");
    }
}
