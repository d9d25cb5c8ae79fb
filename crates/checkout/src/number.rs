//! Human-readable order numbers.
//!
//! Format: `ORD-<millis base36>-<4 random chars>`, e.g. `ORD-LZX2K9QA-7F3B`.
//! The time prefix makes numbers roughly sortable; the random suffix makes a
//! collision improbable. The store still enforces uniqueness and the
//! orchestrator retries on conflict.

use chrono::{DateTime, Utc};
use uuid::Uuid;

const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const SUFFIX_LEN: usize = 4;

pub fn generate_order_number(now: DateTime<Utc>) -> String {
    let millis = now.timestamp_millis().max(0) as u64;
    format!("ORD-{}-{}", to_base36(millis), random_suffix())
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::new();
    while value > 0 {
        buf.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    buf.reverse();
    String::from_utf8(buf).unwrap_or_default()
}

fn random_suffix() -> String {
    // A v4 UUID is our only randomness source; 4 hex chars of it are plenty
    // next to the millisecond prefix.
    Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(SUFFIX_LEN)
        .collect::<String>()
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn format_has_prefix_and_three_segments() {
        let n = generate_order_number(Utc::now());
        let parts: Vec<&str> = n.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "ORD");
        assert!(!parts[1].is_empty());
        assert_eq!(parts[2].len(), SUFFIX_LEN);
        assert!(parts[2].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn same_instant_differs_by_suffix() {
        let now = Utc::now();
        let numbers: HashSet<String> =
            (0..100).map(|_| generate_order_number(now)).collect();
        // All share the time prefix; suffixes keep them distinct.
        assert!(numbers.len() > 90);
    }

    #[test]
    fn base36_digits() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "Z");
        assert_eq!(to_base36(36), "10");
    }
}
