//! Time, confidence and truncation formatters for CLI output.

use chrono::{DateTime, Utc};

/// "today", "yesterday" or "N days ago" relative to `now`.
pub fn days_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    match (now - then).num_days() {
        d if d <= 0 => "today".to_string(),
        1 => "yesterday".to_string(),
        d => format!("{d} days ago"),
    }
}

pub fn timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M UTC").to_string()
}

pub fn percent(fraction: f64) -> String {
    format!("{:.0}%", fraction * 100.0)
}

/// Truncate on a char boundary, ending with an ellipsis.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{kept}\u{2026}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_days_ago() {
        let now = Utc::now();
        assert_eq!(days_ago(now, now), "today");
        assert_eq!(days_ago(now - Duration::hours(30), now), "yesterday");
        assert_eq!(days_ago(now - Duration::days(9), now), "9 days ago");
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 4), "abc\u{2026}");
        assert_eq!(truncate("\u{2212}\u{2212}\u{2212}", 2), "\u{2212}\u{2026}");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0.4), "40%");
        assert_eq!(percent(1.0), "100%");
    }
}
