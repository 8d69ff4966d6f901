use chrono::{DateTime, Utc};

/// Human-readable byte count: `512 B`, `1.5 KB`, `12.0 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, UNITS[unit])
}

/// Describe a token expiry (epoch seconds) relative to `now`.
pub fn format_expiry(exp: i64, now: DateTime<Utc>) -> String {
    let Some(at) = DateTime::<Utc>::from_timestamp(exp, 0) else {
        return "unknown".to_string();
    };
    let remaining = at - now;
    let stamp = at.format("%Y-%m-%d %H:%M UTC");
    if remaining.num_seconds() <= 0 {
        format!("expired ({})", stamp)
    } else if remaining.num_hours() >= 1 {
        format!("{} ({}h {}m left)", stamp, remaining.num_hours(), remaining.num_minutes() % 60)
    } else {
        format!("{} ({}m left)", stamp, remaining.num_minutes())
    }
}

/// Truncate to `max_len` characters, adding an ellipsis if anything was cut.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(100 * 1024 * 1024), "100.0 MB");
    }

    #[test]
    fn test_format_expiry() {
        let now = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        assert!(format_expiry(1_700_000_000 - 10, now).starts_with("expired"));
        assert!(format_expiry(1_700_000_000 + 90 * 60, now).ends_with("(1h 30m left)"));
        assert!(format_expiry(1_700_000_000 + 5 * 60, now).ends_with("(5m left)"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello", 10), "Hello");
        assert_eq!(truncate("Hello World", 8), "Hello...");
        assert_eq!(truncate("héllo wörld", 5), "hé...");
    }
}
