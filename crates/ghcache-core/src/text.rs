//! Text formatting utilities.

use chrono::{DateTime, Utc};

/// Truncate a string to a maximum display width, appending "..." if truncated.
pub fn truncate(text: &str, max_width: usize) -> String {
    if max_width < 4 {
        return text.chars().take(max_width).collect();
    }

    if text.chars().count() <= max_width {
        return text.to_string();
    }

    let truncated: String = text.chars().take(max_width - 3).collect();
    format!("{truncated}...")
}

/// Format a duration as a human-readable fuzzy time string.
pub fn fuzzy_ago(duration: chrono::Duration) -> String {
    let seconds = duration.num_seconds();

    if seconds < 60 {
        return "less than a minute ago".to_string();
    }

    let minutes = seconds / 60;
    if minutes < 60 {
        return pluralize(minutes, "minute", "minutes") + " ago";
    }

    let hours = minutes / 60;
    if hours < 24 {
        return pluralize(hours, "hour", "hours") + " ago";
    }

    let days = hours / 24;
    if days < 30 {
        return pluralize(days, "day", "days") + " ago";
    }

    let months = days / 30;
    if months < 12 {
        return pluralize(months, "month", "months") + " ago";
    }

    pluralize(months / 12, "year", "years") + " ago"
}

/// Format an ISO-8601 timestamp from the API for display.
///
/// On a TTY the time is shown relative to now; otherwise, or when the value
/// does not parse, the original string is returned untouched.
pub fn relative_time_str(timestamp: &str, is_tty: bool) -> String {
    if !is_tty {
        return timestamp.to_string();
    }
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(t) => fuzzy_ago(Utc::now().signed_duration_since(t.with_timezone(&Utc))),
        Err(_) => timestamp.to_string(),
    }
}

/// Simple English pluralization.
pub fn pluralize(count: i64, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

/// Format a byte size into a human-readable string.
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
