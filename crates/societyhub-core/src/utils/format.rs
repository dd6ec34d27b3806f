use chrono::{DateTime, Utc};

/// Truncate a string to a maximum length in characters, adding ellipsis if needed
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

/// Format a date string to a more readable format
pub fn format_date(date: &str) -> String {
    // Try to parse ISO format and convert to readable
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        dt.format("%b %d, %Y").to_string()
    } else if date.len() >= 10 {
        // Try to parse YYYY-MM-DD format
        date.chars().take(10).collect()
    } else {
        date.to_string()
    }
}

/// Relative age of a timestamp: "just now", "12m ago", "2h ago", "3d ago".
/// Hours and days round half up. Future timestamps read as "just now".
pub fn format_age(since: DateTime<Utc>) -> String {
    let minutes = (Utc::now() - since).num_minutes();
    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        let hours = minutes / 60;
        if minutes % 60 >= 30 {
            format!("{}h ago", hours + 1)
        } else {
            format!("{}h ago", hours)
        }
    } else {
        let days = minutes / 1440;
        if (minutes % 1440) / 60 >= 12 {
            format!("{}d ago", days + 1)
        } else {
            format!("{}d ago", days)
        }
    }
}

/// Case-insensitive substring match
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Strip HTML tags and decode the handful of entities rich-text editors emit.
/// Whitespace runs collapse to a single space.
pub fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => {
                in_tag = true;
                text.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    let decoded = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello", 10), "Hello");
        assert_eq!(truncate("Hello World", 8), "Hello...");
        assert_eq!(truncate("Hi", 2), "Hi");
        assert_eq!(truncate("Hello", 2), "He");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2030-01-10T10:00:00Z"), "Jan 10, 2030");
        assert_eq!(format_date("2030-01-10 extra"), "2030-01-10");
        assert_eq!(format_date("soon"), "soon");
    }

    #[test]
    fn test_format_age() {
        let now = Utc::now();
        assert_eq!(format_age(now), "just now");
        assert_eq!(format_age(now + Duration::minutes(5)), "just now");
        assert_eq!(format_age(now - Duration::minutes(12)), "12m ago");
        assert_eq!(format_age(now - Duration::minutes(89)), "1h ago");
        assert_eq!(format_age(now - Duration::minutes(95)), "2h ago");
        assert_eq!(format_age(now - Duration::hours(36)), "2d ago");
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Machine Learning Club", "learning"));
        assert!(!contains_ignore_case("Robotics", "ml"));
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>Bring a <b>laptop</b></p>"), "Bring a laptop");
        assert_eq!(strip_html("Tea &amp; snacks&nbsp;provided"), "Tea & snacks provided");
        assert_eq!(strip_html("plain"), "plain");
    }
}
