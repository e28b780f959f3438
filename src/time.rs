use chrono::{DateTime, Local, TimeZone};

/// Current local time as an RFC 3339 string. This is the widget's single
/// timestamp fallback: anything missing or unparseable becomes "now".
pub fn now_iso() -> String {
    Local::now().to_rfc3339()
}

/// Zero-padded `HH:MM` label in local time for a message timestamp.
/// Never panics; bad input falls back to the current time.
pub fn clock_label(ts: Option<&str>) -> String {
    ts.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| hm(dt.with_timezone(&Local)))
        .unwrap_or_else(|| hm(Local::now()))
}

fn hm<Tz: TimeZone>(dt: DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    dt.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn labels_are_zero_padded() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 5, 9, 4, 0).unwrap();
        assert_eq!(hm(dt), "09:04");

        let dt = Utc.with_ymd_and_hms(2024, 1, 5, 23, 59, 0).unwrap();
        assert_eq!(hm(dt), "23:59");
    }

    fn looks_like_clock(label: &str) {
        assert_eq!(label.len(), 5, "bad label {label:?}");
        assert_eq!(label.as_bytes()[2], b':');
        for (i, c) in label.chars().enumerate() {
            if i != 2 {
                assert!(c.is_ascii_digit(), "bad label {label:?}");
            }
        }
    }

    #[test]
    fn missing_timestamp_falls_back_to_now() {
        looks_like_clock(&clock_label(None));
    }

    #[test]
    fn unparseable_timestamp_falls_back_to_now() {
        looks_like_clock(&clock_label(Some("yesterday-ish")));
        looks_like_clock(&clock_label(Some("")));
    }

    #[test]
    fn valid_timestamp_is_rendered() {
        // Offset-carrying input parses regardless of the host timezone.
        looks_like_clock(&clock_label(Some("2024-01-05T09:04:00Z")));
        looks_like_clock(&clock_label(Some("2024-01-05T09:04:00+08:00")));
    }

    #[test]
    fn sample_timestamp_renders_local_wall_clock() {
        let instant = DateTime::parse_from_rfc3339("2024-01-05T09:04:00Z").unwrap();
        let offset_minutes = instant.with_timezone(&Local).offset().local_minus_utc() / 60;
        let minutes = (9 * 60 + 4 + offset_minutes).rem_euclid(24 * 60);
        let expected = format!("{:02}:{:02}", minutes / 60, minutes % 60);

        // On a UTC host this is literally "09:04".
        assert_eq!(clock_label(Some("2024-01-05T09:04:00Z")), expected);
    }
}
