use chrono::{DateTime, NaiveDateTime, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

pub fn from_rfc3339(s: &str) -> anyhow::Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc))
}

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parses RFC 3339, or a zone-less ISO date-time read as UTC.
pub fn parse_lenient(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = from_rfc3339(s) {
        return Some(dt);
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_offset_and_local_timestamps() {
        let with_zone = parse_lenient("2025-03-01T10:15:00+02:00").unwrap();
        assert_eq!(with_zone.hour(), 8);

        let local = parse_lenient("2025-03-01T10:15:30.123456").unwrap();
        assert_eq!((local.day(), local.hour(), local.second()), (1, 10, 30));

        assert!(parse_lenient("yesterday").is_none());
        assert!(parse_lenient("  ").is_none());
    }
}
