use chrono::{DateTime, SecondsFormat, Utc};

/// Fixed-width RFC 3339 timestamp. Stored dates sort lexicographically.
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serde adapter for `DateTime<Utc>` fields persisted as fixed-width strings.
pub mod rfc3339_millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_timestamp(date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamps_have_fixed_width() {
        let whole = Utc.with_ymd_and_hms(2024, 2, 20, 10, 0, 0).unwrap();
        let fractional = whole + chrono::Duration::milliseconds(500);

        let a = format_timestamp(&whole);
        let b = format_timestamp(&fractional);
        assert_eq!(a, "2024-02-20T10:00:00.000Z");
        assert_eq!(a.len(), b.len());
        assert!(a < b);
    }
}
