/// Timestamps as the provider writes them, e.g. `Wed Oct 10 20:19:24 +0000 2018`.
/// RFC 3339 strings are accepted on input too, for responses replayed from other tools.
pub mod provider_date_format {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_str(&s, FORMAT)
            .or_else(|_| DateTime::parse_from_rfc3339(&s))
            .map_err(serde::de::Error::custom)
            .map(|dt| dt.to_utc())
    }
}
