//! Serde helpers for human-readable durations in configuration.

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};
use std::{fmt, time::Duration};

/// `Duration` as a humantime string (`"15s"`, `"1m30s"`) or whole seconds
pub mod duration {
    use super::*;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let duration_str = humantime::format_duration(*duration).to_string();
        serializer.serialize_str(&duration_str)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DurationVisitor;

        impl<'de> Visitor<'de> for DurationVisitor {
            type Value = Duration;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a duration as seconds (number) or human-readable string (e.g., '15s', '1m30s')")
            }

            fn visit_u64<E>(self, seconds: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Duration::from_secs(seconds))
            }

            fn visit_i64<E>(self, seconds: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                u64::try_from(seconds)
                    .map(Duration::from_secs)
                    .map_err(|_| de::Error::custom(format!("Duration cannot be negative: {seconds}")))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                humantime::parse_duration(value.trim())
                    .map_err(|e| de::Error::custom(format!("Invalid duration '{value}': {e}")))
            }
        }

        deserializer.deserialize_any(DurationVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Timeouts {
        #[serde(with = "duration")]
        connect: Duration,
    }

    #[test]
    fn test_parse_human_readable_and_seconds() {
        let parsed: Timeouts = toml::from_str("connect = \"1m30s\"").unwrap();
        assert_eq!(parsed.connect, Duration::from_secs(90));

        let parsed: Timeouts = toml::from_str("connect = 20").unwrap();
        assert_eq!(parsed.connect, Duration::from_secs(20));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(toml::from_str::<Timeouts>("connect = \"soon\"").is_err());
        assert!(toml::from_str::<Timeouts>("connect = -5").is_err());
    }

    #[test]
    fn test_serializes_as_humantime() {
        let rendered = toml::to_string(&Timeouts {
            connect: Duration::from_secs(15),
        })
        .unwrap();
        assert_eq!(rendered.trim(), "connect = \"15s\"");
    }
}
