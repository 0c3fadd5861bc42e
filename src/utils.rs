//! Small shared helpers for the JSON collateral models.

use anyhow::{Context, Result};

/// Parse an RFC 3339 timestamp into seconds since the Unix epoch.
pub(crate) fn parse_rfc3339_secs(value: &str) -> Result<u64> {
    let parsed = chrono::DateTime::parse_from_rfc3339(value)
        .ok()
        .with_context(|| format!("Failed to parse timestamp '{value}'"))?;
    u64::try_from(parsed.timestamp()).context("Timestamp before the Unix epoch")
}

/// Serde adapter for fixed-size byte arrays carried as hex strings.
pub(crate) mod serde_hex {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, const N: usize>(deserializer: D) -> Result<[u8; N], D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        let bytes = hex::decode(&text).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom(format!("expected {N} hex-encoded bytes")))
    }

    /// Variant for optional hex fields.
    pub mod opt {
        use serde::{Deserialize, Deserializer};

        pub fn deserialize<'de, D, const N: usize>(
            deserializer: D,
        ) -> Result<Option<[u8; N]>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let text = Option::<String>::deserialize(deserializer)?;
            match text {
                None => Ok(None),
                Some(text) => {
                    let bytes = hex::decode(&text).map_err(serde::de::Error::custom)?;
                    bytes.try_into().map(Some).map_err(|_| {
                        serde::de::Error::custom(format!("expected {N} hex-encoded bytes"))
                    })
                }
            }
        }
    }
}
