// Invocation input: `{"number": <integer>}`.

use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};

/// How many of the most recent posts a run examines.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Event {
    #[serde(deserialize_with = "integer_or_string")]
    pub number: usize,
}

/// Triggers sometimes deliver numbers as strings ("3"); accept both.
fn integer_or_string<'de, D>(deserializer: D) -> std::result::Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u64),
        Str(String),
    }

    let value = match Raw::deserialize(deserializer)? {
        Raw::Int(n) => n,
        Raw::Str(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| {
                <D::Error as serde::de::Error>::custom(format!(
                    "{s:?} is not a non-negative integer"
                ))
            })?,
    };
    usize::try_from(value).map_err(<D::Error as serde::de::Error>::custom)
}

impl Event {
    /// Parse an invocation payload.
    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|e| Error::Config(format!("Invalid invocation input {raw:?}: {e}")))
    }
}
