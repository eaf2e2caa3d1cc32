//! User identifier type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// Numeric identifier of a user record.
///
/// The backend issues ids as integers in records but as decimal strings in
/// token subjects, so both forms are accepted when deserializing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Create a user id from its numeric value.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Parse a user id from its decimal representation.
    pub fn parse(s: &str) -> Result<Self, Error> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|e| {
                InvalidInputError::UserId {
                    value: s.to_string(),
                    reason: e.to_string(),
                }
                .into()
            })
    }

    /// Returns the numeric value.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(i64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Ok(Self(n)),
            Repr::Text(s) => UserId::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}
