use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// [DID](https://www.w3.org/TR/did-core/#did-syntax).
///
/// Immutable once built: the methods produce a [Did] and hand it straight
/// to the document assembler.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Did {
    pub method_name: MethodName,
    pub method_id: MethodId,
}

impl Did {
    pub fn new(method_name: &str, method_id: impl Into<String>) -> Self {
        Self {
            method_name: MethodName(method_name.to_string()),
            method_id: MethodId(method_id.into()),
        }
    }
}

impl Display for Did {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "did:{}:{}", self.method_name.0, self.method_id.0)
    }
}

impl FromStr for Did {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');

        if parts.next() != Some("did") {
            return Err(ParseError::MissingScheme);
        }

        let method_name = parts.next().ok_or(ParseError::MissingMethodName)?;
        let method_specific_id = parts.next().ok_or(ParseError::MissingMethodId)?;

        let method_name = MethodName::from_str(method_name)?;
        let method_id = MethodId::from_str(method_specific_id)?;

        Ok(Did {
            method_name,
            method_id,
        })
    }
}

impl Serialize for Did {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Did {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("DID must start with `did:`")]
    MissingScheme,
    #[error("DID has no method name")]
    MissingMethodName,
    #[error("DID has no method-specific id")]
    MissingMethodId,
    #[error("method name must contain only lowercase letters and digits")]
    InvalidMethodName,
    #[error("method-specific id contains invalid characters")]
    InvalidMethodId,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodName(pub String);

impl FromStr for MethodName {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_empty()
            && s.chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            Ok(MethodName(s.to_string()))
        } else {
            Err(ParseError::InvalidMethodName)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodId(pub String);

impl FromStr for MethodId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_empty() && s.split(':').all(is_valid_idchar) {
            Ok(MethodId(s.to_string()))
        } else {
            Err(ParseError::InvalidMethodId)
        }
    }
}

// idchar = ALPHA / DIGIT / "." / "-" / "_" / pct-encoded
fn is_valid_idchar(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' || c == '%')
}
