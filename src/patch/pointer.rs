//! Structural pointers (RFC 6901) into a [`Document`](super::Document).

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PointerError {
    #[error("pointer must be empty or start with '/': {0:?}")]
    MissingLeadingSlash(String),
    #[error("invalid escape sequence in pointer: {0:?}")]
    InvalidEscape(String),
}

/// A parsed pointer. The empty pointer addresses the document root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pointer {
    tokens: Vec<String>,
}

impl Pointer {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn parse(raw: &str) -> Result<Self, PointerError> {
        if raw.is_empty() {
            return Ok(Self::root());
        }
        let rest = raw
            .strip_prefix('/')
            .ok_or_else(|| PointerError::MissingLeadingSlash(raw.to_string()))?;

        let tokens = rest
            .split('/')
            .map(|token| unescape(token).ok_or_else(|| PointerError::InvalidEscape(raw.to_string())))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { tokens })
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Splits into the parent tokens and the last token. `None` for the root.
    pub fn split_last(&self) -> Option<(&[String], &str)> {
        self.tokens
            .split_last()
            .map(|(last, parent)| (parent, last.as_str()))
    }

    /// True when `other` lies strictly below `self` in the tree.
    pub fn is_proper_prefix_of(&self, other: &Pointer) -> bool {
        self.tokens.len() < other.tokens.len() && other.tokens.starts_with(&self.tokens)
    }
}

fn unescape(token: &str) -> Option<String> {
    if !token.contains('~') {
        return Some(token.to_string());
    }
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            _ => return None,
        }
    }
    Some(out)
}

fn escape(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "/{}", escape(token))?;
        }
        Ok(())
    }
}

impl FromStr for Pointer {
    type Err = PointerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Pointer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Pointer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(de::Error::custom)
    }
}
