// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Method-name pattern matching.
//!
//! Patterns are simpler than globs: a pattern is an exact
//! name, `prefix*`, `*suffix`, or the lone wildcard `*`. Matching is a
//! case-sensitive string comparison, never a regular expression.
//!
//! ```rust
//! use weave::pattern::PatternSet;
//!
//! let patterns = PatternSet::new(["request*", "order*", "save*"]).unwrap();
//! assert!(patterns.matches("order_item"));
//! assert!(!patterns.matches("no_log"));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PatternError;

const WILDCARD: char = '*';

/// A single method-name pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// `*` - matches every name.
    Any,
    /// Matches only the identical name.
    Exact(String),
    /// `prefix*`
    Prefix(String),
    /// `*suffix`
    Suffix(String),
}

impl Pattern {
    /// Parse a pattern string.
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        if raw.is_empty() {
            return Err(PatternError::Empty);
        }
        if raw == "*" {
            return Ok(Self::Any);
        }

        let wildcards = raw.matches(WILDCARD).count();
        if wildcards == 0 {
            return Ok(Self::Exact(raw.to_string()));
        }
        if wildcards > 1 {
            return Err(PatternError::MisplacedWildcard(raw.to_string()));
        }

        if let Some(prefix) = raw.strip_suffix(WILDCARD) {
            Ok(Self::Prefix(prefix.to_string()))
        } else if let Some(suffix) = raw.strip_prefix(WILDCARD) {
            Ok(Self::Suffix(suffix.to_string()))
        } else {
            Err(PatternError::MisplacedWildcard(raw.to_string()))
        }
    }

    /// Check whether `name` matches this pattern.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(exact) => name == exact,
            Self::Prefix(prefix) => name.starts_with(prefix.as_str()),
            Self::Suffix(suffix) => name.ends_with(suffix.as_str()),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "*"),
            Self::Exact(exact) => write!(f, "{}", exact),
            Self::Prefix(prefix) => write!(f, "{}*", prefix),
            Self::Suffix(suffix) => write!(f, "*{}", suffix),
        }
    }
}

impl FromStr for Pattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Pattern {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// An ordered collection of patterns; matches when any member matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    /// Parse every pattern, failing on the first invalid one.
    pub fn new<I, S>(patterns: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| Pattern::parse(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// A set that matches nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A set that matches every name.
    pub fn any() -> Self {
        Self {
            patterns: vec![Pattern::Any],
        }
    }

    /// Check whether any pattern matches `name`.
    pub fn matches(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(name))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }
}

impl From<Vec<Pattern>> for PatternSet {
    fn from(patterns: Vec<Pattern>) -> Self {
        Self { patterns }
    }
}

impl fmt::Display for PatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.patterns.iter().map(Pattern::to_string).collect();
        write!(f, "[{}]", rendered.join(", "))
    }
}

/// Check whether `name` matches any pattern in `patterns`.
pub fn matches(patterns: &PatternSet, name: &str) -> bool {
    patterns.matches(name)
}
