// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Level identifiers shared by every nested call of one top-level call.

use std::fmt;
use uuid::Uuid;

/// Identifier of one top-level call plus the nesting level of a status.
///
/// The id is stable for the whole top-level call; the level is 0 for the
/// outermost call and grows by one for each nested begin.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TraceId {
    id: String,
    level: usize,
}

impl TraceId {
    /// Generate a new random id at level 0.
    pub fn new() -> Self {
        Self {
            id: Self::short(Uuid::new_v4()),
            level: 0,
        }
    }

    /// Create an id from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self {
            id: Self::short(uuid),
            level: 0,
        }
    }

    fn short(uuid: Uuid) -> String {
        uuid.simple().to_string()[..8].to_string()
    }

    /// The same id one level deeper.
    pub fn next_level(&self) -> Self {
        Self {
            id: self.id.clone(),
            level: self.level + 1,
        }
    }

    /// The same id one level shallower, saturating at 0.
    pub fn previous_level(&self) -> Self {
        Self {
            id: self.id.clone(),
            level: self.level.saturating_sub(1),
        }
    }

    pub fn is_first_level(&self) -> bool {
        self.level == 0
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn level(&self) -> usize {
        self.level
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TraceId({}@{})", self.id, self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_id_new() {
        let id1 = TraceId::new();
        let id2 = TraceId::new();
        assert_ne!(id1.id(), id2.id());
        assert_eq!(id1.id().len(), 8);
        assert!(id1.is_first_level());
    }

    #[test]
    fn test_trace_id_levels() {
        let root = TraceId::new();
        let nested = root.next_level().next_level();
        assert_eq!(nested.level(), 2);
        assert_eq!(nested.id(), root.id());

        let back = nested.previous_level();
        assert_eq!(back.level(), 1);
        assert_eq!(root.previous_level().level(), 0);
    }

    #[test]
    fn test_trace_id_from_uuid() {
        let uuid = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let id = TraceId::from_uuid(uuid);
        assert_eq!(id.to_string(), "550e8400");
    }

    #[test]
    fn test_trace_id_debug() {
        let id = TraceId::new().next_level();
        let debug = format!("{:?}", id);
        assert!(debug.starts_with("TraceId("));
        assert!(debug.ends_with("@1)"));
    }
}
