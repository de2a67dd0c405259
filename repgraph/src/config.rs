//! Distributor configuration.

use codec::VisibilityRules;

/// Replication configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReplicationConfig {
    /// Maximum entities in the world (hard safety cap).
    pub max_entities: usize,
    /// Per-observer visibility rules applied to every block.
    pub rules: VisibilityRules,
}

impl Default for ReplicationConfig {
    fn default() -> Self {
        Self {
            max_entities: 1_000_000,
            rules: VisibilityRules::default(),
        }
    }
}

impl ReplicationConfig {
    /// Small cap with every visibility rule enabled.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            max_entities: 64,
            rules: VisibilityRules::for_testing(),
        }
    }

    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            max_entities: usize::MAX,
            rules: VisibilityRules::unlimited(),
        }
    }

    #[must_use]
    pub fn with_max_entities(mut self, max_entities: usize) -> Self {
        self.max_entities = max_entities;
        self
    }
}
