//! Configuration for the registration engine.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::canonical::CanonicalEventId;
use crate::types::GroupEvent;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;

/// Per-district registrant limit of each group event.
///
/// Individual events are not listed: they have an implicit capacity of one
/// claimant per district and group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityTable {
    limits: BTreeMap<GroupEvent, u32>,
}

impl Default for CapacityTable {
    fn default() -> Self {
        Self::empty()
            .with_limit(GroupEvent::DevotionalSinging, 5)
            .with_limit(GroupEvent::AltarDecoration, 4)
            .with_limit(GroupEvent::RudramNamakamChanting, 4)
    }
}

impl CapacityTable {
    /// A table without limits
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            limits: BTreeMap::new(),
        }
    }

    /// Sets the limit of one group event
    #[must_use]
    pub fn with_limit(mut self, event: GroupEvent, limit: u32) -> Self {
        self.limits.insert(event, limit);
        self
    }

    /// Limit for a group event
    #[must_use]
    pub fn limit(&self, event: GroupEvent) -> Option<u32> {
        self.limits.get(&event).copied()
    }

    /// Limit for a canonical group-event id.
    ///
    /// Returns `None` for ids that are not group events.
    #[must_use]
    pub fn limit_for(&self, id: &CanonicalEventId) -> Option<u32> {
        id.as_str()
            .parse::<GroupEvent>()
            .ok()
            .and_then(|event| self.limit(event))
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Group event capacities
    pub capacities: CapacityTable,
    /// Reject submissions from districts the wizard does not offer.
    ///
    /// Off by default: an aggregate fetch failure is the only other reason a
    /// submission fails.
    pub enforce_known_districts: bool,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacities: CapacityTable::default(),
            enforce_known_districts: false,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = CapacityTable::default();
        let capacity = |var: &str, event: GroupEvent| {
            env::var(var)
                .ok()
                .and_then(|s| s.parse().ok())
                .or_else(|| defaults.limit(event))
                .unwrap_or_default()
        };

        Self {
            capacities: CapacityTable::empty()
                .with_limit(
                    GroupEvent::DevotionalSinging,
                    capacity(
                        "REGISTRATION_CAPACITY_DEVOTIONAL_SINGING",
                        GroupEvent::DevotionalSinging,
                    ),
                )
                .with_limit(
                    GroupEvent::AltarDecoration,
                    capacity(
                        "REGISTRATION_CAPACITY_ALTAR_DECORATION",
                        GroupEvent::AltarDecoration,
                    ),
                )
                .with_limit(
                    GroupEvent::RudramNamakamChanting,
                    capacity(
                        "REGISTRATION_CAPACITY_RUDRAM_NAMAKAM_CHANTING",
                        GroupEvent::RudramNamakamChanting,
                    ),
                ),
            enforce_known_districts: env::var("REGISTRATION_ENFORCE_KNOWN_DISTRICTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
            log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_capacities() {
        let table = CapacityTable::default();
        assert_eq!(table.limit(GroupEvent::DevotionalSinging), Some(5));
        assert_eq!(table.limit(GroupEvent::AltarDecoration), Some(4));
        assert_eq!(table.limit(GroupEvent::RudramNamakamChanting), Some(4));
    }

    #[test]
    fn limit_for_canonical_ids() {
        let table = CapacityTable::default();
        assert_eq!(
            table.limit_for(&CanonicalEventId::new("devotional-singing")),
            Some(5)
        );
        assert_eq!(table.limit_for(&CanonicalEventId::new("slokas - Boys")), None);
        assert_eq!(table.limit_for(&CanonicalEventId::new("quiz")), None);
    }

    #[test]
    fn with_limit_overrides() {
        let table = CapacityTable::default().with_limit(GroupEvent::AltarDecoration, 2);
        assert_eq!(table.limit(GroupEvent::AltarDecoration), Some(2));
        assert_eq!(CapacityTable::empty().limit(GroupEvent::AltarDecoration), None);
    }

    #[test]
    fn default_config_accepts_any_district() {
        let config = Config::default();
        assert!(!config.enforce_known_districts);
        assert_eq!(config.capacities, CapacityTable::default());
    }
}
