//! Aggregate snapshot and the advisory verdict computed from it.

use super::derive::DerivedEventIds;
use crate::canonical::CanonicalEventId;
use crate::config::CapacityTable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Accepted registrations, summarised for one district and group.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAggregates {
    /// Individual ids already claimed in the same district and group
    pub individual_claims: HashMap<CanonicalEventId, bool>,
    /// Group event registrant counts in the same district, any group
    pub group_event_counts: HashMap<CanonicalEventId, u32>,
}

impl EventAggregates {
    /// Whether an individual id is already taken
    #[must_use]
    pub fn is_claimed(&self, id: &CanonicalEventId) -> bool {
        self.individual_claims.get(id).copied().unwrap_or(false)
    }

    /// Current registrant count of a group event
    #[must_use]
    pub fn count(&self, id: &CanonicalEventId) -> u32 {
        self.group_event_counts.get(id).copied().unwrap_or(0)
    }
}

/// Advisory result attached to a registration; never blocks it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictVerdict {
    /// No conflicts found
    pub validity: bool,
    /// Conflicting ids: individual claims in slot order, then the group event
    pub conflicting_events: Vec<CanonicalEventId>,
}

impl ConflictVerdict {
    /// Builds the verdict from its conflicts
    #[must_use]
    pub fn from_conflicts(conflicting_events: Vec<CanonicalEventId>) -> Self {
        Self {
            validity: conflicting_events.is_empty(),
            conflicting_events,
        }
    }
}

/// Checks derived ids against a snapshot.
///
/// An individual id conflicts when it is already claimed. A group event
/// conflicts once its count has reached the configured limit; an event with
/// no configured limit never conflicts.
#[must_use]
pub fn compute_verdict(
    ids: &DerivedEventIds,
    aggregates: &EventAggregates,
    capacities: &CapacityTable,
) -> ConflictVerdict {
    let mut conflicts: Vec<CanonicalEventId> = ids
        .individual_claims()
        .filter(|id| aggregates.is_claimed(id))
        .cloned()
        .collect();

    if let Some(group_event) = &ids.group_event {
        let full = capacities
            .limit_for(group_event)
            .is_some_and(|limit| aggregates.count(group_event) >= limit);
        if full {
            conflicts.push(group_event.clone());
        }
    }

    ConflictVerdict::from_conflicts(conflicts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> CanonicalEventId {
        CanonicalEventId::new(s)
    }

    fn aggregates(claims: &[&str], counts: &[(&str, u32)]) -> EventAggregates {
        EventAggregates {
            individual_claims: claims.iter().map(|c| (id(c), true)).collect(),
            group_event_counts: counts.iter().map(|(c, n)| (id(c), *n)).collect(),
        }
    }

    #[test]
    fn claimed_individual_conflicts() {
        let ids = DerivedEventIds {
            individual_choice1: Some(id("slokas - Boys")),
            ..DerivedEventIds::default()
        };
        let verdict = compute_verdict(
            &ids,
            &aggregates(&["slokas - Boys"], &[]),
            &CapacityTable::default(),
        );
        assert!(!verdict.validity);
        assert_eq!(verdict.conflicting_events, vec![id("slokas - Boys")]);
    }

    #[test]
    fn other_gender_is_not_a_conflict() {
        let ids = DerivedEventIds {
            individual_choice1: Some(id("slokas - Girls")),
            ..DerivedEventIds::default()
        };
        let verdict = compute_verdict(
            &ids,
            &aggregates(&["slokas - Boys"], &[]),
            &CapacityTable::default(),
        );
        assert!(verdict.validity);
    }

    #[test]
    fn false_claim_entry_is_not_a_conflict() {
        let ids = DerivedEventIds {
            individual_choice2: Some(id("quiz")),
            ..DerivedEventIds::default()
        };
        let mut snapshot = EventAggregates::default();
        snapshot.individual_claims.insert(id("quiz"), false);
        assert!(compute_verdict(&ids, &snapshot, &CapacityTable::default()).validity);
    }

    #[test]
    fn group_event_conflicts_at_capacity() {
        let ids = DerivedEventIds {
            group_event: Some(id("devotional-singing")),
            ..DerivedEventIds::default()
        };
        let table = CapacityTable::default();

        let below = compute_verdict(&ids, &aggregates(&[], &[("devotional-singing", 4)]), &table);
        assert!(below.validity);

        let at = compute_verdict(&ids, &aggregates(&[], &[("devotional-singing", 5)]), &table);
        assert!(!at.validity);
        assert_eq!(at.conflicting_events, vec![id("devotional-singing")]);
    }

    #[test]
    fn all_conflicts_reported() {
        let ids = DerivedEventIds {
            group_event: Some(id("altar-decoration")),
            individual_choice1: Some(id("bhajans - Girls")),
            individual_choice2: Some(id("elocution-english")),
        };
        let verdict = compute_verdict(
            &ids,
            &aggregates(
                &["bhajans - Girls", "elocution-english"],
                &[("altar-decoration", 9)],
            ),
            &CapacityTable::default(),
        );
        assert!(!verdict.validity);
        assert_eq!(
            verdict.conflicting_events,
            vec![
                id("bhajans - Girls"),
                id("elocution-english"),
                id("altar-decoration")
            ]
        );
    }

    #[test]
    fn verdict_serializes_with_wire_names() {
        let verdict = ConflictVerdict::from_conflicts(vec![id("quiz")]);
        let json = serde_json::to_value(&verdict).unwrap_or_default();
        assert_eq!(json["validity"], false);
        assert_eq!(json["conflictingEvents"][0], "quiz");
    }
}
