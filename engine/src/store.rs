//! In-memory document store.
//!
//! Holds accepted registrations in insertion order and answers the aggregate
//! query the resolver needs. Used by the demo binary and the tests; a real
//! deployment implements the same two traits over its document database.

use crate::error::{QueryError, SinkError};
use crate::registration::Registration;
use crate::resolver::{AggregateQuery, BoxedResult, EventAggregates, RegistrationSink};
use crate::types::{District, Group};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Append-only registration collection.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistrationStore {
    records: Arc<RwLock<Vec<Registration>>>,
}

impl InMemoryRegistrationStore {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an already accepted registration
    pub async fn seed(&self, registration: Registration) {
        self.records.write().await.push(registration);
    }

    /// Number of stored registrations
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no registrations
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Snapshot of all registrations in insertion order
    pub async fn records(&self) -> Vec<Registration> {
        self.records.read().await.clone()
    }

    /// Summarises stored records for a district and group.
    ///
    /// Individual claims come from records of the same district and group;
    /// group event counts from records of the same district in any group.
    fn aggregate(records: &[Registration], district: &District, group: Group) -> EventAggregates {
        let mut aggregates = EventAggregates::default();
        for record in records.iter().filter(|r| &r.district == district) {
            if record.group == group {
                for id in record.individual_claims() {
                    aggregates.individual_claims.insert(id.clone(), true);
                }
            }
            if let Some(group_event) = &record.group_event {
                *aggregates
                    .group_event_counts
                    .entry(group_event.clone())
                    .or_insert(0) += 1;
            }
        }
        aggregates
    }
}

impl AggregateQuery for InMemoryRegistrationStore {
    fn fetch_event_aggregates(
        &self,
        district: &District,
        group: Group,
    ) -> BoxedResult<'_, EventAggregates, QueryError> {
        let district = district.clone();
        Box::pin(async move {
            let records = self.records.read().await;
            Ok(Self::aggregate(&records, &district, group))
        })
    }
}

impl RegistrationSink for InMemoryRegistrationStore {
    fn record(&self, registration: Registration) -> BoxedResult<'_, (), SinkError> {
        Box::pin(async move {
            self.records.write().await.push(registration);
            Ok(())
        })
    }
}

/// Aggregate query that always fails, for exercising the fetch failure path.
#[derive(Debug, Clone)]
pub struct FailingAggregateQuery {
    reason: String,
}

impl FailingAggregateQuery {
    /// Creates a query failing with `reason`
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl AggregateQuery for FailingAggregateQuery {
    fn fetch_event_aggregates(
        &self,
        _district: &District,
        _group: Group,
    ) -> BoxedResult<'_, EventAggregates, QueryError> {
        Box::pin(async move { Err(QueryError(self.reason.clone())) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::CanonicalEventId;
    use crate::resolver::DerivedEventIds;
    use crate::types::{Gender, RegistrantContext};
    use registration_core::environment::Clock;
    use registration_testing::test_clock;

    fn accepted(group: Group, district: &str, ids: DerivedEventIds) -> Registration {
        let context = RegistrantContext::new(group, Gender::Male, district);
        Registration::accepted(&context, ids, test_clock().now())
    }

    fn ids(group_event: Option<&str>, first: Option<&str>) -> DerivedEventIds {
        DerivedEventIds {
            group_event: group_event.map(CanonicalEventId::new),
            individual_choice1: first.map(CanonicalEventId::new),
            individual_choice2: None,
        }
    }

    #[tokio::test]
    async fn claims_scoped_to_district_and_group() {
        let store = InMemoryRegistrationStore::new();
        store
            .seed(accepted(Group::Two, "Chennai South", ids(None, Some("slokas - Boys"))))
            .await;
        store
            .seed(accepted(Group::Three, "Chennai South", ids(None, Some("bhajans - Boys"))))
            .await;
        store
            .seed(accepted(Group::Two, "Madurai", ids(None, Some("quiz"))))
            .await;

        let district = District::new("Chennai South");
        let aggregates = store
            .fetch_event_aggregates(&district, Group::Two)
            .await
            .unwrap_or_default();

        assert!(aggregates.is_claimed(&CanonicalEventId::new("slokas - Boys")));
        assert!(!aggregates.is_claimed(&CanonicalEventId::new("bhajans - Boys")));
        assert!(!aggregates.is_claimed(&CanonicalEventId::new("quiz")));
    }

    #[tokio::test]
    async fn group_event_counts_span_groups() {
        let store = InMemoryRegistrationStore::new();
        for group in [Group::One, Group::Two, Group::Three] {
            store
                .seed(accepted(group, "Madurai", ids(Some("devotional-singing"), None)))
                .await;
        }
        store
            .seed(accepted(Group::One, "Salem", ids(Some("devotional-singing"), None)))
            .await;

        let aggregates = store
            .fetch_event_aggregates(&District::new("Madurai"), Group::Four)
            .await
            .unwrap_or_default();
        assert_eq!(aggregates.count(&CanonicalEventId::new("devotional-singing")), 3);
    }

    #[tokio::test]
    async fn sink_appends_in_order() {
        let store = InMemoryRegistrationStore::new();
        assert!(store.is_empty().await);

        let first = accepted(Group::Four, "Erode", ids(None, Some("quiz")));
        let second = accepted(Group::One, "Erode", ids(Some("devotional-singing"), None));
        store.record(first.clone()).await.unwrap_or_default();
        store.record(second.clone()).await.unwrap_or_default();

        assert_eq!(store.len().await, 2);
        assert_eq!(store.records().await, vec![first, second]);
    }

    #[tokio::test]
    async fn failing_query_reports_reason() {
        let query = FailingAggregateQuery::new("offline");
        let result = query
            .fetch_event_aggregates(&District::new("Erode"), Group::One)
            .await;
        assert_eq!(result, Err(QueryError("offline".to_string())));
    }
}
