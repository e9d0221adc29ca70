//! Submission-time conflict resolver.
//!
//! At submission the frozen selection is turned into canonical event ids,
//! checked against a snapshot of accepted registrations and written to the
//! sink together with the resulting verdict. The verdict is advisory: a
//! conflicting registration is recorded all the same and reviewed by hand.
//!
//! # Concurrency
//!
//! The snapshot is read once and nothing serializes the fetch with the
//! write. Two registrants racing for the same individual event (or the last
//! place of a group event) can both observe it as free and both be recorded
//! as valid. Review is manual, so the race is accepted; a stronger guarantee
//! needs a per-(district, group, event) compare-and-set around `submit`.

mod derive;
mod verdict;

pub use derive::{DerivedEventIds, derive_event_ids};
pub use verdict::{ConflictVerdict, EventAggregates, compute_verdict};

use crate::config::Config;
use crate::eligibility::EventSelection;
use crate::error::{QueryError, RegistrationError, Result, SinkError};
use crate::registration::Registration;
use crate::types::{District, Group, RegistrantContext};
use registration_core::environment::Clock;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future returned by the collaborator traits.
pub type BoxedResult<'a, T, E> = Pin<Box<dyn Future<Output = std::result::Result<T, E>> + Send + 'a>>;

/// Read side of the document store.
pub trait AggregateQuery: Send + Sync {
    /// Summarise accepted registrations for a district and group.
    ///
    /// Individual claims are scoped to the district and group; group event
    /// counts to the district across all groups.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] if the store cannot be read.
    fn fetch_event_aggregates(
        &self,
        district: &District,
        group: Group,
    ) -> BoxedResult<'_, EventAggregates, QueryError>;
}

/// Write side of the document store.
pub trait RegistrationSink: Send + Sync {
    /// Persist a finalized registration.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] if the write fails.
    fn record(&self, registration: Registration) -> BoxedResult<'_, (), SinkError>;
}

/// Builds registrations and hands them to the sink.
#[derive(Clone)]
pub struct ConflictResolver {
    query: Arc<dyn AggregateQuery>,
    sink: Arc<dyn RegistrationSink>,
    clock: Arc<dyn Clock>,
    config: Config,
}

impl std::fmt::Debug for ConflictResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConflictResolver")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ConflictResolver {
    /// Creates a resolver over the given collaborators
    #[must_use]
    pub fn new(
        query: Arc<dyn AggregateQuery>,
        sink: Arc<dyn RegistrationSink>,
        clock: Arc<dyn Clock>,
        config: Config,
    ) -> Self {
        Self {
            query,
            sink,
            clock,
            config,
        }
    }

    /// Resolver configuration
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Derives, checks and records one submission.
    ///
    /// A conflict does not fail the submission; it is carried in the
    /// returned record's verdict.
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::UnknownDistrict`] when known districts are enforced
    /// - [`RegistrationError::GroupMismatch`] when the selection was made for another group
    /// - [`RegistrationError::Invariant`] when the selection is in an illegal state
    /// - [`RegistrationError::AggregateFetch`] when the snapshot cannot be read
    /// - [`RegistrationError::Sink`] when the record cannot be written
    #[tracing::instrument(
        skip(self, context, selection),
        fields(district = %context.district, group = %context.group)
    )]
    pub async fn submit(
        &self,
        context: &RegistrantContext,
        selection: &EventSelection,
    ) -> Result<Registration> {
        if self.config.enforce_known_districts && !context.district.is_known() {
            return Err(RegistrationError::UnknownDistrict(context.district.clone()));
        }
        if selection.group() != context.group {
            return Err(RegistrationError::GroupMismatch {
                selection: selection.group(),
                registrant: context.group,
            });
        }
        if let Err(violation) = selection.check_invariants() {
            tracing::error!(%violation, "Selection reached an illegal state");
            return Err(violation.into());
        }

        let ids = derive_event_ids(context, selection);
        tracing::debug!(?ids, "Derived canonical event ids");

        let aggregates = self
            .query
            .fetch_event_aggregates(&context.district, context.group)
            .await
            .inspect_err(|error| tracing::warn!(%error, "Aggregate fetch failed"))?;

        let verdict = compute_verdict(&ids, &aggregates, &self.config.capacities);
        let registration = Registration::new(context, ids, verdict, self.clock.now());
        self.sink.record(registration.clone()).await?;

        if registration.verdict.validity {
            tracing::info!(id = %registration.id, "Registration recorded without conflicts");
        } else {
            tracing::warn!(
                id = %registration.id,
                conflicts = ?registration.verdict.conflicting_events,
                "Registration recorded with conflicts"
            );
            metrics::counter!("registration.conflicts")
                .increment(registration.verdict.conflicting_events.len() as u64);
        }
        metrics::counter!(
            "registration.submissions",
            "validity" => registration.verdict.validity.to_string()
        )
        .increment(1);

        Ok(registration)
    }
}
