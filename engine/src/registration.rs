//! The persisted registration record.

use crate::canonical::CanonicalEventId;
use crate::resolver::{ConflictVerdict, DerivedEventIds};
use crate::types::{District, Gender, Group, RegistrantContext, YesNo};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a registration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrationId(Uuid);

impl RegistrationId {
    /// Creates a new random `RegistrationId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RegistrationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A finalized submission. Written once, never updated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Record id
    pub id: RegistrationId,
    /// Registrant group
    pub group: Group,
    /// Registrant gender
    pub gender: Gender,
    /// Registrant district
    pub district: District,
    /// Group 3 exam answer, if asked
    pub has_given_group2_exam: Option<YesNo>,
    /// Claimed group event
    pub group_event: Option<CanonicalEventId>,
    /// First individual claim
    pub individual_choice1: Option<CanonicalEventId>,
    /// Second individual claim
    pub individual_choice2: Option<CanonicalEventId>,
    /// Advisory conflict verdict
    #[serde(flatten)]
    pub verdict: ConflictVerdict,
    /// When the record was built
    pub submitted_at: DateTime<Utc>,
}

impl Registration {
    /// Assembles a record from its parts
    #[must_use]
    pub fn new(
        context: &RegistrantContext,
        ids: DerivedEventIds,
        verdict: ConflictVerdict,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        let mut context = context.clone();
        context.drop_stale_exam_answer();
        Self {
            id: RegistrationId::new(),
            group: context.group,
            gender: context.gender,
            district: context.district,
            has_given_group2_exam: context.has_given_group2_exam,
            group_event: ids.group_event,
            individual_choice1: ids.individual_choice1,
            individual_choice2: ids.individual_choice2,
            verdict,
            submitted_at,
        }
    }

    /// An already accepted record with a clean verdict, for seeding stores.
    #[must_use]
    pub fn accepted(
        context: &RegistrantContext,
        ids: DerivedEventIds,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self::new(
            context,
            ids,
            ConflictVerdict::from_conflicts(Vec::new()),
            submitted_at,
        )
    }

    /// Individual claims of this record
    pub fn individual_claims(&self) -> impl Iterator<Item = &CanonicalEventId> {
        self.individual_choice1
            .iter()
            .chain(self.individual_choice2.iter())
    }
}
