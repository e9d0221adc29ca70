//! Derivation of the canonical ids a finalized selection claims.

use crate::canonical::CanonicalEventId;
use crate::eligibility::EventSelection;
use crate::types::{Group, GroupEvent, RegistrantContext, Slot, YesNo};
use serde::{Deserialize, Serialize};

/// Canonical ids claimed by one submission.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedEventIds {
    /// Group event, or devotional singing for a group 1 "yes"
    pub group_event: Option<CanonicalEventId>,
    /// First individual claim (a promoted quiz/drawing answer lands here)
    pub individual_choice1: Option<CanonicalEventId>,
    /// Second individual claim
    pub individual_choice2: Option<CanonicalEventId>,
}

impl DerivedEventIds {
    /// Individual claims in slot order
    pub fn individual_claims(&self) -> impl Iterator<Item = &CanonicalEventId> {
        self.individual_choice1
            .iter()
            .chain(self.individual_choice2.iter())
    }
}

/// Derives the canonical ids of a frozen selection.
///
/// A group 3 registrant without the group 2 exam loses both individual
/// choices first, whatever the selection holds. A quiz or drawing answer is
/// then promoted into the first individual claim and the first choice moves
/// to the second.
#[must_use]
pub fn derive_event_ids(context: &RegistrantContext, selection: &EventSelection) -> DerivedEventIds {
    let group_event = match selection.devotional_singing() {
        Some(YesNo::Yes) => Some(CanonicalEventId::for_group_event(
            GroupEvent::DevotionalSinging,
        )),
        _ => selection
            .group_event()
            .and_then(|choice| choice.event())
            .map(CanonicalEventId::for_group_event),
    };

    let individual = |slot| {
        if context.group == Group::Three && !context.passed_group2_exam() {
            return None;
        }
        selection
            .individual(slot)
            .map(|event| CanonicalEventId::for_individual(event, context.group, context.gender))
    };
    let mut individual_choice1 = individual(Slot::First);
    let mut individual_choice2 = individual(Slot::Second);

    if let Some(promoted) = selection
        .quiz_or_drawing()
        .and_then(CanonicalEventId::for_quiz_or_drawing)
    {
        if individual_choice1.is_some() {
            individual_choice2 = individual_choice1.take();
        }
        individual_choice1 = Some(promoted);
    }

    DerivedEventIds {
        group_event,
        individual_choice1,
        individual_choice2,
    }
}
