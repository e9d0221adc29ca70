//! Group 1: a devotional singing flag and up to two individual events.
//!
//! Answering "yes" spends the extra slot on devotional singing, so only the
//! first individual slot stays available. Answering "no" makes the first slot
//! required and the second optional.

use super::{FieldChange, IndividualSlots, SelectionAction, SelectionUpdate};
use crate::error::{InvariantViolation, SelectionError};
use crate::types::{Group, Slot, YesNo};
use serde::{Deserialize, Serialize};

/// Event section state of a group 1 registrant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group1Selection {
    devotional_singing: Option<YesNo>,
    slots: IndividualSlots,
}

impl Group1Selection {
    /// The empty selection
    #[must_use]
    pub const fn new() -> Self {
        Self {
            devotional_singing: None,
            slots: IndividualSlots {
                first: None,
                second: None,
            },
        }
    }

    /// Devotional singing answer, `None` while unanswered
    #[must_use]
    pub const fn devotional_singing(&self) -> Option<YesNo> {
        self.devotional_singing
    }

    /// Individual slots
    #[must_use]
    pub const fn slots(&self) -> &IndividualSlots {
        &self.slots
    }

    /// Yes on its own, or no plus a first individual event.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        match self.devotional_singing {
            Some(YesNo::Yes) => true,
            Some(YesNo::No) => self.slots.first.is_some(),
            None => false,
        }
    }

    pub(super) fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.slots.check()?;
        if self.devotional_singing == Some(YesNo::Yes) && self.slots.second.is_some() {
            return Err(InvariantViolation::SlotBudgetExceeded("devotional singing"));
        }
        Ok(())
    }

    pub(super) fn write(&mut self, change: FieldChange) {
        match change {
            FieldChange::DevotionalSinging(answer) => self.devotional_singing = Some(answer),
            FieldChange::Individual { slot, event } => self.slots.set(slot, event),
            // Never planned for group 1
            FieldChange::QuizOrDrawing(_) | FieldChange::GroupEvent(_) => {}
        }
    }

    fn check_slot_enabled(&self, slot: Slot) -> Result<(), SelectionError> {
        let disabled = |reason| SelectionError::Disabled {
            field: slot.field_name(),
            reason,
        };
        match (slot, self.devotional_singing) {
            (_, None) => Err(disabled("answer the devotional singing question first")),
            (Slot::Second, Some(YesNo::Yes)) => {
                Err(disabled("devotional singing takes the second slot"))
            },
            (Slot::Second, Some(YesNo::No)) if self.slots.first.is_none() => {
                Err(disabled("choose the first individual event first"))
            },
            _ => Ok(()),
        }
    }
}

/// Plans the effect of `action` on a group 1 selection.
///
/// # Errors
///
/// Rejects quiz/drawing and group event answers, elocution, and individual
/// events for a slot that is not enabled yet.
pub fn transition(
    selection: &Group1Selection,
    action: SelectionAction,
) -> Result<SelectionUpdate, SelectionError> {
    match action {
        SelectionAction::SetDevotionalSinging(answer) => {
            let mut update = SelectionUpdate::new(FieldChange::DevotionalSinging(answer));
            if answer == YesNo::Yes {
                selection.slots.clear_second(&mut update);
            }
            Ok(update)
        },
        SelectionAction::SetIndividual { slot, event } => {
            IndividualSlots::check_offered(event, Group::One)?;
            selection.check_slot_enabled(slot)?;
            selection.slots.plan_set(slot, event)
        },
        SelectionAction::ClearIndividual { slot } => Ok(selection.slots.plan_clear(slot)),
        SelectionAction::SetQuizOrDrawing(_) => Err(SelectionError::NotOfferedToGroup {
            field: "quizOrDrawing",
            group: Group::One,
        }),
        SelectionAction::SetGroupEvent(_) => Err(SelectionError::NotOfferedToGroup {
            field: "groupEvent",
            group: Group::One,
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use crate::types::{GroupEventChoice, IndividualEvent, QuizOrDrawing};

    fn apply_all(actions: &[SelectionAction]) -> Group1Selection {
        let mut selection = Group1Selection::new();
        for action in actions {
            let update = transition(&selection, *action).unwrap();
            for change in update.changes() {
                selection.write(*change);
            }
        }
        selection
    }

    fn set(slot: Slot, event: IndividualEvent) -> SelectionAction {
        SelectionAction::SetIndividual { slot, event }
    }

    #[test]
    fn yes_clears_second_slot() {
        let selection = apply_all(&[
            SelectionAction::SetDevotionalSinging(YesNo::No),
            set(Slot::First, IndividualEvent::Slokas),
            set(Slot::Second, IndividualEvent::VedamChanting),
        ]);
        assert_eq!(selection.slots.second, Some(IndividualEvent::VedamChanting));

        let update =
            transition(&selection, SelectionAction::SetDevotionalSinging(YesNo::Yes)).unwrap();
        assert_eq!(
            update.resets(),
            [FieldChange::Individual {
                slot: Slot::Second,
                event: None,
            }]
        );
    }

    #[test]
    fn yes_keeps_first_slot() {
        let selection = apply_all(&[
            SelectionAction::SetDevotionalSinging(YesNo::No),
            set(Slot::First, IndividualEvent::Slokas),
            SelectionAction::SetDevotionalSinging(YesNo::Yes),
        ]);
        assert_eq!(selection.slots.first, Some(IndividualEvent::Slokas));
        assert!(selection.is_complete());
    }

    #[test]
    fn second_slot_disabled_after_yes() {
        let selection = apply_all(&[
            SelectionAction::SetDevotionalSinging(YesNo::Yes),
            set(Slot::First, IndividualEvent::Slokas),
        ]);
        let err = transition(&selection, set(Slot::Second, IndividualEvent::Bhajans)).unwrap_err();
        assert_eq!(
            err,
            SelectionError::Disabled {
                field: "individualChoice2",
                reason: "devotional singing takes the second slot",
            }
        );
    }

    #[test]
    fn second_slot_needs_first() {
        let selection = apply_all(&[SelectionAction::SetDevotionalSinging(YesNo::No)]);
        assert!(matches!(
            transition(&selection, set(Slot::Second, IndividualEvent::Slokas)),
            Err(SelectionError::Disabled { .. })
        ));
    }

    #[test]
    fn no_requires_first_choice() {
        let selection = apply_all(&[SelectionAction::SetDevotionalSinging(YesNo::No)]);
        assert!(!selection.is_complete());

        let selection = apply_all(&[
            SelectionAction::SetDevotionalSinging(YesNo::No),
            set(Slot::First, IndividualEvent::StoryTellingEnglish),
        ]);
        assert!(selection.is_complete());
    }

    #[test]
    fn exclusive_partner_cleared_in_either_direction() {
        let selection = apply_all(&[
            SelectionAction::SetDevotionalSinging(YesNo::No),
            set(Slot::First, IndividualEvent::Slokas),
            set(Slot::Second, IndividualEvent::TamizhChants),
            set(Slot::First, IndividualEvent::Bhajans),
        ]);
        assert_eq!(selection.slots.first, Some(IndividualEvent::Bhajans));
        assert_eq!(selection.slots.second, None);

        let selection = apply_all(&[
            SelectionAction::SetDevotionalSinging(YesNo::No),
            set(Slot::First, IndividualEvent::Bhajans),
            set(Slot::Second, IndividualEvent::TamizhChants),
        ]);
        assert_eq!(selection.slots.first, Some(IndividualEvent::TamizhChants));
        assert_eq!(selection.slots.second, None);
    }

    #[test]
    fn elocution_not_offered() {
        let selection = apply_all(&[SelectionAction::SetDevotionalSinging(YesNo::No)]);
        assert_eq!(
            transition(&selection, set(Slot::First, IndividualEvent::ElocutionEnglish)),
            Err(SelectionError::InvalidAnswer {
                value: "elocution-english",
                group: Group::One,
            })
        );
        assert!(transition(&selection, set(Slot::First, IndividualEvent::Drawing)).is_ok());
    }

    #[test]
    fn same_event_twice_rejected() {
        let selection = apply_all(&[
            SelectionAction::SetDevotionalSinging(YesNo::No),
            set(Slot::First, IndividualEvent::Slokas),
        ]);
        assert_eq!(
            transition(&selection, set(Slot::Second, IndividualEvent::Slokas)),
            Err(SelectionError::AlreadySelected {
                event: IndividualEvent::Slokas,
                slot: Slot::First,
            })
        );
    }

    #[test]
    fn other_questions_not_offered() {
        let selection = Group1Selection::new();
        assert!(matches!(
            transition(&selection, SelectionAction::SetQuizOrDrawing(QuizOrDrawing::Quiz)),
            Err(SelectionError::NotOfferedToGroup { group: Group::One, .. })
        ));
        assert!(matches!(
            transition(
                &selection,
                SelectionAction::SetGroupEvent(GroupEventChoice::Declined)
            ),
            Err(SelectionError::NotOfferedToGroup { group: Group::One, .. })
        ));
    }
}
