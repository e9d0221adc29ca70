//! Groups 2 and 3: quiz/drawing and a group event compete for the extra slot.
//!
//! Taking part in quiz or drawing declines the group event and leaves one
//! individual slot. Declining quiz/drawing opens the group event question; a
//! chosen group event again leaves one individual slot, and declining both
//! makes the first individual slot required and the second optional.

use super::{FieldChange, IndividualSlots, SelectionAction, SelectionUpdate};
use crate::error::{InvariantViolation, SelectionError};
use crate::types::{Group, GroupEventChoice, QuizOrDrawing, Slot};
use serde::{Deserialize, Serialize};

/// Event section state of a group 2 or group 3 registrant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group2Or3Selection {
    group: Group,
    quiz_or_drawing: Option<QuizOrDrawing>,
    group_event: Option<GroupEventChoice>,
    slots: IndividualSlots,
}

impl Group2Or3Selection {
    pub(super) const fn new(group: Group) -> Self {
        Self {
            group,
            quiz_or_drawing: None,
            group_event: None,
            slots: IndividualSlots {
                first: None,
                second: None,
            },
        }
    }

    /// Group 2 or group 3
    #[must_use]
    pub const fn group(&self) -> Group {
        self.group
    }

    /// Quiz/drawing answer, `None` while unanswered
    #[must_use]
    pub const fn quiz_or_drawing(&self) -> Option<QuizOrDrawing> {
        self.quiz_or_drawing
    }

    /// Group event answer, `None` while unanswered
    #[must_use]
    pub const fn group_event(&self) -> Option<GroupEventChoice> {
        self.group_event
    }

    /// Individual slots
    #[must_use]
    pub const fn slots(&self) -> &IndividualSlots {
        &self.slots
    }

    const fn is_participating(&self) -> bool {
        matches!(
            self.quiz_or_drawing,
            Some(QuizOrDrawing::Quiz | QuizOrDrawing::Drawing)
        )
    }

    /// Whether the registrant may leave the event section.
    ///
    /// Quiz or drawing alone is enough. Otherwise the group event must be
    /// answered, and declining it too requires a first individual event.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        match (self.quiz_or_drawing, self.group_event) {
            (None, _) => false,
            (Some(QuizOrDrawing::Quiz | QuizOrDrawing::Drawing), _) => true,
            (Some(QuizOrDrawing::Declined), None) => false,
            (Some(QuizOrDrawing::Declined), Some(GroupEventChoice::Event(_))) => true,
            (Some(QuizOrDrawing::Declined), Some(GroupEventChoice::Declined)) => {
                self.slots.first.is_some()
            },
        }
    }

    pub(super) fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.slots.check()?;
        if self.is_participating() && self.group_event != Some(GroupEventChoice::Declined) {
            return Err(InvariantViolation::GroupEventWithQuizOrDrawing);
        }
        if self.slots.second.is_some() {
            if self.is_participating() {
                return Err(InvariantViolation::SlotBudgetExceeded("quiz/drawing"));
            }
            if matches!(self.group_event, Some(GroupEventChoice::Event(_))) {
                return Err(InvariantViolation::SlotBudgetExceeded("group event"));
            }
        }
        Ok(())
    }

    pub(super) fn write(&mut self, change: FieldChange) {
        match change {
            FieldChange::QuizOrDrawing(answer) => self.quiz_or_drawing = Some(answer),
            FieldChange::GroupEvent(choice) => self.group_event = choice,
            FieldChange::Individual { slot, event } => self.slots.set(slot, event),
            // Never planned for groups 2 and 3
            FieldChange::DevotionalSinging(_) => {}
        }
    }

    fn check_slot_enabled(&self, slot: Slot) -> Result<(), SelectionError> {
        let disabled = |reason| SelectionError::Disabled {
            field: slot.field_name(),
            reason,
        };
        match slot {
            Slot::First if self.is_participating() || self.group_event.is_some() => Ok(()),
            Slot::First => Err(disabled(
                "answer the quiz/drawing and group event questions first",
            )),
            Slot::Second if self.is_participating() => {
                Err(disabled("quiz or drawing takes the second slot"))
            },
            Slot::Second => match self.group_event {
                None => Err(disabled("answer the group event question first")),
                Some(GroupEventChoice::Event(_)) => {
                    Err(disabled("a group event takes the second slot"))
                },
                Some(GroupEventChoice::Declined) if self.slots.first.is_none() => {
                    Err(disabled("choose the first individual event first"))
                },
                Some(GroupEventChoice::Declined) => Ok(()),
            },
        }
    }
}

/// Plans the effect of `action` on a group 2 or group 3 selection.
///
/// # Errors
///
/// Rejects the devotional singing flag, a group event answer while quiz or
/// drawing is not declined, and individual events for a slot that is not
/// enabled yet.
pub fn transition(
    selection: &Group2Or3Selection,
    action: SelectionAction,
) -> Result<SelectionUpdate, SelectionError> {
    match action {
        SelectionAction::SetQuizOrDrawing(answer) => {
            let mut update = SelectionUpdate::new(FieldChange::QuizOrDrawing(answer));
            if answer.is_participating() {
                if selection.group_event != Some(GroupEventChoice::Declined) {
                    update.reset(FieldChange::GroupEvent(Some(GroupEventChoice::Declined)));
                }
                selection.slots.clear_second(&mut update);
            } else if selection.is_participating() && selection.group_event.is_some() {
                // The declined group event was implied by quiz/drawing; ask again.
                update.reset(FieldChange::GroupEvent(None));
            }
            Ok(update)
        },
        SelectionAction::SetGroupEvent(choice) => {
            if selection.quiz_or_drawing != Some(QuizOrDrawing::Declined) {
                return Err(SelectionError::Disabled {
                    field: "groupEvent",
                    reason: "decline quiz and drawing first",
                });
            }
            let mut update = SelectionUpdate::new(FieldChange::GroupEvent(Some(choice)));
            if choice.event().is_some() {
                selection.slots.clear_second(&mut update);
            }
            Ok(update)
        },
        SelectionAction::SetIndividual { slot, event } => {
            IndividualSlots::check_offered(event, selection.group)?;
            selection.check_slot_enabled(slot)?;
            selection.slots.plan_set(slot, event)
        },
        SelectionAction::ClearIndividual { slot } => Ok(selection.slots.plan_clear(slot)),
        SelectionAction::SetDevotionalSinging(_) => Err(SelectionError::NotOfferedToGroup {
            field: "devotionalSinging",
            group: selection.group,
        }),
    }
}
