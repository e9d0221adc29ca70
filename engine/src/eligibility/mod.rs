//! Event-selection eligibility state machine.
//!
//! The selection is a tagged union with one variant per group family. Each
//! variant has a pure transition function that turns a [`SelectionAction`]
//! into a [`SelectionUpdate`]: the requested field change followed by the
//! compensating resets that keep the selection legal. The update is computed
//! against the current state first and written only when the action is
//! accepted, so a rejected action never leaves a partial change behind.
//!
//! # Example
//!
//! ```
//! use registration_engine::eligibility::{EventSelection, SelectionAction};
//! use registration_engine::types::{Group, IndividualEvent, Slot, YesNo};
//!
//! let mut selection = EventSelection::new(Group::One);
//! assert!(!selection.is_complete());
//!
//! selection.apply(SelectionAction::SetDevotionalSinging(YesNo::No)).unwrap();
//! selection
//!     .apply(SelectionAction::SetIndividual {
//!         slot: Slot::First,
//!         event: IndividualEvent::Slokas,
//!     })
//!     .unwrap();
//! assert!(selection.is_complete());
//! ```

pub mod group1;
pub mod group2_or_3;
pub mod group4;

pub use group1::Group1Selection;
pub use group2_or_3::Group2Or3Selection;
pub use group4::Group4Selection;

use crate::error::{InvariantViolation, SelectionError};
use crate::types::{
    Group, GroupEventChoice, IndividualEvent, QuizOrDrawing, Slot, YesNo,
};
use serde::{Deserialize, Serialize};

/// One field interaction of the event section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum SelectionAction {
    /// Group 1: answer the devotional singing question
    SetDevotionalSinging(YesNo),
    /// Groups 2 to 4: answer the quiz/drawing question
    SetQuizOrDrawing(QuizOrDrawing),
    /// Groups 2 and 3: answer the group event question
    SetGroupEvent(GroupEventChoice),
    /// Choose an individual event for a slot
    SetIndividual {
        /// Target slot
        slot: Slot,
        /// Chosen event
        event: IndividualEvent,
    },
    /// Empty an individual slot
    ClearIndividual {
        /// Target slot
        slot: Slot,
    },
}

/// A single field write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum FieldChange {
    /// Group 1 devotional singing flag
    DevotionalSinging(YesNo),
    /// Quiz/drawing answer
    QuizOrDrawing(QuizOrDrawing),
    /// Group event answer; `None` means unanswered
    GroupEvent(Option<GroupEventChoice>),
    /// Individual slot; `None` empties it
    Individual {
        /// Slot written
        slot: Slot,
        /// New content
        event: Option<IndividualEvent>,
    },
}

/// The requested change plus its compensating resets, in write order.
///
/// This is the shallow-merge patch a form container applies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionUpdate {
    requested: FieldChange,
    resets: Vec<FieldChange>,
}

impl SelectionUpdate {
    pub(crate) const fn new(requested: FieldChange) -> Self {
        Self {
            requested,
            resets: Vec::new(),
        }
    }

    pub(crate) fn reset(&mut self, change: FieldChange) {
        self.resets.push(change);
    }

    /// The change the action asked for
    #[must_use]
    pub const fn requested(&self) -> &FieldChange {
        &self.requested
    }

    /// Changes made on the registrant's behalf to keep the selection legal
    #[must_use]
    pub fn resets(&self) -> &[FieldChange] {
        &self.resets
    }

    /// Every change, requested first
    pub fn changes(&self) -> impl Iterator<Item = &FieldChange> {
        std::iter::once(&self.requested).chain(&self.resets)
    }
}

/// The two individual-event slots shared by groups 1 to 3.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualSlots {
    first: Option<IndividualEvent>,
    second: Option<IndividualEvent>,
}

impl IndividualSlots {
    /// Content of a slot
    #[must_use]
    pub const fn get(&self, slot: Slot) -> Option<IndividualEvent> {
        match slot {
            Slot::First => self.first,
            Slot::Second => self.second,
        }
    }

    fn set(&mut self, slot: Slot, event: Option<IndividualEvent>) {
        match slot {
            Slot::First => self.first = event,
            Slot::Second => self.second = event,
        }
    }

    /// Refuses an event the group's catalogue does not list.
    fn check_offered(event: IndividualEvent, group: Group) -> Result<(), SelectionError> {
        if event.is_offered_to(group) {
            Ok(())
        } else {
            Err(SelectionError::InvalidAnswer {
                value: event.tag(),
                group,
            })
        }
    }

    /// Plans putting `event` into `slot`.
    ///
    /// Clears the other slot when it holds the exclusive partner of `event`.
    /// If that empties the first slot, `event` moves up into it.
    fn plan_set(
        &self,
        slot: Slot,
        event: IndividualEvent,
    ) -> Result<SelectionUpdate, SelectionError> {
        let other = slot.other();
        let held = self.get(other);
        if held == Some(event) {
            return Err(SelectionError::AlreadySelected { event, slot: other });
        }

        let mut update = SelectionUpdate::new(FieldChange::Individual {
            slot,
            event: Some(event),
        });
        if held.is_some() && held == event.exclusive_partner() {
            match slot {
                Slot::First => update.reset(FieldChange::Individual {
                    slot: Slot::Second,
                    event: None,
                }),
                Slot::Second => Self::move_up(&mut update, event),
            }
        }
        Ok(update)
    }

    /// Plans emptying `slot`; a filled second slot moves up into the first.
    fn plan_clear(&self, slot: Slot) -> SelectionUpdate {
        let mut update = SelectionUpdate::new(FieldChange::Individual { slot, event: None });
        if let (Slot::First, Some(second)) = (slot, self.second) {
            Self::move_up(&mut update, second);
        }
        update
    }

    fn move_up(update: &mut SelectionUpdate, event: IndividualEvent) {
        update.reset(FieldChange::Individual {
            slot: Slot::First,
            event: Some(event),
        });
        update.reset(FieldChange::Individual {
            slot: Slot::Second,
            event: None,
        });
    }

    fn clear_second(&self, update: &mut SelectionUpdate) {
        if self.second.is_some() {
            update.reset(FieldChange::Individual {
                slot: Slot::Second,
                event: None,
            });
        }
    }

    /// Verifies the slot-independent invariants.
    fn check(&self) -> Result<(), InvariantViolation> {
        if let (None, Some(second)) = (self.first, self.second) {
            return Err(InvariantViolation::SecondSlotWithoutFirst(second));
        }
        if let (Some(first), Some(second)) = (self.first, self.second) {
            if first == second {
                return Err(InvariantViolation::DuplicateEvent(first));
            }
            if first.exclusive_partner() == Some(second) {
                return Err(InvariantViolation::ExclusivePairOccupied { first, second });
            }
        }
        Ok(())
    }
}

/// The registrant's event choices, shaped by their group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EventSelection {
    /// Group 1
    Group1(Group1Selection),
    /// Group 2 or 3
    Group2Or3(Group2Or3Selection),
    /// Group 4
    Group4(Group4Selection),
}

impl EventSelection {
    /// The empty selection for a group
    #[must_use]
    pub const fn new(group: Group) -> Self {
        match group {
            Group::One => Self::Group1(Group1Selection::new()),
            Group::Two | Group::Three => Self::Group2Or3(Group2Or3Selection::new(group)),
            Group::Four => Self::Group4(Group4Selection::new()),
        }
    }

    /// Group the selection was created for
    #[must_use]
    pub const fn group(&self) -> Group {
        match self {
            Self::Group1(_) => Group::One,
            Self::Group2Or3(selection) => selection.group(),
            Self::Group4(_) => Group::Four,
        }
    }

    /// Applies one field interaction.
    ///
    /// On success the returned update has already been written. On rejection
    /// the selection is unchanged.
    ///
    /// # Errors
    ///
    /// Returns a [`SelectionError`] when the field is not offered to the
    /// group, the answer is not allowed, the field is not enabled yet, or the
    /// event already occupies the other slot.
    pub fn apply(&mut self, action: SelectionAction) -> Result<SelectionUpdate, SelectionError> {
        let update = match self {
            Self::Group1(selection) => group1::transition(selection, action)?,
            Self::Group2Or3(selection) => group2_or_3::transition(selection, action)?,
            Self::Group4(selection) => group4::transition(selection, action)?,
        };

        for change in update.changes() {
            match self {
                Self::Group1(selection) => selection.write(*change),
                Self::Group2Or3(selection) => selection.write(*change),
                Self::Group4(selection) => selection.write(*change),
            }
        }
        Ok(update)
    }

    /// Whether the registrant may leave the event section.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        match self {
            Self::Group1(selection) => selection.is_complete(),
            Self::Group2Or3(selection) => selection.is_complete(),
            Self::Group4(selection) => selection.is_complete(),
        }
    }

    /// Re-verifies the exclusion and slot-budget invariants.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found. The transition rules
    /// make every violation unreachable through [`EventSelection::apply`].
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        match self {
            Self::Group1(selection) => selection.check_invariants(),
            Self::Group2Or3(selection) => selection.check_invariants(),
            Self::Group4(_) => Ok(()),
        }
    }

    /// Group 1 devotional singing flag
    #[must_use]
    pub const fn devotional_singing(&self) -> Option<YesNo> {
        match self {
            Self::Group1(selection) => selection.devotional_singing(),
            _ => None,
        }
    }

    /// Quiz/drawing answer
    #[must_use]
    pub const fn quiz_or_drawing(&self) -> Option<QuizOrDrawing> {
        match self {
            Self::Group1(_) => None,
            Self::Group2Or3(selection) => selection.quiz_or_drawing(),
            Self::Group4(selection) => selection.quiz(),
        }
    }

    /// Group event answer (groups 2 and 3)
    #[must_use]
    pub const fn group_event(&self) -> Option<GroupEventChoice> {
        match self {
            Self::Group2Or3(selection) => selection.group_event(),
            _ => None,
        }
    }

    /// Content of an individual slot
    #[must_use]
    pub const fn individual(&self, slot: Slot) -> Option<IndividualEvent> {
        match self {
            Self::Group1(selection) => selection.slots().get(slot),
            Self::Group2Or3(selection) => selection.slots().get(slot),
            Self::Group4(_) => None,
        }
    }
}

/// Completeness predicate used to gate leaving the event section.
///
/// A selection made for another group is never complete.
#[must_use]
pub fn is_section_complete(selection: &EventSelection, group: Group) -> bool {
    selection.group() == group && selection.is_complete()
}
