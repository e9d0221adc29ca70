//! Error types for the eligibility state machine and the conflict resolver.
//!
//! Only aggregate fetch failures (and sink I/O failures) stop a submission.
//! A detected conflict is not an error: it is recorded in the verdict.

use crate::types::{District, Group, IndividualEvent, Slot};
use thiserror::Error;

/// Result type alias for submission operations.
pub type Result<T> = std::result::Result<T, RegistrationError>;

/// A wire tag that is not part of its catalogue.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {kind} tag: {tag:?}")]
pub struct UnknownTag {
    /// Catalogue the tag was parsed for
    pub kind: &'static str,
    /// The offending tag
    pub tag: String,
}

impl UnknownTag {
    /// Creates a new `UnknownTag`
    #[must_use]
    pub fn new(kind: &'static str, tag: &str) -> Self {
        Self {
            kind,
            tag: tag.to_string(),
        }
    }
}

/// Why a field change was refused.
///
/// A refused change leaves the selection untouched. These describe interactions
/// the wizard never offers; they are not an error state of the selection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// The question does not exist for this group.
    #[error("{field} is not offered to group {group}")]
    NotOfferedToGroup {
        /// Field the change targeted
        field: &'static str,
        /// Group of the selection
        group: Group,
    },

    /// The value is not an allowed answer for this group.
    #[error("{value} is not a valid answer for group {group}")]
    InvalidAnswer {
        /// Rejected answer tag
        value: &'static str,
        /// Group of the selection
        group: Group,
    },

    /// The field is not enabled in the current state.
    #[error("{field} is not enabled: {reason}")]
    Disabled {
        /// Field the change targeted
        field: &'static str,
        /// What blocks it
        reason: &'static str,
    },

    /// The event already occupies the other slot.
    #[error("{event} is already selected in {slot}")]
    AlreadySelected {
        /// Requested event
        event: IndividualEvent,
        /// Slot that holds it
        slot: Slot,
    },
}

/// A selection state that the transition rules should have made unreachable.
///
/// Seeing one of these is a defect in the state machine, not a user condition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Bhajans and tamizh chants are held together.
    #[error("mutually exclusive events {first} and {second} are both selected")]
    ExclusivePairOccupied {
        /// Event in the first slot
        first: IndividualEvent,
        /// Event in the second slot
        second: IndividualEvent,
    },

    /// The second slot is filled while the first is empty.
    #[error("second individual slot holds {0} while the first is empty")]
    SecondSlotWithoutFirst(IndividualEvent),

    /// The same event is held in both slots.
    #[error("{0} occupies both individual slots")]
    DuplicateEvent(IndividualEvent),

    /// The second slot is filled although a group-level event consumes it.
    #[error("second individual slot is filled while {0} consumes the extra slot")]
    SlotBudgetExceeded(&'static str),

    /// Quiz or drawing is chosen together with a group event.
    #[error("quiz/drawing is chosen together with a group event")]
    GroupEventWithQuizOrDrawing,
}

/// Failure reported by the aggregate query service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("aggregate query failed: {0}")]
pub struct QueryError(pub String);

/// Failure reported by the registration sink.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("registration sink failed: {0}")]
pub struct SinkError(pub String);

/// Errors that stop a submission.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// Aggregates could not be fetched; never treated as "no conflicts".
    #[error(transparent)]
    AggregateFetch(#[from] QueryError),

    /// The finalized record could not be handed to the sink.
    #[error(transparent)]
    Sink(#[from] SinkError),

    /// District is not one the wizard offers.
    #[error("unknown district: {0}")]
    UnknownDistrict(District),

    /// Selection belongs to a different group than the registrant.
    #[error("selection was made for group {selection} but registrant is in group {registrant}")]
    GroupMismatch {
        /// Group of the selection
        selection: Group,
        /// Group of the registrant
        registrant: Group,
    },

    /// The frozen selection breaks an invariant.
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}
