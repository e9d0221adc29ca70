//! Group 4: a single quiz answer, no individual or group events.

use super::{FieldChange, SelectionAction, SelectionUpdate};
use crate::error::SelectionError;
use crate::types::{Group, QuizOrDrawing};
use serde::{Deserialize, Serialize};

/// Event section state of a group 4 registrant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group4Selection {
    quiz: Option<QuizOrDrawing>,
}

impl Group4Selection {
    /// The empty selection
    #[must_use]
    pub const fn new() -> Self {
        Self { quiz: None }
    }

    /// Quiz answer: `Quiz`, `Declined`, or `None` while unanswered
    #[must_use]
    pub const fn quiz(&self) -> Option<QuizOrDrawing> {
        self.quiz
    }

    /// Complete once the quiz question is answered.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.quiz.is_some()
    }

    pub(super) fn write(&mut self, change: FieldChange) {
        if let FieldChange::QuizOrDrawing(answer) = change {
            self.quiz = Some(answer);
        }
    }
}

/// Plans the effect of `action` on a group 4 selection.
///
/// # Errors
///
/// Only the quiz question exists, and drawing is not a valid answer.
pub fn transition(
    _selection: &Group4Selection,
    action: SelectionAction,
) -> Result<SelectionUpdate, SelectionError> {
    let field = match action {
        SelectionAction::SetQuizOrDrawing(QuizOrDrawing::Drawing) => {
            return Err(SelectionError::InvalidAnswer {
                value: QuizOrDrawing::Drawing.tag(),
                group: Group::Four,
            });
        },
        SelectionAction::SetQuizOrDrawing(answer) => {
            return Ok(SelectionUpdate::new(FieldChange::QuizOrDrawing(answer)));
        },
        SelectionAction::SetDevotionalSinging(_) => "devotionalSinging",
        SelectionAction::SetGroupEvent(_) => "groupEvent",
        SelectionAction::SetIndividual { slot, .. } | SelectionAction::ClearIndividual { slot } => {
            slot.field_name()
        },
    };
    Err(SelectionError::NotOfferedToGroup {
        field,
        group: Group::Four,
    })
}
