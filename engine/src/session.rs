//! Registration session: the event section of one registrant's wizard.
//!
//! The reducer owns the selection and the registrant context. Field
//! interactions are applied synchronously; a submission runs the conflict
//! resolver as an effect and feeds its outcome back as an action.

use crate::eligibility::{EventSelection, SelectionAction, is_section_complete};
use crate::registration::Registration;
use crate::resolver::ConflictResolver;
use crate::types::RegistrantContext;
use registration_core::{SmallVec, async_effect, effect::Effect, reducer::Reducer, smallvec};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Where the session's submission stands.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "camelCase")]
pub enum SubmissionStatus {
    /// Still editing
    #[default]
    Draft,
    /// Resolver running
    Submitting,
    /// Written to the sink
    Recorded(Registration),
    /// Resolver or sink failed; the registrant may submit again
    Failed(String),
}

/// State of one registrant session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationSession {
    /// Who is registering
    pub context: RegistrantContext,
    /// Event choices
    pub selection: EventSelection,
    /// Completeness predicate, re-evaluated after every interaction
    pub section_complete: bool,
    /// Why the last interaction was refused
    pub last_rejection: Option<String>,
    /// Submission progress
    pub submission: SubmissionStatus,
}

impl RegistrationSession {
    /// Creates a session with an empty selection for the registrant's group
    #[must_use]
    pub fn new(context: RegistrantContext) -> Self {
        let selection = EventSelection::new(context.group);
        Self {
            context,
            selection,
            section_complete: false,
            last_rejection: None,
            submission: SubmissionStatus::Draft,
        }
    }

    /// The recorded registration, once submitted
    #[must_use]
    pub const fn registration(&self) -> Option<&Registration> {
        match &self.submission {
            SubmissionStatus::Recorded(registration) => Some(registration),
            _ => None,
        }
    }

    fn refresh_completeness(&mut self) {
        self.section_complete = is_section_complete(&self.selection, self.context.group);
    }
}

/// Actions of a registration session
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistrationAction {
    // Commands
    /// Replace the registrant context (earlier wizard pages)
    UpdateContext(RegistrantContext),
    /// Apply one event-section interaction
    Select(SelectionAction),
    /// Submit the registration
    Submit,

    // Events
    /// The resolver recorded the registration
    SubmissionRecorded(Registration),
    /// The resolver failed
    SubmissionFailed(String),
}

/// Environment dependencies for the session reducer
#[derive(Clone, Debug)]
pub struct RegistrationEnvironment {
    /// Conflict resolver run on submission
    pub resolver: Arc<ConflictResolver>,
}

impl RegistrationEnvironment {
    /// Creates a new `RegistrationEnvironment`
    #[must_use]
    pub const fn new(resolver: Arc<ConflictResolver>) -> Self {
        Self { resolver }
    }
}

/// Reducer for a registration session
#[derive(Clone, Debug, Default)]
pub struct RegistrationReducer;

impl RegistrationReducer {
    /// Creates a new `RegistrationReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn validate_editable(session: &RegistrationSession) -> Result<(), String> {
        match session.submission {
            SubmissionStatus::Draft | SubmissionStatus::Failed(_) => Ok(()),
            SubmissionStatus::Submitting | SubmissionStatus::Recorded(_) => {
                Err("the registration is frozen after submission".to_string())
            }
        }
    }

    fn validate_submit(session: &RegistrationSession) -> Result<(), String> {
        match session.submission {
            SubmissionStatus::Submitting => {
                return Err("a submission is already in flight".to_string());
            }
            SubmissionStatus::Recorded(_) => {
                return Err("the registration has already been recorded".to_string());
            }
            SubmissionStatus::Draft | SubmissionStatus::Failed(_) => {}
        }
        if !session.section_complete {
            return Err("the event section is incomplete".to_string());
        }
        Ok(())
    }
}

impl Reducer for RegistrationReducer {
    type State = RegistrationSession;
    type Action = RegistrationAction;
    type Environment = RegistrationEnvironment;

    fn reduce(
        &self,
        session: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            RegistrationAction::UpdateContext(mut context) => {
                if let Err(reason) = Self::validate_editable(session) {
                    tracing::debug!(%reason, "Context update refused");
                    session.last_rejection = Some(reason);
                    return SmallVec::new();
                }

                context.drop_stale_exam_answer();
                if context.group != session.context.group {
                    tracing::debug!(
                        from = %session.context.group,
                        to = %context.group,
                        "Group changed, starting a new selection"
                    );
                    session.selection = EventSelection::new(context.group);
                }
                session.context = context;
                session.last_rejection = None;
                session.refresh_completeness();
                SmallVec::new()
            }

            RegistrationAction::Select(selection_action) => {
                if let Err(reason) = Self::validate_editable(session) {
                    tracing::debug!(%reason, "Selection change refused");
                    session.last_rejection = Some(reason);
                    return SmallVec::new();
                }

                match session.selection.apply(selection_action) {
                    Ok(update) => {
                        for reset in update.resets() {
                            tracing::debug!(?reset, "Cleared dependent field");
                        }
                        session.last_rejection = None;
                    }
                    Err(error) => {
                        tracing::debug!(%error, "Selection change refused");
                        session.last_rejection = Some(error.to_string());
                    }
                }
                session.refresh_completeness();
                SmallVec::new()
            }

            RegistrationAction::Submit => {
                if let Err(reason) = Self::validate_submit(session) {
                    tracing::debug!(%reason, "Submit refused");
                    session.last_rejection = Some(reason);
                    return SmallVec::new();
                }

                session.submission = SubmissionStatus::Submitting;
                session.last_rejection = None;

                let resolver = Arc::clone(&env.resolver);
                let context = session.context.clone();
                let selection = session.selection.clone();
                smallvec![async_effect! {
                    match resolver.submit(&context, &selection).await {
                        Ok(registration) => Some(RegistrationAction::SubmissionRecorded(registration)),
                        Err(error) => Some(RegistrationAction::SubmissionFailed(error.to_string())),
                    }
                }]
            }

            // ========== Events ==========
            RegistrationAction::SubmissionRecorded(registration) => {
                session.submission = SubmissionStatus::Recorded(registration);
                SmallVec::new()
            }

            RegistrationAction::SubmissionFailed(error) => {
                tracing::warn!(%error, "Submission failed");
                session.submission = SubmissionStatus::Failed(error);
                SmallVec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::store::InMemoryRegistrationStore;
    use crate::canonical::CanonicalEventId;
    use crate::resolver::DerivedEventIds;
    use crate::types::{Gender, Group, IndividualEvent, QuizOrDrawing, Slot, YesNo};
    use registration_core::environment::Clock;
    use registration_testing::{ReducerTest, assertions, test_clock};

    fn test_env() -> RegistrationEnvironment {
        let store = Arc::new(InMemoryRegistrationStore::new());
        let resolver = ConflictResolver::new(
            store.clone(),
            store,
            Arc::new(test_clock()),
            Config::default(),
        );
        RegistrationEnvironment::new(Arc::new(resolver))
    }

    fn group1_session() -> RegistrationSession {
        RegistrationSession::new(RegistrantContext::new(Group::One, Gender::Male, "Madurai"))
    }

    #[test]
    fn select_updates_completeness() {
        ReducerTest::new(RegistrationReducer::new())
            .with_env(test_env())
            .given_state(group1_session())
            .when_action(RegistrationAction::Select(
                SelectionAction::SetDevotionalSinging(YesNo::Yes),
            ))
            .then_state(|session| {
                assert!(session.section_complete);
                assert_eq!(session.last_rejection, None);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn refused_selection_is_recorded() {
        ReducerTest::new(RegistrationReducer::new())
            .with_env(test_env())
            .given_state(group1_session())
            .when_action(RegistrationAction::Select(SelectionAction::SetIndividual {
                slot: Slot::First,
                event: IndividualEvent::Slokas,
            }))
            .then_state(|session| {
                assert_eq!(session.selection.individual(Slot::First), None);
                assert!(session.last_rejection.is_some());
                assert!(!session.section_complete);
            })
            .run();
    }

    #[test]
    fn incomplete_submit_is_refused() {
        ReducerTest::new(RegistrationReducer::new())
            .with_env(test_env())
            .given_state(group1_session())
            .when_action(RegistrationAction::Submit)
            .then_state(|session| {
                assert_eq!(session.submission, SubmissionStatus::Draft);
                assert_eq!(
                    session.last_rejection.as_deref(),
                    Some("the event section is incomplete")
                );
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn complete_submit_runs_resolver() {
        ReducerTest::new(RegistrationReducer::new())
            .with_env(test_env())
            .given_state(group1_session())
            .when_actions([
                RegistrationAction::Select(SelectionAction::SetDevotionalSinging(YesNo::Yes)),
                RegistrationAction::Submit,
            ])
            .then_state(|session| {
                assert_eq!(session.submission, SubmissionStatus::Submitting);
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn second_submit_while_in_flight_is_refused() {
        ReducerTest::new(RegistrationReducer::new())
            .with_env(test_env())
            .given_state(group1_session())
            .when_actions([
                RegistrationAction::Select(SelectionAction::SetDevotionalSinging(YesNo::Yes)),
                RegistrationAction::Submit,
                RegistrationAction::Submit,
            ])
            .then_state(|session| {
                assert_eq!(session.submission, SubmissionStatus::Submitting);
                assert!(session.last_rejection.is_some());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn group_change_resets_selection() {
        ReducerTest::new(RegistrationReducer::new())
            .with_env(test_env())
            .given_state(group1_session())
            .when_actions([
                RegistrationAction::Select(SelectionAction::SetDevotionalSinging(YesNo::Yes)),
                RegistrationAction::UpdateContext(RegistrantContext::new(
                    Group::Four,
                    Gender::Male,
                    "Madurai",
                )),
            ])
            .then_state(|session| {
                assert_eq!(session.selection, EventSelection::new(Group::Four));
                assert!(!session.section_complete);
            })
            .run();
    }

    #[test]
    fn same_group_context_update_keeps_selection() {
        ReducerTest::new(RegistrationReducer::new())
            .with_env(test_env())
            .given_state(group1_session())
            .when_actions([
                RegistrationAction::Select(SelectionAction::SetDevotionalSinging(YesNo::Yes)),
                RegistrationAction::UpdateContext(RegistrantContext::new(
                    Group::One,
                    Gender::Male,
                    "Salem",
                )),
            ])
            .then_state(|session| {
                assert_eq!(session.selection.devotional_singing(), Some(YesNo::Yes));
                assert!(session.section_complete);
                assert_eq!(session.context.district.as_str(), "Salem");
            })
            .run();
    }

    fn recorded_for(context: &RegistrantContext) -> Registration {
        Registration::accepted(
            context,
            DerivedEventIds {
                group_event: Some(CanonicalEventId::new("devotional-singing")),
                ..DerivedEventIds::default()
            },
            test_clock().now(),
        )
    }

    #[test]
    fn context_frozen_after_recording() {
        let context = RegistrantContext::new(Group::One, Gender::Male, "Madurai");
        let registration = recorded_for(&context);

        ReducerTest::new(RegistrationReducer::new())
            .with_env(test_env())
            .given_state(group1_session())
            .when_actions([
                RegistrationAction::Select(SelectionAction::SetDevotionalSinging(YesNo::Yes)),
                RegistrationAction::Submit,
                RegistrationAction::SubmissionRecorded(registration.clone()),
                RegistrationAction::UpdateContext(RegistrantContext::new(
                    Group::Four,
                    Gender::Male,
                    "Salem",
                )),
            ])
            .then_state(move |session| {
                assert_eq!(session.context, context);
                assert_eq!(session.selection.group(), Group::One);
                assert_eq!(session.selection.devotional_singing(), Some(YesNo::Yes));
                assert_eq!(session.registration(), Some(&registration));
                assert_eq!(
                    session.last_rejection.as_deref(),
                    Some("the registration is frozen after submission")
                );
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn context_frozen_while_submitting() {
        ReducerTest::new(RegistrationReducer::new())
            .with_env(test_env())
            .given_state(group1_session())
            .when_actions([
                RegistrationAction::Select(SelectionAction::SetDevotionalSinging(YesNo::Yes)),
                RegistrationAction::Submit,
                RegistrationAction::UpdateContext(RegistrantContext::new(
                    Group::One,
                    Gender::Male,
                    "Salem",
                )),
            ])
            .then_state(|session| {
                assert_eq!(session.context.district.as_str(), "Madurai");
                assert!(session.last_rejection.is_some());
            })
            .run();
    }

    #[test]
    fn leaving_group_three_drops_exam_answer() {
        let group3 = RegistrantContext::new(Group::Three, Gender::Female, "Erode")
            .with_group2_exam(YesNo::Yes);
        let moved = RegistrantContext {
            group: Group::Two,
            ..group3.clone()
        };

        ReducerTest::new(RegistrationReducer::new())
            .with_env(test_env())
            .given_state(RegistrationSession::new(group3))
            .when_actions([
                RegistrationAction::UpdateContext(moved),
                RegistrationAction::Select(SelectionAction::SetQuizOrDrawing(QuizOrDrawing::Quiz)),
            ])
            .then_state(|session| {
                assert_eq!(session.context.group, Group::Two);
                assert_eq!(session.context.has_given_group2_exam, None);
                assert!(!session.context.passed_group2_exam());
                assert!(session.section_complete);
            })
            .run();
    }

    #[test]
    fn failure_allows_resubmission() {
        ReducerTest::new(RegistrationReducer::new())
            .with_env(test_env())
            .given_state(group1_session())
            .when_actions([
                RegistrationAction::Select(SelectionAction::SetDevotionalSinging(YesNo::Yes)),
                RegistrationAction::Submit,
                RegistrationAction::SubmissionFailed("aggregate query failed: offline".into()),
                RegistrationAction::Submit,
            ])
            .then_state(|session| {
                assert_eq!(session.submission, SubmissionStatus::Submitting);
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }
}
