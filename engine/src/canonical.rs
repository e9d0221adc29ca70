//! Canonical event ids: the aggregation and comparison key of an event claim.
//!
//! Individual events of groups 2 and 3 are tracked per gender, so their ids
//! carry a `" - Boys"` / `" - Girls"` suffix. Elocution, promoted quiz/drawing
//! answers and group events are shared across genders and never suffixed, and
//! groups 1 and 4 never suffix anything.

use crate::types::{Gender, Group, GroupEvent, IndividualEvent, QuizOrDrawing};
use serde::{Deserialize, Serialize};
use std::fmt;

const SUFFIX_SEPARATOR: &str = " - ";

/// Event tag plus optional gender suffix.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalEventId(String);

impl CanonicalEventId {
    /// Wraps an id exactly as stored.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id of an individual event for a registrant of `group` and `gender`.
    #[must_use]
    pub fn for_individual(event: IndividualEvent, group: Group, gender: Gender) -> Self {
        let id = Self::new(event.tag());
        if suffixes_individual_events(group) && !event.is_elocution() {
            id.with_gender_suffix(gender)
        } else {
            id
        }
    }

    /// Id of a group event (shared by every group of a district).
    #[must_use]
    pub fn for_group_event(event: GroupEvent) -> Self {
        Self::new(event.tag())
    }

    /// Id of a quiz/drawing answer promoted into an individual slot.
    ///
    /// Returns `None` for a declined answer.
    #[must_use]
    pub fn for_quiz_or_drawing(answer: QuizOrDrawing) -> Option<Self> {
        answer.is_participating().then(|| Self::new(answer.tag()))
    }

    /// Appends the gender suffix unless the id already carries one.
    #[must_use]
    pub fn with_gender_suffix(self, gender: Gender) -> Self {
        if self.gender_suffix().is_some() {
            return self;
        }
        Self(format!("{}{SUFFIX_SEPARATOR}{}", self.0, gender.suffix()))
    }

    /// Gender encoded in the suffix, if any.
    #[must_use]
    pub fn gender_suffix(&self) -> Option<Gender> {
        let (_, suffix) = self.0.rsplit_once(SUFFIX_SEPARATOR)?;
        Gender::ALL.iter().copied().find(|gender| gender.suffix() == suffix)
    }

    /// The tag without any gender suffix.
    #[must_use]
    pub fn base_tag(&self) -> &str {
        match self.gender_suffix() {
            Some(gender) => self
                .0
                .strip_suffix(gender.suffix())
                .and_then(|rest| rest.strip_suffix(SUFFIX_SEPARATOR))
                .unwrap_or(&self.0),
            None => &self.0,
        }
    }

    /// Returns the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalEventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CanonicalEventId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

const fn suffixes_individual_events(group: Group) -> bool {
    matches!(group, Group::Two | Group::Three)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn individual_events_suffixed_in_groups_two_and_three() {
        assert_eq!(
            CanonicalEventId::for_individual(IndividualEvent::Slokas, Group::Two, Gender::Male)
                .as_str(),
            "slokas - Boys"
        );
        assert_eq!(
            CanonicalEventId::for_individual(IndividualEvent::Bhajans, Group::Three, Gender::Female)
                .as_str(),
            "bhajans - Girls"
        );
    }

    #[test]
    fn groups_one_and_four_never_suffix() {
        for group in [Group::One, Group::Four] {
            let id = CanonicalEventId::for_individual(IndividualEvent::Slokas, group, Gender::Male);
            assert_eq!(id.as_str(), "slokas");
        }
    }

    #[test]
    fn elocution_never_suffixed() {
        let id = CanonicalEventId::for_individual(
            IndividualEvent::ElocutionTamizh,
            Group::Two,
            Gender::Female,
        );
        assert_eq!(id.as_str(), "elocution-tamizh");
    }

    #[test]
    fn quiz_and_group_events_never_suffixed() {
        assert_eq!(
            CanonicalEventId::for_quiz_or_drawing(QuizOrDrawing::Drawing),
            Some(CanonicalEventId::new("drawing"))
        );
        assert_eq!(CanonicalEventId::for_quiz_or_drawing(QuizOrDrawing::Declined), None);
        assert_eq!(
            CanonicalEventId::for_group_event(GroupEvent::DevotionalSinging).as_str(),
            "devotional-singing"
        );
    }

    #[test]
    fn suffixing_is_idempotent() {
        let once = CanonicalEventId::new("vedam-chanting").with_gender_suffix(Gender::Male);
        let twice = once.clone().with_gender_suffix(Gender::Male);
        assert_eq!(once, twice);

        // An already canonical id keeps its own suffix.
        let girls = CanonicalEventId::new("slokas - Girls");
        assert_eq!(girls.clone().with_gender_suffix(Gender::Male), girls);
    }

    #[test]
    fn suffix_inspection() {
        let id = CanonicalEventId::new("story-telling-english - Girls");
        assert_eq!(id.gender_suffix(), Some(Gender::Female));
        assert_eq!(id.base_tag(), "story-telling-english");

        let plain = CanonicalEventId::new("quiz");
        assert_eq!(plain.gender_suffix(), None);
        assert_eq!(plain.base_tag(), "quiz");
    }
}
