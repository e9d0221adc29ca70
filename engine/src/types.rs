//! Shared domain types: registrant context and the event catalogues.
//!
//! Every catalogue value has a stable wire tag (the string the document store
//! holds). Tags round-trip through `Display`/`FromStr` and serde.

use crate::error::UnknownTag;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declares a closed catalogue of tagged values.
macro_rules! catalogue {
    (
        $(#[$meta:meta])*
        $name:ident: $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $tag:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $tag)] $variant ),+
        }

        impl $name {
            /// Every value of the catalogue, in declaration order
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire tag of this value
            #[must_use]
            pub const fn tag(self) -> &'static str {
                match self {
                    $(Self::$variant => $tag),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.tag())
            }
        }

        impl FromStr for $name {
            type Err = UnknownTag;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($tag => Ok(Self::$variant),)+
                    other => Err(UnknownTag::new($kind, other)),
                }
            }
        }
    };
}

catalogue! {
    /// Competitive cohort of a registrant; decides which event rules apply.
    Group: "group" {
        /// Group 1
        One => "1",
        /// Group 2
        Two => "2",
        /// Group 3 (individual events need the group 2 exam)
        Three => "3",
        /// Group 4 (quiz only)
        Four => "4",
    }
}

catalogue! {
    /// Registrant gender, used for the canonical id suffix.
    Gender: "gender" {
        /// Male
        Male => "Male",
        /// Female
        Female => "Female",
    }
}

catalogue! {
    /// Answer to a yes/no question of the wizard.
    YesNo: "yes/no answer" {
        /// yes
        Yes => "yes",
        /// no
        No => "no",
    }
}

catalogue! {
    /// Single-registrant performance events (capacity 1 per district and group).
    IndividualEvent: "individual event" {
        /// Bhajans (exclusive with tamizh chants)
        Bhajans => "bhajans",
        /// Slokas
        Slokas => "slokas",
        /// Vedam chanting
        VedamChanting => "vedam-chanting",
        /// Story telling in English
        StoryTellingEnglish => "story-telling-english",
        /// Story telling in Tamizh
        StoryTellingTamizh => "story-telling-tamizh",
        /// Drawing
        Drawing => "drawing",
        /// Tamizh chants (exclusive with bhajans)
        TamizhChants => "tamizh-chants",
        /// Elocution in English
        ElocutionEnglish => "elocution-english",
        /// Elocution in Tamizh
        ElocutionTamizh => "elocution-tamizh",
    }
}

catalogue! {
    /// Collective events with a numeric per-district capacity.
    GroupEvent: "group event" {
        /// Altar decoration
        AltarDecoration => "altar-decoration",
        /// Rudram namakam chanting
        RudramNamakamChanting => "rudram-namakam-chanting",
        /// Devotional singing (group 1 answers it as a yes/no flag)
        DevotionalSinging => "devotional-singing",
    }
}

catalogue! {
    /// Answer to the quiz/drawing question (groups 2 to 4).
    QuizOrDrawing: "quiz/drawing choice" {
        /// Quiz
        Quiz => "quiz",
        /// Drawing (groups 2 and 3 only)
        Drawing => "drawing",
        /// Not participating
        Declined => "none",
    }
}

impl IndividualEvent {
    /// The event that may not be held alongside this one.
    #[must_use]
    pub const fn exclusive_partner(self) -> Option<Self> {
        match self {
            Self::Bhajans => Some(Self::TamizhChants),
            Self::TamizhChants => Some(Self::Bhajans),
            _ => None,
        }
    }

    /// Whether `group` may pick this event. Elocution starts at group 2.
    #[must_use]
    pub const fn is_offered_to(self, group: Group) -> bool {
        match group {
            Group::One => !self.is_elocution(),
            Group::Two | Group::Three => true,
            Group::Four => false,
        }
    }

    /// Elocution events never carry a gender suffix.
    #[must_use]
    pub const fn is_elocution(self) -> bool {
        matches!(self, Self::ElocutionEnglish | Self::ElocutionTamizh)
    }
}

impl QuizOrDrawing {
    /// Whether this answer takes part in quiz or drawing.
    #[must_use]
    pub const fn is_participating(self) -> bool {
        matches!(self, Self::Quiz | Self::Drawing)
    }
}

impl Gender {
    /// Word appended to canonical ids of suffixed events.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Male => "Boys",
            Self::Female => "Girls",
        }
    }
}

/// Answer to the group-event question of groups 2 and 3.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GroupEventChoice {
    /// Not participating in a group event
    Declined,
    /// Participating in the given group event
    Event(GroupEvent),
}

impl GroupEventChoice {
    /// The chosen event, if any.
    #[must_use]
    pub const fn event(self) -> Option<GroupEvent> {
        match self {
            Self::Declined => None,
            Self::Event(event) => Some(event),
        }
    }
}

impl fmt::Display for GroupEventChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Declined => f.write_str("none"),
            Self::Event(event) => event.fmt(f),
        }
    }
}

impl FromStr for GroupEventChoice {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "none" {
            return Ok(Self::Declined);
        }
        s.parse()
            .map(Self::Event)
            .map_err(|_| UnknownTag::new("group event choice", s))
    }
}

impl TryFrom<String> for GroupEventChoice {
    type Error = UnknownTag;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GroupEventChoice> for String {
    fn from(choice: GroupEventChoice) -> Self {
        choice.to_string()
    }
}

/// One of the two individual-event slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    /// `individualChoice1`
    First,
    /// `individualChoice2`
    Second,
}

impl Slot {
    /// The other slot.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }

    /// Name of the form field backing this slot.
    #[must_use]
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::First => "individualChoice1",
            Self::Second => "individualChoice2",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// Districts offered by the registration wizard.
pub const KNOWN_DISTRICTS: &[&str] = &[
    "Coimbatore",
    "Dharmapuri / Krishnagiri",
    "Dindigul",
    "Erode",
    "Kanchipuram North",
    "Kanchipuram South",
    "Kanyakumari",
    "Karur",
    "Madurai",
    "Namakkal",
    "Nilgiris",
    "Salem",
    "Sivaganga&Ramnad",
    "Thanjavur",
    "Theni",
    "Trichy",
    "Tirunelveli",
    "Tirupur",
    "Tiruvannamalai",
    "Tuticorin",
    "Vellore",
    "Villupuram",
    "Virudhunagar",
    "Chennai East Coast",
    "Chennai North",
    "Chennai North West",
    "Chennai South",
    "Chennai South East",
    "Chennai West",
    "Cuddalore",
    "Nagapattinam",
    "Puducherry",
    "Tiruvallur East",
    "Tiruvallur West",
    "Mayiladuthurai",
];

/// District key; aggregation scope for claims and capacities.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct District(String);

impl District {
    /// Creates a district key
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the key as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the wizard offers this district.
    #[must_use]
    pub fn is_known(&self) -> bool {
        KNOWN_DISTRICTS.contains(&self.0.as_str())
    }
}

impl fmt::Display for District {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who is registering; fixed for the duration of one computation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrantContext {
    /// Competitive cohort
    pub group: Group,
    /// Gender, for canonical id suffixes
    pub gender: Gender,
    /// District key
    pub district: District,
    /// Group 3 only: whether the group 2 exam was taken
    pub has_given_group2_exam: Option<YesNo>,
}

impl RegistrantContext {
    /// Creates a context without an exam answer
    #[must_use]
    pub fn new(group: Group, gender: Gender, district: impl Into<String>) -> Self {
        Self {
            group,
            gender,
            district: District::new(district),
            has_given_group2_exam: None,
        }
    }

    /// Records the group 2 exam answer
    #[must_use]
    pub const fn with_group2_exam(mut self, answer: YesNo) -> Self {
        self.has_given_group2_exam = Some(answer);
        self
    }

    /// Only an explicit "yes" counts as having taken the exam.
    #[must_use]
    pub fn passed_group2_exam(&self) -> bool {
        self.has_given_group2_exam == Some(YesNo::Yes)
    }

    /// The exam answer only exists for group 3 and is dropped otherwise.
    pub fn drop_stale_exam_answer(&mut self) {
        if self.group != Group::Three {
            self.has_given_group2_exam = None;
        }
    }
}
