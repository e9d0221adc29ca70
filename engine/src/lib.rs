//! Event-selection eligibility and submission conflict checking for the
//! registration wizard.
//!
//! - [`eligibility`]: per-group state machine over the four event fields,
//!   with compensating resets and the completeness predicate
//! - [`resolver`]: canonical id derivation, aggregate lookup and the advisory
//!   conflict verdict attached to each registration
//! - [`session`]: reducer tying both together for one registrant, run by the
//!   runtime `Store`
//! - [`store`]: in-memory document store implementing the collaborator traits
//!
//! # Quick Start
//!
//! ```no_run
//! use registration_engine::config::Config;
//! use registration_engine::eligibility::SelectionAction;
//! use registration_engine::resolver::ConflictResolver;
//! use registration_engine::session::{
//!     RegistrationAction, RegistrationEnvironment, RegistrationReducer, RegistrationSession,
//! };
//! use registration_engine::store::InMemoryRegistrationStore;
//! use registration_engine::types::{Gender, Group, RegistrantContext, YesNo};
//! use registration_core::environment::SystemClock;
//! use registration_runtime::Store;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let documents = Arc::new(InMemoryRegistrationStore::new());
//! let resolver = ConflictResolver::new(
//!     documents.clone(),
//!     documents,
//!     Arc::new(SystemClock),
//!     Config::from_env(),
//! );
//! let env = RegistrationEnvironment::new(Arc::new(resolver));
//!
//! let context = RegistrantContext::new(Group::One, Gender::Female, "Madurai");
//! let store = Store::new(RegistrationSession::new(context), RegistrationReducer::new(), env);
//!
//! store
//!     .send(RegistrationAction::Select(SelectionAction::SetDevotionalSinging(YesNo::Yes)))
//!     .await?;
//! store.send(RegistrationAction::Submit).await?;
//!
//! let verdict = store
//!     .state(|session| session.registration().map(|r| r.verdict.clone()))
//!     .await;
//! println!("{verdict:?}");
//! # Ok(())
//! # }
//! ```

pub mod canonical;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod registration;
pub mod resolver;
pub mod session;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use canonical::CanonicalEventId;
pub use config::{CapacityTable, Config};
pub use eligibility::{EventSelection, SelectionAction, SelectionUpdate, is_section_complete};
pub use error::{RegistrationError, SelectionError};
pub use registration::{Registration, RegistrationId};
pub use resolver::{AggregateQuery, ConflictResolver, ConflictVerdict, RegistrationSink};
pub use session::{
    RegistrationAction, RegistrationEnvironment, RegistrationReducer, RegistrationSession,
};
pub use types::{Gender, Group, RegistrantContext};
