//! Demo of the registration engine.
//!
//! Seeds an in-memory document store with accepted registrations, then drives
//! two registrant sessions through the runtime `Store`: one with a clean
//! selection and one that collides with an existing claim and a full group
//! event.

use registration_core::environment::{Clock, SystemClock};
use registration_engine::canonical::CanonicalEventId;
use registration_engine::config::Config;
use registration_engine::eligibility::SelectionAction;
use registration_engine::resolver::{ConflictResolver, DerivedEventIds};
use registration_engine::session::{
    RegistrationAction, RegistrationEnvironment, RegistrationReducer, RegistrationSession,
};
use registration_engine::store::InMemoryRegistrationStore;
use registration_engine::types::{
    Gender, Group, GroupEvent, GroupEventChoice, IndividualEvent, QuizOrDrawing,
    RegistrantContext, Slot,
};
use registration_engine::Registration;
use registration_runtime::Store;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type SessionStore =
    Store<RegistrationSession, RegistrationAction, RegistrationEnvironment, RegistrationReducer>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present
    dotenvy::dotenv().ok();

    let config = Config::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("registration_engine={}", config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        capacities = ?config.capacities,
        enforce_known_districts = config.enforce_known_districts,
        "Configuration loaded"
    );

    println!("=== Registration Engine Demo ===\n");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let documents = Arc::new(InMemoryRegistrationStore::new());
    seed(&documents, clock.as_ref()).await;
    println!("Seeded {} accepted registrations", documents.len().await);

    let resolver = Arc::new(ConflictResolver::new(
        documents.clone(),
        documents.clone(),
        clock,
        config,
    ));
    let env = RegistrationEnvironment::new(resolver);

    // Group 2 boy in Salem: quiz plus one individual event, nothing taken yet
    let clean = Store::new(
        RegistrationSession::new(RegistrantContext::new(Group::Two, Gender::Male, "Salem")),
        RegistrationReducer::new(),
        env.clone(),
    );
    run_session(
        "Group 2, Salem",
        &clean,
        &[
            SelectionAction::SetQuizOrDrawing(QuizOrDrawing::Quiz),
            SelectionAction::SetIndividual {
                slot: Slot::First,
                event: IndividualEvent::Drawing,
            },
        ],
    )
    .await?;

    // Group 2 boy in Chennai South: slokas is taken, altar decoration is full
    let conflicting = Store::new(
        RegistrationSession::new(RegistrantContext::new(
            Group::Two,
            Gender::Male,
            "Chennai South",
        )),
        RegistrationReducer::new(),
        env,
    );
    run_session(
        "Group 2, Chennai South",
        &conflicting,
        &[
            SelectionAction::SetQuizOrDrawing(QuizOrDrawing::Declined),
            SelectionAction::SetGroupEvent(GroupEventChoice::Event(GroupEvent::AltarDecoration)),
            SelectionAction::SetIndividual {
                slot: Slot::First,
                event: IndividualEvent::Slokas,
            },
        ],
    )
    .await?;

    println!("\nRegistrations stored: {}", documents.len().await);
    println!("\n=== Demo Complete ===");
    Ok(())
}

async fn run_session(
    label: &str,
    store: &SessionStore,
    actions: &[SelectionAction],
) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n--- {label} ---");
    for action in actions {
        store.send(RegistrationAction::Select(*action)).await?;
        if let Some(reason) = store.state(|s| s.last_rejection.clone()).await {
            println!("  refused {action:?}: {reason}");
        }
    }

    let complete = store.state(|s| s.section_complete).await;
    println!("  section complete: {complete}");

    store.send(RegistrationAction::Submit).await?;
    let session = store.state(std::clone::Clone::clone).await;
    match session.registration() {
        Some(registration) => {
            println!("  recorded {}", registration.id);
            println!("  verdict: {}", serde_json::to_string(&registration.verdict)?);
        }
        None => println!("  not recorded: {:?}", session.submission),
    }
    Ok(())
}

/// Accepted registrations the demo sessions are checked against.
async fn seed(documents: &InMemoryRegistrationStore, clock: &dyn Clock) {
    let chennai_boy = RegistrantContext::new(Group::Two, Gender::Male, "Chennai South");
    documents
        .seed(Registration::accepted(
            &chennai_boy,
            DerivedEventIds {
                individual_choice1: Some(CanonicalEventId::new("slokas - Boys")),
                ..DerivedEventIds::default()
            },
            clock.now(),
        ))
        .await;

    for (group, gender) in [
        (Group::Two, Gender::Female),
        (Group::Two, Gender::Male),
        (Group::Three, Gender::Male),
        (Group::Three, Gender::Female),
    ] {
        documents
            .seed(Registration::accepted(
                &RegistrantContext::new(group, gender, "Chennai South"),
                DerivedEventIds {
                    group_event: Some(CanonicalEventId::new("altar-decoration")),
                    ..DerivedEventIds::default()
                },
                clock.now(),
            ))
            .await;
    }
}
