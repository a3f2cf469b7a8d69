//! Property-based tests for the session state machine
//!
//! Drives random but causally-plausible event sequences (every effect is
//! resolved inline with an arbitrary completion, the way the runtime does)
//! and checks the aggregate invariants after every step.

use super::state::*;
use super::transition::*;
use super::*;
use crate::leaflet::LeafletText;
use crate::llm::Role;
use crate::registry::ProductRecord;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_record() -> impl Strategy<Value = ProductRecord> {
    ("[0-9]{5}", "[A-Z ]{3,20}").prop_map(|(id, name)| ProductRecord {
        name,
        registration_id: id,
        lab_holder: "Lab".to_string(),
    })
}

#[derive(Debug, Clone)]
enum Action {
    /// Search plus its completion.
    Search {
        query: String,
        results: Vec<ProductRecord>,
    },
    /// Select the result at `index % len`, resolving the fetch with
    /// `leaflet_text` (None = leaflet unavailable).
    Select {
        index: usize,
        leaflet_text: Option<String>,
    },
    /// Send a chat message, resolving the turn with success or failure.
    Chat { text: String, succeeds: bool },
    Clear,
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        (
            "[a-z]{1,10}",
            proptest::collection::vec(arb_record(), 0..5)
        )
            .prop_map(|(query, results)| Action::Search { query, results }),
        (0usize..8, proptest::option::of("[a-z ]{1,30}"))
            .prop_map(|(index, leaflet_text)| Action::Select {
                index,
                leaflet_text
            }),
        ("[a-z ]{1,20}", any::<bool>())
            .prop_map(|(text, succeeds)| Action::Chat { text, succeeds }),
        Just(Action::Clear),
    ]
}

// ============================================================================
// Driver
// ============================================================================

/// Apply one event, executing transition effects the way the runtime does.
fn step(session: Session, event: SessionEvent) -> (Session, Vec<Effect>) {
    match transition(&session, event) {
        Ok(result) => (result.session, result.effects),
        // Rejected events must leave the session untouched.
        Err(_) => (session, vec![]),
    }
}

fn apply(session: Session, action: &Action) -> Session {
    match action {
        Action::Search { query, results } => {
            let (session, _) = step(
                session,
                SessionEvent::SearchSubmitted {
                    query: query.clone(),
                },
            );
            let (session, _) = step(
                session,
                SessionEvent::SearchCompleted {
                    results: results.clone(),
                },
            );
            session
        }
        Action::Select {
            index,
            leaflet_text,
        } => {
            if session.results().is_empty() {
                return session;
            }
            let id = session.results()[index % session.results().len()]
                .registration_id
                .clone();
            let (session, effects) = step(
                session,
                SessionEvent::ProductSelected {
                    registration_id: id.clone(),
                },
            );
            if effects
                .iter()
                .any(|e| matches!(e, Effect::FetchLeaflet { .. }))
            {
                let leaflet = leaflet_text.as_ref().map(|text| LeafletText {
                    registration_id: id.clone(),
                    text: text.clone(),
                });
                let (session, _) = step(
                    session,
                    SessionEvent::LeafletLoaded {
                        registration_id: id,
                        leaflet,
                    },
                );
                session
            } else {
                session
            }
        }
        Action::Chat { text, succeeds } => {
            let (session, effects) =
                step(session, SessionEvent::ChatSubmitted { text: text.clone() });
            if effects.iter().any(|e| matches!(e, Effect::RequestTurn)) {
                let completion = if *succeeds {
                    SessionEvent::TurnCompleted {
                        text: "respuesta".to_string(),
                    }
                } else {
                    SessionEvent::TurnFailed {
                        message: "error".to_string(),
                    }
                };
                let (session, _) = step(session, completion);
                session
            } else {
                session
            }
        }
        Action::Clear => step(session, SessionEvent::ChatCleared).0,
    }
}

fn assert_invariants(session: &Session) {
    // Grounding: a transcript can only exist under a loaded leaflet.
    if !session.transcript().is_empty() {
        assert!(session.leaflet().is_some());
    }

    // A loaded leaflet always belongs to the current selection pointer.
    if let Some(leaflet) = session.leaflet() {
        assert_eq!(
            session.selected_registration_id(),
            Some(leaflet.registration_id.as_str())
        );
    }

    // Turns commit a user message before any assistant message.
    let users = session
        .transcript()
        .iter()
        .filter(|m| m.role == Role::User)
        .count();
    let assistants = session
        .transcript()
        .iter()
        .filter(|m| m.role == Role::Assistant)
        .count();
    assert!(assistants <= users);
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_invariants_hold_across_event_sequences(
        actions in proptest::collection::vec(arb_action(), 0..40)
    ) {
        let mut session = Session::new();
        for action in &actions {
            session = apply(session, action);
            assert_invariants(&session);
        }
    }

    #[test]
    fn prop_search_clears_all_residual_state(
        prefix in proptest::collection::vec(arb_action(), 0..20),
        query in "[a-z]{1,10}",
        results in proptest::collection::vec(arb_record(), 0..5),
    ) {
        let mut session = Session::new();
        for action in &prefix {
            session = apply(session, action);
        }

        let (session, _) = step(session, SessionEvent::SearchSubmitted { query });
        prop_assert!(session.results().is_empty());
        prop_assert!(session.selected_registration_id().is_none());
        prop_assert!(session.leaflet().is_none());
        prop_assert!(session.transcript().is_empty());

        let (session, _) = step(session, SessionEvent::SearchCompleted { results: results.clone() });
        prop_assert_eq!(session.results(), results.as_slice());
        prop_assert!(session.transcript().is_empty());
    }

    #[test]
    fn prop_repeat_selection_never_fetches(
        prefix in proptest::collection::vec(arb_action(), 0..20),
    ) {
        let mut session = Session::new();
        for action in &prefix {
            session = apply(session, action);
        }

        if let Some(id) = session.selected_registration_id().map(String::from) {
            let result = transition(
                &session,
                SessionEvent::ProductSelected { registration_id: id },
            ).unwrap();
            prop_assert!(result.effects.is_empty());
        }
    }
}
