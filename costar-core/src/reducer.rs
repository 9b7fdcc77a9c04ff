use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use tokio::sync::broadcast;

use crate::model::{Candidate, PickerId};
use crate::render::RenderedPath;
use crate::state::{AppState, Focus};
use crate::submission::{ErrorKind, SubmissionPhase};

#[derive(Clone, Debug)]
pub enum AppEvent {
    /// Query text changed; a new search generation starts
    QueryChanged {
        picker: PickerId,
        query: String,
    },
    SearchResults {
        picker: PickerId,
        generation: u64,
        candidates: Vec<Candidate>,
    },
    RowSelected {
        picker: PickerId,
        index: usize,
    },
    SubmissionStarted,
    RequestStarted,
    PathReady {
        path: RenderedPath,
    },
    SubmissionFailed {
        kind: ErrorKind,
        message: String,
    },
    SubmissionFinished,
    /// The results panel has been brought into view
    ResultsScrolled,
}

#[derive(Clone, Debug)]
pub struct EventEnvelope {
    pub id: u64,
    pub at: SystemTime,
    pub event: AppEvent,
}

/// Stamps events with increasing ids and publishes them
#[derive(Clone, Debug)]
pub struct EventEmitter {
    tx: broadcast::Sender<EventEnvelope>,
    next_id: Arc<AtomicU64>,
}

impl EventEmitter {
    pub fn new(tx: broadcast::Sender<EventEnvelope>) -> Self {
        Self {
            tx,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.tx.subscribe()
    }

    pub fn envelope(&self, event: AppEvent) -> EventEnvelope {
        EventEnvelope {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            at: SystemTime::now(),
            event,
        }
    }

    pub fn emit(&self, event: AppEvent) {
        // No receivers just means nobody is drawing
        let _ = self.tx.send(self.envelope(event));
    }
}

pub fn reduce(state: &mut AppState, env: &EventEnvelope) {
    state.last_event_id = env.id;

    match &env.event {
        AppEvent::QueryChanged { picker, query } => {
            let p = state.picker_mut(*picker);
            p.query = query.clone();
            p.issued_generation += 1;
            if query.trim().is_empty() {
                // Nothing will be requested; drop whatever is still in flight
                p.table.clear();
                p.cursor = 0;
                p.applied_generation = p.issued_generation;
            }
        }
        AppEvent::SearchResults {
            picker,
            generation,
            candidates,
        } => {
            let p = state.picker_mut(*picker);
            if *generation <= p.applied_generation {
                tracing::debug!(
                    picker = %picker,
                    generation,
                    applied = p.applied_generation,
                    "discarding stale search results"
                );
                return;
            }
            p.applied_generation = *generation;
            p.table.render(candidates);
            p.cursor = 0;
        }
        AppEvent::RowSelected { picker, index } => {
            let AppState {
                pickers,
                selections,
                ..
            } = state;
            let p = &mut pickers[picker.index()];
            if let Some(id) = p.table.select(*index, *picker, selections) {
                tracing::info!(picker = %picker, id = %id, "actor selected");
            }
        }
        AppEvent::SubmissionStarted => {
            state.phase = SubmissionPhase::Validating;
        }
        AppEvent::RequestStarted => {
            state.phase = SubmissionPhase::Requesting;
            state.panel.loading = true;
            state.panel.results_visible = false;
        }
        AppEvent::PathReady { path } => {
            state.phase = SubmissionPhase::Succeeded;
            state.panel.loading = false;
            state.panel.path = path.clone();
            state.panel.scroll = 0;
            state.panel.results_visible = true;
            state.panel.error_visible = false;
            state.panel.scroll_pending = true;
        }
        AppEvent::SubmissionFailed { kind, message } => {
            state.phase = SubmissionPhase::Failed;
            state.panel.loading = false;
            state.panel.error = Some((*kind, message.clone()));
            state.panel.error_visible = true;
            state.panel.results_visible = false;
        }
        AppEvent::SubmissionFinished => {
            state.phase = SubmissionPhase::Idle;
        }
        AppEvent::ResultsScrolled => {
            state.panel.scroll_pending = false;
            state.panel.scroll = 0;
            state.focus = Focus::Results;
        }
    }
}

/// Clear a loading indicator whose outcome was dropped by a lagging receiver.
///
/// Returns whether anything changed.
pub fn settle_after_lag(state: &mut AppState, in_flight: bool) -> bool {
    if in_flight || !state.panel.loading {
        return false;
    }
    state.panel.loading = false;
    state.phase = SubmissionPhase::Idle;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(id: u64, event: AppEvent) -> EventEnvelope {
        EventEnvelope {
            id,
            at: SystemTime::now(),
            event,
        }
    }

    fn candidate(id: &str, name: &str) -> Candidate {
        Candidate {
            id: id.into(),
            full_name: name.into(),
            birth_year: None,
        }
    }

    #[test]
    fn test_stale_search_results_are_discarded() {
        let mut state = AppState::new();
        let picker = PickerId::First;

        reduce(&mut state, &env(1, AppEvent::QueryChanged { picker, query: "ke".into() }));
        reduce(&mut state, &env(2, AppEvent::QueryChanged { picker, query: "kea".into() }));
        assert_eq!(state.picker(picker).issued_generation, 2);

        reduce(
            &mut state,
            &env(3, AppEvent::SearchResults {
                picker,
                generation: 2,
                candidates: vec![candidate("nm001", "keanu reeves")],
            }),
        );
        reduce(
            &mut state,
            &env(4, AppEvent::SearchResults {
                picker,
                generation: 1,
                candidates: vec![candidate("nm009", "kevin bacon")],
            }),
        );

        let table = &state.picker(picker).table;
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].id, "nm001");
        assert_eq!(state.last_event_id, 4);
    }

    #[test]
    fn test_blank_query_clears_table_and_pending_results() {
        let mut state = AppState::new();
        let picker = PickerId::Second;

        reduce(&mut state, &env(1, AppEvent::QueryChanged { picker, query: "tom".into() }));
        reduce(
            &mut state,
            &env(2, AppEvent::SearchResults {
                picker,
                generation: 1,
                candidates: vec![candidate("129", "tom cruise")],
            }),
        );
        reduce(&mut state, &env(3, AppEvent::QueryChanged { picker, query: "tomx".into() }));
        reduce(&mut state, &env(4, AppEvent::QueryChanged { picker, query: "  ".into() }));
        assert!(state.picker(picker).table.is_empty());

        // Late response for "tomx" must not repopulate the table
        reduce(
            &mut state,
            &env(5, AppEvent::SearchResults {
                picker,
                generation: 2,
                candidates: vec![candidate("130", "tomx")],
            }),
        );
        assert!(state.picker(picker).table.is_empty());
    }

    #[test]
    fn test_row_selected_updates_only_its_picker() {
        let mut state = AppState::new();
        reduce(&mut state, &env(1, AppEvent::QueryChanged {
            picker: PickerId::First,
            query: "keanu".into(),
        }));
        reduce(
            &mut state,
            &env(2, AppEvent::SearchResults {
                picker: PickerId::First,
                generation: 1,
                candidates: vec![candidate("nm001", "keanu reeves")],
            }),
        );
        reduce(&mut state, &env(3, AppEvent::RowSelected {
            picker: PickerId::First,
            index: 0,
        }));

        assert_eq!(state.selections.get(PickerId::First), Some("nm001"));
        assert_eq!(state.selections.get(PickerId::Second), None);
        assert_eq!(state.picker(PickerId::First).table.active(), Some(0));
        assert_eq!(state.picker(PickerId::Second).table.active(), None);
    }

    #[test]
    fn test_success_then_failure_toggles_panels() {
        let mut state = AppState::new();
        reduce(&mut state, &env(1, AppEvent::SubmissionStarted));
        reduce(&mut state, &env(2, AppEvent::RequestStarted));
        assert!(state.panel.loading);
        assert_eq!(state.phase, SubmissionPhase::Requesting);

        reduce(
            &mut state,
            &env(3, AppEvent::PathReady {
                path: RenderedPath {
                    header: "Shortest path length: 1".into(),
                    lines: vec!["A acted in B with C".into()],
                },
            }),
        );
        reduce(&mut state, &env(4, AppEvent::SubmissionFinished));
        assert!(!state.panel.loading);
        assert!(state.panel.results_visible);
        assert!(!state.panel.error_visible);
        assert!(state.panel.scroll_pending);
        assert_eq!(state.phase, SubmissionPhase::Idle);

        reduce(&mut state, &env(5, AppEvent::ResultsScrolled));
        assert!(!state.panel.scroll_pending);
        assert_eq!(state.focus, Focus::Results);

        reduce(&mut state, &env(6, AppEvent::SubmissionStarted));
        reduce(&mut state, &env(7, AppEvent::RequestStarted));
        assert!(state.panel.loading);
        assert!(!state.panel.results_visible);

        reduce(
            &mut state,
            &env(8, AppEvent::SubmissionFailed {
                kind: ErrorKind::SameActor,
                message: "same".into(),
            }),
        );
        assert!(!state.panel.loading);
        assert!(!state.panel.results_visible);
        assert!(state.panel.error_visible);
        assert_eq!(state.panel.error, Some((ErrorKind::SameActor, "same".into())));
    }

    #[test]
    fn test_lag_clears_orphaned_spinner() {
        let mut state = AppState::new();
        reduce(&mut state, &env(1, AppEvent::SubmissionStarted));
        reduce(&mut state, &env(2, AppEvent::RequestStarted));

        // Still running: the outcome event has not been sent yet
        assert!(!settle_after_lag(&mut state, true));
        assert!(state.panel.loading);

        assert!(settle_after_lag(&mut state, false));
        assert!(!state.panel.loading);
        assert_eq!(state.phase, SubmissionPhase::Idle);
        assert!(!settle_after_lag(&mut state, false));
    }

    #[test]
    fn test_emitter_ids_increase() {
        let (tx, _) = broadcast::channel(8);
        let emitter = EventEmitter::new(tx);
        let mut rx = emitter.subscribe();
        emitter.emit(AppEvent::SubmissionStarted);
        emitter.emit(AppEvent::SubmissionFinished);
        let a = rx.try_recv().unwrap();
        let b = rx.try_recv().unwrap();
        assert!(b.id > a.id);
    }
}
