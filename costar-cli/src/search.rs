use std::sync::Arc;

use costar_core::backend::PathBackend;
use costar_core::model::{Candidate, PickerId};
use costar_core::reducer::{AppEvent, EventEmitter};

/// Actor-prefix lookups that never fail: errors degrade to no results
#[derive(Clone)]
pub struct SearchClient {
    backend: Arc<dyn PathBackend>,
}

impl SearchClient {
    pub fn new(backend: Arc<dyn PathBackend>) -> Self {
        Self { backend }
    }

    pub async fn search(&self, prefix: &str) -> Vec<Candidate> {
        match self.backend.search_actors(prefix).await {
            Ok(rows) => {
                tracing::debug!(prefix, rows = rows.len(), "actor search");
                rows
            }
            Err(e) => {
                tracing::warn!(prefix, error = %e, "actor search failed");
                Vec::new()
            }
        }
    }

    /// Search in the background and publish the rows tagged with `generation`
    pub fn spawn_search(
        &self,
        picker: PickerId,
        generation: u64,
        prefix: String,
        events: EventEmitter,
    ) -> tokio::task::JoinHandle<()> {
        let client = self.clone();
        tokio::spawn(async move {
            let candidates = client.search(&prefix).await;
            events.emit(AppEvent::SearchResults {
                picker,
                generation,
                candidates,
            });
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use async_trait::async_trait;
    use costar_core::backend::BackendError;
    use costar_core::model::PathStep;
    use costar_core::reducer::reduce;
    use costar_core::state::AppState;
    use tokio::sync::broadcast;

    /// Answers after a delay proportional to the prefix length, so a short
    /// prefix typed first can resolve after a longer one typed later.
    struct SlowBackend;

    #[async_trait]
    impl PathBackend for SlowBackend {
        async fn search_actors(&self, prefix: &str) -> Result<Vec<Candidate>, BackendError> {
            if prefix == "err" {
                return Err(BackendError::Status {
                    status: 500,
                    body: "boom".into(),
                });
            }
            let delay = if prefix.len() < 4 { 500 } else { 10 };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(vec![Candidate {
                id: prefix.len().to_string(),
                full_name: prefix.to_string(),
                birth_year: None,
            }])
        }

        async fn shortest_path(&self, _: &str, _: &str) -> Result<Vec<PathStep>, BackendError> {
            Ok(Vec::new())
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    #[tokio::test]
    async fn test_search_failure_is_empty() {
        let client = SearchClient::new(Arc::new(SlowBackend));
        assert!(client.search("err").await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_response_does_not_overwrite_newer() {
        let (tx, mut rx) = broadcast::channel(16);
        let events = EventEmitter::new(tx);
        let client = SearchClient::new(Arc::new(SlowBackend));
        let mut state = AppState::new();
        let picker = PickerId::First;

        let mut handles = Vec::new();
        for query in ["kea", "keanu"] {
            reduce(
                &mut state,
                &events.envelope(AppEvent::QueryChanged {
                    picker,
                    query: query.into(),
                }),
            );
            let generation = state.picker(picker).issued_generation;
            handles.push(client.spawn_search(picker, generation, query.into(), events.clone()));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        while let Ok(env) = rx.try_recv() {
            reduce(&mut state, &env);
        }

        let table = &state.picker(picker).table;
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].display_name, "Keanu");
    }
}
