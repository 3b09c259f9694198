//! Single owner of the filter state and the rendered view.
//!
//! The engine is synchronous apart from [`FilterEngine::load_baseline`]: state
//! changes hand back a [`PendingQuery`] that the caller executes wherever it
//! likes, then feeds the [`QueryOutcome`] back through
//! [`FilterEngine::complete`]. Outcomes of superseded queries are dropped
//! there, so completion order does not matter.

use crate::compiler::QueryParams;
use crate::compiler::baseline_query;
use crate::compiler::compile_query;
use crate::config::FilterConfig;
use crate::debounce::Debouncer;
use crate::debounce::Trigger;
use crate::debounce::classify_change;
use crate::error::ConfigError;
use crate::error::SearchError;
use crate::generation::Generation;
use crate::generation::GenerationCounter;
use crate::refine::RefinePlan;
use crate::search::CatalogSearch;
use crate::state::FilterPatch;
use crate::state::FilterState;
use crate::view::CatalogView;
use lessoncraft_catalog_protocol::Card;
use std::time::Instant;
use tracing::debug;
use tracing::info;
use tracing::warn;

/// A compiled query waiting to be sent.
#[derive(Debug)]
pub struct PendingQuery {
    pub generation: Generation,
    pub params: QueryParams,
    pub plan: RefinePlan,
}

impl PendingQuery {
    /// Runs the remote search and refines whatever comes back.
    pub async fn execute<S>(self, search: &S) -> QueryOutcome
    where
        S: CatalogSearch + ?Sized,
    {
        let result = search
            .search(&self.params)
            .await
            .map(|cards| self.plan.apply(cards));
        QueryOutcome {
            generation: self.generation,
            result,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome {
    pub generation: Generation,
    pub result: Result<Vec<Card>, SearchError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer query was issued after this one; the outcome was dropped.
    Stale,
}

pub struct FilterEngine {
    state: FilterState,
    revision: u64,
    /// Free text as of the last settled debounce. Queries use this, not `state.text`.
    settled_text: String,
    debouncer: Debouncer,
    generations: GenerationCounter,
    view: CatalogView,
}

impl FilterEngine {
    pub fn new(config: FilterConfig) -> Result<Self, ConfigError> {
        Self::with_state(config, FilterState::default())
    }

    pub fn with_state(config: FilterConfig, state: FilterState) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            debouncer: Debouncer::new(config.debounce()),
            settled_text: state.text.clone(),
            state,
            revision: 0,
            generations: GenerationCounter::default(),
            view: CatalogView::default(),
        })
    }

    pub fn current_state(&self) -> &FilterState {
        &self.state
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn view(&self) -> &CatalogView {
        &self.view
    }

    /// The state queries are compiled from: current selections, settled text.
    pub fn query_state(&self) -> FilterState {
        FilterState {
            text: self.settled_text.clone(),
            ..self.state.clone()
        }
    }

    pub fn debounce_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Applies a UI patch. Returns the query to run now, if any.
    ///
    /// Text edits only arm the debouncer; their query comes out of
    /// [`FilterEngine::poll_debounce`].
    pub fn apply_patch(&mut self, patch: &FilterPatch, now: Instant) -> Option<PendingQuery> {
        let next = self.state.apply_patch(patch);
        let trigger = classify_change(&self.state, &next);
        if trigger == Trigger::Unchanged {
            return None;
        }

        let text_changed = next.text != self.state.text;
        self.state = next;
        self.revision += 1;
        if text_changed {
            debug!(revision = self.revision, "text edit, rescheduling debounce");
            self.debouncer.touch(now);
        }

        match trigger {
            Trigger::Immediate => Some(self.issue()),
            Trigger::Debounced | Trigger::Unchanged => None,
        }
    }

    /// Restores every filter to its default and queries right away.
    pub fn reset_filters(&mut self) -> PendingQuery {
        self.debouncer.cancel();
        self.state = self.state.apply_patch(&FilterPatch::reset());
        self.settled_text.clone_from(&self.state.text);
        self.revision += 1;
        self.issue()
    }

    /// Settles the free text once the quiet interval has passed.
    pub fn poll_debounce(&mut self, now: Instant) -> Option<PendingQuery> {
        if !self.debouncer.fire_if_due(now) {
            return None;
        }
        self.settle_text()
    }

    /// Settles any pending text edit without waiting.
    pub fn flush_debounce(&mut self) -> Option<PendingQuery> {
        if !self.debouncer.is_pending() {
            return None;
        }
        self.debouncer.cancel();
        self.settle_text()
    }

    /// Re-issues the query for the current state.
    pub fn refresh(&mut self) -> PendingQuery {
        self.issue()
    }

    /// Applies an outcome unless a newer query has been issued since.
    pub fn complete(&mut self, outcome: QueryOutcome) -> Completion {
        if !self.generations.is_latest(outcome.generation) {
            debug!(
                generation = %outcome.generation,
                latest = ?self.generations.latest(),
                "dropping stale search response"
            );
            return Completion::Stale;
        }

        self.view.loading = false;
        match outcome.result {
            Ok(cards) => {
                debug!(generation = %outcome.generation, cards = cards.len(), "search applied");
                self.view.cards = cards;
                self.view.failure = None;
                self.view.generation = Some(outcome.generation);
            }
            Err(err) => {
                warn!(generation = %outcome.generation, "catalog search failed: {err}");
                self.view.failure = Some(err);
            }
        }
        Completion::Applied
    }

    /// Runs the unfiltered query once to learn the catalog size.
    pub async fn load_baseline<S>(&mut self, search: &S)
    where
        S: CatalogSearch + ?Sized,
    {
        match search.search(&baseline_query()).await {
            Ok(cards) => {
                info!(total = cards.len(), "catalog baseline loaded");
                self.view.total_all = cards.len();
            }
            Err(err) => {
                warn!("catalog baseline failed: {err}");
                self.view.total_all = 0;
            }
        }
    }

    fn settle_text(&mut self) -> Option<PendingQuery> {
        if self.settled_text == self.state.text {
            debug!("text settled back to its previous value");
            return None;
        }
        self.settled_text.clone_from(&self.state.text);
        Some(self.issue())
    }

    fn issue(&mut self) -> PendingQuery {
        let generation = self.generations.issue();
        let snapshot = self.query_state();
        let params = compile_query(&snapshot);
        let plan = RefinePlan::from_state(&snapshot);
        self.view.loading = true;
        info!(
            generation = %generation,
            revision = self.revision,
            query = %params,
            "issuing catalog search"
        );
        PendingQuery {
            generation,
            params,
            plan,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facet::FacetId;
    use crate::memory::MemoryCatalog;
    use lessoncraft_catalog_protocol::BloomLevel;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn engine() -> FilterEngine {
        FilterEngine::new(FilterConfig::default()).unwrap()
    }

    fn catalog() -> MemoryCatalog {
        let mut apply = Card::new(1, "Case study");
        apply.bloom_level = BloomLevel::Apply;
        let mut create = Card::new(2, "Poster");
        create.bloom_level = BloomLevel::Create;
        MemoryCatalog::new(vec![apply, create])
    }

    fn ids(view: &CatalogView) -> Vec<u64> {
        view.cards.iter().map(|card| card.id).collect()
    }

    #[test]
    fn rejects_invalid_config() {
        let config = FilterConfig {
            debounce_ms: 0,
            ..FilterConfig::default()
        };
        assert!(FilterEngine::new(config).is_err());
    }

    #[test]
    fn unchanged_patch_issues_nothing() {
        let mut engine = engine();
        assert!(engine.apply_patch(&FilterPatch::new(), Instant::now()).is_none());
        assert_eq!(engine.revision(), 0);
    }

    #[test]
    fn non_text_change_issues_immediately_with_settled_text() {
        let mut engine = engine();
        let start = Instant::now();
        assert!(engine
            .apply_patch(&FilterPatch::new().text("poster"), start)
            .is_none());
        let query = engine
            .apply_patch(
                &FilterPatch::new().select(FacetId::Bloom, ["create"]),
                start + Duration::from_millis(10),
            )
            .unwrap();
        assert_eq!(query.params.get("q"), None);
        assert_eq!(query.params.get("bloom_level"), Some("create"));
        assert_eq!(engine.current_state().text, "poster");

        // The text timer still fires afterwards.
        let settled = engine
            .poll_debounce(start + Duration::from_millis(350))
            .unwrap();
        assert_eq!(settled.params.get("q"), Some("poster"));
        assert_eq!(settled.params.get("bloom_level"), Some("create"));
    }

    #[test]
    fn text_reverted_before_settling_issues_nothing() {
        let mut engine = engine();
        let start = Instant::now();
        engine.apply_patch(&FilterPatch::new().text("p"), start);
        engine.apply_patch(&FilterPatch::new().text(""), start);
        assert!(engine.poll_debounce(start + Duration::from_secs(1)).is_none());
    }

    #[test]
    fn reset_cancels_pending_text_and_issues() {
        let mut engine = engine();
        let start = Instant::now();
        engine.apply_patch(&FilterPatch::new().text("quiz"), start);
        let query = engine.reset_filters();
        assert_eq!(query.params.get("q"), None);
        assert_eq!(engine.debounce_deadline(), None);
        assert_eq!(engine.current_state(), &FilterState::default().apply_patch(&FilterPatch::reset()));
    }

    #[test]
    fn older_response_never_overwrites_newer() {
        let mut engine = engine();
        let now = Instant::now();
        let a = engine
            .apply_patch(&FilterPatch::new().select(FacetId::Bloom, ["apply"]), now)
            .unwrap();
        let b = engine
            .apply_patch(&FilterPatch::new().select(FacetId::Bloom, ["create"]), now)
            .unwrap();

        let b_outcome = QueryOutcome {
            generation: b.generation,
            result: Ok(vec![Card::new(2, "Poster")]),
        };
        let a_outcome = QueryOutcome {
            generation: a.generation,
            result: Ok(vec![Card::new(1, "Case study")]),
        };
        assert_eq!(engine.complete(b_outcome), Completion::Applied);
        assert_eq!(engine.complete(a_outcome), Completion::Stale);
        assert_eq!(ids(engine.view()), vec![2]);
        assert_eq!(engine.view().generation, Some(b.generation));
        assert!(!engine.view().loading);
    }

    #[test]
    fn failure_keeps_last_good_cards() {
        let mut engine = engine();
        let first = engine.refresh();
        engine.complete(QueryOutcome {
            generation: first.generation,
            result: Ok(vec![Card::new(1, "Case study")]),
        });
        let second = engine.refresh();
        engine.complete(QueryOutcome {
            generation: second.generation,
            result: Err(SearchError::Unavailable("down".to_string())),
        });
        assert_eq!(ids(engine.view()), vec![1]);
        assert_eq!(
            engine.view().failure,
            Some(SearchError::Unavailable("down".to_string()))
        );
        assert_eq!(engine.current_state(), &FilterState::default());
    }

    #[tokio::test]
    async fn execute_refines_and_baseline_counts() {
        let catalog = catalog();
        let mut engine = engine();
        engine.load_baseline(&catalog).await;
        assert_eq!(engine.view().total_all, 2);

        let query = engine
            .apply_patch(
                &FilterPatch::new().select(FacetId::Bloom, ["create"]),
                Instant::now(),
            )
            .unwrap();
        let outcome = query.execute(&catalog).await;
        engine.complete(outcome);
        assert_eq!(ids(engine.view()), vec![2]);
        assert_eq!(engine.view().summary(), "selected 1 of 2");
    }

    struct Down;

    #[async_trait::async_trait]
    impl CatalogSearch for Down {
        async fn search(&self, _params: &QueryParams) -> Result<Vec<Card>, SearchError> {
            Err(SearchError::Transport("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn failed_baseline_leaves_total_at_zero() {
        let mut engine = engine();
        engine.load_baseline(&Down).await;
        assert_eq!(engine.view().total_all, 0);
        assert_eq!(engine.view().failure, None);
    }
}
