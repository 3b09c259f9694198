//! Event loop wiring the engine to a search backend and a renderer.

use crate::engine::Completion;
use crate::engine::FilterEngine;
use crate::engine::PendingQuery;
use crate::engine::QueryOutcome;
use crate::search::CatalogSearch;
use crate::state::FilterPatch;
use crate::view::CatalogRenderer;
use futures::FutureExt;
use futures::StreamExt;
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::debug;

type InFlight = FuturesUnordered<BoxFuture<'static, QueryOutcome>>;

/// Drives `engine` until `patches` closes, then settles pending text, waits
/// for every in-flight query and hands the engine back.
///
/// Queries run concurrently; their outcomes go through
/// [`FilterEngine::complete`], which drops the stale ones.
pub async fn run_engine<R>(
    mut engine: FilterEngine,
    search: Arc<dyn CatalogSearch>,
    mut patches: mpsc::Receiver<FilterPatch>,
    mut renderer: R,
) -> FilterEngine
where
    R: CatalogRenderer,
{
    engine.load_baseline(search.as_ref()).await;

    let mut in_flight = InFlight::new();
    dispatch(&mut in_flight, &search, engine.refresh());
    renderer.render(engine.view());

    loop {
        let deadline = engine.debounce_deadline().map(Instant::from_std);
        tokio::select! {
            patch = patches.recv() => {
                let Some(patch) = patch else {
                    break;
                };
                if let Some(query) = engine.apply_patch(&patch, now()) {
                    dispatch(&mut in_flight, &search, query);
                    renderer.render(engine.view());
                }
            }
            Some(outcome) = in_flight.next(), if !in_flight.is_empty() => {
                if engine.complete(outcome) == Completion::Applied {
                    renderer.render(engine.view());
                }
            }
            () = sleep_until(deadline), if deadline.is_some() => {
                if let Some(query) = engine.poll_debounce(now()) {
                    dispatch(&mut in_flight, &search, query);
                    renderer.render(engine.view());
                }
            }
        }
    }

    debug!(in_flight = in_flight.len(), "patch channel closed, draining");
    if let Some(query) = engine.flush_debounce() {
        dispatch(&mut in_flight, &search, query);
        renderer.render(engine.view());
    }
    while let Some(outcome) = in_flight.next().await {
        if engine.complete(outcome) == Completion::Applied {
            renderer.render(engine.view());
        }
    }
    engine
}

fn dispatch(in_flight: &mut InFlight, search: &Arc<dyn CatalogSearch>, query: PendingQuery) {
    let search = Arc::clone(search);
    in_flight.push(async move { query.execute(search.as_ref()).await }.boxed());
}

fn now() -> std::time::Instant {
    Instant::now().into_std()
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
