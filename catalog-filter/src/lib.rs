/*!
# Catalog Filter

Faceted filtering of the technique-card catalog:

- **Facets**: every multi-select dimension, its tokens and where it is evaluated
- **Filter state**: immutable snapshots updated through patches
- **Query compiler**: state to the flat parameter map the catalog understands
- **Local refinement**: facets the catalog cannot evaluate (method type)
- **Engine**: debounced text, generation-guarded responses, rendered view

## Architecture

```text
FilterPatch
  └─> FilterState::apply_patch
        ├─> text only ──> Debouncer ──(quiet interval)──┐
        └─> other fields ───────────────────────────────┤
                                                        v
                                  compile_query + RefinePlan (settled text)
                                                        └─> CatalogSearch
                                                              └─> RefinePlan::apply
                                                                    └─> FilterEngine::complete
                                                                          (stale generations dropped)
                                                                          └─> CatalogRenderer
```

## Example

```rust,no_run
use lessoncraft_catalog_filter::{
    run_engine, CatalogView, FacetId, FilterConfig, FilterEngine, FilterPatch, MemoryCatalog,
};
use std::sync::Arc;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let engine = FilterEngine::new(FilterConfig::default())?;
    let search = Arc::new(MemoryCatalog::new(Vec::new()));
    let (patches, rx) = mpsc::channel(16);

    let driver = tokio::spawn(run_engine(engine, search, rx, |view: &CatalogView| {
        println!("{}", view.summary());
    }));

    patches
        .send(FilterPatch::new().select(FacetId::MethodType, ["active", "aux"]))
        .await?;
    drop(patches);
    driver.await?;
    Ok(())
}
```
*/

pub mod compiler;
pub mod config;
pub mod debounce;
pub mod driver;
pub mod engine;
pub mod error;
pub mod facet;
pub mod generation;
pub mod memory;
pub mod refine;
pub mod search;
pub mod state;
pub mod view;

pub use compiler::QueryParams;
pub use compiler::baseline_query;
pub use compiler::compile_query;
pub use config::FilterConfig;
pub use debounce::Debouncer;
pub use debounce::Trigger;
pub use driver::run_engine;
pub use engine::Completion;
pub use engine::FilterEngine;
pub use engine::PendingQuery;
pub use engine::QueryOutcome;
pub use error::ConfigError;
pub use error::SearchError;
pub use facet::Evaluation;
pub use facet::FACETS;
pub use facet::Facet;
pub use facet::FacetId;
pub use generation::Generation;
pub use memory::MemoryCatalog;
pub use refine::RefinePlan;
pub use refine::refine;
pub use search::CatalogSearch;
pub use state::DURATION_PRESETS;
pub use state::FilterPatch;
pub use state::FilterState;
pub use view::CatalogRenderer;
pub use view::CatalogView;
