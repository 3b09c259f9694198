use crate::compiler::QueryParams;
use crate::error::SearchError;
use async_trait::async_trait;
use lessoncraft_catalog_protocol::Card;
use std::sync::Arc;

/// Remote catalog search. Receives the compiled parameters, returns matches.
#[async_trait]
pub trait CatalogSearch: Send + Sync {
    async fn search(&self, params: &QueryParams) -> Result<Vec<Card>, SearchError>;
}

#[async_trait]
impl<T: CatalogSearch + ?Sized> CatalogSearch for Arc<T> {
    async fn search(&self, params: &QueryParams) -> Result<Vec<Card>, SearchError> {
        (**self).search(params).await
    }
}
