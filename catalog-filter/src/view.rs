use crate::error::SearchError;
use crate::generation::Generation;
use lessoncraft_catalog_protocol::Card;
use serde::Serialize;

/// Everything the card list needs to draw itself.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CatalogView {
    pub cards: Vec<Card>,
    pub loading: bool,
    /// Size of the unfiltered catalog, 0 until the baseline query succeeds.
    pub total_all: usize,
    /// Last search failure. Cleared by the next applied response.
    #[serde(serialize_with = "serialize_failure")]
    pub failure: Option<SearchError>,
    /// Generation whose response produced `cards`.
    pub generation: Option<Generation>,
}

fn serialize_failure<S>(failure: &Option<SearchError>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match failure {
        Some(err) => serializer.serialize_some(&err.to_string()),
        None => serializer.serialize_none(),
    }
}

impl CatalogView {
    pub fn summary(&self) -> String {
        if self.loading {
            "loading...".to_string()
        } else {
            format!("selected {} of {}", self.cards.len(), self.total_all)
        }
    }
}

/// Render collaborator. Called after every view change.
pub trait CatalogRenderer: Send {
    fn render(&mut self, view: &CatalogView);
}

impl<F> CatalogRenderer for F
where
    F: FnMut(&CatalogView) + Send,
{
    fn render(&mut self, view: &CatalogView) {
        self(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn summary_reports_loading_then_counts() {
        let mut view = CatalogView {
            loading: true,
            total_all: 12,
            ..CatalogView::default()
        };
        assert_eq!(view.summary(), "loading...");
        view.loading = false;
        view.cards = vec![Card::new(1, "a"), Card::new(2, "b")];
        assert_eq!(view.summary(), "selected 2 of 12");
    }

    #[test]
    fn closures_are_renderers() {
        let mut seen = Vec::new();
        {
            let mut renderer = |view: &CatalogView| seen.push(view.loading);
            renderer.render(&CatalogView::default());
        }
        assert_eq!(seen, vec![false]);
    }
}
