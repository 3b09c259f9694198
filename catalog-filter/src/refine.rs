//! Local refinement of the cards a remote search returned.

use crate::facet::CardPredicate;
use crate::facet::FACETS;
use crate::facet::FacetId;
use crate::state::FilterState;
use lessoncraft_catalog_protocol::Card;
use std::fmt;

/// Predicates of every locally evaluated facet with a non-empty selection.
///
/// Built from a state snapshot when a query is issued so the refinement that
/// runs on completion always matches the query it refines.
#[derive(Default)]
pub struct RefinePlan {
    constraints: Vec<(FacetId, CardPredicate)>,
}

impl RefinePlan {
    pub fn from_state(state: &FilterState) -> Self {
        let constraints = FACETS
            .iter()
            .filter_map(|facet| {
                facet
                    .local_predicate(state)
                    .map(|predicate| (facet.id(), predicate))
            })
            .collect();
        Self { constraints }
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn facets(&self) -> impl Iterator<Item = FacetId> + '_ {
        self.constraints.iter().map(|(facet, _)| *facet)
    }

    pub fn matches(&self, card: &Card) -> bool {
        self.constraints
            .iter()
            .all(|(_, predicate)| predicate(card))
    }

    /// Keeps the cards every constraint accepts, in their original order.
    pub fn apply(&self, cards: Vec<Card>) -> Vec<Card> {
        if self.is_empty() {
            return cards;
        }
        cards.into_iter().filter(|card| self.matches(card)).collect()
    }
}

impl fmt::Debug for RefinePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefinePlan")
            .field("facets", &self.facets().collect::<Vec<_>>())
            .finish()
    }
}

pub fn refine(cards: Vec<Card>, state: &FilterState) -> Vec<Card> {
    RefinePlan::from_state(state).apply(cards)
}
