//! In-process catalog evaluating compiled parameters the way the HTTP API does.

use crate::compiler::DURATION_PARAM;
use crate::compiler::LOGIC_PARAM;
use crate::compiler::QueryParams;
use crate::compiler::TEXT_PARAM;
use crate::error::SearchError;
use crate::facet::FacetId;
use crate::search::CatalogSearch;
use async_trait::async_trait;
use lessoncraft_catalog_protocol::ActivityType;
use lessoncraft_catalog_protocol::Card;
use lessoncraft_catalog_protocol::Logic;
use tracing::debug;

#[derive(Clone, Debug, Default)]
pub struct MemoryCatalog {
    cards: Vec<Card>,
}

impl MemoryCatalog {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Cards accepted by every parameter in `params`, in catalog order.
    pub fn evaluate(&self, params: &QueryParams) -> Vec<Card> {
        let fallback = params
            .get(LOGIC_PARAM)
            .and_then(|raw| raw.parse::<Logic>().ok())
            .unwrap_or_default();

        let mut facets: Vec<(FacetId, Logic, Vec<&str>)> = Vec::new();
        for facet in FacetId::ALL {
            let Some(raw) = params.get(facet.values_param()) else {
                continue;
            };
            let tokens: Vec<&str> = raw
                .split(',')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .collect();
            let logic = params
                .get(facet.logic_param())
                .and_then(|raw| raw.parse::<Logic>().ok())
                .unwrap_or(fallback);
            facets.push((facet, logic, tokens));
        }

        let text = params
            .get(TEXT_PARAM)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_lowercase);
        let duration_max = params
            .get(DURATION_PARAM)
            .and_then(|raw| raw.trim().parse::<u32>().ok());

        self.cards
            .iter()
            .filter(|card| {
                facets
                    .iter()
                    .all(|(facet, logic, tokens)| facet_matches(card, *facet, *logic, tokens))
            })
            .filter(|card| match &text {
                Some(needle) => {
                    card.title.to_lowercase().contains(needle)
                        || card.description_html.to_lowercase().contains(needle)
                }
                None => true,
            })
            .filter(|card| duration_max.is_none_or(|max| card.duration_min <= max))
            .cloned()
            .collect()
    }
}

fn facet_matches(card: &Card, facet: FacetId, logic: Logic, tokens: &[&str]) -> bool {
    let checks = tokens.iter().filter_map(|token| {
        let hit = match facet {
            // The API compares `activity_type` against the raw field only.
            FacetId::MethodType => activity_matches(card, token),
            _ => facet.facet().matches_token(card, token),
        };
        if hit.is_none() {
            debug!(facet = %facet, token = %token, "ignoring unknown token");
        }
        hit
    });
    logic.combine(checks)
}

fn activity_matches(card: &Card, token: &str) -> Option<bool> {
    let wanted = match token.to_ascii_lowercase().as_str() {
        "active" => ActivityType::Active,
        "calm" | "passive" => ActivityType::Calm,
        _ => return None,
    };
    Some(card.activity_type == wanted)
}

#[async_trait]
impl CatalogSearch for MemoryCatalog {
    async fn search(&self, params: &QueryParams) -> Result<Vec<Card>, SearchError> {
        Ok(self.evaluate(params))
    }
}
