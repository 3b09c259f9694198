//! Facet value model.
//!
//! A facet is one independently filterable dimension of a card. Each facet
//! knows its wire names, how to parse its value tokens, how a single value
//! matches a card, and whether the remote catalog can evaluate it
//! ([`Evaluation::Remote`]) or it has to be applied to the returned cards
//! ([`Evaluation::Local`]). The query compiler and the refinement pass both
//! walk [`FACETS`] and ask each facet for its contribution, so moving a facet
//! from one side to the other only touches its [`FacetValue`] impl.

use crate::state::FilterState;
use lessoncraft_catalog_protocol::ActivityType;
use lessoncraft_catalog_protocol::AgeBand;
use lessoncraft_catalog_protocol::BloomLevel;
use lessoncraft_catalog_protocol::Card;
use lessoncraft_catalog_protocol::LessonStage;
use lessoncraft_catalog_protocol::MethodType;
use lessoncraft_catalog_protocol::Skill4k;
use lessoncraft_catalog_protocol::WorkFormat;
use serde::Deserialize;
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use tracing::debug;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FacetId {
    MethodType,
    Bloom,
    Age,
    WorkFormat,
    Skills4k,
    LessonStage,
}

impl FacetId {
    pub const ALL: [FacetId; 6] = [
        FacetId::MethodType,
        FacetId::Bloom,
        FacetId::Age,
        FacetId::WorkFormat,
        FacetId::Skills4k,
        FacetId::LessonStage,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            FacetId::MethodType => "method_type",
            FacetId::Bloom => "bloom",
            FacetId::Age => "age",
            FacetId::WorkFormat => "work_format",
            FacetId::Skills4k => "skills_4k",
            FacetId::LessonStage => "lesson_stage",
        }
    }

    /// Query parameter carrying this facet's effective logic.
    pub const fn logic_param(self) -> &'static str {
        match self {
            FacetId::MethodType => "logic_activity",
            FacetId::Bloom => "logic_bloom",
            FacetId::Age => "logic_age",
            FacetId::WorkFormat => "logic_work",
            FacetId::Skills4k => "logic_4k",
            FacetId::LessonStage => "logic_stage",
        }
    }

    /// Query parameter carrying this facet's comma-joined values.
    pub const fn values_param(self) -> &'static str {
        match self {
            FacetId::MethodType => "activity_type",
            FacetId::Bloom => "bloom_level",
            FacetId::Age => "age_levels",
            FacetId::WorkFormat => "work_format",
            FacetId::Skills4k => "skills_4k",
            FacetId::LessonStage => "lesson_stage",
        }
    }

    pub fn facet(self) -> &'static dyn Facet {
        match self {
            FacetId::MethodType => &METHOD_TYPE,
            FacetId::Bloom => &BLOOM,
            FacetId::Age => &AGE,
            FacetId::WorkFormat => &WORK_FORMAT,
            FacetId::Skills4k => &SKILLS_4K,
            FacetId::LessonStage => &LESSON_STAGE,
        }
    }
}

impl fmt::Display for FacetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FacetId {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        let facet = match normalized.as_str() {
            "method_type" | "method" | "activity" => FacetId::MethodType,
            "bloom" => FacetId::Bloom,
            "age" => FacetId::Age,
            "work_format" | "work" => FacetId::WorkFormat,
            "skills_4k" | "4k" | "skills" => FacetId::Skills4k,
            "lesson_stage" | "stage" => FacetId::LessonStage,
            _ => {
                let known: Vec<&str> = Self::ALL.iter().map(|facet| facet.as_str()).collect();
                return Err(format!(
                    "unknown facet `{raw}` (expected one of {})",
                    known.join(", ")
                ));
            }
        };
        Ok(facet)
    }
}

/// Where a facet's selection gets evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Evaluation {
    /// Forwarded to the remote catalog as query parameters.
    Remote,
    /// Applied to the cards the remote catalog returned.
    Local,
}

pub type CardPredicate = Box<dyn Fn(&Card) -> bool + Send + Sync>;

/// One selectable value of a multi-select facet.
pub trait FacetValue: Copy + Eq + Send + Sync + 'static {
    const FACET: FacetId;
    const EVALUATION: Evaluation;

    fn all() -> &'static [Self];

    fn token(self) -> &'static str;

    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::all()
            .iter()
            .copied()
            .find(|value| value.token().eq_ignore_ascii_case(raw))
    }

    fn matches(self, card: &Card) -> bool;
}

/// Parses raw tokens, dropping unknown ones and repeats. First occurrence wins.
pub fn normalize_values<V: FacetValue>(raw: &[String]) -> Vec<V> {
    let mut values: Vec<V> = Vec::with_capacity(raw.len());
    for token in raw {
        match V::parse(token) {
            Some(value) if !values.contains(&value) => values.push(value),
            Some(_) => {}
            None => debug!(facet = %V::FACET, token = %token, "dropping unknown facet value"),
        }
    }
    values
}

/// Dyn-facing view of a facet, used by the compiler and the refinement pass.
pub trait Facet: Send + Sync {
    fn id(&self) -> FacetId;

    fn evaluation(&self) -> Evaluation;

    /// Canonical tokens of the current selection.
    fn selected_tokens(&self, state: &FilterState) -> Vec<&'static str>;

    /// Match result of one raw token, `None` when the token is unknown.
    fn matches_token(&self, card: &Card, token: &str) -> Option<bool>;

    /// The facet's exact rule for the current selection, `None` when nothing is selected.
    fn predicate(&self, state: &FilterState) -> Option<CardPredicate>;

    /// The values parameter to send to the remote catalog, if any.
    fn server_params(&self, state: &FilterState) -> Option<(&'static str, String)> {
        if self.evaluation() != Evaluation::Remote {
            return None;
        }
        let tokens = self.selected_tokens(state);
        if tokens.is_empty() {
            return None;
        }
        Some((self.id().values_param(), tokens.join(",")))
    }

    /// Predicate the refinement pass must apply, if any.
    fn local_predicate(&self, state: &FilterState) -> Option<CardPredicate> {
        match self.evaluation() {
            Evaluation::Local => self.predicate(state),
            Evaluation::Remote => None,
        }
    }
}

pub struct MultiSelect<V> {
    _values: PhantomData<fn() -> V>,
}

impl<V> MultiSelect<V> {
    pub const fn new() -> Self {
        Self {
            _values: PhantomData,
        }
    }
}

impl<V: FacetValue> Facet for MultiSelect<V> {
    fn id(&self) -> FacetId {
        V::FACET
    }

    fn evaluation(&self) -> Evaluation {
        V::EVALUATION
    }

    fn selected_tokens(&self, state: &FilterState) -> Vec<&'static str> {
        normalize_values::<V>(state.selection(V::FACET))
            .into_iter()
            .map(FacetValue::token)
            .collect()
    }

    fn matches_token(&self, card: &Card, token: &str) -> Option<bool> {
        V::parse(token).map(|value| value.matches(card))
    }

    fn predicate(&self, state: &FilterState) -> Option<CardPredicate> {
        let values = normalize_values::<V>(state.selection(V::FACET));
        if values.is_empty() {
            return None;
        }
        let logic = state.effective_logic(V::FACET);
        Some(Box::new(move |card: &Card| {
            logic.combine(values.iter().map(|value| value.matches(card)))
        }))
    }
}

static METHOD_TYPE: MultiSelect<MethodType> = MultiSelect::new();
static BLOOM: MultiSelect<BloomLevel> = MultiSelect::new();
static AGE: MultiSelect<AgeBand> = MultiSelect::new();
static WORK_FORMAT: MultiSelect<WorkFormat> = MultiSelect::new();
static SKILLS_4K: MultiSelect<Skill4k> = MultiSelect::new();
static LESSON_STAGE: MultiSelect<LessonStage> = MultiSelect::new();

/// Every multi-select facet, in wire order.
pub static FACETS: [&dyn Facet; 6] = [
    &METHOD_TYPE,
    &BLOOM,
    &AGE,
    &WORK_FORMAT,
    &SKILLS_4K,
    &LESSON_STAGE,
];

impl FacetValue for MethodType {
    const FACET: FacetId = FacetId::MethodType;
    // The catalog has no field combining card_kind with activity_type.
    const EVALUATION: Evaluation = Evaluation::Local;

    fn all() -> &'static [Self] {
        &MethodType::ALL
    }

    fn token(self) -> &'static str {
        self.as_str()
    }

    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case(MethodType::LEGACY_CALM_ALIAS) {
            return Some(MethodType::Calm);
        }
        MethodType::ALL
            .into_iter()
            .find(|value| value.as_str().eq_ignore_ascii_case(raw))
    }

    fn matches(self, card: &Card) -> bool {
        match self {
            MethodType::Aux => !card.is_technique(),
            MethodType::Active => {
                card.is_technique() && card.activity_type == ActivityType::Active
            }
            MethodType::Calm => card.is_technique() && card.activity_type == ActivityType::Calm,
        }
    }
}

impl FacetValue for BloomLevel {
    const FACET: FacetId = FacetId::Bloom;
    const EVALUATION: Evaluation = Evaluation::Remote;

    fn all() -> &'static [Self] {
        &BloomLevel::ALL
    }

    fn token(self) -> &'static str {
        self.as_str()
    }

    fn matches(self, card: &Card) -> bool {
        card.bloom_level == self
    }
}

impl FacetValue for AgeBand {
    const FACET: FacetId = FacetId::Age;
    const EVALUATION: Evaluation = Evaluation::Remote;

    fn all() -> &'static [Self] {
        &AgeBand::ALL
    }

    fn token(self) -> &'static str {
        self.as_str()
    }

    fn matches(self, card: &Card) -> bool {
        card.has_age(self)
    }
}

impl FacetValue for WorkFormat {
    const FACET: FacetId = FacetId::WorkFormat;
    const EVALUATION: Evaluation = Evaluation::Remote;

    fn all() -> &'static [Self] {
        &WorkFormat::ALL
    }

    fn token(self) -> &'static str {
        self.as_str()
    }

    fn matches(self, card: &Card) -> bool {
        card.has_work_format(self)
    }
}

impl FacetValue for Skill4k {
    const FACET: FacetId = FacetId::Skills4k;
    const EVALUATION: Evaluation = Evaluation::Remote;

    fn all() -> &'static [Self] {
        &Skill4k::ALL
    }

    fn token(self) -> &'static str {
        self.as_str()
    }

    fn matches(self, card: &Card) -> bool {
        card.has_skill(self)
    }
}

impl FacetValue for LessonStage {
    const FACET: FacetId = FacetId::LessonStage;
    const EVALUATION: Evaluation = Evaluation::Remote;

    fn all() -> &'static [Self] {
        &LessonStage::ALL
    }

    fn token(self) -> &'static str {
        self.as_str()
    }

    fn matches(self, card: &Card) -> bool {
        card.has_stage(self)
    }
}
