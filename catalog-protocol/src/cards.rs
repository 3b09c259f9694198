use crate::facets::AgeBand;
use crate::facets::BloomLevel;
use crate::facets::LessonStage;
use crate::facets::Skill4k;
use crate::facets::WorkFormat;
use serde::Deserialize;
use serde::Serialize;

pub type CardId = u64;

/// Discriminator between main techniques and auxiliary cards.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    #[default]
    Technique,
    AuxTeamSplit,
    AuxWarmup,
    AuxReflection,
    AuxOrg,
    /// A kind added by a newer catalog. Treated as auxiliary.
    #[serde(other)]
    Other,
}

impl CardKind {
    pub const fn is_technique(self) -> bool {
        matches!(self, CardKind::Technique)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            CardKind::Technique => "technique",
            CardKind::AuxTeamSplit => "aux_team_split",
            CardKind::AuxWarmup => "aux_warmup",
            CardKind::AuxReflection => "aux_reflection",
            CardKind::AuxOrg => "aux_org",
            CardKind::Other => "other",
        }
    }
}

/// Activity temperature, meaningful only for technique cards.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    #[default]
    Active,
    Calm,
    #[serde(other)]
    Unknown,
}

impl ActivityType {
    pub const fn as_str(self) -> &'static str {
        match self {
            ActivityType::Active => "active",
            ActivityType::Calm => "calm",
            ActivityType::Unknown => "unknown",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    Draft,
    Pending,
    #[default]
    Public,
    Rejected,
    Archived,
    #[serde(other)]
    Unknown,
}

/// Read model of a technique card as listed by the catalog.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Card {
    pub id: CardId,
    pub title: String,
    #[serde(default)]
    pub description_html: String,
    #[serde(default)]
    pub duration_min: u32,
    #[serde(default)]
    pub status: CardStatus,
    #[serde(default)]
    pub card_kind: CardKind,
    #[serde(default)]
    pub activity_type: ActivityType,
    #[serde(default = "unknown_bloom_level")]
    pub bloom_level: BloomLevel,

    #[serde(default)]
    pub age_a1: bool,
    #[serde(default)]
    pub age_a2: bool,
    #[serde(default)]
    pub age_a3: bool,

    #[serde(default)]
    pub work_individual: bool,
    #[serde(default)]
    pub work_group: bool,

    #[serde(default)]
    pub k_critical: bool,
    #[serde(default)]
    pub k_creative: bool,
    #[serde(default)]
    pub k_communication: bool,
    #[serde(default)]
    pub k_collaboration: bool,

    #[serde(default)]
    pub stage_start: bool,
    #[serde(default)]
    pub stage_core: bool,
    #[serde(default)]
    pub stage_final: bool,
}

fn unknown_bloom_level() -> BloomLevel {
    BloomLevel::Unknown
}

impl Card {
    /// Bare technique card with no flags set. Handy for fixtures.
    pub fn new(id: CardId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description_html: String::new(),
            duration_min: 0,
            status: CardStatus::Public,
            card_kind: CardKind::Technique,
            activity_type: ActivityType::Active,
            bloom_level: BloomLevel::Unknown,
            age_a1: false,
            age_a2: false,
            age_a3: false,
            work_individual: false,
            work_group: false,
            k_critical: false,
            k_creative: false,
            k_communication: false,
            k_collaboration: false,
            stage_start: false,
            stage_core: false,
            stage_final: false,
        }
    }

    pub fn is_technique(&self) -> bool {
        self.card_kind.is_technique()
    }

    pub fn has_age(&self, band: AgeBand) -> bool {
        match band {
            AgeBand::A1 => self.age_a1,
            AgeBand::A2 => self.age_a2,
            AgeBand::A3 => self.age_a3,
        }
    }

    pub fn has_work_format(&self, format: WorkFormat) -> bool {
        match format {
            WorkFormat::Individual => self.work_individual,
            WorkFormat::Group => self.work_group,
        }
    }

    pub fn has_skill(&self, skill: Skill4k) -> bool {
        match skill {
            Skill4k::Critical => self.k_critical,
            Skill4k::Creative => self.k_creative,
            Skill4k::Communication => self.k_communication,
            Skill4k::Collaboration => self.k_collaboration,
        }
    }

    pub fn has_stage(&self, stage: LessonStage) -> bool {
        match stage {
            LessonStage::Start => self.stage_start,
            LessonStage::Core => self.stage_core,
            LessonStage::Final => self.stage_final,
        }
    }
}

/// Paginated envelope returned when the catalog has pagination enabled.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct CardsPage {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub results: Option<Vec<Card>>,
}

/// `GET /cards/` answers with either a bare array or a [`CardsPage`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CardsResponse {
    List(Vec<Card>),
    Page(CardsPage),
}

impl CardsResponse {
    pub fn into_cards(self) -> Vec<Card> {
        match self {
            CardsResponse::List(cards) => cards,
            CardsResponse::Page(page) => page.results.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LIST_ROW: &str = r#"{
        "id": 7,
        "title": "Think-pair-share",
        "duration_min": 10,
        "status": "public",
        "card_kind": "technique",
        "activity_type": "calm",
        "bloom_level": "apply",
        "age_a1": true, "age_a2": false, "age_a3": false,
        "work_individual": false, "work_group": true,
        "k_critical": true, "k_creative": false, "k_communication": true, "k_collaboration": false,
        "stage_start": false, "stage_core": true, "stage_final": false,
        "author": 3,
        "created_at": "2025-01-01T00:00:00Z"
    }"#;

    #[test]
    fn list_row_decodes_and_ignores_extra_fields() {
        let card: Card = serde_json::from_str(LIST_ROW).unwrap();
        assert_eq!(card.id, 7);
        assert_eq!(card.activity_type, ActivityType::Calm);
        assert_eq!(card.bloom_level, BloomLevel::Apply);
        assert_eq!(card.description_html, "");
        assert!(card.has_age(AgeBand::A1));
        assert!(card.has_work_format(WorkFormat::Group));
        assert!(card.has_skill(Skill4k::Communication));
        assert!(card.has_stage(LessonStage::Core));
        assert!(!card.has_stage(LessonStage::Final));
    }

    #[test]
    fn both_response_shapes_yield_cards() {
        let bare = format!("[{LIST_ROW}]");
        let page = format!(r#"{{"count": 1, "next": null, "previous": null, "results": [{LIST_ROW}]}}"#);

        let from_bare: CardsResponse = serde_json::from_str(&bare).unwrap();
        let from_page: CardsResponse = serde_json::from_str(&page).unwrap();
        assert_eq!(from_bare.into_cards(), from_page.into_cards());
    }

    #[test]
    fn envelope_without_results_is_empty() {
        let response: CardsResponse = serde_json::from_str(r#"{"count": 0}"#).unwrap();
        assert_eq!(response.into_cards(), Vec::<Card>::new());
    }

    #[test]
    fn envelope_with_null_results_is_empty() {
        let response: CardsResponse = serde_json::from_str(
            r#"{"count": 0, "next": null, "previous": null, "results": null}"#,
        )
        .unwrap();
        assert_eq!(response.into_cards(), Vec::<Card>::new());
    }

    #[test]
    fn unknown_card_kind_counts_as_auxiliary() {
        let card: Card =
            serde_json::from_str(r#"{"id": 1, "title": "x", "card_kind": "aux_music"}"#).unwrap();
        assert_eq!(card.card_kind, CardKind::Other);
        assert!(!card.is_technique());
    }
}
