//! Wire types shared by the catalog filter engine and its collaborators.
//!
//! Everything here mirrors what the remote card catalog sends and accepts:
//! the card read model, the facet value tokens used in query parameters and
//! the two response shapes returned by `GET /cards/`.

pub mod cards;
pub mod facets;

pub use cards::ActivityType;
pub use cards::Card;
pub use cards::CardId;
pub use cards::CardKind;
pub use cards::CardStatus;
pub use cards::CardsPage;
pub use cards::CardsResponse;
pub use facets::AgeBand;
pub use facets::BloomLevel;
pub use facets::LessonStage;
pub use facets::Logic;
pub use facets::MethodType;
pub use facets::PanelMode;
pub use facets::Skill4k;
pub use facets::WorkFormat;
