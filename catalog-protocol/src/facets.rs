use serde::Deserialize;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// How several selected values of one facet combine.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Logic {
    /// At least one selected value must match.
    #[default]
    Any,
    /// Every selected value must match.
    All,
}

impl Logic {
    pub const fn as_str(self) -> &'static str {
        match self {
            Logic::Any => "any",
            Logic::All => "all",
        }
    }

    /// Folds per-value match results. An empty iterator is "no constraint".
    pub fn combine<I>(self, checks: I) -> bool
    where
        I: IntoIterator<Item = bool>,
    {
        let mut checks = checks.into_iter().peekable();
        if checks.peek().is_none() {
            return true;
        }
        match self {
            Logic::Any => checks.any(|hit| hit),
            Logic::All => checks.all(|hit| hit),
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Logic {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "any" => Ok(Logic::Any),
            "all" => Ok(Logic::All),
            other => Err(format!("unknown logic `{other}` (expected any or all)")),
        }
    }
}

/// Filter panel mode.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PanelMode {
    /// One global logic value drives every facet.
    #[default]
    Simple,
    /// Every facet carries its own logic value.
    Advanced,
}

impl PanelMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            PanelMode::Simple => "simple",
            PanelMode::Advanced => "advanced",
        }
    }
}

impl fmt::Display for PanelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PanelMode {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(PanelMode::Simple),
            "advanced" => Ok(PanelMode::Advanced),
            other => Err(format!(
                "unknown mode `{other}` (expected simple or advanced)"
            )),
        }
    }
}

/// Derived classification combining `card_kind` and `activity_type`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MethodType {
    Active,
    Calm,
    Aux,
}

impl MethodType {
    pub const ALL: [MethodType; 3] = [MethodType::Active, MethodType::Calm, MethodType::Aux];

    /// Older clients sent `passive` for what is now `calm`.
    pub const LEGACY_CALM_ALIAS: &'static str = "passive";

    pub const fn as_str(self) -> &'static str {
        match self {
            MethodType::Active => "active",
            MethodType::Calm => "calm",
            MethodType::Aux => "aux",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BloomLevel {
    Remember,
    Understand,
    Apply,
    Analyze,
    Evaluate,
    Create,
    #[serde(other)]
    Unknown,
}

impl BloomLevel {
    pub const ALL: [BloomLevel; 6] = [
        BloomLevel::Remember,
        BloomLevel::Understand,
        BloomLevel::Apply,
        BloomLevel::Analyze,
        BloomLevel::Evaluate,
        BloomLevel::Create,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            BloomLevel::Remember => "remember",
            BloomLevel::Understand => "understand",
            BloomLevel::Apply => "apply",
            BloomLevel::Analyze => "analyze",
            BloomLevel::Evaluate => "evaluate",
            BloomLevel::Create => "create",
            BloomLevel::Unknown => "unknown",
        }
    }
}

/// School age bands: a1 = grades 1-4, a2 = 5-8, a3 = 9-11.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AgeBand {
    A1,
    A2,
    A3,
}

impl AgeBand {
    pub const ALL: [AgeBand; 3] = [AgeBand::A1, AgeBand::A2, AgeBand::A3];

    pub const fn as_str(self) -> &'static str {
        match self {
            AgeBand::A1 => "a1",
            AgeBand::A2 => "a2",
            AgeBand::A3 => "a3",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WorkFormat {
    Individual,
    Group,
}

impl WorkFormat {
    pub const ALL: [WorkFormat; 2] = [WorkFormat::Individual, WorkFormat::Group];

    pub const fn as_str(self) -> &'static str {
        match self {
            WorkFormat::Individual => "individual",
            WorkFormat::Group => "group",
        }
    }
}

/// The "4K" competencies.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Skill4k {
    Critical,
    Creative,
    Communication,
    Collaboration,
}

impl Skill4k {
    pub const ALL: [Skill4k; 4] = [
        Skill4k::Critical,
        Skill4k::Creative,
        Skill4k::Communication,
        Skill4k::Collaboration,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Skill4k::Critical => "critical",
            Skill4k::Creative => "creative",
            Skill4k::Communication => "communication",
            Skill4k::Collaboration => "collaboration",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LessonStage {
    Start,
    Core,
    Final,
}

impl LessonStage {
    pub const ALL: [LessonStage; 3] = [LessonStage::Start, LessonStage::Core, LessonStage::Final];

    pub const fn as_str(self) -> &'static str {
        match self {
            LessonStage::Start => "start",
            LessonStage::Core => "core",
            LessonStage::Final => "final",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn logic_combine_treats_empty_as_unconstrained() {
        assert!(Logic::Any.combine(std::iter::empty()));
        assert!(Logic::All.combine(std::iter::empty()));
    }

    #[test]
    fn logic_combine_any_vs_all() {
        assert!(Logic::Any.combine([false, true]));
        assert!(!Logic::All.combine([false, true]));
        assert!(Logic::All.combine([true, true]));
        assert!(!Logic::Any.combine([false, false]));
    }

    #[test]
    fn logic_and_mode_parse_case_insensitively() {
        assert_eq!(" ALL ".parse::<Logic>(), Ok(Logic::All));
        assert_eq!("Advanced".parse::<PanelMode>(), Ok(PanelMode::Advanced));
        assert!("both".parse::<Logic>().is_err());
    }

    #[test]
    fn unknown_bloom_level_is_tolerated() {
        let level: BloomLevel = serde_json::from_str("\"synthesize\"").unwrap();
        assert_eq!(level, BloomLevel::Unknown);
    }
}
