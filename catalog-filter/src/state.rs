use crate::facet::FacetId;
use lessoncraft_catalog_protocol::Logic;
use lessoncraft_catalog_protocol::PanelMode;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// Ceilings offered next to the duration slider, in minutes.
pub const DURATION_PRESETS: [u32; 4] = [3, 7, 15, 40];

/// Snapshot of everything the user selected in the filter panel.
///
/// Selections keep the raw tokens the UI sent; unknown tokens survive here
/// and are dropped when the state is compiled or refined.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FilterState {
    pub mode: PanelMode,
    pub global_logic: Logic,
    pub text: String,
    pub selections: BTreeMap<FacetId, Vec<String>>,
    pub facet_logic: BTreeMap<FacetId, Logic>,
    pub duration_max: Option<u32>,
}

impl FilterState {
    pub fn selection(&self, facet: FacetId) -> &[String] {
        self.selections
            .get(&facet)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn logic_override(&self, facet: FacetId) -> Option<Logic> {
        self.facet_logic.get(&facet).copied()
    }

    /// Logic used to combine several selected values of `facet`.
    ///
    /// Simple mode ignores stored per-facet values; advanced mode ignores the
    /// global one and falls back to [`Logic::Any`].
    pub fn effective_logic(&self, facet: FacetId) -> Logic {
        match self.mode {
            PanelMode::Simple => self.global_logic,
            PanelMode::Advanced => self.logic_override(facet).unwrap_or_default(),
        }
    }

    /// Returns a new snapshot with `patch` applied. `self` is left untouched.
    pub fn apply_patch(&self, patch: &FilterPatch) -> FilterState {
        let mut next = self.clone();
        if let Some(mode) = patch.mode {
            next.mode = mode;
        }
        if let Some(logic) = patch.global_logic {
            next.global_logic = logic;
        }
        if let Some(text) = &patch.text {
            next.text.clone_from(text);
        }
        for (facet, values) in &patch.selections {
            if values.is_empty() {
                next.selections.remove(facet);
            } else {
                next.selections.insert(*facet, values.clone());
            }
        }
        for (facet, logic) in &patch.facet_logic {
            next.facet_logic.insert(*facet, *logic);
        }
        if let Some(duration) = patch.duration_max {
            next.duration_max = duration;
        }
        next
    }

    /// Patch adding `value` to the facet's selection, or removing it when present.
    pub fn toggle_value(&self, facet: FacetId, value: &str) -> FilterPatch {
        let mut values = self.selection(facet).to_vec();
        if let Some(pos) = values.iter().position(|existing| existing == value) {
            values.remove(pos);
        } else {
            values.push(value.to_string());
        }
        FilterPatch::new().select(facet, values)
    }

    /// True when every field differs from `other` only in the free text.
    pub fn differs_only_in_text(&self, other: &FilterState) -> bool {
        self.mode == other.mode
            && self.global_logic == other.global_logic
            && self.selections == other.selections
            && self.facet_logic == other.facet_logic
            && self.duration_max == other.duration_max
    }
}

/// Partial update of a [`FilterState`]. Absent fields are left as they are.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub mode: Option<PanelMode>,
    pub global_logic: Option<Logic>,
    pub text: Option<String>,
    /// An empty list clears the facet.
    pub selections: BTreeMap<FacetId, Vec<String>>,
    pub facet_logic: BTreeMap<FacetId, Logic>,
    /// `Some(None)` clears the ceiling.
    pub duration_max: Option<Option<u32>>,
}

impl FilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores every field to its default in one patch.
    pub fn reset() -> Self {
        Self {
            mode: Some(PanelMode::Simple),
            global_logic: Some(Logic::Any),
            text: Some(String::new()),
            selections: FacetId::ALL
                .into_iter()
                .map(|facet| (facet, Vec::new()))
                .collect(),
            facet_logic: FacetId::ALL
                .into_iter()
                .map(|facet| (facet, Logic::Any))
                .collect(),
            duration_max: Some(None),
        }
    }

    pub fn mode(mut self, mode: PanelMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn global_logic(mut self, logic: Logic) -> Self {
        self.global_logic = Some(logic);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn select<I, S>(mut self, facet: FacetId, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selections
            .insert(facet, values.into_iter().map(Into::into).collect());
        self
    }

    pub fn clear(self, facet: FacetId) -> Self {
        self.select(facet, Vec::<String>::new())
    }

    pub fn facet_logic(mut self, facet: FacetId, logic: Logic) -> Self {
        self.facet_logic.insert(facet, logic);
        self
    }

    pub fn duration_max(mut self, minutes: Option<u32>) -> Self {
        self.duration_max = Some(minutes);
        self
    }

    /// Slider readings at or past `slider_max` mean "no ceiling".
    pub fn duration_from_slider(self, reading: u32, slider_max: u32) -> Self {
        if reading >= slider_max {
            self.duration_max(None)
        } else {
            self.duration_max(Some(reading))
        }
    }
}
