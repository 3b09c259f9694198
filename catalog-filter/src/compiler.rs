//! Filter state to remote query parameters.

use crate::facet::FACETS;
use crate::state::FilterState;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

pub const TEXT_PARAM: &str = "q";
pub const MODE_PARAM: &str = "mode";
pub const LOGIC_PARAM: &str = "logic";
pub const DURATION_PARAM: &str = "duration_max";

/// Flat, ordered `name -> value` map sent to the catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `application/x-www-form-urlencoded` rendering, keys in sorted order.
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (name, value) in self.iter() {
            serializer.append_pair(name, value);
        }
        serializer.finish()
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

/// Compiles `state` into the parameters of one catalog search.
///
/// Total: unknown tokens are dropped and repeats collapse, so this never fails.
/// Locally evaluated facets contribute only their logic parameter.
pub fn compile_query(state: &FilterState) -> QueryParams {
    let mut params = QueryParams::new();

    let text = state.text.trim();
    if !text.is_empty() {
        params.insert(TEXT_PARAM, text);
    }

    params.insert(MODE_PARAM, state.mode.as_str());
    params.insert(LOGIC_PARAM, state.global_logic.as_str());

    for facet in FACETS {
        let id = facet.id();
        params.insert(id.logic_param(), state.effective_logic(id).as_str());
        if let Some((name, values)) = facet.server_params(state) {
            params.insert(name, values);
        }
    }

    if let Some(minutes) = state.duration_max {
        params.insert(DURATION_PARAM, minutes.to_string());
    }

    params
}

/// Parameters of the unfiltered query used for the "of N" total.
pub fn baseline_query() -> QueryParams {
    QueryParams::new()
}
