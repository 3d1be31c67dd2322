//! # Jurisdiction
//!
//! Maps a project's city to the state whose admin reviews it.
//!
//! Resolution goes through the [`JurisdictionResolver`] trait so callers can
//! inject a smaller table in tests or load one from configuration. A city
//! that no state lists resolves to [`Jurisdiction::Unknown`], which never
//! matches any admin's home state: such a project can never clear state-level
//! review.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Result of resolving a city.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Jurisdiction {
    State(String),
    Unknown,
}

impl Jurisdiction {
    /// `true` only for a resolved state equal to `home_state`.
    pub fn matches(&self, home_state: Option<&str>) -> bool {
        match (self, home_state) {
            (Self::State(state), Some(home)) => state == home,
            _ => false,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::State(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::State(state) => state,
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that can place a city in a state.
pub trait JurisdictionResolver: Send + Sync {
    fn resolve(&self, city: &str) -> Jurisdiction;
}

/// One state and the cities it covers.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StateEntry {
    pub state: String,
    pub cities: Vec<String>,
}

/// Ordered city → state lookup table.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct JurisdictionTable {
    entries: Vec<StateEntry>,
}

impl JurisdictionTable {
    pub fn new(entries: Vec<StateEntry>) -> Self {
        Self { entries }
    }

    /// Build a table from `(state, cities)` pairs, keeping their order.
    pub fn from_pairs<S, C>(pairs: impl IntoIterator<Item = (S, C)>) -> Self
    where
        S: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(state, cities)| StateEntry {
                state: state.into(),
                cities: cities.into_iter().map(Into::into).collect(),
            })
            .collect();
        Self { entries }
    }

    /// Parse `{ "State": ["City", ...], ... }`.
    ///
    /// Object key order is not preserved by `serde_json`, so the resulting
    /// table is sorted by state name.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let map: std::collections::BTreeMap<String, Vec<String>> = serde_json::from_str(json)?;
        Ok(Self::from_pairs(map))
    }

    /// The built-in table of supported cities.
    pub fn india() -> Self {
        Self::from_pairs([
            (
                "Uttar Pradesh",
                vec!["Lucknow", "Kanpur", "Meerut", "Agra", "Varanasi"],
            ),
            ("Maharashtra", vec!["Mumbai", "Pune", "Nagpur"]),
            ("Karnataka", vec!["Bengaluru", "Mysore"]),
            ("Tamil Nadu", vec!["Chennai", "Coimbatore"]),
            ("West Bengal", vec!["Kolkata", "Siliguri"]),
            ("Rajasthan", vec!["Jaipur", "Jodhpur"]),
            ("Gujarat", vec!["Ahmedabad", "Surat"]),
            ("Telangana", vec!["Hyderabad", "Warangal"]),
            ("Delhi", vec!["Delhi"]),
        ])
    }

    pub fn entries(&self) -> &[StateEntry] {
        &self.entries
    }

    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.state.as_str())
    }

    pub fn cities(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .flat_map(|e| e.cities.iter().map(String::as_str))
    }

    pub fn contains_state(&self, state: &str) -> bool {
        self.states().any(|s| s == state)
    }
}

impl JurisdictionResolver for JurisdictionTable {
    fn resolve(&self, city: &str) -> Jurisdiction {
        self.entries
            .iter()
            .find(|e| e.cities.iter().any(|c| c == city))
            .map(|e| Jurisdiction::State(e.state.clone()))
            .unwrap_or(Jurisdiction::Unknown)
    }
}
