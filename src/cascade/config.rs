use std::collections::BTreeSet;

use crate::{
    cascade::phase::Phase,
    foundation::error::{CascadeError, CascadeResult},
};

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Engine configuration.
///
/// Every field has a default, so a partial (or empty) JSON object is a valid configuration.
pub struct CascadeConfig {
    /// Phases eligible for [`Phase::Auto`] substitution in previews.
    #[serde(default)]
    pub substitution: SubstitutionPolicy,
    /// Writer behavior on programmer errors.
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl CascadeConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(s: &str) -> CascadeResult<Self> {
        serde_json::from_str(s).map_err(|e| CascadeError::serde(e.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
/// Set of phases whose previews fall back to [`Phase::Auto`] while their own tier is empty.
///
/// Only [`Phase::AssetLang`] and [`Phase::InstanceLang`] own a substitutable tier; other phases
/// in the set are ignored.
pub struct SubstitutionPolicy {
    eligible: BTreeSet<Phase>,
}

impl Default for SubstitutionPolicy {
    fn default() -> Self {
        Self::new([Phase::AssetLang, Phase::InstanceLang])
    }
}

impl SubstitutionPolicy {
    /// Policy allowing substitution for `phases`.
    pub fn new(phases: impl IntoIterator<Item = Phase>) -> Self {
        Self {
            eligible: phases.into_iter().collect(),
        }
    }

    /// Policy that never substitutes.
    pub fn disabled() -> Self {
        Self::new([])
    }

    /// `true` when previews under `phase` may substitute [`Phase::Auto`].
    pub fn is_eligible(&self, phase: Phase) -> bool {
        matches!(phase, Phase::AssetLang | Phase::InstanceLang) && self.eligible.contains(&phase)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// How the writer reacts to programmer errors.
pub enum FailurePolicy {
    /// Return the error and apply nothing.
    Strict,
    /// Log the error, drop the offending update and commit the rest.
    Lenient,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Strict
        } else {
            Self::Lenient
        }
    }
}
