//! Resolution phases and the shared phase-to-tier table.
//!
//! Both [`crate::CascadeResolver`] and [`crate::CascadeWriter`] consult [`Phase::read_tiers`] and
//! [`Phase::write_tier`]; there is no other place where a phase is mapped onto storage tiers.

use std::{fmt, str::FromStr};

use crate::{
    cascade::config::SubstitutionPolicy,
    cascade::resolver::CascadeResolver,
    foundation::error::CascadeError,
    foundation::ids::Language,
    store::model::{Instance, TextAsset},
};

/// Sentinel tab name selecting the common-defaults tab in the asset editor.
pub const COMMON_TAB: &str = "common";

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Editing/rendering context deciding which tiers are read and which single tier is written.
pub enum Phase {
    /// Editing the asset's common defaults.
    AssetCommon,
    /// Editing the asset's defaults for one language.
    AssetLang,
    /// Editing one placement for one language.
    InstanceLang,
    /// "What would actually render": every tier, read-only.
    Auto,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
/// One storage layer of the override cascade.
pub enum Tier {
    /// Per-language (or, for context, language-agnostic) instance overrides.
    InstanceLanguage,
    /// Per-language asset overrides.
    AssetLanguage,
    /// Mandatory asset common defaults.
    CommonDefault,
}

const TIERS_COMMON: &[Tier] = &[Tier::CommonDefault];
const TIERS_ASSET_LANG: &[Tier] = &[Tier::AssetLanguage, Tier::CommonDefault];
const TIERS_ALL: &[Tier] = &[Tier::InstanceLanguage, Tier::AssetLanguage, Tier::CommonDefault];

impl Phase {
    /// Tiers eligible for reads, highest priority first.
    pub fn read_tiers(self) -> &'static [Tier] {
        match self {
            Self::AssetCommon => TIERS_COMMON,
            Self::AssetLang => TIERS_ASSET_LANG,
            Self::InstanceLang | Self::Auto => TIERS_ALL,
        }
    }

    /// The single tier receiving writes; `None` for the read-only [`Phase::Auto`].
    ///
    /// Always the head of [`Phase::read_tiers`] when present.
    pub fn write_tier(self) -> Option<Tier> {
        match self {
            Self::Auto => None,
            _ => self.read_tiers().first().copied(),
        }
    }

    /// `true` when reads under this phase consult `tier`.
    pub fn reads(self, tier: Tier) -> bool {
        self.read_tiers().contains(&tier)
    }

    /// `true` for the phases that edit through an instance.
    pub fn targets_instance(self) -> bool {
        self.write_tier() == Some(Tier::InstanceLanguage)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AssetCommon => "ASSET_COMMON",
            Self::AssetLang => "ASSET_LANG",
            Self::InstanceLang => "INSTANCE_LANG",
            Self::Auto => "AUTO",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// What the user is editing.
pub enum EditingTarget {
    /// Asset-level defaults.
    Asset,
    /// One placement on the current page.
    Instance,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Tab selected in the asset editor.
pub enum ActiveTab {
    /// The common-defaults tab ([`COMMON_TAB`]).
    Common,
    /// A per-language tab.
    Language(Language),
}

impl FromStr for ActiveTab {
    type Err = CascadeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(CascadeError::classification("active tab must be non-empty"));
        }
        if s == COMMON_TAB {
            Ok(Self::Common)
        } else {
            Ok(Self::Language(Language::from(s)))
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Snapshot of the UI focus used to derive a phase.
pub struct EditContext {
    /// What is being edited.
    pub target: EditingTarget,
    /// Asset editor tab; meaningful only for [`EditingTarget::Asset`].
    pub active_tab: ActiveTab,
    /// Canvas language; meaningful only for [`EditingTarget::Instance`].
    pub current_language: Language,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A phase together with the language under edit.
///
/// For [`Phase::AssetCommon`] the language is the canvas language and does not affect reads
/// or writes.
pub struct PhaseSelection {
    /// Selected phase.
    pub phase: Phase,
    /// Language under edit.
    pub language: Language,
}

/// Pure mapping from UI focus to a [`PhaseSelection`]. Never returns [`Phase::Auto`].
pub struct PhaseClassifier;

impl PhaseClassifier {
    /// Derive the phase for `ctx`.
    pub fn classify(ctx: &EditContext) -> PhaseSelection {
        match (ctx.target, &ctx.active_tab) {
            (EditingTarget::Asset, ActiveTab::Common) => PhaseSelection {
                phase: Phase::AssetCommon,
                language: ctx.current_language.clone(),
            },
            (EditingTarget::Asset, ActiveTab::Language(lang)) => PhaseSelection {
                phase: Phase::AssetLang,
                language: lang.clone(),
            },
            (EditingTarget::Instance, _) => PhaseSelection {
                phase: Phase::InstanceLang,
                language: ctx.current_language.clone(),
            },
        }
    }
}

impl PhaseSelection {
    /// Phase to use for a live preview.
    ///
    /// Substitutes [`Phase::Auto`] when the phase is eligible under `policy` and its own tier
    /// defines nothing for the language yet, so a tab that is showing through to a lower tier
    /// previews the inherited values instead of a placeholder.
    pub fn for_preview(
        &self,
        asset: &TextAsset,
        instance: Option<&Instance>,
        policy: &SubstitutionPolicy,
    ) -> PhaseSelection {
        let substitute = policy.is_eligible(self.phase)
            && !CascadeResolver::has_own_override(asset, instance, &self.language, self.phase);
        PhaseSelection {
            phase: if substitute { Phase::Auto } else { self.phase },
            language: self.language.clone(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cascade/phase.rs"]
mod tests;
