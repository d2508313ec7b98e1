use std::{fmt, str::FromStr};

use crate::{
    cascade::phase::{Phase, Tier},
    foundation::error::{CascadeError, CascadeResult},
    store::settings::SettingField,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Any field the resolver can read or the writer can route.
pub enum Field {
    /// Asset display name.
    Name,
    /// Text content (base text, asset per-language text or instance per-language text).
    Text,
    /// Context note (base context or the instance context override).
    Context,
    /// A Scalar Property Set field.
    Setting(SettingField),
    /// Whether the instance owns a settings entry for the language.
    OverrideEnabled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Category a field falls into once its phase is known.
pub enum FieldCategory {
    /// Name, base text, base context and the asset per-language text.
    AssetIdentity,
    /// Scalar Property Set field, at any tier.
    Setting,
    /// Instance text entry, instance context override, override membership flag.
    InstanceOnly,
}

/// Concrete storage slot for one field under one phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Route {
    Name,
    Text(Tier),
    Context(Tier),
    Setting(SettingField, Tier),
    OverrideFlag,
}

impl Field {
    /// Stable snake_case name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Text => "text",
            Self::Context => "context",
            Self::Setting(f) => f.name(),
            Self::OverrideEnabled => "override_enabled",
        }
    }

    /// Category of this field when written under `phase`.
    pub fn category(self, phase: Phase) -> CascadeResult<FieldCategory> {
        route(self, phase).map(Route::category)
    }
}

impl From<SettingField> for Field {
    fn from(f: SettingField) -> Self {
        Self::Setting(f)
    }
}

impl FromStr for Field {
    type Err = CascadeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "text" => Ok(Self::Text),
            "context" => Ok(Self::Context),
            "override_enabled" => Ok(Self::OverrideEnabled),
            _ => s.parse::<SettingField>().map(Self::Setting),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Route {
    pub(crate) fn category(self) -> FieldCategory {
        match self {
            Self::Name => FieldCategory::AssetIdentity,
            Self::Text(Tier::InstanceLanguage) | Self::Context(Tier::InstanceLanguage) => {
                FieldCategory::InstanceOnly
            }
            Self::Text(_) | Self::Context(_) => FieldCategory::AssetIdentity,
            Self::Setting(..) => FieldCategory::Setting,
            Self::OverrideFlag => FieldCategory::InstanceOnly,
        }
    }
}

/// Classify `field` for a write under `phase`.
pub(crate) fn route(field: Field, phase: Phase) -> CascadeResult<Route> {
    let Some(tier) = phase.write_tier() else {
        return Err(CascadeError::classification(format!(
            "'{field}' cannot be written under {phase}; the phase is read-only"
        )));
    };
    match (field, tier) {
        (Field::Name, Tier::InstanceLanguage) => Err(CascadeError::classification(
            "'name' is an asset identity field and cannot be written through an instance",
        )),
        (Field::Name, _) => Ok(Route::Name),
        (Field::Text, tier) => Ok(Route::Text(tier)),
        (Field::Context, Tier::AssetLanguage) => Err(CascadeError::classification(
            "'context' has no per-language asset tier",
        )),
        (Field::Context, tier) => Ok(Route::Context(tier)),
        (Field::Setting(f), tier) => Ok(Route::Setting(f, tier)),
        (Field::OverrideEnabled, Tier::InstanceLanguage) => Ok(Route::OverrideFlag),
        (Field::OverrideEnabled, _) => Err(CascadeError::classification(format!(
            "'override_enabled' is instance-only and cannot be written under {phase}"
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cascade/field.rs"]
mod tests;
