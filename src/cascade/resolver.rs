use crate::{
    cascade::field::Field,
    cascade::phase::{Phase, Tier},
    foundation::ids::Language,
    store::model::{Instance, TextAsset},
    store::settings::{CommonSettings, SettingField, SettingValue},
};

#[derive(Clone, Debug, PartialEq)]
/// An effective value together with the tier that supplied it.
pub struct Resolved<T> {
    /// Effective value.
    pub value: T,
    /// Tier the value came from.
    pub tier: Tier,
}

impl<T> Resolved<T> {
    /// `true` when the value is inherited from a tier below the phase's own write tier.
    ///
    /// UIs use this to show "using asset default" style placeholders.
    pub fn is_inherited(&self, phase: Phase) -> bool {
        phase.write_tier().is_some_and(|own| own != self.tier)
    }
}

/// Stateless cascade reader.
///
/// Every read walks [`Phase::read_tiers`] top-down and returns the first tier where the key is
/// present; presence is independent of truthiness (`0`, `false` and `""` all win). The common
/// tier always answers, so reads never fail. Override maps are assumed to respect the
/// absent-vs-empty invariant the writer maintains.
pub struct CascadeResolver;

impl CascadeResolver {
    /// Effective text for `language`.
    pub fn resolve_text<'a>(
        asset: &'a TextAsset,
        instance: Option<&'a Instance>,
        language: &Language,
        phase: Phase,
    ) -> &'a str {
        Self::resolve_text_with_source(asset, instance, language, phase).value
    }

    /// Effective text for `language` with its source tier.
    pub fn resolve_text_with_source<'a>(
        asset: &'a TextAsset,
        instance: Option<&'a Instance>,
        language: &Language,
        phase: Phase,
    ) -> Resolved<&'a str> {
        first_present(phase, asset.base_text.as_str(), |tier| match tier {
            Tier::InstanceLanguage => instance.and_then(|i| i.text_override(language)),
            Tier::AssetLanguage => asset.text_override(language),
            Tier::CommonDefault => None,
        })
    }

    /// Effective context note. Context has no per-language asset tier and a single,
    /// language-agnostic instance tier; `language` is accepted for call-site symmetry.
    pub fn resolve_context<'a>(
        asset: &'a TextAsset,
        instance: Option<&'a Instance>,
        language: &Language,
        phase: Phase,
    ) -> &'a str {
        Self::resolve_context_with_source(asset, instance, language, phase).value
    }

    /// Effective context note with its source tier.
    pub fn resolve_context_with_source<'a>(
        asset: &'a TextAsset,
        instance: Option<&'a Instance>,
        _language: &Language,
        phase: Phase,
    ) -> Resolved<&'a str> {
        first_present(phase, asset.base_context.as_str(), |tier| match tier {
            Tier::InstanceLanguage => instance.and_then(|i| i.context_override.as_deref()),
            Tier::AssetLanguage | Tier::CommonDefault => None,
        })
    }

    /// Effective value of one Scalar Property Set field.
    pub fn resolve_setting(
        field: SettingField,
        asset: &TextAsset,
        instance: Option<&Instance>,
        language: &Language,
        phase: Phase,
    ) -> SettingValue {
        Self::resolve_setting_with_source(field, asset, instance, language, phase).value
    }

    /// Effective value of one Scalar Property Set field with its source tier.
    pub fn resolve_setting_with_source(
        field: SettingField,
        asset: &TextAsset,
        instance: Option<&Instance>,
        language: &Language,
        phase: Phase,
    ) -> Resolved<SettingValue> {
        first_present(phase, asset.common.get(field), |tier| match tier {
            Tier::InstanceLanguage => instance
                .and_then(|i| i.language_settings(language))
                .and_then(|s| s.get(field)),
            Tier::AssetLanguage => asset
                .language_settings(language)
                .and_then(|s| s.get(field)),
            Tier::CommonDefault => None,
        })
    }

    /// Every Scalar Property Set field resolved at once.
    pub fn resolve_settings(
        asset: &TextAsset,
        instance: Option<&Instance>,
        language: &Language,
        phase: Phase,
    ) -> CommonSettings {
        let mut out = asset.common.clone();
        // Overlay lowest tier first so higher tiers win.
        for tier in phase.read_tiers().iter().rev() {
            let layer = match tier {
                Tier::InstanceLanguage => instance.and_then(|i| i.language_settings(language)),
                Tier::AssetLanguage => asset.language_settings(language),
                Tier::CommonDefault => None,
            };
            if let Some(layer) = layer {
                layer.apply_to(&mut out);
            }
        }
        out
    }

    /// Effective value of any [`Field`], as a scalar.
    ///
    /// [`Field::OverrideEnabled`] reports whether the phase's own tier defines settings for
    /// `language`.
    pub fn resolve_field(
        field: Field,
        asset: &TextAsset,
        instance: Option<&Instance>,
        language: &Language,
        phase: Phase,
    ) -> SettingValue {
        match field {
            Field::Name => SettingValue::Text(asset.name.clone()),
            Field::Text => Self::resolve_text(asset, instance, language, phase).into(),
            Field::Context => Self::resolve_context(asset, instance, language, phase).into(),
            Field::Setting(f) => Self::resolve_setting(f, asset, instance, language, phase),
            Field::OverrideEnabled => SettingValue::Flag(match phase.write_tier() {
                Some(Tier::InstanceLanguage) => {
                    instance.is_some_and(|i| i.language_settings(language).is_some())
                }
                Some(Tier::AssetLanguage) => asset.language_settings(language).is_some(),
                Some(Tier::CommonDefault) => true,
                None => false,
            }),
        }
    }

    /// `true` when the phase's own write tier defines anything for `language`.
    ///
    /// The common tier always does; [`Phase::Auto`] owns no tier.
    pub fn has_own_override(
        asset: &TextAsset,
        instance: Option<&Instance>,
        language: &Language,
        phase: Phase,
    ) -> bool {
        match phase.write_tier() {
            Some(Tier::InstanceLanguage) => {
                instance.is_some_and(|i| i.has_language_override(language))
            }
            Some(Tier::AssetLanguage) => asset.has_language_override(language),
            Some(Tier::CommonDefault) => true,
            None => false,
        }
    }
}

fn first_present<T>(
    phase: Phase,
    common: T,
    mut lookup: impl FnMut(Tier) -> Option<T>,
) -> Resolved<T> {
    for &tier in phase.read_tiers() {
        if tier == Tier::CommonDefault {
            break;
        }
        if let Some(value) = lookup(tier) {
            return Resolved { value, tier };
        }
    }
    Resolved {
        value: common,
        tier: Tier::CommonDefault,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cascade/resolver.rs"]
mod tests;
