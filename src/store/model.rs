use std::collections::{BTreeMap, BTreeSet};

use crate::{
    foundation::error::{CascadeError, CascadeResult},
    foundation::ids::{AssetId, InstanceId, Language, PageId},
    store::overrides::{self, OverrideEntry, OverrideMap},
    store::settings::{CommonSettings, LanguageSettings},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A complete multilingual document.
///
/// The project is a passive snapshot: the cascade engine reads it through
/// [`crate::CascadeResolver`] and mutates it only through [`crate::CascadeWriter`], which keeps
/// the absent-vs-empty override invariant intact. It serializes verbatim via Serde (JSON).
pub struct Project {
    /// Languages the document is authored in.
    pub supported_languages: Vec<Language>,
    /// Language currently shown on the canvas; always in `supported_languages`.
    pub current_language: Language,
    /// Asset table keyed by stable asset ids.
    #[serde(default)]
    pub assets: BTreeMap<AssetId, TextAsset>,
    /// Ordered pages.
    #[serde(default)]
    pub pages: Vec<Page>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A reusable, overridable text-bearing asset.
///
/// An asset is identified by its key in [`Project::assets`] and stores no id of its own.
pub struct TextAsset {
    /// Display name (asset identity field).
    pub name: String,
    /// Text used when no per-language override applies.
    #[serde(default)]
    pub base_text: String,
    /// Context note used when no instance override applies.
    #[serde(default)]
    pub base_context: String,
    /// Mandatory common defaults for every Scalar Property Set field.
    #[serde(default)]
    pub common: CommonSettings,
    /// Per-language partial settings that win over `common` for that language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_overrides: Option<OverrideMap<LanguageSettings>>,
    /// Per-language text that wins over `base_text` for that language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_overrides: Option<OverrideMap<String>>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Placement of an asset on one page.
pub struct Instance {
    /// Instance identifier (unique within its page).
    pub id: InstanceId,
    /// Asset key into [`Project::assets`].
    pub asset: AssetId,
    /// Per-language text for this exact page and language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_overrides: Option<OverrideMap<String>>,
    /// Context note for this placement (not per-language).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_override: Option<String>,
    /// Per-language partial settings for this placement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setting_overrides: Option<OverrideMap<LanguageSettings>>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One page of the document.
pub struct Page {
    /// Page identifier.
    pub id: PageId,
    /// Instances placed on this page.
    #[serde(default)]
    pub instances: Vec<Instance>,
}

impl TextAsset {
    /// New asset with default common settings and no overrides.
    pub fn new(name: impl Into<String>, base_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_text: base_text.into(),
            base_context: String::new(),
            common: CommonSettings::default(),
            language_overrides: None,
            text_overrides: None,
        }
    }

    /// Per-language settings stored for `lang`, if any.
    pub fn language_settings(&self, lang: &Language) -> Option<&LanguageSettings> {
        overrides::get(&self.language_overrides, lang)
    }

    /// Per-language text stored for `lang`, if any.
    pub fn text_override(&self, lang: &Language) -> Option<&str> {
        overrides::get(&self.text_overrides, lang).map(String::as_str)
    }

    /// `true` when the asset-language tier defines anything for `lang`.
    pub fn has_language_override(&self, lang: &Language) -> bool {
        self.language_settings(lang).is_some() || self.text_override(lang).is_some()
    }

    /// Languages used as keys in any override map.
    pub fn override_languages(&self) -> BTreeSet<&Language> {
        let mut out = BTreeSet::new();
        out.extend(self.language_overrides.iter().flat_map(|m| m.keys()));
        out.extend(self.text_overrides.iter().flat_map(|m| m.keys()));
        out
    }

    /// Validate the absent-vs-empty invariant for this asset's override maps.
    pub fn validate(&self) -> CascadeResult<()> {
        check_map(&self.language_overrides, "asset language_overrides")?;
        check_map(&self.text_overrides, "asset text_overrides")?;
        Ok(())
    }
}

impl Instance {
    /// New instance of `asset` with no overrides.
    pub fn new(id: impl Into<InstanceId>, asset: impl Into<AssetId>) -> Self {
        Self {
            id: id.into(),
            asset: asset.into(),
            text_overrides: None,
            context_override: None,
            setting_overrides: None,
        }
    }

    /// Per-language settings stored for `lang`, if any.
    pub fn language_settings(&self, lang: &Language) -> Option<&LanguageSettings> {
        overrides::get(&self.setting_overrides, lang)
    }

    /// Per-language text stored for `lang`, if any.
    pub fn text_override(&self, lang: &Language) -> Option<&str> {
        overrides::get(&self.text_overrides, lang).map(String::as_str)
    }

    /// `true` when the instance-language tier defines anything for `lang`.
    ///
    /// The context override is language-agnostic and does not count.
    pub fn has_language_override(&self, lang: &Language) -> bool {
        self.language_settings(lang).is_some() || self.text_override(lang).is_some()
    }

    /// Languages used as keys in any override map.
    pub fn override_languages(&self) -> BTreeSet<&Language> {
        let mut out = BTreeSet::new();
        out.extend(self.setting_overrides.iter().flat_map(|m| m.keys()));
        out.extend(self.text_overrides.iter().flat_map(|m| m.keys()));
        out
    }

    /// Validate the absent-vs-empty invariant for this instance's override maps.
    pub fn validate(&self) -> CascadeResult<()> {
        let what = format!("instance '{}'", self.id);
        check_map(&self.setting_overrides, &format!("{what} setting_overrides"))?;
        check_map(&self.text_overrides, &format!("{what} text_overrides"))?;
        if self.context_override.as_deref() == Some("") {
            return Err(CascadeError::validation(format!(
                "{what} context_override must be absent rather than empty"
            )));
        }
        Ok(())
    }
}

impl Page {
    /// Instance `id` on this page.
    pub fn instance(&self, id: &InstanceId) -> Option<&Instance> {
        self.instances.iter().find(|i| &i.id == id)
    }

    /// Mutable instance `id` on this page.
    pub fn instance_mut(&mut self, id: &InstanceId) -> Option<&mut Instance> {
        self.instances.iter_mut().find(|i| &i.id == id)
    }
}

impl Project {
    /// New empty project. `current_language` is added to `supported_languages` if missing.
    pub fn new(mut supported_languages: Vec<Language>, current_language: Language) -> Self {
        if !supported_languages.contains(&current_language) {
            supported_languages.push(current_language.clone());
        }
        Self {
            supported_languages,
            current_language,
            assets: BTreeMap::new(),
            pages: Vec::new(),
        }
    }

    /// `true` when `lang` is in the supported-language list.
    pub fn is_supported(&self, lang: &Language) -> bool {
        self.supported_languages.contains(lang)
    }

    /// Asset `id`.
    pub fn asset(&self, id: &AssetId) -> Option<&TextAsset> {
        self.assets.get(id)
    }

    /// Mutable asset `id`. Edits to override tiers belong to [`crate::CascadeWriter`].
    pub fn asset_mut(&mut self, id: &AssetId) -> Option<&mut TextAsset> {
        self.assets.get_mut(id)
    }

    /// Page `id`.
    pub fn page(&self, id: &PageId) -> Option<&Page> {
        self.pages.iter().find(|p| &p.id == id)
    }

    /// Mutable page `id`.
    pub fn page_mut(&mut self, id: &PageId) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| &p.id == id)
    }

    /// Instance `id` on page `page`.
    pub fn instance(&self, page: &PageId, id: &InstanceId) -> Option<&Instance> {
        self.page(page)?.instance(id)
    }

    /// Mutable instance `id` on page `page`.
    pub fn instance_mut(&mut self, page: &PageId, id: &InstanceId) -> Option<&mut Instance> {
        self.page_mut(page)?.instance_mut(id)
    }

    /// Instance `id` on page `page` together with its asset (if the asset still exists).
    pub fn placement(
        &self,
        page: &PageId,
        id: &InstanceId,
    ) -> Option<(Option<&TextAsset>, &Instance)> {
        let instance = self.instance(page, id)?;
        Some((self.assets.get(&instance.asset), instance))
    }

    /// Parse a project from JSON and validate it.
    pub fn from_json(s: &str) -> CascadeResult<Self> {
        let project: Self =
            serde_json::from_str(s).map_err(|e| CascadeError::serde(e.to_string()))?;
        project.validate()?;
        Ok(project)
    }

    /// Compact JSON encoding. Absent override maps are omitted.
    pub fn to_json(&self) -> CascadeResult<String> {
        serde_json::to_string(self).map_err(|e| CascadeError::serde(e.to_string()))
    }

    /// Pretty JSON encoding. Absent override maps are omitted.
    pub fn to_json_pretty(&self) -> CascadeResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| CascadeError::serde(e.to_string()))
    }

    #[tracing::instrument(skip_all, fields(assets = self.assets.len(), pages = self.pages.len()))]
    /// Validate language membership, id uniqueness and the absent-vs-empty invariant.
    ///
    /// Instances whose asset no longer exists are allowed.
    pub fn validate(&self) -> CascadeResult<()> {
        if self.supported_languages.is_empty() {
            return Err(CascadeError::validation(
                "supported_languages must be non-empty",
            ));
        }
        let mut seen = BTreeSet::new();
        for lang in &self.supported_languages {
            if lang.as_str().trim().is_empty() {
                return Err(CascadeError::validation("language codes must be non-empty"));
            }
            if !seen.insert(lang) {
                return Err(CascadeError::validation(format!(
                    "language '{lang}' is listed twice"
                )));
            }
        }
        if !self.is_supported(&self.current_language) {
            return Err(CascadeError::validation(format!(
                "current_language '{}' is not a supported language",
                self.current_language
            )));
        }

        for (id, asset) in &self.assets {
            if id.as_str().trim().is_empty() {
                return Err(CascadeError::validation("asset id must be non-empty"));
            }
            asset.validate()?;
            self.check_languages(asset.override_languages(), &format!("asset '{id}'"))?;
        }

        let mut page_ids = BTreeSet::new();
        for page in &self.pages {
            if !page_ids.insert(&page.id) {
                return Err(CascadeError::validation(format!(
                    "page '{}' is listed twice",
                    page.id
                )));
            }
            let mut instance_ids = BTreeSet::new();
            for instance in &page.instances {
                if !instance_ids.insert(&instance.id) {
                    return Err(CascadeError::validation(format!(
                        "instance '{}' appears twice on page '{}'",
                        instance.id, page.id
                    )));
                }
                instance.validate()?;
                self.check_languages(
                    instance.override_languages(),
                    &format!("instance '{}'", instance.id),
                )?;
            }
        }

        Ok(())
    }

    fn check_languages<'a>(
        &self,
        langs: impl IntoIterator<Item = &'a Language>,
        owner: &str,
    ) -> CascadeResult<()> {
        for lang in langs {
            if !self.is_supported(lang) {
                return Err(CascadeError::validation(format!(
                    "{owner} overrides unsupported language '{lang}'"
                )));
            }
        }
        Ok(())
    }
}

fn check_map<V: OverrideEntry>(map: &Option<OverrideMap<V>>, what: &str) -> CascadeResult<()> {
    match overrides::find_empty(map) {
        Ok(()) => Ok(()),
        Err(None) => Err(CascadeError::validation(format!(
            "{what} must be absent rather than empty"
        ))),
        Err(Some(lang)) => Err(CascadeError::validation(format!(
            "{what} has an empty entry for '{lang}'"
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/model.rs"]
mod tests;
