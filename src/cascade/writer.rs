use crate::{
    cascade::config::{CascadeConfig, FailurePolicy},
    cascade::field::{Field, Route, route},
    cascade::phase::{Phase, Tier},
    cascade::resolver::CascadeResolver,
    foundation::error::{CascadeError, CascadeResult},
    foundation::ids::{AssetId, InstanceId, Language, PageId},
    store::model::{Instance, Project, TextAsset},
    store::overrides::{self, Pruned},
    store::settings::{LanguageSettings, SettingField, SettingValue},
};

#[derive(Clone, Debug, PartialEq)]
/// One field update. `None` (or an empty string) clears the field at the target tier.
pub struct FieldUpdate {
    /// Field to write.
    pub field: Field,
    /// New value, or `None` to clear.
    pub value: Option<SettingValue>,
}

impl FieldUpdate {
    /// Set `field` to `value`.
    pub fn set(field: impl Into<Field>, value: impl Into<SettingValue>) -> Self {
        Self {
            field: field.into(),
            value: Some(value.into()),
        }
    }

    /// Clear `field` at the target tier.
    pub fn clear(field: impl Into<Field>) -> Self {
        Self {
            field: field.into(),
            value: None,
        }
    }

    fn is_clear(&self) -> bool {
        self.value.as_ref().is_none_or(SettingValue::is_empty)
    }
}

/// What a writer call mutates.
///
/// Built by [`Project::asset_target`] and [`Project::instance_target`], which also lend the
/// project's supported languages so per-language tiers never gain a key the project rejects.
pub enum WriteTarget<'a> {
    /// Asset-level editing ([`Phase::AssetCommon`], [`Phase::AssetLang`]).
    Asset {
        /// Asset receiving the writes.
        asset: &'a mut TextAsset,
        /// Languages the owning project supports.
        languages: &'a [Language],
    },
    /// Placement editing ([`Phase::InstanceLang`]); the asset is read for snapshots only.
    Instance {
        /// Asset the instance places.
        asset: &'a TextAsset,
        /// Instance receiving the writes.
        instance: &'a mut Instance,
        /// Languages the owning project supports.
        languages: &'a [Language],
    },
}

impl WriteTarget<'_> {
    fn languages(&self) -> &[Language] {
        match self {
            Self::Asset { languages, .. } | Self::Instance { languages, .. } => languages,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// An update dropped by a lenient writer.
pub struct RejectedUpdate {
    /// Field of the dropped update.
    pub field: Field,
    /// Why it was dropped.
    pub reason: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
/// Outcome of one committed writer call.
pub struct WriteReport {
    /// Tier that received the writes (`None` when nothing could be routed).
    pub tier: Option<Tier>,
    /// Fields stored.
    pub written: Vec<Field>,
    /// Fields cleared.
    pub cleared: Vec<Field>,
    /// Language keys removed by tier cleanup.
    pub removed_language_keys: usize,
    /// Override maps collapsed to absent by tier cleanup.
    pub collapsed_maps: usize,
    /// Updates dropped under [`FailurePolicy::Lenient`].
    pub rejected: Vec<RejectedUpdate>,
}

impl WriteReport {
    fn record_cleanup(&mut self, pruned: Pruned) {
        self.removed_language_keys += usize::from(pruned.key_removed);
        self.collapsed_maps += usize::from(pruned.map_collapsed);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Outcome of [`CascadeWriter::purge_language`].
pub struct PurgeReport {
    /// Assets that lost at least one override.
    pub assets: Vec<AssetId>,
    /// Instances (page, instance) that lost at least one override.
    pub instances: Vec<(PageId, InstanceId)>,
}

/// The single entry point for mutating override tiers.
///
/// Each call routes every update into the phase's write tier on a staged copy of the target,
/// re-runs tier cleanup for the language, and only then commits the copy in one assignment.
/// A failed strict call leaves the target untouched.
#[derive(Clone, Debug, Default)]
pub struct CascadeWriter {
    config: CascadeConfig,
}

impl CascadeWriter {
    /// Writer using `config`.
    pub fn new(config: CascadeConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &CascadeConfig {
        &self.config
    }

    #[tracing::instrument(skip(self, target, updates), fields(updates = updates.len()))]
    /// Apply `updates` for `language` under `phase` as one state transition.
    pub fn apply(
        &self,
        target: WriteTarget<'_>,
        phase: Phase,
        language: &Language,
        updates: &[FieldUpdate],
    ) -> CascadeResult<WriteReport> {
        let mut report = WriteReport::default();
        if let Err(err) = check_target(&target, phase, language) {
            self.absorb_all(err, updates, &mut report)?;
            return Ok(report);
        }
        report.tier = phase.write_tier();

        match target {
            WriteTarget::Asset { asset, .. } => {
                let mut staged = asset.clone();
                for update in updates {
                    let outcome = route(update.field, phase)
                        .and_then(|r| write_asset(&mut staged, r, language, update));
                    self.record(outcome, update, &mut report)?;
                }
                report.record_cleanup(overrides::prune(&mut staged.language_overrides, language));
                report.record_cleanup(overrides::prune(&mut staged.text_overrides, language));
                *asset = staged;
            }
            WriteTarget::Instance { asset, instance, .. } => {
                let mut staged = instance.clone();
                for update in updates {
                    let outcome = route(update.field, phase)
                        .and_then(|r| write_instance(asset, &mut staged, r, language, update));
                    self.record(outcome, update, &mut report)?;
                }
                report.record_cleanup(overrides::prune(&mut staged.setting_overrides, language));
                report.record_cleanup(overrides::prune(&mut staged.text_overrides, language));
                *instance = staged;
            }
        }

        if report.removed_language_keys > 0 || report.collapsed_maps > 0 {
            tracing::debug!(
                %language,
                removed_keys = report.removed_language_keys,
                collapsed_maps = report.collapsed_maps,
                "tier cleanup"
            );
        }
        Ok(report)
    }

    /// Remove everything the phase's own tier stores for `language` (settings and text).
    ///
    /// This is the explicit "disable override" action. The common tier cannot be reset and
    /// [`Phase::Auto`] owns no tier.
    pub fn reset_language(
        &self,
        target: WriteTarget<'_>,
        phase: Phase,
        language: &Language,
    ) -> CascadeResult<WriteReport> {
        let mut report = WriteReport::default();
        let checked =
            check_target(&target, phase, language).and_then(|()| match phase.write_tier() {
                Some(Tier::CommonDefault) | None => Err(CascadeError::classification(format!(
                    "{phase} has no per-language tier to reset"
                ))),
                Some(tier) => Ok(tier),
            });
        let tier = match checked {
            Ok(tier) => tier,
            Err(err) => {
                self.absorb_all(err, &[], &mut report)?;
                return Ok(report);
            }
        };
        report.tier = Some(tier);

        match target {
            WriteTarget::Asset { asset, .. } => {
                report.record_cleanup(overrides::remove(
                    &mut asset.language_overrides,
                    language,
                ));
                report.record_cleanup(overrides::remove(&mut asset.text_overrides, language));
            }
            WriteTarget::Instance { instance, .. } => {
                report.record_cleanup(overrides::remove(
                    &mut instance.setting_overrides,
                    language,
                ));
                report.record_cleanup(overrides::remove(
                    &mut instance.text_overrides,
                    language,
                ));
            }
        }
        Ok(report)
    }

    #[tracing::instrument(skip(self, project))]
    /// Drop `language` from the project: the supported list and every override map.
    ///
    /// The current language cannot be removed.
    pub fn purge_language(
        &self,
        project: &mut Project,
        language: &Language,
    ) -> CascadeResult<PurgeReport> {
        if &project.current_language == language {
            return Err(CascadeError::validation(format!(
                "cannot remove the current language '{language}'"
            )));
        }
        project.supported_languages.retain(|l| l != language);

        let mut report = PurgeReport::default();
        for (id, asset) in &mut project.assets {
            let a = overrides::remove(&mut asset.language_overrides, language);
            let b = overrides::remove(&mut asset.text_overrides, language);
            if a.key_removed || b.key_removed {
                report.assets.push(id.clone());
            }
        }
        for page in &mut project.pages {
            for instance in &mut page.instances {
                let a = overrides::remove(&mut instance.setting_overrides, language);
                let b = overrides::remove(&mut instance.text_overrides, language);
                if a.key_removed || b.key_removed {
                    report.instances.push((page.id.clone(), instance.id.clone()));
                }
            }
        }
        tracing::debug!(
            assets = report.assets.len(),
            instances = report.instances.len(),
            "language purged"
        );
        Ok(report)
    }

    fn record(
        &self,
        outcome: CascadeResult<bool>,
        update: &FieldUpdate,
        report: &mut WriteReport,
    ) -> CascadeResult<()> {
        match outcome {
            Ok(true) => report.cleared.push(update.field),
            Ok(false) => report.written.push(update.field),
            Err(err) => self.absorb(err, update.field, report)?,
        }
        Ok(())
    }

    fn absorb(
        &self,
        err: CascadeError,
        field: Field,
        report: &mut WriteReport,
    ) -> CascadeResult<()> {
        if self.config.failure_policy == FailurePolicy::Strict || !err.is_programmer_error() {
            return Err(err);
        }
        tracing::error!(%field, error = %err, "dropping cascade update");
        report.rejected.push(RejectedUpdate {
            field,
            reason: err.to_string(),
        });
        Ok(())
    }

    fn absorb_all(
        &self,
        err: CascadeError,
        updates: &[FieldUpdate],
        report: &mut WriteReport,
    ) -> CascadeResult<()> {
        if self.config.failure_policy == FailurePolicy::Strict || !err.is_programmer_error() {
            return Err(err);
        }
        tracing::error!(error = %err, "dropping cascade call");
        report.rejected.extend(updates.iter().map(|u| RejectedUpdate {
            field: u.field,
            reason: err.to_string(),
        }));
        Ok(())
    }
}

fn check_target(target: &WriteTarget<'_>, phase: Phase, language: &Language) -> CascadeResult<()> {
    let tier = match (target, phase.write_tier()) {
        (_, None) => {
            return Err(CascadeError::classification(format!(
                "{phase} is read-only and cannot receive writes"
            )));
        }
        (WriteTarget::Asset { .. }, Some(Tier::InstanceLanguage)) => {
            return Err(CascadeError::MissingInstance);
        }
        (WriteTarget::Instance { .. }, Some(Tier::AssetLanguage | Tier::CommonDefault)) => {
            return Err(CascadeError::classification(format!(
                "{phase} edits the asset, not an instance"
            )));
        }
        (_, Some(tier)) => tier,
    };
    if tier != Tier::CommonDefault && !target.languages().contains(language) {
        return Err(CascadeError::classification(format!(
            "language '{language}' is not supported by the project"
        )));
    }
    Ok(())
}

fn expect_text(field: Field, value: &SettingValue) -> CascadeResult<String> {
    match value {
        SettingValue::Text(s) => Ok(s.clone()),
        other => Err(CascadeError::TypeMismatch {
            field: field.name().to_string(),
            expected: "text",
            found: other.kind().name(),
        }),
    }
}

fn required(update: &FieldUpdate, what: &str) -> CascadeResult<SettingValue> {
    update.value.clone().ok_or_else(|| {
        CascadeError::missing_default(format!(
            "{what} '{}' has no lower tier and cannot be cleared",
            update.field
        ))
    })
}

/// Returns `Ok(true)` when the update cleared the field.
fn write_asset(
    asset: &mut TextAsset,
    route: Route,
    language: &Language,
    update: &FieldUpdate,
) -> CascadeResult<bool> {
    match route {
        Route::Name => {
            let value = required(update, "asset identity field")?;
            asset.name = expect_text(update.field, &value)?;
            Ok(false)
        }
        Route::Text(Tier::CommonDefault) => {
            let value = required(update, "base field")?;
            asset.base_text = expect_text(update.field, &value)?;
            Ok(false)
        }
        Route::Context(Tier::CommonDefault) => {
            let value = required(update, "base field")?;
            asset.base_context = expect_text(update.field, &value)?;
            Ok(false)
        }
        Route::Setting(field, Tier::CommonDefault) => {
            let value = required(update, "common default")?;
            asset.common.set(field, value)?;
            Ok(false)
        }
        Route::Text(Tier::AssetLanguage) => {
            write_text_entry(&mut asset.text_overrides, language, update)
        }
        Route::Setting(field, Tier::AssetLanguage) => {
            write_setting_entry(&mut asset.language_overrides, field, language, update)
        }
        other => Err(CascadeError::classification(format!(
            "'{}' routed to {other:?}, which is not an asset tier",
            update.field
        ))),
    }
}

fn write_instance(
    asset: &TextAsset,
    instance: &mut Instance,
    route: Route,
    language: &Language,
    update: &FieldUpdate,
) -> CascadeResult<bool> {
    match route {
        Route::Text(Tier::InstanceLanguage) => {
            write_text_entry(&mut instance.text_overrides, language, update)
        }
        Route::Context(Tier::InstanceLanguage) => {
            if update.is_clear() {
                instance.context_override = None;
                return Ok(true);
            }
            let value = required(update, "context")?;
            instance.context_override = Some(expect_text(update.field, &value)?);
            Ok(false)
        }
        Route::Setting(field, Tier::InstanceLanguage) => {
            write_setting_entry(&mut instance.setting_overrides, field, language, update)
        }
        Route::OverrideFlag => {
            let value = required(update, "override flag")?;
            let enabled = value.as_bool().ok_or_else(|| CascadeError::TypeMismatch {
                field: update.field.name().to_string(),
                expected: "flag",
                found: value.kind().name(),
            })?;
            if !enabled {
                overrides::blank(&mut instance.setting_overrides, language);
                overrides::blank(&mut instance.text_overrides, language);
                return Ok(true);
            }
            if instance.language_settings(language).is_none() {
                let effective = CascadeResolver::resolve_settings(
                    asset,
                    Some(&*instance),
                    language,
                    Phase::Auto,
                );
                *overrides::entry_mut(&mut instance.setting_overrides, language) =
                    LanguageSettings::from_complete(&effective);
            }
            Ok(false)
        }
        other => Err(CascadeError::classification(format!(
            "'{}' routed to {other:?}, which is not an instance tier",
            update.field
        ))),
    }
}

fn write_text_entry(
    map: &mut Option<overrides::OverrideMap<String>>,
    language: &Language,
    update: &FieldUpdate,
) -> CascadeResult<bool> {
    if update.is_clear() {
        overrides::blank(map, language);
        return Ok(true);
    }
    let value = required(update, "text")?;
    let text = expect_text(update.field, &value)?;
    *overrides::entry_mut(map, language) = text;
    Ok(false)
}

fn write_setting_entry(
    map: &mut Option<overrides::OverrideMap<LanguageSettings>>,
    field: SettingField,
    language: &Language,
    update: &FieldUpdate,
) -> CascadeResult<bool> {
    if update.is_clear() {
        if let Some(entry) = map.as_mut().and_then(|m| m.get_mut(language)) {
            entry.clear(field);
        }
        return Ok(true);
    }
    let value = required(update, "setting")?;
    let result = overrides::entry_mut(map, language).set(field, value);
    if result.is_err() {
        // Drop the entry materialized for the rejected value.
        overrides::prune(map, language);
    }
    result.map(|()| false)
}

impl Project {
    /// Write target for asset-level editing of `id`.
    pub fn asset_target(&mut self, id: &AssetId) -> CascadeResult<WriteTarget<'_>> {
        let Project {
            assets,
            supported_languages,
            ..
        } = self;
        let asset = assets
            .get_mut(id)
            .ok_or_else(|| CascadeError::validation(format!("unknown asset '{id}'")))?;
        Ok(WriteTarget::Asset {
            asset,
            languages: supported_languages,
        })
    }

    /// Write target for editing instance `id` on page `page`.
    pub fn instance_target(
        &mut self,
        page: &PageId,
        id: &InstanceId,
    ) -> CascadeResult<WriteTarget<'_>> {
        let Project {
            assets,
            pages,
            supported_languages,
            ..
        } = self;
        let instance = pages
            .iter_mut()
            .find(|p| &p.id == page)
            .ok_or_else(|| CascadeError::validation(format!("unknown page '{page}'")))?
            .instance_mut(id)
            .ok_or_else(|| {
                CascadeError::validation(format!("unknown instance '{id}' on page '{page}'"))
            })?;
        let asset = assets.get(&instance.asset).ok_or_else(|| {
            CascadeError::validation(format!(
                "instance '{id}' references missing asset '{}'",
                instance.asset
            ))
        })?;
        Ok(WriteTarget::Instance {
            asset,
            instance,
            languages: supported_languages,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cascade/writer.rs"]
mod tests;
