use std::collections::BTreeMap;

use crate::{
    foundation::error::{CascadeError, CascadeResult},
    foundation::ids::{AssetId, InstanceId, Language, PageId},
    store::model::{Instance, Page, Project, TextAsset},
};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// A sibling placement sharing the candidate's effective z-order.
pub struct ConflictingPlacement {
    /// Sibling instance.
    pub instance: InstanceId,
    /// Asset the sibling places.
    pub asset: AssetId,
    /// Display name of that asset.
    pub asset_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// Non-blocking warning: an instance shares its z-order with siblings on the same page.
pub struct ZConflict {
    /// Instance under test.
    pub instance: InstanceId,
    /// The contested z-order value.
    pub z: i32,
    /// Siblings with the same effective z-order, in page order.
    pub conflicting: Vec<ConflictingPlacement>,
}

impl ZConflict {
    /// Names of the conflicting siblings' assets, deduplicated, in page order.
    pub fn conflicting_asset_names(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for c in &self.conflicting {
            if !out.contains(&c.asset_name.as_str()) {
                out.push(&c.asset_name);
            }
        }
        out
    }
}

/// Flags duplicate effective z-order values among sibling instances.
///
/// Uses a single-tier cascade: the instance's own z-order override for the language, else the
/// asset's common default. Asset per-language overrides are not consulted. Detection never
/// blocks a write.
pub struct ConflictDetector;

impl ConflictDetector {
    /// Effective z-order of `instance` for conflict purposes.
    pub fn effective_z(instance: &Instance, asset: &TextAsset, language: &Language) -> i32 {
        instance
            .language_settings(language)
            .and_then(|s| s.z_index)
            .unwrap_or(asset.common.z_index)
    }

    #[tracing::instrument(skip(page, assets), fields(page = %page.id))]
    /// Check whether giving `candidate` the z-order `new_z` collides with a sibling.
    ///
    /// Siblings whose asset no longer exists are skipped. `candidate` itself is excluded and
    /// need not be on the page yet.
    pub fn check(
        page: &Page,
        assets: &BTreeMap<AssetId, TextAsset>,
        candidate: &InstanceId,
        new_z: i32,
        language: &Language,
    ) -> Option<ZConflict> {
        let conflicting: Vec<ConflictingPlacement> = page
            .instances
            .iter()
            .filter(|other| &other.id != candidate)
            .filter_map(|other| {
                let asset = assets.get(&other.asset)?;
                (Self::effective_z(other, asset, language) == new_z).then(|| {
                    ConflictingPlacement {
                        instance: other.id.clone(),
                        asset: other.asset.clone(),
                        asset_name: asset.name.clone(),
                    }
                })
            })
            .collect();

        if conflicting.is_empty() {
            return None;
        }
        let conflict = ZConflict {
            instance: candidate.clone(),
            z: new_z,
            conflicting,
        };
        tracing::warn!(
            instance = %conflict.instance,
            z = new_z,
            assets = ?conflict.conflicting_asset_names(),
            "duplicate z-order"
        );
        Some(conflict)
    }

    #[tracing::instrument(skip(page, assets), fields(page = %page.id))]
    /// Every instance on `page` that shares its effective z-order with a sibling.
    pub fn scan_page(
        page: &Page,
        assets: &BTreeMap<AssetId, TextAsset>,
        language: &Language,
    ) -> Vec<ZConflict> {
        page.instances
            .iter()
            .filter_map(|instance| {
                let asset = assets.get(&instance.asset)?;
                let z = Self::effective_z(instance, asset, language);
                Self::check(page, assets, &instance.id, z, language)
            })
            .collect()
    }
}

impl Project {
    /// [`ConflictDetector::check`] on page `page` for the current language.
    pub fn check_z(
        &self,
        page: &PageId,
        candidate: &InstanceId,
        new_z: i32,
    ) -> CascadeResult<Option<ZConflict>> {
        let page = self
            .page(page)
            .ok_or_else(|| CascadeError::validation(format!("unknown page '{page}'")))?;
        Ok(ConflictDetector::check(
            page,
            &self.assets,
            candidate,
            new_z,
            &self.current_language,
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/conflict/detector.rs"]
mod tests;
