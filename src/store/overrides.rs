//! Helpers for per-language override maps.
//!
//! Override maps are stored as `Option<BTreeMap<Language, V>>`. `None` is the only legal
//! representation of "no overrides"; a `Some` map is never empty and none of its entries is
//! empty. The writer goes through [`entry_mut`] and [`prune`] so the invariant is re-checked
//! after every mutation.

use std::collections::BTreeMap;

use crate::foundation::ids::Language;
use crate::store::settings::LanguageSettings;

/// Per-language override map.
pub type OverrideMap<V> = BTreeMap<Language, V>;

/// Values that can sit in an override map entry.
pub(crate) trait OverrideEntry: Default {
    fn is_empty_entry(&self) -> bool;
}

impl OverrideEntry for LanguageSettings {
    fn is_empty_entry(&self) -> bool {
        self.is_empty()
    }
}

impl OverrideEntry for String {
    fn is_empty_entry(&self) -> bool {
        self.is_empty()
    }
}

/// What [`prune`] removed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Pruned {
    pub(crate) key_removed: bool,
    pub(crate) map_collapsed: bool,
}

pub(crate) fn get<'a, V>(map: &'a Option<OverrideMap<V>>, lang: &Language) -> Option<&'a V> {
    map.as_ref().and_then(|m| m.get(lang))
}

/// Mutable entry for `lang`, materializing the map and entry as needed.
///
/// Callers must follow up with [`prune`] once they are done mutating.
pub(crate) fn entry_mut<'a, V: OverrideEntry>(
    map: &'a mut Option<OverrideMap<V>>,
    lang: &Language,
) -> &'a mut V {
    map.get_or_insert_with(BTreeMap::new)
        .entry(lang.clone())
        .or_default()
}

/// Remove `lang` if its entry is empty, then collapse the map to `None` if nothing is left.
pub(crate) fn prune<V: OverrideEntry>(map: &mut Option<OverrideMap<V>>, lang: &Language) -> Pruned {
    let mut out = Pruned::default();
    let Some(inner) = map.as_mut() else {
        return out;
    };
    if inner.get(lang).is_some_and(OverrideEntry::is_empty_entry) {
        inner.remove(lang);
        out.key_removed = true;
    }
    if inner.is_empty() {
        *map = None;
        out.map_collapsed = true;
    }
    out
}

/// Reset an existing entry for `lang` to empty, leaving removal to [`prune`].
pub(crate) fn blank<V: OverrideEntry>(map: &mut Option<OverrideMap<V>>, lang: &Language) {
    if let Some(entry) = map.as_mut().and_then(|m| m.get_mut(lang)) {
        *entry = V::default();
    }
}

/// Remove `lang` unconditionally, collapsing the map if it becomes empty.
pub(crate) fn remove<V>(map: &mut Option<OverrideMap<V>>, lang: &Language) -> Pruned {
    let mut out = Pruned::default();
    let Some(inner) = map.as_mut() else {
        return out;
    };
    out.key_removed = inner.remove(lang).is_some();
    if inner.is_empty() {
        *map = None;
        out.map_collapsed = true;
    }
    out
}

/// Check the absent-vs-empty invariant, returning the first offending language.
pub(crate) fn find_empty<V: OverrideEntry>(
    map: &Option<OverrideMap<V>>,
) -> Result<(), Option<Language>> {
    let Some(inner) = map else {
        return Ok(());
    };
    if inner.is_empty() {
        return Err(None);
    }
    match inner.iter().find(|(_, v)| v.is_empty_entry()) {
        Some((lang, _)) => Err(Some(lang.clone())),
        None => Ok(()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/overrides.rs"]
mod tests;
