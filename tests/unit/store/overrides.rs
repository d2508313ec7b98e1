use super::*;
use crate::store::settings::{SettingField, SettingValue};

fn en() -> Language {
    Language::from("en")
}

#[test]
fn entry_mut_materializes_map_and_key() {
    let mut map: Option<OverrideMap<String>> = None;
    entry_mut(&mut map, &en()).push_str("hello");
    assert_eq!(get(&map, &en()).map(String::as_str), Some("hello"));
}

#[test]
fn prune_collapses_to_absent() {
    let mut map: Option<OverrideMap<LanguageSettings>> = None;
    let entry = entry_mut(&mut map, &en());
    entry
        .set(SettingField::X, SettingValue::Number(1.0))
        .unwrap();
    entry.clear(SettingField::X);

    let pruned = prune(&mut map, &en());
    assert!(pruned.key_removed);
    assert!(pruned.map_collapsed);
    assert!(map.is_none());
}

#[test]
fn prune_keeps_siblings() {
    let mut map: Option<OverrideMap<String>> = None;
    entry_mut(&mut map, &en());
    entry_mut(&mut map, &Language::from("fr")).push_str("bonjour");

    let pruned = prune(&mut map, &en());
    assert!(pruned.key_removed);
    assert!(!pruned.map_collapsed);
    assert_eq!(map.as_ref().map(|m| m.len()), Some(1));
}

#[test]
fn prune_leaves_non_empty_entry() {
    let mut map: Option<OverrideMap<String>> = None;
    entry_mut(&mut map, &en()).push_str("x");
    assert_eq!(prune(&mut map, &en()), Pruned::default());
    assert!(map.is_some());
}

#[test]
fn remove_drops_non_empty_entry() {
    let mut map: Option<OverrideMap<String>> = None;
    entry_mut(&mut map, &en()).push_str("x");
    let pruned = remove(&mut map, &en());
    assert!(pruned.key_removed && pruned.map_collapsed);
    assert!(map.is_none());
}

#[test]
fn find_empty_reports_offenders() {
    let mut map: Option<OverrideMap<String>> = Some(OverrideMap::new());
    assert_eq!(find_empty(&map), Err(None));

    map.as_mut().unwrap().insert(en(), String::new());
    assert_eq!(find_empty(&map), Err(Some(en())));

    map.as_mut().unwrap().insert(en(), "ok".to_string());
    assert_eq!(find_empty(&map), Ok(()));
    assert_eq!(find_empty::<String>(&None), Ok(()));
}

#[test]
fn blank_defers_removal_to_prune() {
    let mut map: Option<OverrideMap<String>> = None;
    entry_mut(&mut map, &en()).push_str("x");
    blank(&mut map, &en());
    assert_eq!(get(&map, &en()).map(String::as_str), Some(""));
    assert!(prune(&mut map, &en()).map_collapsed);

    blank(&mut map, &en());
    assert!(map.is_none());
}
