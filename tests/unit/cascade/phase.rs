use super::*;
use crate::store::overrides::OverrideMap;

fn ctx(target: EditingTarget, tab: &str, current: &str) -> EditContext {
    EditContext {
        target,
        active_tab: tab.parse().unwrap(),
        current_language: Language::from(current),
    }
}

#[test]
fn asset_common_tab() {
    let sel = PhaseClassifier::classify(&ctx(EditingTarget::Asset, COMMON_TAB, "en"));
    assert_eq!(sel.phase, Phase::AssetCommon);
}

#[test]
fn asset_language_tab_edits_tab_language() {
    let sel = PhaseClassifier::classify(&ctx(EditingTarget::Asset, "ja", "en"));
    assert_eq!(sel.phase, Phase::AssetLang);
    assert_eq!(sel.language, Language::from("ja"));
}

#[test]
fn instance_edits_current_language_regardless_of_tab() {
    for tab in [COMMON_TAB, "ja"] {
        let sel = PhaseClassifier::classify(&ctx(EditingTarget::Instance, tab, "en"));
        assert_eq!(sel.phase, Phase::InstanceLang);
        assert_eq!(sel.language, Language::from("en"));
    }
}

#[test]
fn empty_tab_is_rejected() {
    assert!("  ".parse::<ActiveTab>().is_err());
}

#[test]
fn tier_table_is_ordered_and_shared() {
    assert_eq!(Phase::AssetCommon.read_tiers(), [Tier::CommonDefault]);
    assert_eq!(
        Phase::AssetLang.read_tiers(),
        [Tier::AssetLanguage, Tier::CommonDefault]
    );
    assert_eq!(Phase::InstanceLang.read_tiers(), Phase::Auto.read_tiers());
    for phase in [Phase::AssetCommon, Phase::AssetLang, Phase::InstanceLang] {
        assert_eq!(phase.write_tier(), phase.read_tiers().first().copied());
        assert_eq!(phase.read_tiers().last(), Some(&Tier::CommonDefault));
    }
    assert_eq!(Phase::Auto.write_tier(), None);
    assert!(Phase::InstanceLang.targets_instance());
    assert!(!Phase::Auto.targets_instance());
    assert!(!Phase::AssetLang.reads(Tier::InstanceLanguage));
}

#[test]
fn phase_serializes_in_screaming_case() {
    assert_eq!(
        serde_json::to_string(&Phase::InstanceLang).unwrap(),
        "\"INSTANCE_LANG\""
    );
    assert_eq!(Phase::AssetCommon.to_string(), "ASSET_COMMON");
}

#[test]
fn preview_substitutes_auto_only_when_own_tier_is_empty() {
    let mut asset = TextAsset::new("Title", "Hello");
    let policy = SubstitutionPolicy::default();
    let sel = PhaseSelection {
        phase: Phase::AssetLang,
        language: Language::from("ja"),
    };

    assert_eq!(sel.for_preview(&asset, None, &policy).phase, Phase::Auto);

    asset.text_overrides = Some(OverrideMap::from([(
        Language::from("ja"),
        "Konnichiwa".to_string(),
    )]));
    assert_eq!(sel.for_preview(&asset, None, &policy).phase, Phase::AssetLang);
}

#[test]
fn preview_respects_policy() {
    let asset = TextAsset::new("Title", "Hello");
    let instance = Instance::new("i1", "title");
    let sel = PhaseSelection {
        phase: Phase::InstanceLang,
        language: Language::from("en"),
    };
    assert_eq!(
        sel.for_preview(&asset, Some(&instance), &SubstitutionPolicy::default())
            .phase,
        Phase::Auto
    );
    assert_eq!(
        sel.for_preview(&asset, Some(&instance), &SubstitutionPolicy::disabled())
            .phase,
        Phase::InstanceLang
    );

    let common = PhaseSelection {
        phase: Phase::AssetCommon,
        language: Language::from("en"),
    };
    assert_eq!(
        common
            .for_preview(&asset, None, &SubstitutionPolicy::default())
            .phase,
        Phase::AssetCommon
    );
}
