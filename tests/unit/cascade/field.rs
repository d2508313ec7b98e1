use super::*;

#[test]
fn names_parse_back() {
    for name in ["name", "text", "context", "override_enabled", "z_index", "fill"] {
        let field: Field = name.parse().unwrap();
        assert_eq!(field.name(), name);
    }
    assert_eq!(
        "opacity".parse::<Field>().unwrap(),
        Field::Setting(SettingField::Opacity)
    );
}

#[test]
fn unknown_name_is_a_programmer_error() {
    let err = "kerning".parse::<Field>().unwrap_err();
    assert!(matches!(err, CascadeError::UnknownField(_)));
    assert!(err.is_programmer_error());
}

#[test]
fn settings_route_to_the_phase_write_tier() {
    let f = Field::Setting(SettingField::X);
    assert_eq!(
        route(f, Phase::AssetCommon).unwrap(),
        Route::Setting(SettingField::X, Tier::CommonDefault)
    );
    assert_eq!(
        route(f, Phase::AssetLang).unwrap(),
        Route::Setting(SettingField::X, Tier::AssetLanguage)
    );
    assert_eq!(
        route(f, Phase::InstanceLang).unwrap(),
        Route::Setting(SettingField::X, Tier::InstanceLanguage)
    );
}

#[test]
fn auto_is_read_only() {
    let err = route(Field::Text, Phase::Auto).unwrap_err();
    assert!(err.to_string().contains("read-only"));
}

#[test]
fn context_has_no_asset_language_tier() {
    let err = route(Field::Context, Phase::AssetLang).unwrap_err();
    assert!(matches!(err, CascadeError::Classification(_)));
    assert_eq!(
        route(Field::Context, Phase::InstanceLang).unwrap(),
        Route::Context(Tier::InstanceLanguage)
    );
}

#[test]
fn categories_follow_phase() {
    assert_eq!(
        Field::Text.category(Phase::AssetLang).unwrap(),
        FieldCategory::AssetIdentity
    );
    assert_eq!(
        Field::Text.category(Phase::InstanceLang).unwrap(),
        FieldCategory::InstanceOnly
    );
    assert_eq!(
        Field::Setting(SettingField::Opacity)
            .category(Phase::AssetCommon)
            .unwrap(),
        FieldCategory::Setting
    );
    assert_eq!(
        Field::OverrideEnabled
            .category(Phase::InstanceLang)
            .unwrap(),
        FieldCategory::InstanceOnly
    );
    assert!(Field::OverrideEnabled.category(Phase::AssetLang).is_err());
    assert!(Field::Name.category(Phase::InstanceLang).is_err());
}
