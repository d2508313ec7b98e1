use super::*;

#[test]
fn field_names_roundtrip_through_from_str() {
    for field in SettingField::ALL {
        let parsed: SettingField = field.name().parse().unwrap();
        assert_eq!(parsed, *field);
    }
    assert_eq!(SettingField::ALL.len(), 15);
}

#[test]
fn unknown_field_name_is_rejected() {
    let err = "letter_spacing".parse::<SettingField>().unwrap_err();
    assert!(matches!(err, CascadeError::UnknownField(name) if name == "letter_spacing"));
}

#[test]
fn serde_name_matches_field_name() {
    let json = serde_json::to_string(&SettingField::CharRotation).unwrap();
    assert_eq!(json, "\"char_rotation\"");
}

#[test]
fn z_index_is_the_only_integer_field() {
    let ints: Vec<_> = SettingField::ALL
        .iter()
        .filter(|f| f.kind() == SettingKind::Integer)
        .collect();
    assert_eq!(ints, [&SettingField::ZIndex]);
    assert_eq!(SettingField::Vertical.kind(), SettingKind::Flag);
    assert_eq!(SettingField::Fill.kind(), SettingKind::Text);
}

#[test]
fn presence_is_tracked_independently_of_truthiness() {
    let mut s = LanguageSettings::default();
    assert!(s.is_empty());

    s.set(SettingField::Opacity, SettingValue::Number(0.0)).unwrap();
    s.set(SettingField::Vertical, SettingValue::Flag(false)).unwrap();
    s.set(SettingField::FontFamily, SettingValue::from("")).unwrap();

    assert!(s.contains(SettingField::Opacity));
    assert_eq!(s.get(SettingField::Opacity), Some(SettingValue::Number(0.0)));
    assert_eq!(s.get(SettingField::Vertical), Some(SettingValue::Flag(false)));
    assert_eq!(s.get(SettingField::FontFamily), Some(SettingValue::from("")));
    assert_eq!(
        s.present_fields(),
        [
            SettingField::FontFamily,
            SettingField::Vertical,
            SettingField::Opacity
        ]
    );
}

#[test]
fn clear_reports_presence_and_empties() {
    let mut s = LanguageSettings::default();
    s.set(SettingField::X, SettingValue::Number(4.0)).unwrap();
    assert!(s.clear(SettingField::X));
    assert!(!s.clear(SettingField::X));
    assert!(s.is_empty());
}

#[test]
fn kind_mismatch_is_rejected() {
    let mut s = LanguageSettings::default();
    let err = s
        .set(SettingField::Opacity, SettingValue::from("half"))
        .unwrap_err();
    assert!(matches!(
        err,
        CascadeError::TypeMismatch {
            expected: "number",
            found: "text",
            ..
        }
    ));
    assert!(s.is_empty());
}

#[test]
fn numeric_fields_accept_lossless_conversions() {
    let mut s = LanguageSettings::default();
    s.set(SettingField::Opacity, SettingValue::Integer(1)).unwrap();
    assert_eq!(s.opacity, Some(1.0));

    s.set(SettingField::ZIndex, SettingValue::Number(3.0)).unwrap();
    assert_eq!(s.z_index, Some(3));

    assert!(s.set(SettingField::ZIndex, SettingValue::Number(3.5)).is_err());
}

#[test]
fn language_settings_omit_absent_fields() {
    let mut s = LanguageSettings::default();
    s.set(SettingField::ScaleX, SettingValue::Number(2.0)).unwrap();
    let json = serde_json::to_string(&s).unwrap();
    assert_eq!(json, r#"{"scale_x":2.0}"#);
}

#[test]
fn common_settings_fill_missing_keys_with_defaults() {
    let c: CommonSettings = serde_json::from_str(r#"{"z_index":5}"#).unwrap();
    assert_eq!(c.z_index, 5);
    assert_eq!(c.opacity, 1.0);
    assert_eq!(c.get(SettingField::ScaleY), SettingValue::Number(1.0));
}

#[test]
fn untagged_values_decode_by_shape() {
    let v: Vec<SettingValue> = serde_json::from_str(r#"[true, 5, 0.5, "x"]"#).unwrap();
    assert_eq!(
        v,
        [
            SettingValue::Flag(true),
            SettingValue::Integer(5),
            SettingValue::Number(0.5),
            SettingValue::from("x"),
        ]
    );
}

#[test]
fn apply_to_overlays_only_present_fields() {
    let mut common = CommonSettings::default();
    let mut s = LanguageSettings::default();
    s.set(SettingField::Fill, SettingValue::from("#ff0000")).unwrap();
    s.apply_to(&mut common);
    assert_eq!(common.fill, "#ff0000");
    assert_eq!(common.stroke, CommonSettings::default().stroke);
}

#[test]
fn from_complete_marks_every_field_present() {
    let s = LanguageSettings::from_complete(&CommonSettings::default());
    assert_eq!(s.present_fields().len(), SettingField::ALL.len());
    let mut back = CommonSettings {
        z_index: 9,
        ..CommonSettings::default()
    };
    s.apply_to(&mut back);
    assert_eq!(back, CommonSettings::default());
}
