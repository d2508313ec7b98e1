use super::*;
use crate::store::settings::{SettingField, SettingValue};

fn lang(s: &str) -> Language {
    Language::from(s)
}

fn sample_project() -> Project {
    let mut project = Project::new(vec![lang("en"), lang("ja")], lang("en"));
    project
        .assets
        .insert(AssetId::from("title"), TextAsset::new("Title", "Hello"));
    project.pages.push(Page {
        id: PageId::from("p1"),
        instances: vec![Instance::new("i1", "title")],
    });
    project
}

#[test]
fn new_adds_current_language_to_supported_list() {
    let project = Project::new(vec![lang("ja")], lang("en"));
    assert_eq!(project.supported_languages, [lang("ja"), lang("en")]);
    assert!(project.validate().is_ok());
}

#[test]
fn sample_project_is_valid() {
    sample_project().validate().unwrap();
}

#[test]
fn absent_maps_are_omitted_from_json() {
    let json = sample_project().to_json().unwrap();
    assert!(!json.contains("language_overrides"));
    assert!(!json.contains("text_overrides"));
    assert!(!json.contains("setting_overrides"));
    assert!(!json.contains("context_override"));
    assert!(!json.contains("{}"));
}

#[test]
fn json_roundtrip_preserves_snapshot() {
    let mut project = sample_project();
    let mut settings = LanguageSettings::default();
    settings
        .set(SettingField::FontSize, SettingValue::Number(24.0))
        .unwrap();
    project.assets.get_mut(&AssetId::from("title")).unwrap().language_overrides =
        Some(OverrideMap::from([(lang("ja"), settings)]));

    let json = project.to_json_pretty().unwrap();
    let back = Project::from_json(&json).unwrap();
    assert_eq!(back, project);
    assert_eq!(back.to_json_pretty().unwrap(), json);
}

#[test]
fn empty_override_map_is_rejected() {
    let mut project = sample_project();
    project.assets.get_mut(&AssetId::from("title")).unwrap().text_overrides =
        Some(OverrideMap::new());
    let err = project.validate().unwrap_err();
    assert!(err.to_string().contains("absent rather than empty"));
}

#[test]
fn empty_language_entry_is_rejected() {
    let mut project = sample_project();
    project.pages[0].instances[0].setting_overrides =
        Some(OverrideMap::from([(lang("en"), LanguageSettings::default())]));
    let err = project.validate().unwrap_err();
    assert!(err.to_string().contains("empty entry for 'en'"));
}

#[test]
fn empty_context_override_is_rejected() {
    let mut project = sample_project();
    project.pages[0].instances[0].context_override = Some(String::new());
    assert!(project.validate().is_err());
}

#[test]
fn unsupported_override_language_is_rejected() {
    let mut project = sample_project();
    project.pages[0].instances[0].text_overrides =
        Some(OverrideMap::from([(lang("de"), "Hallo".to_string())]));
    let err = project.validate().unwrap_err();
    assert!(err.to_string().contains("unsupported language 'de'"));
}

#[test]
fn current_language_must_be_supported() {
    let mut project = sample_project();
    project.current_language = lang("fr");
    assert!(project.validate().is_err());
}

#[test]
fn duplicate_instance_ids_are_rejected() {
    let mut project = sample_project();
    project.pages[0]
        .instances
        .push(Instance::new("i1", "title"));
    assert!(project.validate().is_err());
}

#[test]
fn dangling_asset_reference_is_allowed() {
    let mut project = sample_project();
    project.pages[0]
        .instances
        .push(Instance::new("i2", "deleted-asset"));
    project.validate().unwrap();

    let (asset, instance) = project
        .placement(&PageId::from("p1"), &InstanceId::from("i2"))
        .unwrap();
    assert!(asset.is_none());
    assert_eq!(instance.asset, AssetId::from("deleted-asset"));
}

#[test]
fn from_json_reports_serde_errors() {
    let err = Project::from_json("{not json").unwrap_err();
    assert!(matches!(err, CascadeError::Serde(_)));
}

#[test]
fn override_presence_helpers() {
    let mut asset = TextAsset::new("Title", "Hello");
    assert!(!asset.has_language_override(&lang("ja")));
    asset.text_overrides = Some(OverrideMap::from([(lang("ja"), "Konnichiwa".to_string())]));
    assert!(asset.has_language_override(&lang("ja")));
    assert_eq!(asset.text_override(&lang("ja")), Some("Konnichiwa"));

    let mut instance = Instance::new("i1", "title");
    instance.context_override = Some("note".to_string());
    assert!(!instance.has_language_override(&lang("ja")));
}

#[test]
fn asset_key_is_its_identity() {
    let mut project = sample_project();
    let title = project.assets.remove(&AssetId::from("title")).unwrap();
    project.assets.insert(AssetId::from(" "), title);
    let err = project.validate().unwrap_err();
    assert!(matches!(err, CascadeError::Validation(_)));

    let json = sample_project().to_json().unwrap();
    assert!(json.contains(r#""assets":{"title":{"name":"Title""#));
}

#[test]
fn lookups_by_page_and_instance() {
    let mut project = sample_project();
    let (p1, i1) = (PageId::from("p1"), InstanceId::from("i1"));
    assert_eq!(project.instance(&p1, &i1).map(|i| &i.asset), Some(&AssetId::from("title")));
    assert!(project.instance(&PageId::from("p2"), &i1).is_none());

    project.instance_mut(&p1, &i1).unwrap().context_override = Some("note".to_string());
    assert_eq!(
        project.instance(&p1, &i1).unwrap().context_override.as_deref(),
        Some("note")
    );
    project.asset_mut(&AssetId::from("title")).unwrap().name = "Heading".to_string();
    assert_eq!(project.asset(&AssetId::from("title")).unwrap().name, "Heading");
}
