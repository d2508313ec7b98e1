//! Walk one caption through the cascade: classify the editor focus, preview, write, re-read.
//!
//! The fmt subscriber prints duplicate z-order warnings to stderr.

use canvas_cascade::{
    ActiveTab, AssetId, CascadeConfig, CascadeResolver, CascadeWriter, EditContext,
    EditingTarget, FieldUpdate, Instance, InstanceId, Language, Page, PageId, PhaseClassifier,
    Project, SettingField, TextAsset,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let en = Language::from("en");
    let ja = Language::from("ja");
    let mut project = Project::new(vec![en.clone(), ja.clone()], en.clone());
    project.assets.insert(
        AssetId::from("caption"),
        TextAsset::new("Caption", "Once upon a time"),
    );
    project.assets.insert(AssetId::from("badge"), TextAsset::new("Badge", "New"));
    project.pages.push(Page {
        id: PageId::from("p1"),
        instances: vec![Instance::new("c1", "caption"), Instance::new("b1", "badge")],
    });

    let writer = CascadeWriter::new(CascadeConfig::default());
    let page = PageId::from("p1");
    let c1 = InstanceId::from("c1");

    // The user opens the Japanese tab of the caption asset.
    let ctx = EditContext {
        target: EditingTarget::Asset,
        active_tab: ActiveTab::Language(ja.clone()),
        current_language: en.clone(),
    };
    let selection = PhaseClassifier::classify(&ctx);
    let asset = project
        .asset(&AssetId::from("caption"))
        .ok_or_else(|| anyhow::anyhow!("caption asset missing"))?;
    let preview = selection.for_preview(asset, None, &writer.config().substitution);
    println!(
        "tab {} classified as {}, previewing as {}",
        selection.language, selection.phase, preview.phase
    );

    let report = writer.apply(
        project.asset_target(&AssetId::from("caption"))?,
        selection.phase,
        &selection.language,
        &[
            FieldUpdate::set(SettingField::Vertical, true),
            FieldUpdate::set(canvas_cascade::Field::Text, "むかしむかし"),
        ],
    )?;
    println!("wrote {:?} at {:?}", report.written, report.tier);

    // Then drags the caption on page 1 while viewing Japanese.
    let ctx = EditContext {
        target: EditingTarget::Instance,
        active_tab: ActiveTab::Language(ja.clone()),
        current_language: ja.clone(),
    };
    let selection = PhaseClassifier::classify(&ctx);
    writer.apply(
        project.instance_target(&page, &c1)?,
        selection.phase,
        &selection.language,
        &[
            FieldUpdate::set(SettingField::X, 120.0),
            FieldUpdate::set(SettingField::Y, 48.0),
        ],
    )?;

    let (asset, instance) = project
        .placement(&page, &c1)
        .ok_or_else(|| anyhow::anyhow!("instance c1 missing"))?;
    let asset = asset.ok_or_else(|| anyhow::anyhow!("c1 has a dangling asset"))?;
    for lang in [&en, &ja] {
        let text =
            CascadeResolver::resolve_text_with_source(asset, Some(instance), lang, preview.phase);
        let settings =
            CascadeResolver::resolve_settings(asset, Some(instance), lang, preview.phase);
        println!(
            "[{lang}] {:?} from {:?}, vertical={}, at ({}, {})",
            text.value, text.tier, settings.vertical, settings.x, settings.y
        );
    }

    // Both placements sit at the default z-order.
    if let Some(conflict) = project.check_z(&page, &c1, 0)? {
        println!(
            "z-order {} is shared with {}",
            conflict.z,
            conflict.conflicting_asset_names().join(", ")
        );
    }

    println!("{}", project.to_json_pretty()?);
    Ok(())
}
