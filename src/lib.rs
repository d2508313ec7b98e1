//! Attribute cascade resolution for multilingual canvas documents.
//!
//! A document places reusable text-bearing assets on pages. Every visual property of a
//! placement is resolved through a cascade of storage tiers:
//!
//! 1. **Instance language** overrides (this placement, this language)
//! 2. **Asset language** overrides (every placement, this language)
//! 3. **Common defaults** (mandatory, per asset)
//!
//! Which tiers are read, and which single tier receives writes, depends on the editing
//! [`Phase`]:
//!
//! - [`PhaseClassifier`]: UI focus (`EditContext`) to [`Phase`] + language
//! - [`CascadeResolver`]: `Phase + field + language -> effective value`
//! - [`CascadeWriter`]: `Phase + updates -> one committed state transition` (with tier cleanup)
//! - [`ConflictDetector`]: non-blocking warnings for duplicate z-order on a page
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Stateless**: every call receives the full snapshot it works on; phases are derived fresh
//!   per call and never cached.
//! - **Absent, never empty**: override maps with no entries are `None`, and serialize as
//!   omitted keys. Only the writer mutates tiers, and it re-checks this after every call.
//! - **No IO**: persistence and rendering are collaborators; the store is plain Serde data.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod cascade;
mod conflict;
mod foundation;
mod store;

pub use cascade::config::{CascadeConfig, FailurePolicy, SubstitutionPolicy};
pub use cascade::field::{Field, FieldCategory};
pub use cascade::phase::{
    ActiveTab, COMMON_TAB, EditContext, EditingTarget, Phase, PhaseClassifier, PhaseSelection,
    Tier,
};
pub use cascade::resolver::{CascadeResolver, Resolved};
pub use cascade::writer::{
    CascadeWriter, FieldUpdate, PurgeReport, RejectedUpdate, WriteReport, WriteTarget,
};
pub use conflict::detector::{ConflictDetector, ConflictingPlacement, ZConflict};
pub use foundation::error::{CascadeError, CascadeResult};
pub use foundation::ids::{AssetId, InstanceId, Language, PageId};
pub use store::model::{Instance, Page, Project, TextAsset};
pub use store::overrides::OverrideMap;
pub use store::settings::{
    CommonSettings, LanguageSettings, SettingField, SettingKind, SettingValue,
};
