pub(crate) mod model;
pub(crate) mod overrides;
pub(crate) mod settings;
