pub(crate) mod config;
pub(crate) mod field;
pub(crate) mod phase;
pub(crate) mod resolver;
pub(crate) mod writer;
