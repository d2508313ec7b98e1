/// Convenience result type used across the crate.
pub type CascadeResult<T> = Result<T, CascadeError>;

#[derive(thiserror::Error, Debug)]
/// Top-level error type for the cascade engine.
///
/// Every variant except [`CascadeError::Validation`] and [`CascadeError::Serde`] signals a
/// programmer error (a caller asked for a read or write the tier model cannot express). Expected
/// absence of an override is never an error, and z-order conflicts are reported as
/// [`crate::ZConflict`] values instead.
pub enum CascadeError {
    /// Field cannot be read or written under the requested phase.
    #[error("classification error: {0}")]
    Classification(String),

    /// Field name does not name a known field.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Value kind does not match the field's kind.
    #[error("type mismatch for '{field}': expected {expected}, found {found}")]
    TypeMismatch {
        /// Field that received the value.
        field: String,
        /// Kind the field stores.
        expected: &'static str,
        /// Kind of the rejected value.
        found: &'static str,
    },

    /// Attempt to clear a value in a tier with no lower fallback.
    #[error("missing default: {0}")]
    MissingDefault(String),

    /// An instance-tier operation was requested without an instance.
    #[error("instance required for instance-tier phase")]
    MissingInstance,

    /// Snapshot violates a structural invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// JSON encoding/decoding failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CascadeError {
    /// Build a [`CascadeError::Classification`] value.
    pub fn classification(msg: impl Into<String>) -> Self {
        Self::Classification(msg.into())
    }

    /// Build a [`CascadeError::UnknownField`] value.
    pub fn unknown_field(name: impl Into<String>) -> Self {
        Self::UnknownField(name.into())
    }

    /// Build a [`CascadeError::MissingDefault`] value.
    pub fn missing_default(msg: impl Into<String>) -> Self {
        Self::MissingDefault(msg.into())
    }

    /// Build a [`CascadeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CascadeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for the programmer-error variants a lenient writer may absorb.
    pub fn is_programmer_error(&self) -> bool {
        matches!(
            self,
            Self::Classification(_)
                | Self::UnknownField(_)
                | Self::TypeMismatch { .. }
                | Self::MissingDefault(_)
                | Self::MissingInstance
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
