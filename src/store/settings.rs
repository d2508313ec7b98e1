//! The Scalar Property Set: the fixed collection of independently overridable scalar fields
//! shared by asset common defaults, asset per-language overrides and instance per-language
//! overrides.
//!
//! Fields are declared once in `setting_fields!`; the macro expands to the closed
//! [`SettingField`] enum, the partial [`LanguageSettings`] tier object and the complete
//! [`CommonSettings`] defaults, so adding a field forces every match in the crate to handle it.

use std::{fmt, str::FromStr};

use crate::foundation::error::{CascadeError, CascadeResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Primitive kind stored by a [`SettingField`].
pub enum SettingKind {
    /// Floating point number.
    Number,
    /// Signed integer.
    Integer,
    /// UTF-8 string.
    Text,
    /// Boolean flag.
    Flag,
}

impl SettingKind {
    /// Lowercase display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Text => "text",
            Self::Flag => "flag",
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
/// A primitive scalar value.
///
/// JSON integers decode as [`SettingValue::Integer`] and other numbers as
/// [`SettingValue::Number`]; numeric fields accept either when the conversion is lossless.
pub enum SettingValue {
    /// Boolean flag.
    Flag(bool),
    /// Signed integer.
    Integer(i32),
    /// Floating point number.
    Number(f64),
    /// UTF-8 string.
    Text(String),
}

impl SettingValue {
    /// Kind of this value.
    pub fn kind(&self) -> SettingKind {
        match self {
            Self::Flag(_) => SettingKind::Flag,
            Self::Integer(_) => SettingKind::Integer,
            Self::Number(_) => SettingKind::Number,
            Self::Text(_) => SettingKind::Text,
        }
    }

    /// `true` for the empty string, which override tiers treat as "no value".
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }

    /// Numeric view (integers widen).
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Number(v) => Some(v),
            Self::Integer(v) => Some(f64::from(v)),
            _ => None,
        }
    }

    /// Integer view (integral numbers narrow).
    pub fn as_i32(&self) -> Option<i32> {
        match *self {
            Self::Integer(v) => Some(v),
            Self::Number(v) => integral_f64_to_i32(v),
            _ => None,
        }
    }

    /// String view.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Flag view.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Flag(b) => Some(b),
            _ => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(b) => write!(f, "{b}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<f64> for SettingValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for SettingValue {
    fn from(v: i32) -> Self {
        Self::Integer(v)
    }
}

impl From<bool> for SettingValue {
    fn from(v: bool) -> Self {
        Self::Flag(v)
    }
}

impl From<&str> for SettingValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

fn integral_f64_to_i32(v: f64) -> Option<i32> {
    if v.fract() == 0.0 && v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX) {
        Some(v as i32)
    } else {
        None
    }
}

/// Rust storage type for one [`SettingKind`].
pub(crate) trait Scalar: Sized + Clone {
    const KIND: SettingKind;

    fn into_value(self) -> SettingValue;

    fn try_from_value(value: &SettingValue) -> Option<Self>;

    fn from_value(field: SettingField, value: SettingValue) -> CascadeResult<Self> {
        Self::try_from_value(&value).ok_or_else(|| CascadeError::TypeMismatch {
            field: field.name().to_string(),
            expected: Self::KIND.name(),
            found: value.kind().name(),
        })
    }
}

impl Scalar for f64 {
    const KIND: SettingKind = SettingKind::Number;

    fn into_value(self) -> SettingValue {
        SettingValue::Number(self)
    }

    fn try_from_value(value: &SettingValue) -> Option<Self> {
        value.as_f64()
    }
}

impl Scalar for i32 {
    const KIND: SettingKind = SettingKind::Integer;

    fn into_value(self) -> SettingValue {
        SettingValue::Integer(self)
    }

    fn try_from_value(value: &SettingValue) -> Option<Self> {
        value.as_i32()
    }
}

impl Scalar for String {
    const KIND: SettingKind = SettingKind::Text;

    fn into_value(self) -> SettingValue {
        SettingValue::Text(self)
    }

    fn try_from_value(value: &SettingValue) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl Scalar for bool {
    const KIND: SettingKind = SettingKind::Flag;

    fn into_value(self) -> SettingValue {
        SettingValue::Flag(self)
    }

    fn try_from_value(value: &SettingValue) -> Option<Self> {
        value.as_bool()
    }
}

macro_rules! setting_fields {
    ($( $(#[$doc:meta])* $variant:ident => $field:ident : $ty:ty = $default:expr; )*) => {
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(rename_all = "snake_case")]
        /// One field of the Scalar Property Set.
        pub enum SettingField {
            $( $(#[$doc])* $variant, )*
        }

        impl SettingField {
            /// Every field, in declaration order.
            pub const ALL: &'static [SettingField] = &[$(SettingField::$variant,)*];

            /// Stable snake_case name (also the serialized key).
            pub fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => stringify!($field), )*
                }
            }

            /// Primitive kind stored by this field.
            pub fn kind(self) -> SettingKind {
                match self {
                    $( Self::$variant => <$ty as Scalar>::KIND, )*
                }
            }
        }

        impl FromStr for SettingField {
            type Err = CascadeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( stringify!($field) => Ok(Self::$variant), )*
                    _ => Err(CascadeError::unknown_field(s)),
                }
            }
        }

        #[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(deny_unknown_fields)]
        /// Partial Scalar Property Set stored by an override tier for one language.
        ///
        /// Every field is independently optional; `None` means "not overridden here".
        pub struct LanguageSettings {
            $(
                $(#[$doc])*
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub $field: Option<$ty>,
            )*
        }

        impl LanguageSettings {
            /// Value stored for `field`, if present at this tier.
            pub fn get(&self, field: SettingField) -> Option<SettingValue> {
                match field {
                    $( SettingField::$variant => self.$field.clone().map(Scalar::into_value), )*
                }
            }

            /// `true` when `field` is present (regardless of its value).
            pub fn contains(&self, field: SettingField) -> bool {
                match field {
                    $( SettingField::$variant => self.$field.is_some(), )*
                }
            }

            /// Store `value` for `field`, checking its kind.
            pub fn set(&mut self, field: SettingField, value: SettingValue) -> CascadeResult<()> {
                match field {
                    $( SettingField::$variant => {
                        self.$field = Some(<$ty as Scalar>::from_value(field, value)?);
                    } )*
                }
                Ok(())
            }

            /// Remove `field`; returns whether it was present.
            pub fn clear(&mut self, field: SettingField) -> bool {
                match field {
                    $( SettingField::$variant => self.$field.take().is_some(), )*
                }
            }

            /// `true` when no field is present.
            pub fn is_empty(&self) -> bool {
                true $( && self.$field.is_none() )*
            }

            /// Copy every present field onto `target`.
            pub fn apply_to(&self, target: &mut CommonSettings) {
                $(
                    if let Some(v) = &self.$field {
                        target.$field = v.clone();
                    }
                )*
            }

            /// Partial set with every field present, copied from `complete`.
            pub fn from_complete(complete: &CommonSettings) -> Self {
                Self {
                    $( $field: Some(complete.$field.clone()), )*
                }
            }

            /// Present fields in declaration order.
            pub fn present_fields(&self) -> Vec<SettingField> {
                SettingField::ALL
                    .iter()
                    .copied()
                    .filter(|f| self.contains(*f))
                    .collect()
            }
        }

        #[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(default, deny_unknown_fields)]
        /// Complete Scalar Property Set: the mandatory common defaults of an asset.
        pub struct CommonSettings {
            $(
                $(#[$doc])*
                pub $field: $ty,
            )*
        }

        impl Default for CommonSettings {
            fn default() -> Self {
                Self {
                    $( $field: $default, )*
                }
            }
        }

        impl CommonSettings {
            /// Value of `field` (always present).
            pub fn get(&self, field: SettingField) -> SettingValue {
                match field {
                    $( SettingField::$variant => self.$field.clone().into_value(), )*
                }
            }

            /// Replace `field`, checking its kind.
            pub fn set(&mut self, field: SettingField, value: SettingValue) -> CascadeResult<()> {
                match field {
                    $( SettingField::$variant => {
                        self.$field = <$ty as Scalar>::from_value(field, value)?;
                    } )*
                }
                Ok(())
            }
        }
    };
}

setting_fields! {
    /// Font identifier.
    FontFamily => font_family: String = String::from("sans-serif");
    /// Font size in points.
    FontSize => font_size: f64 = 16.0;
    /// Line spacing multiplier.
    LineHeight => line_height: f64 = 1.2;
    /// Vertical writing direction.
    Vertical => vertical: bool = false;
    /// Fill color (CSS color string).
    Fill => fill: String = String::from("#000000");
    /// Stroke color (CSS color string).
    Stroke => stroke: String = String::from("#000000");
    /// Stroke width.
    StrokeWidth => stroke_width: f64 = 0.0;
    /// Position X.
    X => x: f64 = 0.0;
    /// Position Y.
    Y => y: f64 = 0.0;
    /// Horizontal scale.
    ScaleX => scale_x: f64 = 1.0;
    /// Vertical scale.
    ScaleY => scale_y: f64 = 1.0;
    /// Rotation in degrees.
    Rotation => rotation: f64 = 0.0;
    /// Per-character rotation in degrees.
    CharRotation => char_rotation: f64 = 0.0;
    /// Opacity.
    Opacity => opacity: f64 = 1.0;
    /// Layering order.
    ZIndex => z_index: i32 = 0;
}

impl fmt::Display for SettingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/settings.rs"]
mod tests;
