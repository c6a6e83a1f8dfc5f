//! Three-state setting cells.
//!
//! A config file that omits a key and a config file that sets the key to its
//! zero value mean different things: the first defers to a lower-precedence
//! layer, the second overrides it. [`SettingValue`] keeps that distinction so
//! a project file can re-enable something the global file turned off.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A setting that is either absent or explicitly present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SettingValue<T> {
    /// The layer said nothing about this setting.
    #[default]
    Absent,
    /// The layer set this value explicitly.
    Present(T),
}

impl<T> SettingValue<T> {
    /// Whether the layer supplied a value.
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Whether the layer left this setting unset.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Borrow the value if present.
    pub fn as_option(&self) -> Option<&T> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent => None,
        }
    }

    /// Replace `self` with `other` when `other` is present.
    ///
    /// An absent `other` never clears an established value.
    pub fn merge(&mut self, other: SettingValue<T>) {
        if let Self::Present(value) = other {
            *self = Self::Present(value);
        }
    }

    /// Overwrite `target` when this cell is present.
    pub fn apply_to(self, target: &mut T) {
        if let Self::Present(value) = self {
            *target = value;
        }
    }
}

impl<T: Clone> SettingValue<T> {
    /// Resolve to a concrete value, falling back to `default` when absent.
    pub fn resolve(&self, default: &T) -> T {
        match self {
            Self::Present(value) => value.clone(),
            Self::Absent => default.clone(),
        }
    }
}

impl<T> From<Option<T>> for SettingValue<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Present(v),
            None => Self::Absent,
        }
    }
}

impl<T> From<SettingValue<T>> for Option<T> {
    fn from(value: SettingValue<T>) -> Self {
        match value {
            SettingValue::Present(v) => Some(v),
            SettingValue::Absent => None,
        }
    }
}

impl<T: Serialize> Serialize for SettingValue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Present(value) => value.serialize(serializer),
            Self::Absent => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for SettingValue<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Into::into)
    }
}
