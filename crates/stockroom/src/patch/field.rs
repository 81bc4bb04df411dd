use serde::{Deserialize, Deserializer};

/// An update field that is either omitted or explicitly set.
///
/// `Field<Option<T>>` distinguishes "leave as is" (`Absent`) from "clear the
/// column" (`Set(None)`, sent as JSON `null`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    Absent,
    Set(T),
}

impl<T> Field<T> {
    pub fn is_set(&self) -> bool {
        matches!(self, Field::Set(_))
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Field::Set(v) => Some(v),
            Field::Absent => None,
        }
    }
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Absent
    }
}

impl<T> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Field::Set(value)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Field::Set)
    }
}
