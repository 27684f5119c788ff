//! Trainer core attributes.
//!
//! The "core" panel edits four scalar attributes of the save's CoreData
//! block. Each has a declared kind that decides both how raw input is
//! validated and how equality against the baseline is judged:
//!
//! | Field      | Kind           | Valid range                |
//! |------------|----------------|----------------------------|
//! | `name`     | string         | any (taken verbatim)       |
//! | `gender`   | enum ordinal   | [`Gender`] (0..=1)         |
//! | `tid`      | bounded integer| `0..=u32::MAX`             |
//! | `language` | enum ordinal   | [`Language`] (0..=9)       |
//!
//! Enums travel as their ordinal on the wire, never as names.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, FromRepr, IntoStaticStr};
use thiserror::Error;

/// An integer on the wire that names no variant of the target enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown {kind} ordinal {value}")]
pub struct UnknownOrdinal {
    pub kind: &'static str,
    pub value: u8,
}

/// Trainer gender.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
    Display, EnumIter, EnumString, FromRepr, IntoStaticStr,
)]
#[serde(try_from = "u8", into = "u8")]
#[strum(ascii_case_insensitive, serialize_all = "snake_case")]
#[repr(u8)]
pub enum Gender {
    #[default]
    Male = 0,
    Female = 1,
}

/// Trainer language, in save-file ordinal order.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
    Display, EnumIter, EnumString, FromRepr, IntoStaticStr,
)]
#[serde(try_from = "u8", into = "u8")]
#[strum(ascii_case_insensitive, serialize_all = "snake_case")]
#[repr(u8)]
pub enum Language {
    Kana = 0,
    Kanji = 1,
    #[default]
    English = 2,
    French = 3,
    Italian = 4,
    German = 5,
    Spanish = 6,
    Korean = 7,
    #[strum(to_string = "simp_chinese", serialize = "simp_ch")]
    SimpChinese = 8,
    #[strum(to_string = "trad_chinese", serialize = "trad_ch")]
    TradChinese = 9,
}

macro_rules! impl_ordinal_enum {
    ($T:ident, $kind:literal) => {
        impl $T {
            /// Wire ordinal.
            pub fn ordinal(self) -> u8 {
                self as u8
            }

            /// Parse user input: a decimal ordinal (what a select box submits)
            /// or a case-insensitive variant name. `None` means "discard".
            pub fn parse_input(raw: &str) -> Option<Self> {
                let raw = raw.trim();
                match raw.parse::<u8>() {
                    Ok(n) => Self::from_repr(n),
                    Err(_) => raw.parse().ok(),
                }
            }
        }

        impl From<$T> for u8 {
            fn from(v: $T) -> u8 {
                v as u8
            }
        }

        impl TryFrom<u8> for $T {
            type Error = UnknownOrdinal;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                Self::from_repr(value).ok_or(UnknownOrdinal { kind: $kind, value })
            }
        }
    };
}

impl_ordinal_enum!(Gender, "gender");
impl_ordinal_enum!(Language, "language");

/// Identifier of an editable core attribute.
///
/// The strum name is also the wire key in the `core` section of a diff.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
    Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(ascii_case_insensitive, serialize_all = "snake_case")]
pub enum CoreField {
    Name,
    Gender,
    #[strum(to_string = "tid", serialize = "trainer_id", serialize = "id")]
    Tid,
    Language,
}

impl CoreField {
    /// Key used in the modify request's `core` object.
    pub fn wire_key(self) -> &'static str {
        self.into()
    }
}

/// A typed value for one [`CoreField`].
///
/// Serializes untagged, so a `CoreValue` becomes exactly the JSON scalar the
/// reconciliation server expects for its field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CoreValue {
    Name(String),
    Gender(Gender),
    Tid(u32),
    Language(Language),
}

impl CoreValue {
    /// The field this value belongs to.
    pub fn field(&self) -> CoreField {
        match self {
            CoreValue::Name(_) => CoreField::Name,
            CoreValue::Gender(_) => CoreField::Gender,
            CoreValue::Tid(_) => CoreField::Tid,
            CoreValue::Language(_) => CoreField::Language,
        }
    }

    /// Validate raw text input for `field`.
    ///
    /// Returns `None` for anything outside the field's declared kind/range:
    /// non-numeric or negative trainer IDs, IDs past `u32::MAX`, and unknown
    /// enum ordinals. Names are taken verbatim (an empty name is legal here;
    /// the server substitutes a placeholder).
    pub fn parse(field: CoreField, raw: &str) -> Option<Self> {
        match field {
            CoreField::Name => Some(CoreValue::Name(raw.to_string())),
            CoreField::Gender => Gender::parse_input(raw).map(CoreValue::Gender),
            CoreField::Tid => raw.trim().parse::<u32>().ok().map(CoreValue::Tid),
            CoreField::Language => Language::parse_input(raw).map(CoreValue::Language),
        }
    }

    /// JSON form used in the diff payload.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            CoreValue::Name(s) => serde_json::Value::from(s.as_str()),
            CoreValue::Gender(g) => serde_json::Value::from(g.ordinal()),
            CoreValue::Tid(t) => serde_json::Value::from(*t),
            CoreValue::Language(l) => serde_json::Value::from(l.ordinal()),
        }
    }
}

impl fmt::Display for CoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreValue::Name(s) => write!(f, "{s:?}"),
            CoreValue::Gender(g) => write!(f, "{g} ({})", g.ordinal()),
            CoreValue::Tid(t) => write!(f, "{t}"),
            CoreValue::Language(l) => write!(f, "{l} ({})", l.ordinal()),
        }
    }
}

/// Core attributes as parsed from the save.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreData {
    pub name: String,
    pub gender: Gender,
    pub tid: u32,
    pub language: Language,
}

impl CoreData {
    /// Current value of `field`.
    pub fn value(&self, field: CoreField) -> CoreValue {
        match field {
            CoreField::Name => CoreValue::Name(self.name.clone()),
            CoreField::Gender => CoreValue::Gender(self.gender),
            CoreField::Tid => CoreValue::Tid(self.tid),
            CoreField::Language => CoreValue::Language(self.language),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
