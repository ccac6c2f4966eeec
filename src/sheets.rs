//! Sheet rows as the evaluator sees them, plus the column layout of every sheet
//! the evaluator reads by schema.

use serde::{Deserialize, Serialize};

use crate::text::EncodedText;

/// A single cell.
///
/// Deserialization is untagged: JSON booleans become [`ColumnValue::Bool`],
/// integers [`ColumnValue::Int`] (or [`ColumnValue::UInt`] above `i64::MAX`),
/// other numbers [`ColumnValue::Float`] and strings are parsed as macro-string
/// notation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnValue {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f32),
    String(EncodedText),
}

impl ColumnValue {
    pub fn as_text(&self) -> Option<&EncodedText> {
        match self {
            ColumnValue::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ColumnValue::Bool(b) => Some(*b as i64),
            ColumnValue::Int(v) => Some(*v),
            ColumnValue::UInt(v) => i64::try_from(*v).ok(),
            ColumnValue::Float(v) => Some(*v as i64),
            ColumnValue::String(_) => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            ColumnValue::Float(v) => Some(*v),
            other => other.as_i64().map(|v| v as f32),
        }
    }

    /// Culture-invariant rendering of a scalar cell; bools render as `0`/`1`.
    /// Text cells have no scalar rendering.
    pub fn format_scalar(&self) -> Option<String> {
        match self {
            ColumnValue::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
            ColumnValue::Int(v) => Some(v.to_string()),
            ColumnValue::UInt(v) => Some(v.to_string()),
            ColumnValue::Float(v) => Some(v.to_string()),
            ColumnValue::String(_) => None,
        }
    }
}

impl From<&str> for ColumnValue {
    fn from(value: &str) -> Self {
        ColumnValue::String(EncodedText::from_text(value))
    }
}

impl From<EncodedText> for ColumnValue {
    fn from(value: EncodedText) -> Self {
        ColumnValue::String(value)
    }
}

impl From<i64> for ColumnValue {
    fn from(value: i64) -> Self {
        ColumnValue::Int(value)
    }
}

impl From<bool> for ColumnValue {
    fn from(value: bool) -> Self {
        ColumnValue::Bool(value)
    }
}

impl From<f32> for ColumnValue {
    fn from(value: f32) -> Self {
        ColumnValue::Float(value)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SheetRow {
    pub row_id: u32,
    pub columns: Vec<ColumnValue>,
}

impl SheetRow {
    pub fn new(row_id: u32, columns: Vec<ColumnValue>) -> Self {
        Self { row_id, columns }
    }

    pub fn column(&self, index: usize) -> Option<&ColumnValue> {
        self.columns.get(index)
    }

    /// Text of a string column; missing or non-text columns read as empty.
    pub fn read_text(&self, index: usize) -> EncodedText {
        self.column(index)
            .and_then(ColumnValue::as_text)
            .cloned()
            .unwrap_or_default()
    }

    pub fn read_i64(&self, index: usize) -> Option<i64> {
        self.column(index).and_then(ColumnValue::as_i64)
    }

    pub fn read_u32(&self, index: usize) -> Option<u32> {
        self.read_i64(index).and_then(|v| u32::try_from(v).ok())
    }

    pub fn read_f32(&self, index: usize) -> Option<f32> {
        self.column(index).and_then(ColumnValue::as_f32)
    }
}

// Column layout of the sheets read by typed lookups.

pub mod addon {
    pub const NAME: &str = "Addon";
    pub const TEXT: usize = 0;
}

pub mod lobby {
    pub const NAME: &str = "Lobby";
    pub const TEXT: usize = 0;
}

pub mod log_message {
    pub const NAME: &str = "LogMessage";
    pub const TEXT: usize = 0;
}

pub mod completion {
    pub const NAME: &str = "Completion";
    pub const GROUP: usize = 0;
    pub const GROUP_TITLE: usize = 1;
    pub const LOOKUP_TABLE: usize = 2;
    pub const TEXT: usize = 3;
}

pub mod world {
    pub const NAME: &str = "World";
    pub const WORLD_NAME: usize = 0;
}

pub mod class_job {
    pub const NAME: &str = "ClassJob";
    pub const JOB_NAME: usize = 0;
}

pub mod status {
    pub const NAME: &str = "Status";
    pub const STATUS_NAME: usize = 0;
    pub const DESCRIPTION: usize = 1;
    pub const STATUS_CATEGORY: usize = 2;
}

pub mod territory_type {
    pub const NAME: &str = "TerritoryType";
    pub const PLACE_NAME: usize = 0;
}

pub mod place_name {
    pub const NAME: &str = "PlaceName";
    pub const PLACE_NAME: usize = 0;
}

pub mod map {
    pub const NAME: &str = "Map";
    pub const SIZE_FACTOR: usize = 0;
    pub const OFFSET_X: usize = 1;
    pub const OFFSET_Y: usize = 2;
    pub const PLACE_NAME: usize = 3;
}

pub mod level {
    pub const NAME: &str = "Level";
    pub const X: usize = 0;
    pub const Y: usize = 1;
    pub const Z: usize = 2;
    pub const MAP: usize = 3;
}

pub mod ui_color {
    pub const NAME: &str = "UIColor";
    pub const FOREGROUND: usize = 0;
}

pub mod item {
    pub const NAME: &str = "Item";
    pub const RARITY: usize = 0;
    pub const FILTER_GROUP: usize = 1;
}
