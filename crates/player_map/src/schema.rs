//! Record layout and input table vocabulary
//!
//! A `Record` is the JSON value stored under each name. Which of its four
//! possible fields get written is decided by the `OutputSchema`:
//!
//! - `basic`    : graph_id, pos
//! - `extended` : graph_id, pos, id_player, rr

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Player table columns
pub mod player_columns {
    pub const PRIMARY_NAME: &str = "FANGRAPHSNAME";
    pub const ALTERNATE_NAME: &str = "YAHOONAME";
    pub const GRAPH_ID: &str = "IDFANGRAPHS";
    pub const POS: &str = "POS";
    pub const ID_PLAYER: &str = "IDPLAYER";
}

/// Team table columns
pub mod team_columns {
    pub const NAME: &str = "FANGRAPHSTEAM";
    pub const ABBR: &str = "FANGRAPHSABBR";
    pub const RR: &str = "FANGRAPHSRR";
}

/// Position marker written for every team record.
pub const TEAM_POS_MARKER: &str = "t";

/// Output attribute keys. Declaration order is serialization order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordField {
    GraphId,
    Pos,
    IdPlayer,
    Rr,
}

impl RecordField {
    pub const ALL: [RecordField; 4] =
        [RecordField::GraphId, RecordField::Pos, RecordField::IdPlayer, RecordField::Rr];

    pub fn as_str(self) -> &'static str {
        match self {
            RecordField::GraphId => "graph_id",
            RecordField::Pos => "pos",
            RecordField::IdPlayer => "id_player",
            RecordField::Rr => "rr",
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordField::ALL
            .into_iter()
            .find(|field| field.as_str() == s.trim())
            .ok_or_else(|| format!("Unknown record field: '{}'", s.trim()))
    }
}

/// Value stored under a name in the output map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<RecordField, String>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: RecordField, value: impl Into<String>) -> Self {
        self.0.insert(field, value.into());
        self
    }

    pub fn get(&self, field: RecordField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Which input vocabulary a table uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Players,
    Teams,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TableKind::Players => f.write_str("players"),
            TableKind::Teams => f.write_str("teams"),
        }
    }
}

/// Named field presets accepted wherever a schema is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaPreset {
    Basic,
    Extended,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SchemaRepr {
    Preset(SchemaPreset),
    Fields(Vec<RecordField>),
}

/// Set of record fields to emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SchemaRepr", into = "Vec<RecordField>")]
pub struct OutputSchema {
    fields: Vec<RecordField>,
}

impl OutputSchema {
    pub fn basic() -> Self {
        Self::from_fields([RecordField::GraphId, RecordField::Pos])
    }

    pub fn extended() -> Self {
        Self::from_fields(RecordField::ALL)
    }

    /// Sorted and deduplicated.
    pub fn from_fields(fields: impl IntoIterator<Item = RecordField>) -> Self {
        let mut fields: Vec<RecordField> = fields.into_iter().collect();
        fields.sort();
        fields.dedup();
        Self { fields }
    }

    pub fn contains(&self, field: RecordField) -> bool {
        self.fields.contains(&field)
    }

    pub fn fields(&self) -> &[RecordField] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for OutputSchema {
    fn default() -> Self {
        Self::extended()
    }
}

impl From<SchemaPreset> for OutputSchema {
    fn from(preset: SchemaPreset) -> Self {
        match preset {
            SchemaPreset::Basic => Self::basic(),
            SchemaPreset::Extended => Self::extended(),
        }
    }
}

impl From<SchemaRepr> for OutputSchema {
    fn from(repr: SchemaRepr) -> Self {
        match repr {
            SchemaRepr::Preset(preset) => preset.into(),
            SchemaRepr::Fields(fields) => Self::from_fields(fields),
        }
    }
}

impl From<OutputSchema> for Vec<RecordField> {
    fn from(schema: OutputSchema) -> Self {
        schema.fields
    }
}

/// Accepts `basic`, `extended`, or a comma-separated field list
/// such as `graph_id,pos,rr`.
impl FromStr for OutputSchema {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "basic" => Ok(Self::basic()),
            "extended" => Ok(Self::extended()),
            list => list
                .split(',')
                .filter(|part| !part.trim().is_empty())
                .map(RecordField::from_str)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::from_fields),
        }
    }
}
