//! Name → Record map construction
//!
//! Player rows can be known by two names (primary and alternate vocabularies,
//! e.g. "Enrique Hernández" vs "Kiké Hernández"). Both names get their own
//! copy of the record. Team rows are keyed by the team name only.
//!
//! Every insert is last-write-wins, across rows and across tables.

use crate::error::{MapError, Result};
use crate::fold::fold_accents;
use crate::schema::{player_columns, team_columns, OutputSchema, Record, RecordField, TableKind};
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Lookup map written to the output JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerMap {
    entries: BTreeMap<String, Record>,
}

impl PlayerMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. Returns the replaced record, if any.
    pub fn insert(&mut self, name: impl Into<String>, record: Record) -> Option<Record> {
        self.entries.insert(name.into(), record)
    }

    pub fn get(&self, name: &str) -> Option<&Record> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Load a previously written map.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(MapError::FileNotFound { path: path.to_path_buf() });
        }
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Row statistics for one input table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableStats {
    pub kind: TableKind,
    pub path: String,
    pub rows: u32,
    /// Entries inserted under a second name (alternate or accent-folded).
    pub aliases: u32,
    /// Inserts that replaced an existing entry.
    pub overwritten: u32,
}

impl TableStats {
    fn new(kind: TableKind, path: &Path) -> Self {
        Self { kind, path: path.display().to_string(), rows: 0, aliases: 0, overwritten: 0 }
    }
}

/// Builds a [`PlayerMap`] from input tables.
pub struct MapBuilder {
    map: PlayerMap,
    schema: OutputSchema,
    fold_accents: bool,
    trim: bool,
}

impl MapBuilder {
    pub fn new(schema: OutputSchema) -> Self {
        Self { map: PlayerMap::new(), schema, fold_accents: false, trim: false }
    }

    /// Also insert accent-folded copies of every key.
    pub fn fold_accents(mut self, enabled: bool) -> Self {
        self.fold_accents = enabled;
        self
    }

    /// Trim whitespace around every CSV field.
    pub fn trim(mut self, enabled: bool) -> Self {
        self.trim = enabled;
        self
    }

    pub fn add_table(&mut self, kind: TableKind, path: &Path) -> Result<TableStats> {
        let stats = match kind {
            TableKind::Players => self.add_players(path)?,
            TableKind::Teams => self.add_teams(path)?,
        };

        info!(
            table = %kind,
            path = %path.display(),
            rows = stats.rows,
            aliases = stats.aliases,
            overwritten = stats.overwritten,
            "table loaded"
        );
        Ok(stats)
    }

    pub fn add_players(&mut self, path: &Path) -> Result<TableStats> {
        let mut stats = TableStats::new(TableKind::Players, path);
        let mut table = Table::open(path, self.trim)?;
        if table.has_no_header() {
            return Ok(stats);
        }

        let primary = table.column(player_columns::PRIMARY_NAME)?;
        let alternate = table.column(player_columns::ALTERNATE_NAME)?;
        let graph_id =
            table.column_if(player_columns::GRAPH_ID, self.schema.contains(RecordField::GraphId))?;
        let pos = table.column_if(player_columns::POS, self.schema.contains(RecordField::Pos))?;
        let id_player =
            table.column_if(player_columns::ID_PLAYER, self.schema.contains(RecordField::IdPlayer))?;

        for row in table.rows() {
            let row = row?;
            stats.rows += 1;

            let mut record = Record::new();
            if let Some(v) = row.get_opt(graph_id.as_ref())? {
                record = record.with(RecordField::GraphId, v);
            }
            if let Some(v) = row.get_opt(pos.as_ref())? {
                record = record.with(RecordField::Pos, v);
            }
            if let Some(v) = row.get_opt(id_player.as_ref())? {
                record = record.with(RecordField::IdPlayer, v);
            }

            let primary_name = row.get(&primary)?;
            let alternate_name = row.get(&alternate)?;

            if alternate_name != primary_name {
                self.put(alternate_name, record.clone(), &mut stats);
                stats.aliases += 1;
            }
            self.put(primary_name, record, &mut stats);
        }

        Ok(stats)
    }

    pub fn add_teams(&mut self, path: &Path) -> Result<TableStats> {
        let mut stats = TableStats::new(TableKind::Teams, path);
        let mut table = Table::open(path, self.trim)?;
        if table.has_no_header() {
            return Ok(stats);
        }

        let needs_abbr = self.schema.contains(RecordField::GraphId)
            || self.schema.contains(RecordField::IdPlayer);
        let name = table.column(team_columns::NAME)?;
        let abbr = table.column_if(team_columns::ABBR, needs_abbr)?;
        let rr = table.column_if(team_columns::RR, self.schema.contains(RecordField::Rr))?;

        for row in table.rows() {
            let row = row?;
            stats.rows += 1;

            let mut record = Record::new();
            if let Some(abbr) = row.get_opt(abbr.as_ref())? {
                if self.schema.contains(RecordField::GraphId) {
                    record = record.with(RecordField::GraphId, abbr);
                }
                if self.schema.contains(RecordField::IdPlayer) {
                    record = record.with(RecordField::IdPlayer, abbr);
                }
            }
            if self.schema.contains(RecordField::Pos) {
                record = record.with(RecordField::Pos, crate::schema::TEAM_POS_MARKER);
            }
            if let Some(v) = row.get_opt(rr.as_ref())? {
                record = record.with(RecordField::Rr, v);
            }

            self.put(row.get(&name)?, record, &mut stats);
        }

        Ok(stats)
    }

    /// Insert `record` under `name`, plus its folded alias when enabled.
    fn put(&mut self, name: &str, record: Record, stats: &mut TableStats) {
        if self.fold_accents {
            let folded = fold_accents(name);
            if folded != name {
                self.insert_counted(folded, record.clone(), stats);
                stats.aliases += 1;
            }
        }
        self.insert_counted(name.to_string(), record, stats);
    }

    fn insert_counted(&mut self, name: String, record: Record, stats: &mut TableStats) {
        if let Some(previous) = self.map.insert(name.clone(), record) {
            stats.overwritten += 1;
            debug!(name = %name, ?previous, "entry overwritten");
        }
    }

    pub fn map(&self) -> &PlayerMap {
        &self.map
    }

    pub fn finish(self) -> PlayerMap {
        self.map
    }
}
