//! Player Map Builder
//!
//! CSV (player / team identifier tables) → name-keyed lookup JSON
//! consumed by the stats tooltip extension.

pub mod config;
pub mod error;
pub mod fold;
pub mod lookup;
pub mod mapper;
pub mod schema;
pub mod table;
pub mod writer;

use serde::{Deserialize, Serialize};
use tracing::info;

pub use config::{InputTable, MapperConfig, CONFIG_PATH_ENV};
pub use error::{MapError, Result};
pub use lookup::{find_names, NameMatch};
pub use mapper::{MapBuilder, PlayerMap, TableStats};
pub use schema::{OutputSchema, Record, RecordField, TableKind};
pub use writer::{verify_map, write_map};

/// Summary of one build run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildReport {
    /// Output file path
    pub output: String,
    /// Entries in the written map
    pub entries: usize,
    /// Per-table row statistics, in processing order
    pub tables: Vec<TableStats>,
    /// SHA256 of the written file (hex)
    pub checksum: String,
    /// Written file size (bytes)
    pub size: u64,
    /// Creation time (RFC3339)
    pub created_at: String,
}

impl BuildReport {
    pub fn total_rows(&self) -> u32 {
        self.tables.iter().map(|t| t.rows).sum()
    }

    pub fn total_overwritten(&self) -> u32 {
        self.tables.iter().map(|t| t.overwritten).sum()
    }
}

/// Build the map described by `config` and write it to `config.output`.
///
/// All tables are read before anything is written; any error leaves the
/// output path untouched.
pub fn build_player_map(config: &MapperConfig) -> Result<BuildReport> {
    config.validate()?;

    let (map, tables) = build_in_memory(config)?;
    let written = write_map(&map, &config.output)?;

    let report = BuildReport {
        output: config.output.display().to_string(),
        entries: map.len(),
        tables,
        checksum: written.checksum,
        size: written.size,
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    info!(entries = report.entries, rows = report.total_rows(), "build complete");
    Ok(report)
}

/// Read every input table into a map without writing anything.
pub fn build_in_memory(config: &MapperConfig) -> Result<(PlayerMap, Vec<TableStats>)> {
    let mut builder = MapBuilder::new(config.schema.clone())
        .fold_accents(config.fold_accents)
        .trim(config.trim);

    let mut tables = Vec::with_capacity(config.inputs.len());
    for input in &config.inputs {
        tables.push(builder.add_table(input.kind, &input.path)?);
    }

    Ok((builder.finish(), tables))
}

#[cfg(test)]
mod tests {
    use super::{
        build_player_map, verify_map, InputTable, MapBuilder, MapError, MapperConfig, OutputSchema,
        PlayerMap, RecordField,
    };
    use proptest::prelude::*;
    use std::collections::{BTreeMap, BTreeSet};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const PLAYER_HEADER: &str = "FANGRAPHSNAME,YAHOONAME,IDFANGRAPHS,POS,IDPLAYER\n";

    fn write_players(dir: &Path, rows: &[(String, String, String, String)]) -> std::path::PathBuf {
        let path = dir.join("players.csv");
        let mut writer = csv::Writer::from_path(&path).unwrap();
        writer.write_record(["FANGRAPHSNAME", "YAHOONAME", "IDFANGRAPHS", "POS", "IDPLAYER"]).unwrap();
        for (primary, alternate, id, pos) in rows {
            writer.write_record([primary, alternate, id, pos, id]).unwrap();
        }
        writer.flush().unwrap();
        path
    }

    #[test]
    fn test_end_to_end_extended() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let players = dir.path().join("PlayerMap.csv");
        let teams = dir.path().join("TeamMap.csv");
        let output = dir.path().join("map.json");

        fs::write(
            &players,
            format!("{PLAYER_HEADER}Enrique Hernández,Kiké Hernández,123,2B,hernaen02\n"),
        )?;
        fs::write(&teams, "FANGRAPHSTEAM,FANGRAPHSABBR,FANGRAPHSRR\nNYY,NYY,AL East\n")?;

        let config = MapperConfig::new(
            vec![InputTable::players(&players), InputTable::teams(&teams)],
            &output,
        );
        let report = build_player_map(&config)?;

        assert_eq!(report.entries, 3);
        assert_eq!(report.total_rows(), 2);
        assert!(verify_map(&output, &report.checksum)?);

        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output)?)?;
        let expected = serde_json::json!({
            "Enrique Hernández": { "graph_id": "123", "pos": "2B", "id_player": "hernaen02" },
            "Kiké Hernández": { "graph_id": "123", "pos": "2B", "id_player": "hernaen02" },
            "NYY": { "graph_id": "NYY", "id_player": "NYY", "pos": "t", "rr": "AL East" }
        });
        assert_eq!(json, expected);
        Ok(())
    }

    #[test]
    fn test_header_only_writes_empty_object() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let players = dir.path().join("players.csv");
        let output = dir.path().join("map.json");
        fs::write(&players, PLAYER_HEADER)?;

        let config = MapperConfig::new(vec![InputTable::players(&players)], &output)
            .with_schema(OutputSchema::basic());
        let report = build_player_map(&config)?;

        assert_eq!(report.entries, 0);
        assert_eq!(fs::read_to_string(&output)?, "{}");
        Ok(())
    }

    #[test]
    fn test_failed_run_leaves_output_untouched() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let players = dir.path().join("players.csv");
        let output = dir.path().join("map.json");
        fs::write(&players, "FANGRAPHSNAME,YAHOONAME\nMike Trout,Mike Trout\n")?;
        fs::write(&output, "{\"previous\": {}}")?;

        let config = MapperConfig::new(vec![InputTable::players(&players)], &output);
        let err = build_player_map(&config).unwrap_err();

        assert!(matches!(err, MapError::MissingField { line: None, .. }));
        assert_eq!(fs::read_to_string(&output)?, "{\"previous\": {}}");
        Ok(())
    }

    #[test]
    fn test_missing_team_file_aborts() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let players = dir.path().join("players.csv");
        let output = dir.path().join("map.json");
        fs::write(&players, PLAYER_HEADER)?;

        let config = MapperConfig::new(
            vec![InputTable::players(&players), InputTable::teams(dir.path().join("teams.csv"))],
            &output,
        );

        assert!(matches!(build_player_map(&config), Err(MapError::FileNotFound { .. })));
        assert!(!output.exists());
        Ok(())
    }

    #[test]
    fn test_invalid_utf8_is_encoding_error() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let players = dir.path().join("players.csv");
        let mut bytes = PLAYER_HEADER.as_bytes().to_vec();
        bytes.extend_from_slice(b"Jos\xE9 Ram\xEDrez,Jos\xE9 Ram\xEDrez,13510,3B,ramirjo01\n");
        fs::write(&players, bytes)?;

        let config = MapperConfig::new(vec![InputTable::players(&players)], dir.path().join("map.json"));
        assert!(matches!(build_player_map(&config), Err(MapError::Encoding { .. })));
        Ok(())
    }

    #[test]
    fn test_padded_names_are_distinct_by_default() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let players = dir.path().join("players.csv");
        let output = dir.path().join("map.json");
        fs::write(&players, format!("{PLAYER_HEADER}Mike Trout,Mike Trout ,10155, CF,troutmi01\n"))?;

        let config = MapperConfig::new(vec![InputTable::players(&players)], &output);
        let report = build_player_map(&config)?;
        let map = PlayerMap::load(&output)?;

        assert_eq!(report.entries, 2);
        assert!(map.contains("Mike Trout"));
        assert!(map.contains("Mike Trout "));
        assert_eq!(map.get("Mike Trout").unwrap().get(RecordField::Pos), Some(" CF"));

        let trimmed = MapperConfig { trim: true, ..config };
        assert_eq!(build_player_map(&trimmed)?.entries, 1);
        Ok(())
    }

    #[test]
    fn test_blank_header_aborts_instead_of_dropping_rows() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let players = dir.path().join("players.csv");
        let output = dir.path().join("map.json");
        fs::write(&players, "   \nMike Trout,Mike Trout,10155,CF,troutmi01\n")?;

        let config = MapperConfig::new(vec![InputTable::players(&players)], &output);
        assert!(matches!(
            build_player_map(&config),
            Err(MapError::MissingField { line: None, .. })
        ));
        assert!(!output.exists());
        Ok(())
    }

    #[test]
    fn test_input_beside_output_survives_write() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let players = dir.path().join("map.tmp");
        let output = dir.path().join("map.json");
        let contents = format!("{PLAYER_HEADER}Juan Soto,Juan Soto,20123,OF,sotoju01\n");
        fs::write(&players, &contents)?;

        let config = MapperConfig::new(vec![InputTable::players(&players)], &output);
        build_player_map(&config)?;

        assert_eq!(fs::read_to_string(&players)?, contents);
        assert_eq!(fs::read_dir(dir.path())?.count(), 2);
        Ok(())
    }

    fn name_strategy() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["Mike Trout", "Aaron Judge", "Juan Soto", "Kiké Hernández"])
            .prop_map(str::to_string)
    }

    fn row_strategy() -> impl Strategy<Value = (String, String, String, String)> {
        (name_strategy(), name_strategy(), 1u32..500, prop::sample::select(vec!["C", "SS", "OF"]))
            .prop_map(|(primary, alternate, id, pos)| (primary, alternate, id.to_string(), pos.to_string()))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_last_write_wins_and_key_set(rows in prop::collection::vec(row_strategy(), 0..12)) {
            let dir = TempDir::new().unwrap();
            let players = write_players(dir.path(), &rows);
            let output = dir.path().join("map.json");

            let config = MapperConfig::new(vec![InputTable::players(&players)], &output)
                .with_schema(OutputSchema::basic());
            build_player_map(&config).unwrap();
            let written = PlayerMap::load(&output).unwrap();

            // replay the rows in order with a plain map
            let mut expected: BTreeMap<String, (String, String)> = BTreeMap::new();
            let mut names = BTreeSet::new();
            for (primary, alternate, id, pos) in &rows {
                if primary != alternate {
                    expected.insert(alternate.clone(), (id.clone(), pos.clone()));
                    names.insert(alternate.clone());
                }
                expected.insert(primary.clone(), (id.clone(), pos.clone()));
                names.insert(primary.clone());
            }

            let written_names: BTreeSet<String> = written.names().map(str::to_string).collect();
            prop_assert_eq!(written_names, names);

            for (name, (id, pos)) in &expected {
                let record = written.get(name).unwrap();
                prop_assert_eq!(record.get(RecordField::GraphId), Some(id.as_str()));
                prop_assert_eq!(record.get(RecordField::Pos), Some(pos.as_str()));
                prop_assert_eq!(record.len(), 2);
            }
        }

        #[test]
        fn prop_single_row_entry_count(row in row_strategy()) {
            let dir = TempDir::new().unwrap();
            let players = write_players(dir.path(), std::slice::from_ref(&row));

            let mut builder = MapBuilder::new(OutputSchema::basic());
            builder.add_players(&players).unwrap();
            let map = builder.finish();

            let (primary, alternate, _, _) = &row;
            if primary == alternate {
                prop_assert_eq!(map.len(), 1);
            } else {
                prop_assert_eq!(map.len(), 2);
                prop_assert_eq!(map.get(primary), map.get(alternate));
            }
        }
    }
}
