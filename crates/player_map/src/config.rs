//! Run configuration
//!
//! ```json
//! {
//!     "inputs": [
//!         { "kind": "players", "path": "PlayerMap3-23.csv" },
//!         { "kind": "teams", "path": "TeamMap.csv" }
//!     ],
//!     "output": "map.json",
//!     "schema": "extended",
//!     "fold_accents": false
//! }
//! ```

use crate::error::{MapError, Result};
use crate::schema::{OutputSchema, TableKind};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Env var naming a JSON config file.
pub const CONFIG_PATH_ENV: &str = "PLAYER_MAP_CONFIG";

/// One input table, processed in list order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputTable {
    pub kind: TableKind,
    pub path: PathBuf,
}

impl InputTable {
    pub fn players(path: impl Into<PathBuf>) -> Self {
        Self { kind: TableKind::Players, path: path.into() }
    }

    pub fn teams(path: impl Into<PathBuf>) -> Self {
        Self { kind: TableKind::Teams, path: path.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapperConfig {
    pub inputs: Vec<InputTable>,
    pub output: PathBuf,
    #[serde(default)]
    pub schema: OutputSchema,
    #[serde(default)]
    pub fold_accents: bool,
    #[serde(default)]
    pub trim: bool,
}

impl MapperConfig {
    pub fn new(inputs: Vec<InputTable>, output: impl Into<PathBuf>) -> Self {
        Self {
            inputs,
            output: output.into(),
            schema: OutputSchema::default(),
            fold_accents: false,
            trim: false,
        }
    }

    pub fn with_schema(mut self, schema: OutputSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| MapError::Config(format!("malformed config: {e}")))
    }

    /// Read and validate a config file. Relative table and output paths
    /// are resolved against the config file's directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| {
            MapError::Config(format!("failed to read config '{}': {e}", path.display()))
        })?;
        let mut config = Self::from_json(&json)?;

        if let Some(base) = path.parent() {
            for input in &mut config.inputs {
                input.path = rebase(base, &input.path);
            }
            config.output = rebase(base, &config.output);
        }

        config.validate()?;
        Ok(config)
    }

    /// Config named by `PLAYER_MAP_CONFIG`, if set and non-empty.
    pub fn from_env() -> Result<Option<Self>> {
        let Ok(path) = env::var(CONFIG_PATH_ENV) else {
            return Ok(None);
        };
        let path = path.trim();
        if path.is_empty() {
            return Ok(None);
        }
        Self::from_file(Path::new(path)).map(Some)
    }

    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            return Err(MapError::Config("no input tables".to_string()));
        }
        if self.schema.is_empty() {
            return Err(MapError::Config("schema has no fields".to_string()));
        }
        if self.output.as_os_str().is_empty() {
            return Err(MapError::Config("output path is empty".to_string()));
        }
        if let Some(input) = self.inputs.iter().find(|input| input.path == self.output) {
            return Err(MapError::Config(format!(
                "output would overwrite input '{}'",
                input.path.display()
            )));
        }
        Ok(())
    }
}

fn rebase(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
