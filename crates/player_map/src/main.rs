//! Player Map CLI
//!
//! CSV → lookup JSON builder (players, teams)
//! Name lookup against a built map

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use player_map::{InputTable, MapperConfig, OutputSchema};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "player_map")]
#[command(about = "Build and query the player/team name lookup map", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Build the lookup JSON from CSV tables
    Build {
        /// Player table CSV (FANGRAPHSNAME, YAHOONAME, IDFANGRAPHS, POS, IDPLAYER)
        #[arg(long)]
        players: Option<PathBuf>,

        /// Team table CSV (FANGRAPHSTEAM, FANGRAPHSABBR, FANGRAPHSRR)
        #[arg(long)]
        teams: Option<PathBuf>,

        /// Output JSON file path
        #[arg(long, default_value = "map.json")]
        out: PathBuf,

        /// Output fields: "basic", "extended" or a list like "graph_id,pos"
        #[arg(long, default_value = "extended")]
        schema: OutputSchema,

        /// Also emit accent-folded aliases (Kiké → Kike)
        #[arg(long)]
        fold_accents: bool,

        /// Trim whitespace around CSV fields
        #[arg(long)]
        trim: bool,

        /// JSON config file (overrides the table flags; $PLAYER_MAP_CONFIG is used when no table flags are given)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Verify the written file after building
        #[arg(long, default_value = "false")]
        verify: bool,

        /// Output build report JSON file
        #[arg(long)]
        metadata: Option<PathBuf>,
    },

    /// Find known names in a piece of text
    Lookup {
        /// Map JSON built by `build`
        #[arg(long)]
        map: PathBuf,

        /// Text to scan
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        text: Option<String>,

        /// File whose contents to scan
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            players,
            teams,
            out,
            schema,
            fold_accents,
            trim,
            config,
            verify,
            metadata,
        } => {
            // explicit table flags win over $PLAYER_MAP_CONFIG
            let has_table_flags = players.is_some() || teams.is_some();
            let env_config = if config.is_none() && !has_table_flags {
                MapperConfig::from_env().context("Failed to load config from env")?
            } else {
                None
            };

            let config = match (config, env_config) {
                (Some(path), _) => MapperConfig::from_file(&path)
                    .with_context(|| format!("Failed to load config: {}", path.display()))?,
                (None, Some(config)) => config,
                (None, None) => {
                    let mut inputs = Vec::new();
                    if let Some(players) = players {
                        inputs.push(InputTable::players(players));
                    }
                    if let Some(teams) = teams {
                        inputs.push(InputTable::teams(teams));
                    }
                    MapperConfig { inputs, output: out, schema, fold_accents, trim }
                }
            };

            println!("🔨 Building player map...");
            for input in &config.inputs {
                println!("   {:<8} {}", format!("{}:", input.kind), input.path.display());
            }
            println!("   Output:  {}", config.output.display());

            let report = player_map::build_player_map(&config)
                .with_context(|| format!("Failed to build {}", config.output.display()))?;

            print_report(&report);

            if verify {
                verify_output(Path::new(&report.output), &report.checksum)?;
            }

            if let Some(metadata_path) = metadata {
                save_metadata(&metadata_path, &report)?;
            }
        }

        Commands::Lookup { map, text, file } => {
            let map = player_map::PlayerMap::load(&map)
                .with_context(|| format!("Failed to load map: {}", map.display()))?;

            let text = match (text, file) {
                (Some(text), _) => text,
                (None, Some(file)) => std::fs::read_to_string(&file)
                    .with_context(|| format!("Failed to read text file: {}", file.display()))?,
                (None, None) => anyhow::bail!("Either --text or --file is required"),
            };

            let found = player_map::find_names(&map, &text);
            println!("{}", serde_json::to_string_pretty(&found)?);
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[cfg(feature = "cli")]
fn print_report(report: &player_map::BuildReport) {
    println!("\n✅ Map built successfully!");
    for table in &report.tables {
        println!(
            "   {:<8} {} rows, {} aliases, {} overwritten",
            format!("{}:", table.kind),
            table.rows,
            table.aliases,
            table.overwritten
        );
    }
    println!("   Entries:  {} ({} overwritten)", report.entries, report.total_overwritten());
    println!("   Size:     {} bytes ({:.2} KB)", report.size, report.size as f64 / 1024.0);
    println!("   Checksum: {}", report.checksum);
    println!("   Created:  {}", report.created_at);
}

#[cfg(feature = "cli")]
fn verify_output(path: &Path, checksum: &str) -> Result<()> {
    println!("\n🔍 Verifying map integrity...");
    let is_valid = player_map::verify_map(path, checksum)?;

    if is_valid {
        println!("✅ Map verification passed");
        Ok(())
    } else {
        anyhow::bail!("❌ Map verification failed - checksum mismatch!")
    }
}

#[cfg(feature = "cli")]
fn save_metadata(path: &Path, report: &player_map::BuildReport) -> Result<()> {
    let metadata_json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, metadata_json)?;
    println!("\n📄 Build report saved to: {}", path.display());
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("player_map CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
