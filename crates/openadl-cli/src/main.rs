//! OpenADL - inspect and manage ADL save slots
//!
//! # Commands
//!
//! - `openadl games` - List supported games and their detection files
//! - `openadl features` - Show the meta engine's feature flags
//! - `openadl list <target>` - List the save slots of a target
//! - `openadl info <target> <slot>` - Show the full metadata of one slot
//! - `openadl remove <target> <slot>` - Delete a slot
//!
//! Save files are read from `save_path` in the config file (`--config`), or
//! from `--save-path`, which takes precedence.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use openadl_common::{AppConfig, MetaEngineFeature};
use openadl_meta::{AdlMetaEngine, PLUGIN};
use openadl_savefile::{DirSaveFileManager, SaveSlots, SaveStateDescriptor};

/// OpenADL - inspect and manage ADL save slots
#[derive(Parser)]
#[command(name = "openadl")]
#[command(version)]
struct Cli {
    /// Config file (TOML)
    #[arg(long, default_value = "openadl.toml")]
    config: PathBuf,

    /// Directory holding the save files
    #[arg(long)]
    save_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported games and their detection files
    Games,

    /// Show the meta engine's feature flags
    Features,

    /// List the save slots of a target
    List { target: String },

    /// Show the full metadata of one slot
    Info { target: String, slot: i32 },

    /// Delete a slot
    Remove { target: String, slot: i32 },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config)
        .with_context(|| format!("Loading config {}", cli.config.display()))?;
    if let Some(path) = cli.save_path {
        config.save_path = path;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Using save path {}", config.save_path.display());

    let saves = SaveSlots::new(Arc::new(DirSaveFileManager::new(&config.save_path)));
    let meta = (PLUGIN.create)(saves);

    print!("{}", run(&meta, cli.command));
    Ok(())
}

fn run(meta: &AdlMetaEngine, command: Commands) -> String {
    match command {
        Commands::Games => games(meta),
        Commands::Features => features(meta),
        Commands::List { target } => list(meta, &target),
        Commands::Info { target, slot } => slot_info(meta, &target, slot),
        Commands::Remove { target, slot } => {
            if meta.remove_save_state(&target, slot) {
                format!("Removed slot {} of '{}'\n", slot, target)
            } else {
                format!("Slot {} of '{}' is empty\n", slot, target)
            }
        }
    }
}

fn games(meta: &AdlMetaEngine) -> String {
    let mut out = format!("{} ({})\n", meta.name(), meta.original_copyright());
    for desc in meta.game_descriptions() {
        out.push_str(&format!(
            "  {}: {} [{:?}, {:?}]\n",
            desc.game_id.id(),
            desc.game_id.display_name(),
            desc.language,
            desc.platform
        ));
        for file in desc.files {
            out.push_str(&format!("    {:<16} {} {:>6}\n", file.name, file.md5, file.size));
        }
    }
    for opt in meta.extra_gui_options() {
        out.push_str(&format!(
            "  option {}: {} ({}), default {}\n",
            opt.config_key(),
            opt.label(),
            opt.tooltip(),
            if opt.default_value() { "on" } else { "off" }
        ));
    }
    out
}

fn features(meta: &AdlMetaEngine) -> String {
    let mut out = String::new();
    for feature in MetaEngineFeature::all() {
        let mark = if meta.has_feature(feature) { "yes" } else { "no" };
        out.push_str(&format!("{:<30} {}\n", format!("{:?}", feature), mark));
    }
    out.push_str(&format!("{:<30} {}\n", "MaximumSaveSlot", meta.maximum_save_slot()));
    out
}

fn list(meta: &AdlMetaEngine, target: &str) -> String {
    let saves = meta.list_saves(target);
    if saves.is_empty() {
        return format!("No saves for '{}'\n", target);
    }
    saves
        .iter()
        .map(|sd| format!("{:>2} {}  {}\n", sd.slot, slot_letter(sd.slot), sd.description))
        .collect()
}

fn slot_info(meta: &AdlMetaEngine, target: &str, slot: i32) -> String {
    match meta.query_save_meta_infos(target, slot) {
        Some(sd) => describe(&sd),
        None => format!("Slot {} of '{}' is empty\n", slot, target),
    }
}

fn describe(sd: &SaveStateDescriptor) -> String {
    let mut out = format!("Slot {} ({}): {}\n", sd.slot, slot_letter(sd.slot), sd.description);
    if let (Some(date), Some(time)) = (sd.save_date, sd.save_time) {
        out.push_str(&format!("  Saved:     {} {}\n", date, time));
    }
    if let Some(play_time) = sd.play_time_string() {
        out.push_str(&format!("  Play time: {}\n", play_time));
    }
    match &sd.thumbnail {
        Some(thumb) => out.push_str(&format!("  Thumbnail: {}x{}\n", thumb.width, thumb.height)),
        None => out.push_str("  Thumbnail: none\n"),
    }
    out
}

/// Letter the game shows for a slot
fn slot_letter(slot: i32) -> char {
    u8::try_from(slot)
        .ok()
        .filter(|&s| i32::from(s) <= openadl_savefile::MAX_SAVE_SLOT)
        .map(|s| char::from(b'A' + s))
        .unwrap_or('?')
}
