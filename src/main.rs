use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use draftquill::config::Config;
use draftquill::gate;
use draftquill::model::content_state::ContentState;
use draftquill::raw::{convert_from_raw, convert_to_raw, RawDraftContentState};

/// DraftQuill - inspect and normalize raw rich-text documents
#[derive(Parser)]
#[command(name = "draftquill")]
#[command(version)]
#[command(about = "Inspect and normalize raw rich-text documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Decode nested blocks as a block tree (overrides the config file)
    #[arg(long, global = true)]
    tree: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print one line per block: key, type, depth, length, styles and entities
    Inspect {
        /// Raw JSON file (omit to read stdin)
        file: Option<PathBuf>,
    },
    /// Print the plain text of the document
    Plain {
        /// Raw JSON file (omit to read stdin)
        file: Option<PathBuf>,

        /// Block delimiter
        #[arg(short, long, default_value = "\n")]
        delimiter: String,
    },
    /// Decode and re-encode the document, printing canonical raw JSON
    Normalize {
        /// Raw JSON file (omit to read stdin)
        file: Option<PathBuf>,
    },
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("DRAFTQUILL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            Ok(buffer)
        }
    }
}

fn load_content(file: Option<&PathBuf>) -> Result<ContentState> {
    let json = read_input(file)?;
    let raw = RawDraftContentState::from_json(&json).context("Failed to parse raw content")?;
    convert_from_raw(&raw).context("Failed to decode raw content")
}

fn inspect(content: &ContentState) {
    for block in content.block_map().iter() {
        let mut styles: Vec<&str> = block
            .character_list()
            .iter()
            .flat_map(|c| c.style().iter().map(String::as_str))
            .collect();
        styles.sort_unstable();
        styles.dedup();

        let mut entities = Vec::new();
        block.find_entity_ranges(
            |c| c.entity().is_some(),
            |start, end| entities.push(format!("{}..{}", start, end)),
        );

        let indent = "  ".repeat(block.depth());
        let parent = block
            .parent_key()
            .map(|p| format!(" parent={}", p))
            .unwrap_or_default();
        println!(
            "{}{} [{}] len={}{} styles=[{}] entities=[{}]",
            indent,
            block.key(),
            block.block_type(),
            block.length(),
            parent,
            styles.join(","),
            entities.join(","),
        );
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = Config::load();
    if cli.tree {
        config.tree_data_support = true;
    }
    config.install();
    tracing::debug!(tree = gate::tree_data_support(), "configuration installed");

    match &cli.command {
        Command::Inspect { file } => {
            let content = load_content(file.as_ref())?;
            inspect(&content);
        }
        Command::Plain { file, delimiter } => {
            let content = load_content(file.as_ref())?;
            println!("{}", content.get_plain_text(delimiter));
        }
        Command::Normalize { file } => {
            let content = load_content(file.as_ref())?;
            let raw = convert_to_raw(&content).context("Failed to encode content")?;
            println!("{}", raw.to_json_pretty()?);
        }
    }

    Ok(())
}
