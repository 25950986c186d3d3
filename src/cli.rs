//! Command-line interface for the fragmentizer.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use console::style;

use crate::config::{parse_block_tags, DEFAULT_MAX_LEN};
use crate::error::{FragmentizeError, Result};
use crate::splitting::{split_markup, BlockTagRegistry, SplitOptions};

/// Split an HTML message into length-bounded, well-formed fragments.
#[derive(Parser)]
#[command(name = "fragmentize")]
#[command(version, about)]
pub struct Cli {
    /// Path to the source markup file
    pub source: PathBuf,

    /// Maximum fragment length in bytes
    #[arg(short, long, default_value_t = DEFAULT_MAX_LEN)]
    pub max_len: usize,

    /// Comma-separated override of the splittable block tags
    #[arg(long)]
    pub block_tags: Option<String>,
}

/// Parse arguments and run the splitter.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    split_command(&cli.source, cli.max_len, cli.block_tags.as_deref())
}

fn split_command(source: &Path, max_len: usize, block_tags: Option<&str>) -> Result<()> {
    let markup = read_source(source)?;

    let mut options = SplitOptions::new(max_len);
    if let Some(list) = block_tags {
        let tags = parse_block_tags(list)?;
        options = options.with_block_tags(tags.into_iter().collect::<BlockTagRegistry>());
    }

    let mut total = 0usize;
    let mut raw_cuts = 0usize;
    for (index, fragment) in split_markup(&markup, options)?.enumerate() {
        if fragment.is_well_formed() {
            println!("fragment: #{index}: {} chars", fragment.len());
        } else {
            raw_cuts += 1;
            println!(
                "fragment: #{index}: {} chars {}",
                fragment.len(),
                style("(raw cut)").yellow()
            );
        }
        total += 1;
    }

    println!();
    println!(
        "{} {total} fragments from {}",
        style("Total:").green().bold(),
        source.display()
    );
    if raw_cuts > 0 {
        println!(
            "{} {raw_cuts} oversized fragment(s) were cut without tag balance",
            style("Warning:").yellow().bold()
        );
    }
    Ok(())
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| FragmentizeError::Source {
        path: path.to_path_buf(),
        source,
    })
}
