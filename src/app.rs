// Declare modules
pub mod cli;
pub mod config;
pub mod formatter;
pub mod merger;
pub mod models;
pub mod scanner;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Parser;
use std::fs::File;
use std::io::{BufWriter, Write};

use self::cli::Cli;
use self::config::{absolute_path, load_presets_file, resolve_config};
use self::formatter::OutputGenerator;
use self::merger::Merger;
use self::scanner::Scanner;

/// Resolves the configuration, merges the tree and prints the summary.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();

    // 2. Resolve Configuration
    let presets = load_presets_file()?;
    let started = Local::now();
    let config = resolve_config(args, &presets, &started);
    log::debug!("Resolved configuration: {:?}", config);

    println!("Source directory: {}", config.source_dir.display());
    println!("Output file: {}", config.output_file.display());
    println!("Extensions: {}", config.extensions.join(", "));
    println!("{}", "-".repeat(60));

    // 3. Nothing is written unless the source is a directory
    if !config.source_dir.is_dir() {
        bail!(
            "source directory '{}' does not exist or is not a directory",
            config.source_dir.display()
        );
    }

    // 4. Merge
    let file = File::create(&config.output_file)
        .context(format!("Failed to create {}", config.output_file.display()))?;
    let mut writer = BufWriter::new(file);

    let scanner = Scanner::new(&config)?.skip_output(&config.output_file);
    let result = Merger::new(&config, scanner).merge_into(&mut writer, &started)?;

    writer
        .flush()
        .context(format!("Failed to write {}", config.output_file.display()))?;

    // 5. Report
    println!(
        "{}",
        OutputGenerator::summary(&result, &absolute_path(&config.output_file))
    );

    Ok(())
}
