use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Merge the source files of a directory tree into a single text file"
)]
pub struct Cli {
    /// Directory to scan
    #[arg(default_value = ".")]
    pub source_dir: PathBuf,

    /// Comma-separated extensions to merge, without dots (e.g. 'py,js,html')
    pub extensions: Option<String>,

    /// Write the merged file here instead of merged_code_<dir>_<timestamp>.txt
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Use a named extension list from ~/.config/merge_code/presets.toml
    ///
    /// Without this flag, a preset named like the source directory replaces
    /// the built-in extension list. An explicit EXTENSIONS argument always wins.
    #[arg(long)]
    pub preset: Option<String>,
}
