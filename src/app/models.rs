use std::collections::HashSet;
use std::path::PathBuf;

/// Fully resolved settings for a single merge run.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Source directory exactly as requested on the command line.
    pub source_dir: PathBuf,
    /// Absolute form of `source_dir`, used for the header and relative paths.
    pub source_abs: PathBuf,
    pub output_file: PathBuf,
    /// Lower-cased, deduplicated, in the order given.
    pub extensions: Vec<String>,
    pub ignored_dirs: HashSet<String>,
    /// File name of the running executable, never merged.
    pub script_name: String,
    pub output_prefix: String,
}

impl RuntimeConfig {
    /// Extension of the output file including the dot, or empty if it has none.
    pub fn output_extension(&self) -> String {
        self.output_file
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default()
    }
}

/// A file found under the source directory, before it is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub path: PathBuf,
    pub relative_path: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeResult {
    pub files_processed: usize,
    pub total_lines: usize,
}

impl MergeResult {
    pub fn record(&mut self, line_count: usize) {
        self.files_processed += 1;
        self.total_lines += line_count;
    }
}
