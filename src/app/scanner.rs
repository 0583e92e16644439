use crate::app::config::absolute_path;
use crate::app::models::{CandidateFile, RuntimeConfig};
use anyhow::{Context, Result};
use globset::{Glob, GlobMatcher};
use ignore::WalkBuilder;
use pathdiff::diff_paths;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolves links so the output file is recognised under any spelling.
fn resolve(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| absolute_path(path))
}

/// Directory filter: ignored names and hidden directories are never entered.
pub fn is_traversable_dir(name: &str, ignored_dirs: &HashSet<String>) -> bool {
    !ignored_dirs.contains(name) && !name.starts_with('.')
}

/// Lower-cased text after the last dot, or empty when the name has no dot.
pub fn extension_of(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}

/// File filter, built once per run from the resolved configuration.
pub struct FileFilter {
    script_name: String,
    previous_output: GlobMatcher,
    extensions: HashSet<String>,
}

impl FileFilter {
    pub fn new(config: &RuntimeConfig) -> Result<Self> {
        // merged_code_*.txt with the default output name
        let pattern = format!(
            "{}*{}",
            globset::escape(&config.output_prefix),
            globset::escape(&config.output_extension())
        );
        let previous_output = Glob::new(&pattern)
            .context(format!("Invalid output guard pattern: {}", pattern))?
            .compile_matcher();

        Ok(Self {
            script_name: config.script_name.clone(),
            previous_output,
            extensions: config.extensions.iter().map(|e| e.to_lowercase()).collect(),
        })
    }

    pub fn accepts(&self, file_name: &str) -> bool {
        if file_name == self.script_name {
            return false;
        }
        if self.previous_output.is_match(file_name) {
            return false;
        }
        self.extensions.contains(&extension_of(file_name))
    }
}

pub struct Scanner {
    root: PathBuf,
    ignored_dirs: HashSet<String>,
    filter: FileFilter,
    /// Absolute path of the file being written by this run, if it exists yet.
    output_path: Option<PathBuf>,
}

impl Scanner {
    pub fn new(config: &RuntimeConfig) -> Result<Self> {
        Ok(Self {
            root: config.source_dir.clone(),
            ignored_dirs: config.ignored_dirs.clone(),
            filter: FileFilter::new(config)?,
            output_path: None,
        })
    }

    pub fn skip_output(mut self, output_path: &Path) -> Self {
        self.output_path = Some(resolve(output_path));
        self
    }

    /// Depth-first, pre-order walk yielding the files that pass the file filter.
    /// Within a directory, files come before subdirectories and ignored
    /// subtrees are pruned before they are entered.
    pub fn candidates(&self) -> impl Iterator<Item = CandidateFile> + '_ {
        let mut pending = vec![self.root.clone()];

        std::iter::from_fn(move || {
            let dir = pending.pop()?;
            let (files, subdirs) = self.read_level(&dir);
            // Reversed so the first subdirectory is visited next
            pending.extend(subdirs.into_iter().rev());
            Some(files)
        })
        .flatten()
    }

    /// Lists the immediate children of `dir`, sorted by name, split into
    /// accepted files and subdirectories still to visit.
    fn read_level(&self, dir: &Path) -> (Vec<CandidateFile>, Vec<PathBuf>) {
        let mut files = Vec::new();
        let mut subdirs = Vec::new();

        let walker = WalkBuilder::new(dir)
            .standard_filters(false)
            .follow_links(false)
            .max_depth(Some(1))
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        for result in walker {
            let entry = match result {
                Ok(entry) if entry.depth() == 0 => continue,
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!("Error walking entry: {}", err);
                    continue;
                }
            };

            let Some(file_type) = entry.file_type() else {
                continue;
            };

            if file_type.is_dir() {
                let keep =
                    is_traversable_dir(&entry.file_name().to_string_lossy(), &self.ignored_dirs);
                if keep {
                    subdirs.push(entry.into_path());
                } else {
                    log::debug!("Pruning directory {}", entry.path().display());
                }
            } else if file_type.is_symlink() && entry.path().is_dir() {
                log::debug!("Not following directory link {}", entry.path().display());
            } else if let Some(candidate) = self.process_entry(entry.path(), entry.file_name()) {
                files.push(candidate);
            }
        }

        (files, subdirs)
    }

    fn process_entry(&self, path: &Path, file_name: &OsStr) -> Option<CandidateFile> {
        let name = file_name.to_string_lossy();
        if !self.filter.accepts(&name) {
            log::trace!("Skipping {}", path.display());
            return None;
        }

        if self.is_current_output(path) {
            log::debug!("Skipping the output file {}", path.display());
            return None;
        }

        let relative = diff_paths(path, &self.root)?;

        Some(CandidateFile {
            path: path.to_path_buf(),
            relative_path: relative.to_string_lossy().to_string(),
        })
    }

    fn is_current_output(&self, path: &Path) -> bool {
        match &self.output_path {
            Some(output) => output.file_name() == path.file_name() && resolve(path) == *output,
            None => false,
        }
    }
}
