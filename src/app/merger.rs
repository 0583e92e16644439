use crate::app::formatter::{count_lines, OutputGenerator};
use crate::app::models::{CandidateFile, MergeResult, RuntimeConfig};
use crate::app::scanner::Scanner;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::io::Write;

pub struct Merger<'a> {
    config: &'a RuntimeConfig,
    scanner: Scanner,
}

impl<'a> Merger<'a> {
    pub fn new(config: &'a RuntimeConfig, scanner: Scanner) -> Self {
        Self { config, scanner }
    }

    /// Writes the header and one block per accepted file into `out`.
    ///
    /// Files that cannot be read are reported and skipped; only failures to
    /// write `out` abort the merge.
    pub fn merge_into<W: Write>(
        &self,
        out: &mut W,
        generated_at: &DateTime<Local>,
    ) -> Result<MergeResult> {
        OutputGenerator::write_header(out, generated_at, &self.config.source_abs)
            .context("Failed to write output header")?;

        let mut result = MergeResult::default();

        for candidate in self.scanner.candidates() {
            let content = match read_lossy(&candidate) {
                Ok(content) => content,
                Err(err) => {
                    println!("Failed to process {}: {:#}", candidate.relative_path, err);
                    continue;
                }
            };

            let line_count = count_lines(&content);
            OutputGenerator::write_file_block(out, &candidate.relative_path, line_count, &content)
                .context(format!("Failed to write block for {}", candidate.relative_path))?;

            result.record(line_count);
            println!("Processed: {}", candidate.relative_path);
        }

        Ok(result)
    }
}

fn read_lossy(candidate: &CandidateFile) -> Result<String> {
    let bytes = fs::read(&candidate.path)
        .context(format!("Failed to read {}", candidate.path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
