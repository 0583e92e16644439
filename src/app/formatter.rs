use crate::app::models::MergeResult;
use chrono::{DateTime, Local};
use std::io::{self, Write};
use std::path::Path;

pub const TITLE: &str = "# 合并的代码文件";
const RULE_WIDTH: usize = 80;

/// Newlines plus one. An empty file therefore counts as one line.
pub fn count_lines(content: &str) -> usize {
    bytecount::count(content.as_bytes(), b'\n') + 1
}

pub struct OutputGenerator;

impl OutputGenerator {
    pub fn write_header<W: Write>(
        out: &mut W,
        generated_at: &DateTime<Local>,
        source_abs: &Path,
    ) -> io::Result<()> {
        writeln!(out, "{}", TITLE)?;
        writeln!(out, "# 生成时间: {}", generated_at.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(out, "# 源目录: {}", source_abs.display())?;
        writeln!(out)
    }

    pub fn write_file_block<W: Write>(
        out: &mut W,
        relative_path: &str,
        line_count: usize,
        content: &str,
    ) -> io::Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        write!(out, "\n\n{}\n", rule)?;
        writeln!(out, "# 文件: {}", relative_path)?;
        writeln!(out, "# 行数: {}", line_count)?;
        write!(out, "{}\n\n", rule)?;
        out.write_all(content.as_bytes())?;
        writeln!(out)
    }

    pub fn summary(result: &MergeResult, output_abs: &Path) -> String {
        format!(
            "\nMerge complete! Processed {} files, {} lines in total\nOutput file: {}",
            result.files_processed,
            result.total_lines,
            output_abs.display()
        )
    }
}
