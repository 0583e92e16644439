use crate::app::cli::Cli;
use crate::app::models::RuntimeConfig;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "py", "js", "html", "css", "java", "c", "cpp", "h", "hpp", "cs", "go", "rs", "ts", "tsx",
    "jsx", "php", "rb", "swift", "kt", "scala", "sh", "bat", "ps1", "sql", "r", "json", "xml",
    "yaml", "yml", "toml", "vue",
];

pub const IGNORED_DIRS: &[&str] = &[
    ".git",
    ".svn",
    ".hg",
    ".idea",
    ".vscode",
    "node_modules",
    "venv",
    "env",
    "__pycache__",
    "dist",
    "build",
    "target",
    "bin",
    "obj",
];

pub const OUTPUT_PREFIX: &str = "merged_code_";

const FALLBACK_SCRIPT_NAME: &str = "merge_code";

#[derive(Deserialize, Debug)]
struct PresetsFile {
    #[serde(flatten)]
    presets: HashMap<String, PresetConfig>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct PresetConfig {
    pub extensions: Option<Vec<String>>,
}

/// Reads `~/.config/merge_code/presets.toml`. A missing file yields no presets.
pub fn load_presets_file() -> Result<HashMap<String, PresetConfig>> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let config_path = home.join(".config").join("merge_code").join("presets.toml");

    if !config_path.exists() {
        return Ok(HashMap::new());
    }

    let content = fs::read_to_string(&config_path)
        .context(format!("Failed to read config at {:?}", config_path))?;

    parse_presets(&content).context(format!("Failed to parse {:?}", config_path))
}

fn parse_presets(content: &str) -> Result<HashMap<String, PresetConfig>> {
    let parsed: PresetsFile = toml::from_str(content)?;
    Ok(parsed.presets)
}

/// Trims and lower-cases each entry, dropping repeats but keeping order.
/// Empty entries survive: they select files without an extension.
fn normalize_extensions<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .map(|item| item.as_ref().trim().to_lowercase())
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

pub fn parse_extensions(list: &str) -> Vec<String> {
    normalize_extensions(list.split(','))
}

pub fn default_output_name(project_name: &str, now: &DateTime<Local>) -> PathBuf {
    PathBuf::from(format!(
        "{}{}_{}.txt",
        OUTPUT_PREFIX,
        project_name,
        now.format("%Y%m%d_%H%M%S")
    ))
}

/// Absolute form of `path` with `.` and `..` folded away. Symlinks are kept
/// as spelled, so a linked source directory is reported under the link name.
pub fn absolute_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

fn current_script_name() -> String {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| FALLBACK_SCRIPT_NAME.to_string())
}

fn resolve_extensions(
    cli_list: Option<&str>,
    explicit_preset: Option<&str>,
    project_name: &str,
    presets: &HashMap<String, PresetConfig>,
) -> Vec<String> {
    if let Some(list) = cli_list {
        return parse_extensions(list);
    }

    // Explicit --preset wins over auto-detection by directory name
    let preset_key = explicit_preset.unwrap_or(project_name);
    match presets.get(preset_key).and_then(|p| p.extensions.as_ref()) {
        Some(exts) => {
            log::info!("Using extensions from preset '{}'", preset_key);
            normalize_extensions(exts)
        }
        None => {
            if let Some(name) = explicit_preset {
                log::warn!("Preset '{}' not found, using default extensions", name);
            }
            normalize_extensions(DEFAULT_EXTENSIONS)
        }
    }
}

pub fn resolve_config(
    cli: Cli,
    presets: &HashMap<String, PresetConfig>,
    now: &DateTime<Local>,
) -> RuntimeConfig {
    let source_abs = absolute_path(&cli.source_dir);
    let project_name = source_abs
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let extensions = resolve_extensions(
        cli.extensions.as_deref(),
        cli.preset.as_deref(),
        &project_name,
        presets,
    );

    let output_file = cli
        .output
        .unwrap_or_else(|| default_output_name(&project_name, now));

    RuntimeConfig {
        source_dir: cli.source_dir,
        source_abs,
        output_file,
        extensions,
        ignored_dirs: IGNORED_DIRS.iter().map(|d| d.to_string()).collect(),
        script_name: current_script_name(),
        output_prefix: OUTPUT_PREFIX.to_string(),
    }
}
