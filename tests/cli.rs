//! End-to-end tests for the `merge_code` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Fixture {
    home: TempDir,
    work: TempDir,
    source: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            home: tempfile::tempdir().unwrap(),
            work: tempfile::tempdir().unwrap(),
            source: tempfile::tempdir().unwrap(),
        }
    }

    fn write(&self, rel: &str, content: &str) {
        let path = self.source.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("merge_code").unwrap();
        cmd.current_dir(self.work.path())
            .env("HOME", self.home.path())
            .env_remove("RUST_LOG");
        cmd
    }

    fn outputs(&self) -> Vec<PathBuf> {
        fs::read_dir(self.work.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| {
                let name = p.file_name().unwrap().to_string_lossy();
                name.starts_with("merged_code_") && name.ends_with(".txt")
            })
            .collect()
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn merges_selected_files_into_timestamped_output() {
    let fx = Fixture::new();
    fx.write("a.py", "x\ny\n");
    fx.write("b/node_modules/c.py", "ignored");
    fx.write("b/d.js", "z");
    fx.write(".git/config.py", "hidden");
    fx.write("README.md", "docs");

    fx.command()
        .arg(fx.source.path())
        .arg("py,js")
        .assert()
        .success()
        .stdout(predicate::str::contains("Extensions: py, js"))
        .stdout(predicate::str::contains("Processed: a.py"))
        .stdout(predicate::str::contains("Processed 2 files, 4 lines in total"));

    let outputs = fx.outputs();
    assert_eq!(outputs.len(), 1);

    let source_name = fx.source.path().file_name().unwrap().to_string_lossy().to_string();
    let file_name = outputs[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(file_name.starts_with(&format!("merged_code_{}_", source_name)));

    let text = read(&outputs[0]);
    assert!(text.starts_with("# 合并的代码文件\n# 生成时间: "));
    assert!(text.contains("# 行数: 3\n"));
    assert!(text.contains("# 行数: 1\n"));
    assert!(!text.contains("ignored"));
    assert!(!text.contains("hidden"));
    assert!(!text.contains("docs"));
}

#[test]
fn empty_tree_produces_header_only() {
    let fx = Fixture::new();

    fx.command()
        .arg(fx.source.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 0 files, 0 lines in total"));

    let outputs = fx.outputs();
    assert_eq!(outputs.len(), 1);
    let text = read(&outputs[0]);
    assert!(!text.contains("# 文件:"));
    assert!(text.ends_with("\n\n"));
}

#[test]
fn missing_source_dir_fails_without_output() {
    let fx = Fixture::new();
    let missing = fx.source.path().join("nope");

    fx.command()
        .arg(&missing)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("does not exist"));

    assert!(fx.outputs().is_empty());
}

#[test]
fn file_as_source_dir_is_rejected() {
    let fx = Fixture::new();
    fx.write("a.py", "x");

    fx.command()
        .arg(fx.source.path().join("a.py"))
        .assert()
        .code(1);
}

#[test]
fn rerun_in_place_skips_previous_output() {
    let fx = Fixture::new();
    fx.write("main.rs", "fn main() {}");

    let mut cmd = Command::cargo_bin("merge_code").unwrap();
    cmd.current_dir(fx.source.path())
        .env("HOME", fx.home.path())
        .arg("--output")
        .arg("merged_code_first.txt")
        .assert()
        .success();

    let mut cmd = Command::cargo_bin("merge_code").unwrap();
    cmd.current_dir(fx.source.path())
        .env("HOME", fx.home.path())
        .args([".", "rs,txt", "-o", "merged_code_second.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 1 files"));

    let second = read(&fx.source.path().join("merged_code_second.txt"));
    assert!(second.contains("# 文件: main.rs"));
    assert!(!second.contains("merged_code_first.txt"));
}

#[test]
fn explicit_output_inside_tree_is_not_merged_into_itself() {
    let fx = Fixture::new();
    fx.write("notes.md", "hello");
    let output = fx.source.path().join("all.md");

    fx.command()
        .arg(fx.source.path())
        .arg("md")
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 1 files"));

    let text = read(&output);
    assert!(text.contains("# 文件: notes.md"));
    assert!(!text.contains("# 文件: all.md"));
}

#[test]
fn preset_from_home_config_selects_extensions() {
    let fx = Fixture::new();
    fx.write("page.vue", "<template/>");
    fx.write("app.py", "print()");

    let config_dir = fx.home.path().join(".config").join("merge_code");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("presets.toml"),
        "[frontend]\nextensions = [\"VUE\"]\n",
    )
    .unwrap();

    fx.command()
        .arg(fx.source.path())
        .args(["--preset", "frontend"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Extensions: vue"))
        .stdout(predicate::str::contains("Processed: page.vue"))
        .stdout(predicate::str::contains("app.py").not());
}

#[test]
fn malformed_presets_file_is_fatal() {
    let fx = Fixture::new();
    let config_dir = fx.home.path().join(".config").join("merge_code");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("presets.toml"), "not = [valid").unwrap();

    fx.command().arg(fx.source.path()).assert().code(1);
    assert!(fx.outputs().is_empty());
}

#[cfg(unix)]
#[test]
fn unreadable_file_is_reported_and_run_succeeds() {
    let fx = Fixture::new();
    fx.write("ok.py", "pass");
    std::os::unix::fs::symlink("missing", fx.source.path().join("broken.py")).unwrap();

    fx.command()
        .arg(fx.source.path())
        .arg("py")
        .assert()
        .success()
        .stdout(predicate::str::contains("Failed to process broken.py"))
        .stdout(predicate::str::contains("Processed: ok.py"))
        .stdout(predicate::str::contains("Processed 1 files, 1 lines in total"));

    let text = read(&fx.outputs()[0]);
    assert!(!text.contains("# 文件: broken.py"));
}
