//! Command-line tests for the mdreport binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn mdreport() -> Command {
    Command::cargo_bin("mdreport").unwrap()
}

fn write_markdown(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("weekly.md");
    std::fs::write(&path, "# Weekly\n").unwrap();
    path
}

#[test]
fn test_help() {
    mdreport()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("compile"))
        .stdout(predicate::str::contains("info"));
}

#[test]
fn test_print_command() {
    let dir = tempdir().unwrap();
    write_markdown(dir.path());

    mdreport()
        .current_dir(dir.path())
        .args(["compile", "weekly.md", "--to", "pdf", "--print-command"])
        .args(["--pdf-engine", "xelatex", "--author", "Ops"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("pandoc -s --from gfm+yaml_metadata_block"))
        .stdout(predicate::str::contains("/weekly.md -o "))
        .stdout(predicate::str::contains("--pdf-engine xelatex"))
        .stdout(predicate::str::contains("title=weekly"))
        .stdout(predicate::str::contains("author=Ops"));

    assert!(!dir.path().join("weekly.pdf").exists());
}

#[test]
fn test_print_command_extra_args() {
    let dir = tempdir().unwrap();
    write_markdown(dir.path());

    mdreport()
        .current_dir(dir.path())
        .args(["compile", "weekly.md", "--to", "html", "--print-command", "--", "--toc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("weekly.html"))
        .stdout(predicate::str::ends_with("--toc\n"));
}

#[test]
fn test_wsl_mount_translates_paths() {
    let dir = tempdir().unwrap();
    let md = write_markdown(dir.path());

    mdreport()
        .current_dir(dir.path())
        .arg("compile")
        .arg(&md)
        .args(["--to", "docx", "--wsl-mount", "mnt", "--output", "C:\\reports\\weekly.docx"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-o /mnt/c/reports/weekly.docx"));
}

#[cfg(unix)]
#[test]
fn test_relative_output_resolved_from_cwd() {
    let dir = tempdir().unwrap();
    std::fs::create_dir(dir.path().join("docs")).unwrap();
    std::fs::write(dir.path().join("docs/weekly.md"), "# Weekly\n").unwrap();

    let output = mdreport()
        .current_dir(dir.path())
        .args(["compile", "docs/weekly.md", "--to", "html", "--output", "final.html"])
        .arg("--print-command")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let line = String::from_utf8(output).unwrap();

    let after = line.split(" -o ").nth(1).unwrap();
    let written = after.split_whitespace().next().unwrap();
    assert!(written.starts_with('/'));
    assert!(written.ends_with("/final.html"));
    assert!(!written.contains("docs"));
}

#[test]
fn test_unsupported_format() {
    let dir = tempdir().unwrap();
    write_markdown(dir.path());

    mdreport()
        .current_dir(dir.path())
        .args(["compile", "weekly.md", "--to", "xml", "--print-command"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Unsupported export format 'xml'"));
}

#[test]
fn test_missing_markdown() {
    let dir = tempdir().unwrap();

    mdreport()
        .current_dir(dir.path())
        .args(["compile", "absent.md", "--to", "pdf", "--print-command"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("save the markdown"));
}

#[test]
fn test_config_file_extra_args() {
    let dir = tempdir().unwrap();
    write_markdown(dir.path());
    std::fs::write(
        dir.path().join("mdreport.toml"),
        "[export]\nextra_args = [\"--number-sections\"]\n",
    )
    .unwrap();

    mdreport()
        .current_dir(dir.path())
        .args(["compile", "weekly.md", "--to", "html", "--print-command"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--number-sections"));
}

#[test]
fn test_info() {
    mdreport()
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("Converter:"))
        .stdout(predicate::str::contains("PDF Engines:"));
}
