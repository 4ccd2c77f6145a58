#![cfg(unix)]

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

// A stand-in for 7z: answers the `i` probe, then creates an archive whose
// size depends on the dictionary flag. Positional args mirror the real
// invocation: a -mx9 <flag> -- <out>.7z <input>.
fn fake_compressor(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("fake7z");
    let script = format!(
        "#!/bin/sh\n\
         if [ \"$1\" = \"i\" ]; then exit 0; fi\n\
         flag=\"$3\"\n\
         out=\"$5\"\n\
         input=\"$6\"\n\
         {body}\n"
    );
    fs::write(&path, script).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

const SIZED_BY_FLAG: &str = "case \"$flag\" in\n\
  -md64k) n=300 ;;\n\
  -md1m) n=100 ;;\n\
  -md2m) n=100 ;;\n\
  *) n=200 ;;\n\
esac\n\
head -c \"$n\" /dev/zero > \"$out\"";

fn make_input(workspace: &Path, name: &str, len: usize) {
    let dir = workspace.join(name);
    fs::create_dir(&dir).unwrap();
    fs::write(dir.join("data.bin"), vec![0u8; len]).unwrap();
}

fn archive_count(workspace: &Path) -> usize {
    fs::read_dir(workspace)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "7z"))
        .count()
}

#[test]
fn dict_sweep_reports_best_candidate_with_tie_break() -> Result<(), Box<dyn std::error::Error>> {
    let tools = tempdir()?;
    let workspace = tempdir()?;
    let compressor = fake_compressor(tools.path(), SIZED_BY_FLAG);
    // 1.5 MiB input: bound is 2m, so candidates are 64k, 1m, 2m.
    make_input(workspace.path(), "data", 1_572_864);

    let mut cmd = Command::cargo_bin("archtune")?;
    cmd.arg("--workspace")
        .arg(workspace.path())
        .arg("--compressor")
        .arg(&compressor);
    cmd.assert()
        .success()
        .stdout(
            predicate::str::contains("Dict size: 64k")
                .and(predicate::str::contains("Dict size: 1m"))
                .and(predicate::str::contains("Dict size: 2m"))
                // 1m and 2m tie at 100 bytes; the smaller value wins.
                .and(predicate::str::contains("Best dict size: 1m (100 bytes)"))
                .and(predicate::str::contains("Dict size: 3m").not()),
        );

    // All artifacts cleared between candidates and after the run.
    assert_eq!(archive_count(workspace.path()), 0);
    Ok(())
}

#[test]
fn hidden_and_denylisted_directories_are_not_compressed(
) -> Result<(), Box<dyn std::error::Error>> {
    let tools = tempdir()?;
    let workspace = tempdir()?;
    let log = tools.path().join("invocations.log");
    let body = format!(
        "echo \"$input\" >> \"{}\"\nhead -c 50 /dev/zero > \"$out\"",
        log.display()
    );
    let compressor = fake_compressor(tools.path(), &body);
    make_input(workspace.path(), "alpha", 10);
    make_input(workspace.path(), "beta", 10);
    make_input(workspace.path(), "venv", 10);
    make_input(workspace.path(), ".cache", 10);

    let mut cmd = Command::cargo_bin("archtune")?;
    cmd.arg("--workspace")
        .arg(workspace.path())
        .arg("--compressor")
        .arg(&compressor);
    cmd.assert().success();

    let invoked = fs::read_to_string(&log)?;
    assert!(invoked.contains("alpha"));
    assert!(invoked.contains("beta"));
    assert!(!invoked.contains("venv"));
    assert!(!invoked.contains(".cache"));
    Ok(())
}

#[test]
fn word_sweep_walks_the_full_table() -> Result<(), Box<dyn std::error::Error>> {
    let tools = tempdir()?;
    let workspace = tempdir()?;
    let compressor = fake_compressor(tools.path(), SIZED_BY_FLAG);
    make_input(workspace.path(), "data", 10);

    let mut cmd = Command::cargo_bin("archtune")?;
    cmd.arg("--dimension")
        .arg("word")
        .arg("--workspace")
        .arg(workspace.path())
        .arg("--compressor")
        .arg(&compressor);
    cmd.assert().success().stdout(
        predicate::str::contains("Word size: 8")
            .and(predicate::str::contains("Word size: 273"))
            // All candidates produce 200 bytes; the first wins the tie.
            .and(predicate::str::contains("Best word size: 8 (200 bytes)")),
    );
    Ok(())
}

#[test]
fn failing_invocation_names_the_pair_and_aborts() -> Result<(), Box<dyn std::error::Error>> {
    let tools = tempdir()?;
    let workspace = tempdir()?;
    let body = format!(
        "if [ \"$flag\" = \"-md1m\" ]; then exit 7; fi\n{SIZED_BY_FLAG}"
    );
    let compressor = fake_compressor(tools.path(), &body);
    make_input(workspace.path(), "data", 1_572_864);

    let mut cmd = Command::cargo_bin("archtune")?;
    cmd.arg("--workspace")
        .arg(workspace.path())
        .arg("--compressor")
        .arg(&compressor);
    cmd.assert()
        .failure()
        .stderr(
            predicate::str::contains("status 7")
                .and(predicate::str::contains("item 'data'"))
                .and(predicate::str::contains("candidate 1m")),
        )
        .stdout(predicate::str::contains("Best").not());
    Ok(())
}

#[test]
fn missing_compressor_is_fatal_before_any_mutation() -> Result<(), Box<dyn std::error::Error>> {
    let workspace = tempdir()?;
    make_input(workspace.path(), "data", 10);
    let stale = workspace.path().join("stale.7z");
    fs::write(&stale, b"left over")?;

    let mut cmd = Command::cargo_bin("archtune")?;
    cmd.arg("--workspace")
        .arg(workspace.path())
        .arg("--compressor")
        .arg("/nonexistent/archtune-missing-7z");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no usable 7-Zip binary"));

    // The stale archive was not touched: resolution failed first.
    assert!(stale.exists());
    Ok(())
}

#[test]
fn json_mode_emits_report_on_stdout_and_progress_on_stderr(
) -> Result<(), Box<dyn std::error::Error>> {
    let tools = tempdir()?;
    let workspace = tempdir()?;
    let compressor = fake_compressor(tools.path(), SIZED_BY_FLAG);
    make_input(workspace.path(), "data", 1_572_864);

    let mut cmd = Command::cargo_bin("archtune")?;
    cmd.arg("--json")
        .arg("--workspace")
        .arg(workspace.path())
        .arg("--compressor")
        .arg(&compressor);
    let output = cmd.assert().success();
    let output = output.get_output();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Dict size: 64k"));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["dimension"], "dict");
    assert_eq!(report["inputs"], 1);
    assert_eq!(report["best"]["value"], "1m");
    assert_eq!(report["best"]["total_bytes"], 100);
    let results = report["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["value"], "64k");
    assert_eq!(results[0]["total_bytes"], 300);
    Ok(())
}

#[test]
fn consecutive_runs_agree_and_leak_no_artifacts() -> Result<(), Box<dyn std::error::Error>> {
    let tools = tempdir()?;
    let workspace = tempdir()?;
    let compressor = fake_compressor(tools.path(), SIZED_BY_FLAG);
    make_input(workspace.path(), "data", 1_572_864);

    let mut first_best = String::new();
    for _ in 0..2 {
        let mut cmd = Command::cargo_bin("archtune")?;
        cmd.arg("--workspace")
            .arg(workspace.path())
            .arg("--compressor")
            .arg(&compressor);
        let output = cmd.output()?;
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let best = stdout
            .lines()
            .find(|line| line.starts_with("Best"))
            .unwrap()
            .to_string();
        if first_best.is_empty() {
            first_best = best;
        } else {
            assert_eq!(best, first_best);
        }
        assert_eq!(archive_count(workspace.path()), 0);
    }
    Ok(())
}
