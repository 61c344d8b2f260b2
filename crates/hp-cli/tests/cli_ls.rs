use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

use hp_root::fixture::{FixtureHist, RootFileBuilder};

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_harry"))
}

fn tmp_path(filename: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let mut p = std::env::temp_dir();
    p.push(format!("harry_cli_{}_{}_{}", std::process::id(), nanos, filename));
    p
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .env("NO_COLOR", "1")
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

#[test]
fn ls_lists_nested_objects_with_classes() {
    let mut b = RootFileBuilder::new("nested.root");
    b.add_hist("", FixtureHist::th1d("h_top", &[0.0, 1.0], &[1.0]));
    b.add_hist("sr/mu", FixtureHist::th1f("h_pt", &[0.0, 10.0, 20.0], &[3.0, 4.0]));
    b.add_hist("sr", FixtureHist::th2d("h_map", (&[0.0, 1.0], &[0.0, 1.0]), &[2.0]));
    b.add_opaque("", "events", "TTree", b"opaque");
    let path = tmp_path("nested.root");
    std::fs::write(&path, b.build()).unwrap();

    let out = run(&["ls", path.to_str().unwrap()]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);

    let expected = ["h_top (TH1D)", "sr/mu/h_pt (TH1F)", "sr/h_map (TH2D)", "events (TTree)"];
    let positions: Vec<usize> = expected
        .iter()
        .map(|line| stdout.find(line).unwrap_or_else(|| panic!("missing {line:?} in:\n{stdout}")))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "unexpected order:\n{stdout}");
    assert!(!stdout.contains("(TDirectoryFile)"));

    let _ = std::fs::remove_file(path);
}

#[test]
fn ls_respects_log_level() {
    let mut b = RootFileBuilder::new("flat.root");
    b.add_hist("", FixtureHist::th1d("h", &[0.0, 1.0], &[1.0]));
    let path = tmp_path("flat.root");
    std::fs::write(&path, b.build()).unwrap();

    let out = run(&["--log-level", "warn", "ls", path.to_str().unwrap()]);
    assert!(out.status.success());
    assert!(!String::from_utf8_lossy(&out.stdout).contains("h (TH1D)"));

    let _ = std::fs::remove_file(path);
}

#[test]
fn ls_missing_file_fails() {
    let out = run(&["ls", "/definitely/not/here.root"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("failed to open"));
}

#[test]
fn ls_rejects_non_root_file() {
    let path = tmp_path("junk.root");
    std::fs::write(&path, vec![b'x'; 256]).unwrap();
    let out = run(&["ls", path.to_str().unwrap()]);
    assert!(!out.status.success());
    let _ = std::fs::remove_file(path);
}
