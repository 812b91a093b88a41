use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn copy_fixture(dir: &TempDir, name: &str) -> PathBuf {
    let target = dir.path().join(name);
    fs::copy(fixture_path(name), &target).expect("copy fixture");
    target
}

#[test]
fn formats_stdin_to_stdout() {
    let mut cmd = cargo_bin_cmd!("rebfmt");
    cmd.write_stdin("if(a>0){b=1;}else{b=2;}");
    cmd.assert()
        .success()
        .stdout("if (a > 0) {\n\tb = 1;\n} else {\n\tb = 2;\n}\n");
}

#[test]
fn dialect_flag_applies_to_stdin() {
    let mut cmd = cargo_bin_cmd!("rebfmt");
    cmd.arg("--dialect").arg("property").write_stdin("Safety:p0&&p1;");
    cmd.assert().success().stdout("Safety: p0 && p1;\n");
}

#[test]
fn dialect_follows_file_extension() {
    let mut cmd = cargo_bin_cmd!("rebfmt");
    cmd.arg(fixture_path("ping_pong.property"));
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Safety: pingReady || !manyPings;"));
}

#[test]
fn indent_flag_overrides_detection() {
    let mut cmd = cargo_bin_cmd!("rebfmt");
    cmd.arg("--indent").arg("3").write_stdin("main{\n\tA a():();\n}\n");
    cmd.assert().success().stdout("main {\n   A a():();\n}\n");
}

#[test]
fn rejects_unknown_dialect() {
    let mut cmd = cargo_bin_cmd!("rebfmt");
    cmd.arg("--dialect").arg("cobol").write_stdin("x;");
    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("cobol"));
}

#[test]
fn rejects_bad_indent() {
    let mut cmd = cargo_bin_cmd!("rebfmt");
    cmd.arg("--indent").arg("wide").write_stdin("x;");
    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("--indent"));
}

#[test]
fn check_reports_unformatted_files() {
    let dir = TempDir::new().unwrap();
    let messy = copy_fixture(&dir, "ping_pong.rebeca");
    let before = fs::read_to_string(&messy).unwrap();

    let mut cmd = cargo_bin_cmd!("rebfmt");
    cmd.arg("--check").arg(&messy);
    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("+    msgsrv initial() {"))
        .stderr(predicate::str::contains("1 of 1 files would be reformatted"));

    assert_eq!(fs::read_to_string(&messy).unwrap(), before);
}

#[test]
fn check_passes_on_clean_files() {
    let mut cmd = cargo_bin_cmd!("rebfmt");
    cmd.arg("--check").arg(fixture_path("clean.rebeca"));
    cmd.assert().success().stdout("");
}

#[test]
fn write_rewrites_in_place() {
    let dir = TempDir::new().unwrap();
    let path = copy_fixture(&dir, "ping_pong.property");

    let mut cmd = cargo_bin_cmd!("rebfmt");
    cmd.arg("--write").arg(&path);
    cmd.assert().success().stdout("");

    let rewritten = fs::read_to_string(&path).unwrap();
    assert!(rewritten.contains("  define {\n    pingReady = ping.ready;\n"));

    let mut check = cargo_bin_cmd!("rebfmt");
    check.arg("--check").arg(&path);
    check.assert().success();
}

#[test]
fn range_formats_only_the_span() {
    let source = "a{\n  b=1;\n  c=2;\n}\n";
    let offset = source.find("c=2;").unwrap();
    let mut cmd = cargo_bin_cmd!("rebfmt");
    cmd.arg("--range")
        .arg(format!("{}:4", offset))
        .write_stdin(source);
    cmd.assert().success().stdout("  c = 2;");
}

#[test]
fn range_write_splices_into_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("r.rebeca");
    let source = "a{\n  b=1;\n  c=2;\n}\n";
    fs::write(&path, source).unwrap();
    let offset = source.find("c=2;").unwrap();

    let mut cmd = cargo_bin_cmd!("rebfmt");
    cmd.arg("--range")
        .arg(format!("{}:4", offset))
        .arg("--write")
        .arg(&path);
    cmd.assert().success();
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "a{\n  b=1;\n  c = 2;\n}\n"
    );
}

#[test]
fn rejects_malformed_range() {
    let mut cmd = cargo_bin_cmd!("rebfmt");
    cmd.arg("--range").arg("12").write_stdin("x;");
    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("OFFSET:LENGTH"));
}

#[test]
fn token_format_dumps_tokens() {
    let mut cmd = cargo_bin_cmd!("rebfmt");
    cmd.arg("--format").arg("token-simple").write_stdin("msgsrv go");
    cmd.assert()
        .success()
        .stdout("<keyword:msgsrv><whitespace><identifier:go>");
}

#[test]
fn unknown_format_lists_alternatives() {
    let mut cmd = cargo_bin_cmd!("rebfmt");
    cmd.arg("--format").arg("ast-tag").write_stdin("x;");
    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("token-simple"));
}

#[test]
fn list_formats() {
    let mut cmd = cargo_bin_cmd!("rebfmt");
    cmd.arg("--list-formats");
    cmd.assert().success().stdout(
        predicate::str::contains("token-json")
            .and(predicate::str::contains("format-diff"))
            .and(predicate::str::contains("format-edits")),
    );
}

#[test]
fn config_file_sets_indent() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("custom.toml");
    fs::write(&config, "[formatting]\nindent = \"2\"\n").unwrap();

    let mut cmd = cargo_bin_cmd!("rebfmt");
    cmd.arg("--config").arg(&config).write_stdin("a{b;}");
    cmd.assert().success().stdout("a {\n  b;\n}\n");
}

#[test]
fn local_config_file_is_picked_up() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("rebfmt.toml"),
        "[dialects]\ndefault = \"property\"\n",
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("rebfmt");
    cmd.current_dir(dir.path()).write_stdin("Safety:p;");
    cmd.assert().success().stdout("Safety: p;\n");
}

#[test]
fn missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let mut cmd = cargo_bin_cmd!("rebfmt");
    cmd.arg(dir.path().join("absent.rebeca"));
    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("could not be read"));
}
