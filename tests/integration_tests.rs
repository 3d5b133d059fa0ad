use std::fs;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use std::process::Command;

#[test]
fn runs_without_arguments() {
    let mut cmd = Command::cargo_bin("mano").unwrap();
    cmd.assert().success();
}

#[test]
fn lists_subtraction_program() {
    let mut cmd = Command::cargo_bin("mano").unwrap();
    cmd.arg("tests/files/subtract.asm");

    cmd.assert()
        .success()
        .stdout(contains("Symbol Table:\nMIN: 106\nSUB: 107\nDIF: 108\n"))
        .stdout(contains("Machine Code:\n100: 0010000100000111\n"))
        .stdout(contains("108: 0000000000000000"));
}

#[test]
fn compiles_listing() {
    let dest = std::env::temp_dir().join(format!("mano-subtract-{}.lst", std::process::id()));
    let mut cmd = Command::cargo_bin("mano").unwrap();
    cmd.arg("compile").arg("tests/files/subtract.asm").arg(&dest);
    cmd.assert().success().stdout(contains("Saved"));

    let listing = fs::read_to_string(&dest).unwrap();
    let _ = fs::remove_file(&dest);
    assert_eq!(
        listing,
        include_str!("expected/subtract.lst").replace("\r\n", "\n")
    );
}

#[test]
fn prints_symbols_only() {
    let mut cmd = Command::cargo_bin("mano").unwrap();
    cmd.arg("symbols").arg("tests/files/subtract.asm");
    cmd.assert()
        .success()
        .stdout(contains("MIN: 106\nSUB: 107\nDIF: 108\n"))
        .stdout(contains("Machine Code").not());
}

#[test]
fn traces_each_word() {
    let mut cmd = Command::cargo_bin("mano").unwrap();
    cmd.arg("assemble")
        .arg("tests/files/subtract.asm")
        .arg("--trace");
    cmd.assert()
        .success()
        .stdout(contains("MIN = 106"))
        .stdout(contains("107: 1111111111101001  line 10: DEC -23"))
        .stdout(contains("LDA SUB"));
}

#[test]
fn warns_on_undefined_symbol() {
    let mut cmd = Command::cargo_bin("mano").unwrap();
    cmd.arg("check").arg("tests/files/undefined.asm");
    cmd.assert()
        .success()
        .stdout(contains("1 warning(s)"))
        .stderr(contains("undefined symbol `MISSING`"));
}

#[test]
fn strict_fails_on_undefined_symbol() {
    let mut cmd = Command::cargo_bin("mano").unwrap();
    cmd.arg("check").arg("tests/files/undefined.asm").arg("--strict");
    cmd.assert()
        .failure()
        .stderr(contains("undefined symbol `MISSING`"));
}

#[test]
fn strict_from_environment() {
    let mut cmd = Command::cargo_bin("mano").unwrap();
    cmd.env("MANO_STRICT", "1")
        .arg("check")
        .arg("tests/files/unknown.asm");
    cmd.assert()
        .failure()
        .stderr(contains("unrecognized mnemonic `NOP`"));
}

#[test]
fn skips_unknown_mnemonic_with_warning() {
    let mut cmd = Command::cargo_bin("mano").unwrap();
    cmd.arg("tests/files/unknown.asm");
    cmd.assert()
        .success()
        .stdout(contains("000: 0111100000000000\n001: 0111000000000001\n"))
        .stderr(contains("unrecognized mnemonic `NOP`"));
}

#[test]
fn fails_on_malformed_origin() {
    let mut cmd = Command::cargo_bin("mano").unwrap();
    cmd.arg("check").arg("tests/files/bad_org.asm");
    cmd.assert()
        .failure()
        .stderr(contains("malformed hexadecimal literal `1G`"));
}

#[test]
fn fails_on_label_only_line() {
    let mut cmd = Command::cargo_bin("mano").unwrap();
    cmd.arg("check").arg("tests/files/label_only.asm");
    cmd.assert()
        .failure()
        .stderr(contains("after the label"));
}

#[test]
fn traced_diagnostic_is_reported_once() {
    let mut cmd = Command::cargo_bin("mano").unwrap();
    cmd.arg("assemble")
        .arg("tests/files/undefined.asm")
        .arg("--trace");
    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let total = stdout.matches("undefined symbol `MISSING`").count()
        + stderr.matches("undefined symbol `MISSING`").count();
    assert_eq!(total, 1);
    assert!(stdout.contains("LDA MISSING"));
}
