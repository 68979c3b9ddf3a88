use assert_cmd::Command;
use predicates::prelude::*;

fn r3k() -> Command {
    let mut cmd = Command::cargo_bin("r3k").unwrap();
    cmd.env_remove("USER_AGENT");
    cmd
}

#[test]
fn lists_commands() {
    r3k()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("pull").and(predicate::str::contains("parse")));
}

#[test]
fn pull_needs_a_user_agent() {
    let output = tempfile::tempdir().unwrap();

    r3k()
        .args(["pull", "--output"])
        .arg(output.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("user agent"));
}

#[test]
fn parse_needs_an_input() {
    r3k()
        .args(["parse", "--output", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--input"));
}

#[test]
fn parse_filings() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    std::fs::copy(
        concat!(env!("CARGO_MANIFEST_DIR"), "/../r3k-spider/tests/files/legacy.htm"),
        input.path().join("2009-03-31_c57123_ncsr.htm"),
    )
    .unwrap();
    std::fs::write(
        input.path().join("filing-index.csv"),
        "FILING_DATE,PERIOD_OF_REPORT,FORM_TYPE,SIZE,URI,VERSION\n\
         2009-06-01,2009-03-31,N-CSR,1716,/Archives/edgar/data/1100663/000093041309003456/c57123_ncsr.htm,1\n",
    )
    .unwrap();

    r3k()
        .args(["parse", "--trace", "INFO", "--input"])
        .arg(input.path())
        .arg("--output")
        .arg(output.path())
        .assert()
        .success();

    let csv = std::fs::read_to_string(output.path().join("2009-03-31.csv")).unwrap();
    assert!(csv.starts_with("SECTOR,COMPANY_NAME,SHARES,VALUE,REPORT_DATE,ETF_NAME\n"));
    assert_eq!(csv.lines().count(), 6);

    // nothing left to do on a second run
    r3k()
        .args(["parse", "-i"])
        .arg(input.path())
        .arg("-o")
        .arg(output.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("0 filings").and(predicate::str::contains("1 skipped")));
}

#[test]
fn parse_reports_broken_filings() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    std::fs::write(input.path().join("2012-03-31_broken.htm"), "<html></html>").unwrap();
    std::fs::write(
        input.path().join("filing-index.csv"),
        "FILING_DATE,PERIOD_OF_REPORT,FORM_TYPE,SIZE,URI,VERSION\n\
         2012-05-30,2012-03-31,N-CSR,13,/a/broken.htm,2\n",
    )
    .unwrap();

    r3k()
        .args(["parse", "-t", "ERROR", "-i"])
        .arg(input.path())
        .arg("-o")
        .arg(output.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse"));
}
