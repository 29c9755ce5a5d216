//! Unit tests for CLI argument parsing

use ds3_backup::SnapshotFormat;
use ds3_backup::cli::args::{CliArgs, parse_args};
use std::path::PathBuf;
use std::time::Duration;

fn make_args(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

#[test]
fn no_flags_means_single_directory_backup() {
    let parsed = parse_args(&make_args(&["ds3backup"])).expect("parse args");
    assert_eq!(parsed, CliArgs::default());

    let plan = parsed.to_plan();
    assert_eq!(plan.schedule, None);
    assert_eq!(plan.options.format, SnapshotFormat::Directory);
    assert_eq!(plan.options.source, None);
    assert_eq!(plan.options.destination_root, None);
}

#[test]
fn parse_full_flag_set() {
    let argv = make_args(&[
        "ds3backup",
        "--auto",
        "--interval",
        "60",
        "--backup-path",
        "/tmp/out",
        "--zip",
        "--source",
        "/tmp/saves",
        "--json",
    ]);

    let parsed = parse_args(&argv).expect("parse args");
    assert!(parsed.auto);
    assert!(parsed.zip);
    assert!(parsed.json);
    assert_eq!(parsed.interval_secs, 60);

    let plan = parsed.to_plan();
    assert_eq!(plan.schedule, Some(Duration::from_secs(60)));
    assert_eq!(plan.options.format, SnapshotFormat::Archive);
    assert_eq!(plan.options.destination_root, Some(PathBuf::from("/tmp/out")));
    assert_eq!(plan.options.source, Some(PathBuf::from("/tmp/saves")));
}

#[test]
fn single_dash_legacy_flags_are_accepted() {
    let argv = make_args(&["ds3backup", "-auto", "-zip", "-t", "5", "-b", "D:/Saves"]);
    let parsed = parse_args(&argv).expect("parse args");
    assert!(parsed.auto);
    assert!(parsed.zip);
    assert_eq!(parsed.interval_secs, 5);
    assert_eq!(parsed.backup_path.as_deref(), Some("D:/Saves"));
}

#[test]
fn interval_without_auto_does_not_schedule() {
    let parsed = parse_args(&make_args(&["ds3backup", "-t", "30"])).unwrap();
    assert_eq!(parsed.to_plan().schedule, None);
}

#[test]
fn interval_requires_positive_value() {
    let err = parse_args(&make_args(&["ds3backup", "--interval", "0"]))
        .expect_err("zero interval should be rejected");
    assert!(err.contains("greater than zero"));

    let err = parse_args(&make_args(&["ds3backup", "--interval", "soon"]))
        .expect_err("non-numeric interval should be rejected");
    assert!(err.contains("positive integer"));

    let err = parse_args(&make_args(&["ds3backup", "--interval"]))
        .expect_err("missing value should be rejected");
    assert!(err.contains("--interval requires a value"));
}

#[test]
fn unknown_and_stray_arguments_fail() {
    let err = parse_args(&make_args(&["ds3backup", "--keep", "3"])).unwrap_err();
    assert!(err.contains("Unknown option: --keep"));

    let err = parse_args(&make_args(&["ds3backup", "extra"])).unwrap_err();
    assert!(err.contains("Unexpected argument: extra"));
}

#[test]
fn config_flag_records_explicit_path() {
    let parsed = parse_args(&make_args(&["ds3backup", "-c", "alt.json", "-q"])).unwrap();
    assert_eq!(parsed.config.as_deref(), Some("alt.json"));
    assert!(parsed.quiet);
}
