// tests/error_handling.rs

mod common;
use crate::common::builders::ConfigBuilder;
use crate::common::init_tracing;

use clap::Parser;
use tempfile::TempDir;

use inl::cli::CliArgs;
use inl::config::Config;
use inl::errors::InlError;

fn args(extra: &[&str]) -> CliArgs {
    let mut argv = vec!["inl"];
    argv.extend_from_slice(extra);
    CliArgs::try_parse_from(argv).expect("valid arguments")
}

#[test]
fn builder_defaults_validate() {
    let dir = TempDir::new().unwrap();
    let cfg = ConfigBuilder::new("make test").root(dir.path()).build();
    assert!(cfg.root.is_absolute());
    assert_eq!(cfg.command.line(), "make test");
    assert!(cfg.wait_mode.waits());
}

#[test]
fn each_bad_pattern_names_its_flag() {
    let dir = TempDir::new().unwrap();
    let cases = [
        (ConfigBuilder::new("true").exclude_dir("(").raw(), "exclude-dir"),
        (ConfigBuilder::new("true").exclude_file("[").raw(), "exclude"),
        (ConfigBuilder::new("true").include_file("*x").raw(), "include"),
    ];

    for (mut raw, expected) in cases {
        raw.root = dir.path().to_path_buf();
        match Config::try_from(raw) {
            Err(InlError::InvalidPattern { flag, .. }) => assert_eq!(flag, expected),
            other => panic!("expected invalid {expected} pattern, got {other:?}"),
        }
    }
}

#[test]
fn root_must_be_an_existing_directory() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("plain.txt");
    std::fs::write(&file, "x").unwrap();

    let err = Config::try_from(ConfigBuilder::new("true").root(&file).raw()).unwrap_err();
    assert!(matches!(err, InlError::ConfigError(_)), "got {err:?}");
}

#[tokio::test]
async fn dry_run_walks_without_running_anything() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("src")).unwrap();
    let marker = dir.path().join("ran");

    let root = dir.path().to_string_lossy().into_owned();
    let command = format!("touch {}", marker.display());
    inl::run(args(&["--dry-run", "--root", &root, &command]))
        .await
        .unwrap();

    assert!(!marker.exists(), "dry run must not execute the command");
}

#[tokio::test]
async fn run_reports_invalid_patterns_before_watching() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let root = dir.path().to_string_lossy().into_owned();

    let err = inl::run(args(&["-i", "(", "--root", &root, "true"]))
        .await
        .unwrap_err();
    let inl_err = err.downcast_ref::<InlError>().expect("InlError inside anyhow");
    assert!(matches!(inl_err, InlError::InvalidPattern { flag: "include", .. }));
}
