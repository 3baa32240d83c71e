// src/config/validate.rs

use std::path::PathBuf;

use regex::Regex;

use crate::config::model::{Config, Patterns, RawConfig};
use crate::errors::{InlError, Result};

impl TryFrom<RawConfig> for Config {
    type Error = InlError;

    fn try_from(raw: RawConfig) -> std::result::Result<Self, Self::Error> {
        ensure_has_command(&raw)?;
        let patterns = compile_patterns(&raw)?;
        let root = resolve_root(&raw)?;
        Ok(Config::new_unchecked(root, patterns, &raw))
    }
}

fn ensure_has_command(raw: &RawConfig) -> Result<()> {
    if raw.command.iter().all(|arg| arg.trim().is_empty()) {
        return Err(InlError::ConfigError(
            "no command given (usage: inl SHELL-COMMAND)".to_string(),
        ));
    }
    if raw.shell.trim().is_empty() {
        return Err(InlError::ConfigError("shell must not be empty".to_string()));
    }
    Ok(())
}

fn compile_patterns(raw: &RawConfig) -> Result<Patterns> {
    Ok(Patterns {
        exclude_dir: compile("exclude-dir", &raw.exclude_dir)?,
        exclude_file: compile("exclude", &raw.exclude_file)?,
        include_file: compile("include", &raw.include_file)?,
    })
}

fn compile(flag: &'static str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| InlError::InvalidPattern {
        flag,
        pattern: pattern.to_string(),
        source,
    })
}

/// Make the root absolute without resolving symlinks, so event paths keep the
/// prefix the user sees.
fn resolve_root(raw: &RawConfig) -> Result<PathBuf> {
    let root = std::path::absolute(&raw.root)?;
    if !root.is_dir() {
        return Err(InlError::ConfigError(format!(
            "watch root {:?} is not a directory",
            root
        )));
    }
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_with_command() -> RawConfig {
        RawConfig {
            command: vec!["true".to_string()],
            ..RawConfig::default()
        }
    }

    #[test]
    fn defaults_validate() {
        let cfg = Config::try_from(raw_with_command()).unwrap();
        assert!(cfg.root.is_absolute());
        assert!(cfg.patterns.exclude_dir.is_match(".git"));
        assert!(!cfg.patterns.exclude_dir.is_match("src"));
        assert!(cfg.patterns.exclude_file.is_match("/work/main.rs.swp"));
        assert!(cfg.patterns.exclude_file.is_match("/work/4913"));
        assert!(!cfg.patterns.exclude_file.is_match("/work/main.rs"));
        assert!(cfg.patterns.include_file.is_match("/anything/at/all"));
    }

    #[test]
    fn invalid_pattern_names_the_flag() {
        let raw = RawConfig {
            include_file: "(unclosed".to_string(),
            ..raw_with_command()
        };
        match Config::try_from(raw) {
            Err(InlError::InvalidPattern { flag, pattern, .. }) => {
                assert_eq!(flag, "include");
                assert_eq!(pattern, "(unclosed");
            }
            other => panic!("expected InvalidPattern, got {other:?}"),
        }
    }

    #[test]
    fn empty_command_is_a_config_error() {
        let raw = RawConfig {
            command: vec![" ".to_string()],
            ..RawConfig::default()
        };
        assert!(matches!(
            Config::try_from(raw),
            Err(InlError::ConfigError(msg)) if msg.contains("no command")
        ));
    }

    #[test]
    fn missing_root_is_a_config_error() {
        let raw = RawConfig {
            root: PathBuf::from("/definitely/not/here/inl-root"),
            ..raw_with_command()
        };
        assert!(matches!(
            Config::try_from(raw),
            Err(InlError::ConfigError(msg)) if msg.contains("not a directory")
        ));
    }
}
