use std::path::Path;
use std::time::Duration;

use inl::config::{Config, RawConfig};
use inl::types::WaitMode;

/// Builder for `Config` to simplify test setup.
pub struct ConfigBuilder {
    raw: RawConfig,
}

impl ConfigBuilder {
    pub fn new(command: &str) -> Self {
        Self {
            raw: RawConfig {
                command: vec![command.to_string()],
                ..RawConfig::default()
            },
        }
    }

    pub fn root(mut self, root: impl AsRef<Path>) -> Self {
        self.raw.root = root.as_ref().to_path_buf();
        self
    }

    pub fn exclude_dir(mut self, pattern: &str) -> Self {
        self.raw.exclude_dir = pattern.to_string();
        self
    }

    pub fn exclude_file(mut self, pattern: &str) -> Self {
        self.raw.exclude_file = pattern.to_string();
        self
    }

    pub fn include_file(mut self, pattern: &str) -> Self {
        self.raw.include_file = pattern.to_string();
        self
    }

    pub fn debounce(mut self, debounce: Duration) -> Self {
        self.raw.debounce = debounce;
        self
    }

    pub fn no_wait(mut self) -> Self {
        self.raw.wait_mode = WaitMode::NoWait;
        self
    }

    pub fn shell(mut self, shell: &str) -> Self {
        self.raw.shell = shell.to_string();
        self
    }

    pub fn postpone(mut self) -> Self {
        self.raw.postpone = true;
        self
    }

    pub fn raw(self) -> RawConfig {
        self.raw
    }

    pub fn build(self) -> Config {
        Config::try_from(self.raw).expect("Failed to build valid config from builder")
    }
}
