// src/config/mod.rs

//! Run configuration.
//!
//! - [`model`] holds the raw (as typed) and validated configuration types.
//! - [`validate`] turns a [`RawConfig`] into a [`Config`], compiling every
//!   pattern up front so that a bad regex is a startup error.
//! - [`loader`] builds a `RawConfig` from parsed CLI arguments.
//! - [`duration`] parses `100ms` / `1.5s` style durations.

pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use loader::load_from_args;
pub use model::{Config, Patterns, RawConfig, ShellCommand};
