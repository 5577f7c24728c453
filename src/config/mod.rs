//! Configuration loading and application.
mod apply;
mod loader;
pub mod types;

#[cfg(test)]
mod tests;

pub use apply::apply_config;
pub use loader::load_config;

pub(crate) use loader::default_config_path;

#[cfg(test)]
pub(crate) use loader::{ConfigFormat, load_config_file};
