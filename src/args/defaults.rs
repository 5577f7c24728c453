pub(crate) const DEFAULT_USER_AGENT: &str = concat!("clobbr/", env!("CARGO_PKG_VERSION"));

/// Per-attempt deadline used when neither the CLI nor a config file sets one.
pub(crate) const DEFAULT_TIMEOUT_MS: u64 = 10_000;
