//! Shared support for the scaffold end-to-end test suites

use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;

/// Install a `RUST_LOG`-driven subscriber once per test binary
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Directory holding the checked-in template trees
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Glob pattern matching every file of a fixture template tree
pub fn fixture_pattern(relative: &str) -> String {
    format!("{}/{}/templates/**/*", fixtures_dir().display(), relative)
}
