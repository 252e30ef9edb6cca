//! Version information.

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User agent style identifier: `naviguide/{version}`.
pub fn version_string() -> String {
    format!("naviguide/{PKG_VERSION}")
}
