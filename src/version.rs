//! Canonical version/build identifier strings.
//!
//! Every title and URL in the crate is derived through these functions so
//! that topics created here are always found again by the same strings.

/// Title of the nightly-builds topic for a version, e.g. "v0.7.2-beta Nightly Builds".
pub fn topic_title(version: &str) -> String {
    format!("v{} Nightly Builds", version)
}

/// Combined version and build number, e.g. "0.7.2-beta.142".
pub fn version_build(version: &str, build: u64) -> String {
    format!("{}.{}", version, build)
}

/// Combined version, build number, and commit hash with build metadata
/// separator, e.g. "0.7.2-beta.142+build.7a017dc".
pub fn version_build_hash(version: &str, build: u64, hash: &str) -> String {
    format!("{}+build.{}", version_build(version, build), hash)
}
