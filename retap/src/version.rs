//! Version information display

// Include the auto-generated versions from build.rs
include!(concat!(env!("OUT_DIR"), "/versions.rs"));

/// Package version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git commit hash (set by build.rs)
pub const GIT_HASH: &str = env!("RETAP_GIT_HASH");

/// Git commit date (set by build.rs)
pub const GIT_DATE: &str = env!("RETAP_GIT_DATE");

/// Print version information
pub fn print_version() {
    println!("retap {} ({} {})", VERSION, GIT_HASH, GIT_DATE);
    println!();
    println!("Core libraries:");

    // Find max name length for alignment
    let max_len = DEPENDENCY_VERSIONS.iter().map(|(n, _)| n.len()).max().unwrap_or(0);

    for (name, version) in DEPENDENCY_VERSIONS {
        println!("  {:width$}  {}", name, version, width = max_len);
    }
}
