//! Build script to capture git information and dependency versions at compile time

use std::collections::HashMap;
use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::process::Command;

fn main() {
    // Re-run build script if git HEAD changes or Cargo.lock changes
    println!("cargo:rerun-if-changed=../.git/HEAD");
    println!("cargo:rerun-if-changed=../.git/index");
    println!("cargo:rerun-if-changed=../Cargo.lock");

    // Get git commit hash (short)
    let commit_hash = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    // Get git commit datetime in ISO format
    let commit_date = Command::new("git")
        .args(["log", "-1", "--format=%ci"])
        .output()
        .ok()
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    // Check if working directory is dirty
    let is_dirty = Command::new("git")
        .args(["status", "--porcelain"])
        .output()
        .ok()
        .map(|o| !o.stdout.is_empty())
        .unwrap_or(false);

    let dirty_suffix = if is_dirty { "-dirty" } else { "" };

    println!("cargo:rustc-env=RETAP_GIT_HASH={}{}", commit_hash, dirty_suffix);
    println!("cargo:rustc-env=RETAP_GIT_DATE={}", commit_date);

    // Extract dependency versions from Cargo.lock
    let versions = get_dependency_versions();

    // Generate version info file
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("versions.rs");
    let mut f = File::create(&dest_path).unwrap();

    writeln!(f, "/// Auto-generated dependency versions from Cargo.lock").unwrap();
    writeln!(f, "pub const DEPENDENCY_VERSIONS: &[(&str, &str)] = &[").unwrap();
    for name in ["tree-sitter", "tree-sitter-java"] {
        if let Some(version) = versions.get(name) {
            writeln!(f, "    (\"{}\", \"{}\"),", name, version).unwrap();
        }
    }
    writeln!(f, "];").unwrap();
}

/// Extract dependency versions from Cargo.lock
fn get_dependency_versions() -> HashMap<String, String> {
    let mut versions = HashMap::new();

    if let Ok(lockfile) = std::fs::read_to_string("../Cargo.lock") {
        parse_cargo_lock(&lockfile, &mut versions);
    }

    versions
}

/// Parse Cargo.lock to extract package versions
fn parse_cargo_lock(content: &str, versions: &mut HashMap<String, String>) {
    let mut current_name: Option<String> = None;
    let mut in_package_block = false;

    for line in content.lines() {
        let line = line.trim();

        if line == "[[package]]" {
            current_name = None;
            in_package_block = true;
        } else if in_package_block {
            if let Some(rest) = line.strip_prefix("name = ") {
                current_name = Some(rest.trim_matches('"').to_string());
            } else if let Some(rest) = line.strip_prefix("version = ") {
                if let Some(name) = current_name.take() {
                    if should_track(&name) {
                        versions.insert(name, rest.trim_matches('"').to_string());
                    }
                }
            }
        }
    }
}

/// Check if we should track this package
fn should_track(name: &str) -> bool {
    name == "tree-sitter" || name == "tree-sitter-java"
}
