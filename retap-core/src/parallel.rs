//! Parallel file processing using Rayon

use rayon::prelude::*;
use std::path::Path;

use crate::engine::{migrate_file, FileOutcome, MigrateError};
use crate::parser::is_java_file;

/// Migrate multiple files in parallel
pub fn process_files_parallel<P: AsRef<Path> + Sync>(
    files: &[P],
    write: bool,
    concurrency: Option<usize>,
) -> Vec<Result<FileOutcome, MigrateError>> {
    // Configure thread pool
    if let Some(num_threads) = concurrency {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if pool already initialized
    }

    files
        .par_iter()
        .map(|path| migrate_file(path.as_ref(), write))
        .collect()
}

/// Expand glob patterns to file paths
pub fn expand_globs(patterns: &[String]) -> Vec<String> {
    let mut files = Vec::new();

    for pattern in patterns {
        if pattern.contains('*') || pattern.contains('?') {
            match glob::glob(pattern) {
                Ok(paths) => {
                    for entry in paths.flatten() {
                        if entry.is_file() {
                            if let Some(path) = entry.to_str() {
                                files.push(path.to_string());
                            }
                        }
                    }
                }
                Err(e) => {
                    eprintln!("Invalid glob pattern '{}': {}", pattern, e);
                }
            }
        } else {
            // Not a glob, use as-is
            files.push(pattern.clone());
        }
    }

    files
}

/// Keep only Java sources
pub fn filter_java_files(files: Vec<String>) -> Vec<String> {
    files.into_iter().filter(|f| is_java_file(f)).collect()
}
