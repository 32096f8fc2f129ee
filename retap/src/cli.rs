//! CLI argument parsing using clap

use clap::Parser;

/// Migrate Reactor's deprecated doAfterSuccessOrError to tap
#[derive(Parser, Debug)]
#[command(name = "retap")]
#[command(author, about, long_about = None)]
#[command(disable_version_flag = true)]
#[command(after_help = r#"EXAMPLES:
    # Preview the migration across a source tree
    retap "src/**/*.java"

    # Apply the migration in place
    retap "src/**/*.java" --write

    # Migrate from stdin (prints the result to stdout)
    cat Service.java | retap

    # CI: fail if any file still uses the deprecated combinator
    retap "src/**/*.java" --check

    # Machine-readable summary
    retap "src/**/*.java" -o json
"#)]
pub struct Args {
    /// Files to process (supports glob patterns like "src/**/*.java")
    #[arg()]
    pub files: Vec<String>,

    /// Rewrite files in place (default is a dry run)
    #[arg(short = 'w', long = "write")]
    pub write: bool,

    /// Exit non-zero if any file would change (implies dry run)
    #[arg(long = "check")]
    pub check: bool,

    /// Output format: text (default), json
    #[arg(short = 'o', long = "output", default_value = "text")]
    pub output: String,

    /// Number of parallel workers
    #[arg(short = 'c', long = "concurrency")]
    pub concurrency: Option<usize>,

    /// Show verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Print version information
    #[arg(short = 'V', long = "version")]
    pub version: bool,
}
