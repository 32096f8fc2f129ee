//! retap - Reactor doAfterSuccessOrError migration tool
//!
//! This is the main CLI entry point that orchestrates file collection and
//! per-file migration.

mod cli;
mod version;

use std::io::{self, Read};
use std::process::ExitCode;

use anyhow::{bail, Result};
use clap::Parser;
use retap_core::{
    expand_globs, filter_java_files, migrate_source, process_files_parallel, FileOutcome,
    MigrateError,
};

use cli::Args;

fn main() -> ExitCode {
    let args = Args::parse();

    if args.version {
        version::print_version();
        return ExitCode::SUCCESS;
    }

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    if args.output != "text" && args.output != "json" {
        bail!("invalid format '{}'. Valid formats: text, json", args.output);
    }
    let json = args.output == "json";

    // Collect files
    let files = filter_java_files(expand_globs(&args.files));

    // Stdin mode: no files and piped input
    let stdin_source = args.files.is_empty() && !atty::is(atty::Stream::Stdin);
    if stdin_source {
        return run_stdin(&args);
    }

    if files.is_empty() {
        eprintln!("Usage: retap <files...> [OPTIONS]");
        eprintln!("   or: cat Service.java | retap");
        eprintln!("\nUse --help for more information.");
        bail!("no input files");
    }

    // Configure thread pool
    let concurrency = args.concurrency.unwrap_or_else(num_cpus::get);
    rayon::ThreadPoolBuilder::new()
        .num_threads(concurrency)
        .build_global()
        .ok();

    // --check never writes, regardless of --write
    let write = args.write && !args.check;
    let results = process_files_parallel(&files, write, None);

    let mut outcomes: Vec<FileOutcome> = Vec::new();
    let mut errors: Vec<(String, MigrateError)> = Vec::new();
    for (file, result) in files.iter().zip(results) {
        match result {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => errors.push((file.clone(), e)),
        }
    }

    let changed = outcomes.iter().filter(|o| o.changed).count();
    let rewritten: usize = outcomes.iter().map(|o| o.rewritten).sum();
    let skipped: usize = outcomes.iter().map(|o| o.skipped.len()).sum();

    if json {
        let summary = serde_json::json!({
            "files": outcomes,
            "errors": errors
                .iter()
                .map(|(file, e)| serde_json::json!({ "file": file, "error": e.to_string() }))
                .collect::<Vec<_>>(),
            "changed": changed,
            "rewritten": rewritten,
            "skipped": skipped,
            "write": write,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for (file, e) in &errors {
            eprintln!("error: {}: {}", file, e);
        }
        for outcome in &outcomes {
            for diagnostic in &outcome.skipped {
                eprintln!("warning: {}", diagnostic);
            }
            if outcome.changed {
                let verb = if write { "rewrote" } else { "would rewrite" };
                println!(
                    "{}: {} {} call site{}",
                    outcome.file,
                    verb,
                    outcome.rewritten,
                    if outcome.rewritten == 1 { "" } else { "s" }
                );
            } else if args.verbose {
                println!("{}: unchanged", outcome.file);
            }
        }
        println!(
            "{} file{} scanned, {} changed, {} call site{} rewritten, {} skipped",
            outcomes.len(),
            if outcomes.len() == 1 { "" } else { "s" },
            changed,
            rewritten,
            if rewritten == 1 { "" } else { "s" },
            skipped
        );
    }

    if !errors.is_empty() {
        return Ok(ExitCode::FAILURE);
    }
    if args.check && changed > 0 {
        eprintln!("check failed: {} file(s) still use doAfterSuccessOrError", changed);
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Migrate a single source read from stdin, printing the result to stdout
fn run_stdin(args: &Args) -> Result<ExitCode> {
    let mut source = String::new();
    io::stdin().read_to_string(&mut source)?;

    let outcome = migrate_source(&source, "<stdin>")?;
    for diagnostic in &outcome.skipped {
        eprintln!("warning: {}", diagnostic);
    }

    if args.output == "json" {
        println!("{}", serde_json::to_string_pretty(&stdin_json(&outcome)?)?);
    } else {
        print!("{}", outcome.output);
    }

    if args.check && outcome.changed {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// JSON payload for stdin mode. Unlike the per-file summary it carries the
/// migrated source, since stdout is the only channel to hand it back.
fn stdin_json(outcome: &FileOutcome) -> Result<serde_json::Value> {
    let mut value = serde_json::to_value(outcome)?;
    value["output"] = serde_json::Value::String(outcome.output.clone());
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stdin_json_carries_migrated_source() {
        let source = "import reactor.core.publisher.Mono;\n\
                      class A {\n\
                          void m(Mono<String> mono) {\n\
                              mono.doAfterSuccessOrError((r, e) -> {\n\
                                  System.out.println(r);\n\
                              }).subscribe();\n\
                          }\n\
                      }\n";
        let outcome = migrate_source(source, "<stdin>").unwrap();
        let json = stdin_json(&outcome).unwrap();
        assert_eq!(json["file"], "<stdin>");
        assert_eq!(json["changed"], true);
        let output = json["output"].as_str().unwrap();
        assert!(output.contains(".tap(() -> new DefaultSignalListener<String>()"));
        assert!(!output.contains("doAfterSuccessOrError"));
    }
}
