//! Per-file migration driver
//!
//! Parses a compilation unit, visits every eligible call site exactly once in
//! a single traversal, and attempts the rewrite per site. All per-site
//! failures are recoverable: the site is left byte-for-byte unchanged and a
//! diagnostic is recorded; nothing escalates to a whole-file or whole-run
//! failure except unreadable or unparseable input.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tree_sitter::Node;

use crate::bindings::ParamBindings;
use crate::classify::classify;
use crate::edit::{apply_edits, Edit, EditError};
use crate::imports::{ensure_imports, DEFAULT_SIGNAL_LISTENER, SIGNAL_TYPE};
use crate::lower::lower_body;
use crate::matcher::{find_call_sites, Candidate};
use crate::parser::{parse_source, ParseError};
use crate::rewrite::render_replacement;
use crate::types::resolve_element_type;

/// Why a matched call site was left unmodified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// The callback body is an expression, not a statement block
    ExpressionBody,
    /// The receiver's `Mono<T>` element type could not be resolved
    UnresolvedElementType,
    /// The call site sits inside the callback body of another rewritten site
    NestedCallSite,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::ExpressionBody => {
                write!(f, "callback body is not a statement block")
            }
            SkipReason::UnresolvedElementType => {
                write!(f, "cannot resolve the receiver's element type")
            }
            SkipReason::NestedCallSite => {
                write!(f, "call site is nested inside another rewritten call site")
            }
        }
    }
}

/// A per-site diagnostic for a skipped call site
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub file: String,
    /// Start line of the call site (1-based)
    pub line: u32,
    /// Start column (1-based)
    pub column: u32,
    pub reason: SkipReason,
}

impl Diagnostic {
    fn at(file: &str, node: Node, reason: SkipReason) -> Self {
        let position = node.start_position();
        Diagnostic {
            file: file.to_string(),
            line: position.row as u32 + 1,
            column: position.column as u32 + 1,
            reason,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: could not apply transformation: {}",
            self.file, self.line, self.column, self.reason
        )
    }
}

/// Result of migrating one compilation unit
#[derive(Debug, Serialize)]
pub struct FileOutcome {
    pub file: String,
    /// Number of call sites rewritten
    pub rewritten: usize,
    /// Whether the output differs from the input
    pub changed: bool,
    /// Call sites matched but left unmodified
    pub skipped: Vec<Diagnostic>,
    /// The migrated source (equal to the input when nothing changed)
    #[serde(skip)]
    pub output: String,
}

/// Errors that abort migration of one file
#[derive(Error, Debug)]
pub enum MigrateError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("failed to apply rewrites: {0}")]
    Edit(#[from] EditError),
    #[error("failed to write file: {0}")]
    Write(std::io::Error),
}

/// Migrate all eligible call sites in a source string.
pub fn migrate_source(source: &str, file_path: &str) -> Result<FileOutcome, MigrateError> {
    let tree = parse_source(source)?;
    let root = tree.root_node();

    let mut edits: Vec<Edit> = Vec::new();
    let mut skipped = Vec::new();
    let mut rewritten = 0;
    let mut rewritten_spans: Vec<(usize, usize)> = Vec::new();

    for candidate in find_call_sites(root, source) {
        match candidate {
            Candidate::Skipped { node, reason } => {
                skipped.push(Diagnostic::at(file_path, node, reason));
            }
            Candidate::Eligible(site) => {
                // A site inside an already-rewritten span would produce an
                // overlapping edit; its body is carried over verbatim by the
                // outer rewrite instead. Traversal is preorder, so the outer
                // site is always seen first.
                let span = (site.invocation.start_byte(), site.invocation.end_byte());
                if rewritten_spans.iter().any(|&(s, e)| span.0 >= s && span.1 <= e) {
                    skipped.push(Diagnostic::at(
                        file_path,
                        site.invocation,
                        SkipReason::NestedCallSite,
                    ));
                    continue;
                }

                let element_type = match resolve_element_type(&site, source) {
                    Some(t) => t,
                    None => {
                        skipped.push(Diagnostic::at(
                            file_path,
                            site.invocation,
                            SkipReason::UnresolvedElementType,
                        ));
                        continue;
                    }
                };

                let bindings = ParamBindings::from_lambda(
                    site.lambda,
                    site.value_param,
                    site.error_param,
                    source,
                );
                let lowered = lower_body(site.body, source, &bindings);
                let buckets = classify(&lowered.arena, &lowered.stmts);
                let replacement =
                    render_replacement(&site, &element_type, &lowered.arena, &buckets, source);

                edits.push(Edit::replace(span.0, span.1, replacement));
                rewritten_spans.push(span);
                rewritten += 1;
            }
        }
    }

    // Imports only when at least one site was rewritten
    if !edits.is_empty() {
        edits.extend(ensure_imports(root, source, &[DEFAULT_SIGNAL_LISTENER, SIGNAL_TYPE]));
    }

    let output = apply_edits(source, &edits)?;
    Ok(FileOutcome {
        file: file_path.to_string(),
        rewritten,
        changed: output != source,
        skipped,
        output,
    })
}

/// Migrate one file, optionally writing the result back.
///
/// The file is rewritten on disk only when `write` is set and the content
/// actually changed.
pub fn migrate_file(path: &Path, write: bool) -> Result<FileOutcome, MigrateError> {
    let source = fs::read_to_string(path).map_err(ParseError::FileRead)?;
    let outcome = migrate_source(&source, &path.to_string_lossy())?;

    if write && outcome.changed {
        fs::write(path, &outcome.output).map_err(MigrateError::Write)?;
    }
    Ok(outcome)
}
