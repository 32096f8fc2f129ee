//! retap-core: Reactor `doAfterSuccessOrError` migration library
//!
//! This library provides:
//! - TreeSitter-based Java parsing
//! - Call-site matching for the deprecated combinator
//! - Statement classification into value/error/finally buckets
//! - Call-site rewriting to `tap` with a `DefaultSignalListener`
//! - Idempotent import registration

pub mod ast;
pub mod bindings;
pub mod classify;
pub mod edit;
pub mod engine;
pub mod imports;
pub mod lower;
pub mod matcher;
pub mod parallel;
pub mod parser;
pub mod rewrite;
pub mod template;
pub mod types;

pub use ast::{Bucket, Buckets, Param, Polarity, Stmt, StmtArena, StmtId, StmtNode};
pub use bindings::{Binding, BindingId, ParamBindings};
pub use classify::classify;
pub use edit::{apply_edits, Edit, EditError};
pub use engine::{
    migrate_file, migrate_source, Diagnostic, FileOutcome, MigrateError, SkipReason,
};
pub use imports::{ensure_imports, DEFAULT_SIGNAL_LISTENER, SIGNAL_TYPE};
pub use lower::{lower_body, LoweredBody};
pub use matcher::{find_call_sites, CallSite, Candidate, COMBINATOR_NAME};
pub use parallel::{expand_globs, filter_java_files, process_files_parallel};
pub use parser::{is_java_file, parse_file, parse_source, ParseError};
pub use rewrite::render_replacement;
pub use types::resolve_element_type;
