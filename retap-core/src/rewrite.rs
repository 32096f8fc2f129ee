//! Call-site rewriting
//!
//! Synthesizes the replacement invocation: same receiver, the `tap` operator,
//! and a zero-argument factory producing a `DefaultSignalListener` whose three
//! methods receive the classified statement lists. The lambda parameter names
//! are reused as the listener method parameter names to keep the diff small.

use crate::ast::{Buckets, StmtArena, StmtId};
use crate::matcher::CallSite;
use crate::parser::node_text;
use crate::template;

/// Skeleton for the listener factory, with named holes. Methods appear in
/// bucket order: error handler, value handler, catch-all.
const LISTENER_SKELETON: &str = "\
{receiver}.tap(() -> new DefaultSignalListener<{element}>() {
    @Override
    public void doOnError(Throwable {error}) {
{on_error}    }

    @Override
    public void doOnNext({element} {value}) {
{on_next}    }

    @Override
    public void doFinally(SignalType terminationType) {
{do_finally}    }
})";

/// Indent of statements inside a listener method, relative to the call site
const METHOD_BODY_INDENT: &str = "        ";

/// Render the replacement expression for one call site.
///
/// The result covers exactly the invocation node's span; the caller turns it
/// into an edit. Continuation lines are indented to the call site's own
/// indentation so the replacement nests naturally in its surroundings.
pub fn render_replacement(
    site: &CallSite,
    element_type: &str,
    arena: &StmtArena,
    buckets: &Buckets,
    source: &str,
) -> String {
    let receiver = node_text(site.receiver, source);
    let value_name = node_text(site.value_param, source);
    let error_name = node_text(site.error_param, source);

    let on_error = render_bucket(arena, &buckets.error, source);
    let on_next = render_bucket(arena, &buckets.value, source);
    let do_finally = render_bucket(arena, &buckets.finally, source);

    let filled = template::fill(
        LISTENER_SKELETON,
        &[
            ("receiver", receiver),
            ("element", element_type),
            ("value", value_name),
            ("error", error_name),
            ("on_error", &on_error),
            ("on_next", &on_next),
            ("do_finally", &do_finally),
        ],
    );

    let base_indent = line_indent(source, site.invocation.start_byte());
    indent_continuation_lines(&filled, base_indent)
}

/// Render one bucket's statements, one per line, preserving order and
/// re-indenting each statement to the method body depth.
fn render_bucket(arena: &StmtArena, ids: &[StmtId], source: &str) -> String {
    let mut out = String::new();
    for &id in ids {
        let node = arena.get(id);
        let text = &source[node.start..node.end];
        let old_indent = line_indent(source, node.start);
        out.push_str(&reindent(text, old_indent, METHOD_BODY_INDENT));
        out.push('\n');
    }
    out
}

/// Leading whitespace of the line containing `offset`
pub fn line_indent(source: &str, offset: usize) -> &str {
    let line_start = source[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let rest = &source[line_start..];
    let indent_len = rest
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(rest.len());
    &rest[..indent_len]
}

/// Re-indent a statement: the first line gets `new_indent`, continuation
/// lines swap `old_indent` for `new_indent`, blank lines stay blank.
pub fn reindent(text: &str, old_indent: &str, new_indent: &str) -> String {
    let mut out = String::new();
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if i == 0 {
            out.push_str(new_indent);
            out.push_str(line.trim_start());
        } else if line.trim().is_empty() {
            // keep blank, no trailing whitespace
        } else {
            out.push_str(new_indent);
            out.push_str(line.strip_prefix(old_indent).unwrap_or(line));
        }
    }
    out
}

/// Prefix every line after the first with `indent`, leaving blank lines alone
fn indent_continuation_lines(text: &str, indent: &str) -> String {
    let mut out = String::new();
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if i == 0 || line.is_empty() {
            out.push_str(line);
        } else {
            out.push_str(indent);
            out.push_str(line);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_indent() {
        let source = "class A {\n    void m() {\n        mono.tap();\n    }\n}";
        let offset = source.find("mono").unwrap();
        assert_eq!(line_indent(source, offset), "        ");
        assert_eq!(line_indent(source, 0), "");
    }

    #[test]
    fn test_reindent_single_line() {
        assert_eq!(reindent("foo();", "    ", "        "), "        foo();");
    }

    #[test]
    fn test_reindent_multiline_keeps_relative_depth() {
        let stmt = "if (x) {\n        y();\n    }";
        // Statement originally at 4 spaces, nested line at 8
        assert_eq!(
            reindent(stmt, "    ", "  "),
            "  if (x) {\n      y();\n  }"
        );
    }

    #[test]
    fn test_indent_continuation_lines_skips_blanks() {
        let text = "a\nb\n\nc";
        assert_eq!(indent_continuation_lines(text, "  "), "a\n  b\n\n  c");
    }
}
