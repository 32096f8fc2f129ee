//! Lowering of callback bodies into the statement arena
//!
//! Recognizes exactly one conditional shape: an `if` whose condition is a
//! direct `==`/`!=` comparison between the null literal and an identifier that
//! resolves to one of the two callback parameters. Everything else lowers to a
//! plain statement with precomputed reference flags, which the classifier
//! handles with its default rule.

use tree_sitter::Node;

use crate::ast::{Param, Polarity, Stmt, StmtArena, StmtId, StmtNode};
use crate::bindings::{references, resolves_to, ParamBindings};

/// A lowered callback body: the arena plus the top-level statement list
#[derive(Debug)]
pub struct LoweredBody {
    pub arena: StmtArena,
    pub stmts: Vec<StmtId>,
}

/// Lower a callback body block into the arena, in source order
pub fn lower_body(body: Node, source: &str, params: &ParamBindings) -> LoweredBody {
    let mut arena = StmtArena::new();
    let mut stmts = Vec::new();
    for i in 0..body.named_child_count() {
        if let Some(child) = body.named_child(i) {
            if child.kind() == "line_comment" || child.kind() == "block_comment" {
                continue;
            }
            stmts.push(lower_statement(child, source, params, &mut arena));
        }
    }
    LoweredBody { arena, stmts }
}

fn lower_statement(node: Node, source: &str, params: &ParamBindings, arena: &mut StmtArena) -> StmtId {
    if let Some((param, polarity)) = guard_shape(node, source, params) {
        let then_branch = node
            .child_by_field_name("consequence")
            .map(|n| lower_branch(n, source, params, arena))
            .unwrap_or_default();
        let else_branch = node
            .child_by_field_name("alternative")
            .map(|n| lower_branch(n, source, params, arena));
        return arena.alloc(StmtNode {
            stmt: Stmt::Guard { param, polarity, then_branch, else_branch },
            start: node.start_byte(),
            end: node.end_byte(),
        });
    }
    lower_plain(node, source, params, arena)
}

fn lower_plain(node: Node, source: &str, params: &ParamBindings, arena: &mut StmtArena) -> StmtId {
    arena.alloc(StmtNode {
        stmt: Stmt::Plain {
            refs_value: references(node, &params.value, source),
            refs_error: references(node, &params.error, source),
        },
        start: node.start_byte(),
        end: node.end_byte(),
    })
}

/// Lower a guard branch. Branch statements are always plain: classification
/// inspects them only for identifier usage, so a nested conditional is
/// carried over verbatim as an ordinary statement.
fn lower_branch(branch: Node, source: &str, params: &ParamBindings, arena: &mut StmtArena) -> Vec<StmtId> {
    branch_statements(branch)
        .into_iter()
        .map(|stmt| lower_plain(stmt, source, params, arena))
        .collect()
}

/// Statements of a branch; a bare statement counts as a one-statement block
fn branch_statements(branch: Node) -> Vec<Node> {
    if branch.kind() == "block" {
        let mut out = Vec::new();
        for i in 0..branch.named_child_count() {
            if let Some(child) = branch.named_child(i) {
                if child.kind() == "line_comment" || child.kind() == "block_comment" {
                    continue;
                }
                out.push(child);
            }
        }
        out
    } else {
        vec![branch]
    }
}

/// Recognize the guard conditional shape.
///
/// Returns which parameter is compared and with which polarity, or `None` when
/// the statement is not an `if` or its condition is anything other than a
/// direct identifier-vs-null comparison (compound conditions, method calls,
/// shadowed names). Either operand order is accepted: `error != null` and
/// `null != error` are the same guard.
fn guard_shape(node: Node, source: &str, params: &ParamBindings) -> Option<(Param, Polarity)> {
    if node.kind() != "if_statement" {
        return None;
    }
    let condition = node.child_by_field_name("condition")?;
    let expr = if condition.kind() == "parenthesized_expression" {
        condition.named_child(0)?
    } else {
        condition
    };
    if expr.kind() != "binary_expression" {
        return None;
    }

    let operator = expr.child_by_field_name("operator")?;
    let polarity = match &source[operator.byte_range()] {
        "!=" => Polarity::NotNull,
        "==" => Polarity::IsNull,
        _ => return None,
    };

    let left = expr.child_by_field_name("left")?;
    let right = expr.child_by_field_name("right")?;
    let ident = match (left.kind(), right.kind()) {
        ("null_literal", _) => right,
        (_, "null_literal") => left,
        _ => return None,
    };

    if resolves_to(ident, &params.value, source) {
        Some((Param::Value, polarity))
    } else if resolves_to(ident, &params.error, source) {
        Some((Param::Error, polarity))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::find_call_sites;
    use crate::parser::parse_source;

    fn lower(body: &str) -> LoweredBody {
        let source = format!(
            "import reactor.core.publisher.Mono;\n\
             class SomeClass {{\n\
                 void doSomething(Mono<String> mono) {{\n\
                     mono.doAfterSuccessOrError((result, error) -> {{\n{}\n}}).subscribe();\n\
                 }}\n\
             }}\n",
            body
        );
        let tree = parse_source(&source).unwrap();
        let candidates = find_call_sites(tree.root_node(), &source);
        let site = candidates
            .iter()
            .find_map(|c| c.as_site())
            .expect("should match call site");
        let bindings = ParamBindings::from_lambda(site.lambda, site.value_param, site.error_param, &source);
        lower_body(site.body, &source, &bindings)
    }

    #[test]
    fn test_plain_statement_reference_flags() {
        let lowered = lower("System.out.println(result); System.out.println(\"x\");");
        assert_eq!(lowered.stmts.len(), 2);
        match lowered.arena.get(lowered.stmts[0]).stmt {
            Stmt::Plain { refs_value, refs_error } => {
                assert!(refs_value);
                assert!(!refs_error);
            }
            _ => panic!("expected plain statement"),
        }
        match lowered.arena.get(lowered.stmts[1]).stmt {
            Stmt::Plain { refs_value, refs_error } => {
                assert!(!refs_value);
                assert!(!refs_error);
            }
            _ => panic!("expected plain statement"),
        }
    }

    #[test]
    fn test_guard_not_null_with_else() {
        let lowered = lower(
            "if (error != null) { System.out.println(error); } else { System.out.println(result); }",
        );
        assert_eq!(lowered.stmts.len(), 1);
        match &lowered.arena.get(lowered.stmts[0]).stmt {
            Stmt::Guard { param, polarity, then_branch, else_branch } => {
                assert_eq!(*param, Param::Error);
                assert_eq!(*polarity, Polarity::NotNull);
                assert_eq!(then_branch.len(), 1);
                assert_eq!(else_branch.as_ref().map(|b| b.len()), Some(1));
            }
            _ => panic!("expected guard"),
        }
    }

    #[test]
    fn test_guard_null_first_operand() {
        let lowered = lower("if (null == result) { System.out.println(error); }");
        match &lowered.arena.get(lowered.stmts[0]).stmt {
            Stmt::Guard { param, polarity, else_branch, .. } => {
                assert_eq!(*param, Param::Value);
                assert_eq!(*polarity, Polarity::IsNull);
                assert!(else_branch.is_none());
            }
            _ => panic!("expected guard"),
        }
    }

    #[test]
    fn test_bare_branch_is_single_statement_block() {
        let lowered = lower("if (error != null) System.out.println(error);");
        match &lowered.arena.get(lowered.stmts[0]).stmt {
            Stmt::Guard { then_branch, .. } => assert_eq!(then_branch.len(), 1),
            _ => panic!("expected guard"),
        }
    }

    #[test]
    fn test_compound_condition_lowers_to_plain() {
        let lowered = lower("if (error != null && result == null) { System.out.println(error); }");
        match lowered.arena.get(lowered.stmts[0]).stmt {
            Stmt::Plain { refs_value, refs_error } => {
                assert!(refs_value);
                assert!(refs_error);
            }
            _ => panic!("unsupported guard shape must lower to plain"),
        }
    }

    #[test]
    fn test_method_call_condition_lowers_to_plain() {
        let lowered = lower("if (isBad(error)) { System.out.println(error); }");
        assert!(matches!(
            lowered.arena.get(lowered.stmts[0]).stmt,
            Stmt::Plain { refs_error: true, .. }
        ));
    }

    #[test]
    fn test_nested_guard_in_branch_stays_plain() {
        let lowered = lower(
            "if (error != null) { if (result != null) { System.out.println(result); } }",
        );
        match &lowered.arena.get(lowered.stmts[0]).stmt {
            Stmt::Guard { then_branch, .. } => {
                assert_eq!(then_branch.len(), 1);
                assert!(matches!(
                    lowered.arena.get(then_branch[0]).stmt,
                    Stmt::Plain { .. }
                ));
            }
            _ => panic!("expected guard"),
        }
    }
}
