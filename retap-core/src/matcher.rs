//! Call-site matching for the deprecated success-or-error combinator
//!
//! Finds `doAfterSuccessOrError` invocations whose single argument is a
//! two-parameter lambda. The signature match is exact: anything else is left
//! untouched. A matching invocation whose lambda body is an expression rather
//! than a statement block is reported as a skipped site, never partially
//! rewritten.

use tree_sitter::Node;

use crate::engine::SkipReason;
use crate::parser::node_text;

/// Method name of the deprecated combinator being migrated
pub const COMBINATOR_NAME: &str = "doAfterSuccessOrError";

/// An eligible call site: `receiver.doAfterSuccessOrError((value, error) -> { ... })`
#[derive(Debug, Clone, Copy)]
pub struct CallSite<'t> {
    /// The whole method invocation node (the span that gets replaced)
    pub invocation: Node<'t>,
    /// Receiver expression of the invocation
    pub receiver: Node<'t>,
    /// The two-parameter callback lambda
    pub lambda: Node<'t>,
    /// First lambda parameter identifier (success value)
    pub value_param: Node<'t>,
    /// Second lambda parameter identifier (error)
    pub error_param: Node<'t>,
    /// The callback body block
    pub body: Node<'t>,
}

/// Outcome of inspecting one invocation that names the combinator
#[derive(Debug, Clone, Copy)]
pub enum Candidate<'t> {
    /// Matches the combinator signature and can be attempted
    Eligible(CallSite<'t>),
    /// Matches the combinator but has an unsupported shape; left unmodified
    Skipped { node: Node<'t>, reason: SkipReason },
}

impl<'t> Candidate<'t> {
    pub fn as_site(&self) -> Option<&CallSite<'t>> {
        match self {
            Candidate::Eligible(site) => Some(site),
            Candidate::Skipped { .. } => None,
        }
    }
}

/// Find all combinator call sites in a compilation unit, in source order.
///
/// Each eligible call site is visited exactly once in a single traversal.
pub fn find_call_sites<'t>(root: Node<'t>, source: &str) -> Vec<Candidate<'t>> {
    let mut candidates = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.kind() == "method_invocation" {
            if let Some(candidate) = match_invocation(node, source) {
                candidates.push(candidate);
            }
        }
        // Push in reverse so candidates come out in source order
        for i in (0..node.named_child_count()).rev() {
            if let Some(child) = node.named_child(i) {
                stack.push(child);
            }
        }
    }
    candidates
}

/// Match one invocation against the combinator signature
fn match_invocation<'t>(node: Node<'t>, source: &str) -> Option<Candidate<'t>> {
    let name = node.child_by_field_name("name")?;
    if node_text(name, source) != COMBINATOR_NAME {
        return None;
    }
    let receiver = node.child_by_field_name("object")?;
    let arguments = node.child_by_field_name("arguments")?;

    // Exactly one argument, and it must be a lambda
    if arguments.named_child_count() != 1 {
        return None;
    }
    let lambda = arguments.named_child(0)?;
    if lambda.kind() != "lambda_expression" {
        return None;
    }

    // Exactly two parameters, in fixed order: value first, error second
    let params = lambda_params(lambda);
    if params.len() != 2 {
        return None;
    }

    let body = lambda.child_by_field_name("body")?;
    if body.kind() != "block" {
        // Expression-bodied callback: recognized but unsupported
        return Some(Candidate::Skipped {
            node,
            reason: SkipReason::ExpressionBody,
        });
    }

    Some(Candidate::Eligible(CallSite {
        invocation: node,
        receiver,
        lambda,
        value_param: params[0],
        error_param: params[1],
        body,
    }))
}

/// Collect a lambda's parameter name identifiers.
///
/// Handles `x -> ...`, `(a, b) -> ...` and typed `(String a, Throwable b) -> ...`.
fn lambda_params(lambda: Node) -> Vec<Node> {
    let params = match lambda.child_by_field_name("parameters") {
        Some(p) => p,
        None => return Vec::new(),
    };
    match params.kind() {
        "identifier" => vec![params],
        "inferred_parameters" => {
            let mut out = Vec::new();
            for i in 0..params.named_child_count() {
                if let Some(child) = params.named_child(i) {
                    if child.kind() == "identifier" {
                        out.push(child);
                    }
                }
            }
            out
        }
        "formal_parameters" => {
            let mut out = Vec::new();
            for i in 0..params.named_child_count() {
                if let Some(param) = params.named_child(i) {
                    if let Some(name) = param.child_by_field_name("name") {
                        out.push(name);
                    }
                }
            }
            out
        }
        _ => Vec::new(),
    }
}
