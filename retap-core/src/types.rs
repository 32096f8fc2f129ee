//! Lexical element-type resolution for the receiver
//!
//! The rewritten `doOnNext` method needs a typed parameter: the `T` of the
//! receiver's `Mono<T>`. Resolution is lexical, not semantic: the receiver
//! must be a plain identifier whose nearest enclosing declaration (formal
//! parameter, local variable, or field) carries a generic `Mono` type. When
//! that fails the call site is left unmodified and reported as a skipped
//! site; resolution failure is never fatal.

use tree_sitter::Node;

use crate::matcher::CallSite;
use crate::parser::node_text;

/// Resolve the element type bound to the receiver's `Mono<T>`.
pub fn resolve_element_type(site: &CallSite, source: &str) -> Option<String> {
    let receiver = site.receiver;
    if receiver.kind() != "identifier" {
        return None;
    }
    let name = node_text(receiver, source);

    let mut current = site.invocation;
    while let Some(parent) = current.parent() {
        let found = match parent.kind() {
            "block" => block_declaration(parent, current, name, source),
            "method_declaration" | "constructor_declaration" => {
                parameter_declaration(parent, name, source)
            }
            "class_declaration" | "enum_declaration" => field_declaration(parent, name, source),
            _ => None,
        };
        if let Some(type_node) = found {
            return element_type_of(type_node, source);
        }
        current = parent;
    }
    None
}

/// Find a local variable declaration of `name` preceding the statement that
/// contains the call site.
fn block_declaration<'t>(block: Node<'t>, below: Node, name: &str, source: &str) -> Option<Node<'t>> {
    for i in 0..block.named_child_count() {
        let child = block.named_child(i)?;
        if child.start_byte() >= below.start_byte() {
            break;
        }
        if child.kind() == "local_variable_declaration" && declarator_matches(child, name, source) {
            return child.child_by_field_name("type");
        }
    }
    None
}

fn declarator_matches(decl: Node, name: &str, source: &str) -> bool {
    for i in 0..decl.named_child_count() {
        if let Some(child) = decl.named_child(i) {
            if child.kind() == "variable_declarator" {
                if let Some(decl_name) = child.child_by_field_name("name") {
                    if node_text(decl_name, source) == name {
                        return true;
                    }
                }
            }
        }
    }
    false
}

/// Find a formal parameter of `name` on the enclosing method or constructor.
fn parameter_declaration<'t>(method: Node<'t>, name: &str, source: &str) -> Option<Node<'t>> {
    let params = method.child_by_field_name("parameters")?;
    for i in 0..params.named_child_count() {
        let param = params.named_child(i)?;
        if param.kind() != "formal_parameter" {
            continue;
        }
        let param_name = param.child_by_field_name("name")?;
        if node_text(param_name, source) == name {
            return param.child_by_field_name("type");
        }
    }
    None
}

/// Find a field declaration of `name` on the enclosing class.
fn field_declaration<'t>(class: Node<'t>, name: &str, source: &str) -> Option<Node<'t>> {
    let body = class.child_by_field_name("body")?;
    for i in 0..body.named_child_count() {
        let member = body.named_child(i)?;
        if member.kind() == "field_declaration" && declarator_matches(member, name, source) {
            return member.child_by_field_name("type");
        }
    }
    None
}

/// Extract `T` from a `Mono<T>` type node. Raw types, wildcards and other
/// base types yield `None`.
fn element_type_of(type_node: Node, source: &str) -> Option<String> {
    if type_node.kind() != "generic_type" {
        return None;
    }
    let base = type_node.named_child(0)?;
    let base_name = node_text(base, source);
    if base_name != "Mono" && !base_name.ends_with(".Mono") {
        return None;
    }

    let mut type_args = None;
    for i in 0..type_node.named_child_count() {
        if let Some(child) = type_node.named_child(i) {
            if child.kind() == "type_arguments" {
                type_args = Some(child);
            }
        }
    }
    let argument = type_args?.named_child(0)?;
    if argument.kind() == "wildcard" {
        return None;
    }
    Some(node_text(argument, source).to_string())
}
