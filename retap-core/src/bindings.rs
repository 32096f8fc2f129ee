//! Identifier binding resolution for the callback parameters
//!
//! Reference detection is identity-based: an identifier occurrence counts as a
//! reference to a callback parameter only when it resolves to that parameter's
//! declaration, never on spelling alone. A local variable, nested lambda
//! parameter, catch parameter, or loop variable with the same name shadows the
//! parameter for its scope, and member-access or method-name positions are not
//! references at all.

use tree_sitter::Node;

use crate::parser::node_text;

/// Opaque handle identifying one declaration site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingId(pub u32);

/// A callback parameter's binding: name plus the lambda that declares it
#[derive(Debug, Clone)]
pub struct Binding {
    pub name: String,
    pub id: BindingId,
    /// Node id of the declaring lambda expression (the binding's scope)
    scope: usize,
}

/// The two parameter bindings of a success-or-error callback
#[derive(Debug, Clone)]
pub struct ParamBindings {
    pub value: Binding,
    pub error: Binding,
}

impl ParamBindings {
    /// Build bindings from the lambda node and its two parameter identifiers
    pub fn from_lambda(lambda: Node, value_param: Node, error_param: Node, source: &str) -> Self {
        ParamBindings {
            value: Binding {
                name: node_text(value_param, source).to_string(),
                id: BindingId(0),
                scope: lambda.id(),
            },
            error: Binding {
                name: node_text(error_param, source).to_string(),
                id: BindingId(1),
                scope: lambda.id(),
            },
        }
    }
}

/// Does any identifier occurrence in `node`'s subtree resolve to `binding`?
pub fn references(node: Node, binding: &Binding, source: &str) -> bool {
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        if current.kind() == "identifier" && resolves_to(current, binding, source) {
            return true;
        }
        for i in 0..current.named_child_count() {
            if let Some(child) = current.named_child(i) {
                stack.push(child);
            }
        }
    }
    false
}

/// Does this identifier occurrence resolve to the given binding?
///
/// Requires the same spelling, a reference position (not a declaration, member
/// name, or method name), and no shadowing declaration between the occurrence
/// and the binding's scope.
pub fn resolves_to(ident: Node, binding: &Binding, source: &str) -> bool {
    if ident.kind() != "identifier" || node_text(ident, source) != binding.name {
        return false;
    }
    if !is_reference_position(ident) {
        return false;
    }
    !is_shadowed(ident, binding, source)
}

/// Is this identifier in a position where it reads a variable?
fn is_reference_position(ident: Node) -> bool {
    let parent = match ident.parent() {
        Some(p) => p,
        None => return false,
    };

    let is_field = |name: &str| {
        parent
            .child_by_field_name(name)
            .map(|n| n.id() == ident.id())
            .unwrap_or(false)
    };

    match parent.kind() {
        // `error.getMessage()` counts via the object field, the name does not
        "method_invocation" => !is_field("name"),
        // `this.error` - the field name is a different binding
        "field_access" => !is_field("field"),
        // Declaration positions, not references
        "variable_declarator" => !is_field("name"),
        "formal_parameter" | "catch_formal_parameter" | "inferred_parameters" => false,
        "enhanced_for_statement" => !is_field("name"),
        // Labels share the identifier kind but never bind variables
        "labeled_statement" | "break_statement" | "continue_statement" => false,
        _ => true,
    }
}

/// Walk from the occurrence up to the binding's scope, looking for an
/// intervening declaration of the same name.
fn is_shadowed(ident: Node, binding: &Binding, source: &str) -> bool {
    let mut current = ident;
    while let Some(parent) = current.parent() {
        if parent.id() == binding.scope {
            // Reached the declaring lambda with no shadow in between
            return false;
        }
        match parent.kind() {
            "block" => {
                if block_shadows(parent, ident, &binding.name, source) {
                    return true;
                }
            }
            "lambda_expression" => {
                if lambda_declares(parent, &binding.name, source) {
                    return true;
                }
            }
            "catch_clause" => {
                if catch_declares(parent, &binding.name, source) {
                    return true;
                }
            }
            "enhanced_for_statement" => {
                let loop_var = parent
                    .child_by_field_name("name")
                    .map(|n| node_text(n, source) == binding.name)
                    .unwrap_or(false);
                // The loop variable scopes over the body, not the iterable
                let in_iterable = parent
                    .child_by_field_name("value")
                    .map(|v| within(ident, v))
                    .unwrap_or(false);
                if loop_var && !in_iterable {
                    return true;
                }
            }
            "for_statement" => {
                if for_init_declares(parent, &binding.name, source) {
                    return true;
                }
            }
            _ => {}
        }
        current = parent;
    }
    // Never reached the declaring lambda: the occurrence is outside its scope
    true
}

/// A declaration in a block shadows the name for statements after it
fn block_shadows(block: Node, ident: Node, name: &str, source: &str) -> bool {
    for i in 0..block.named_child_count() {
        let child = match block.named_child(i) {
            Some(c) => c,
            None => continue,
        };
        if child.start_byte() >= ident.start_byte() {
            break;
        }
        if child.kind() == "local_variable_declaration" && declares_name(child, name, source) {
            return true;
        }
    }
    false
}

/// Does a local variable declaration declare `name`?
fn declares_name(decl: Node, name: &str, source: &str) -> bool {
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

/// Does a lambda's parameter list declare `name`?
fn lambda_declares(lambda: Node, name: &str, source: &str) -> bool {
    let params = match lambda.child_by_field_name("parameters") {
        Some(p) => p,
        None => return false,
    };
    let mut stack = vec![params];
    while let Some(current) = stack.pop() {
        if current.kind() == "identifier" && node_text(current, source) == name {
            return true;
        }
        for i in 0..current.named_child_count() {
            if let Some(child) = current.named_child(i) {
                stack.push(child);
            }
        }
    }
    false
}

/// Does a catch clause's parameter declare `name`?
fn catch_declares(catch: Node, name: &str, source: &str) -> bool {
    for i in 0..catch.named_child_count() {
        if let Some(child) = catch.named_child(i) {
            if child.kind() == "catch_formal_parameter" {
                let mut stack = vec![child];
                while let Some(current) = stack.pop() {
                    if current.kind() == "identifier" && node_text(current, source) == name {
                        return true;
                    }
                    for j in 0..current.named_child_count() {
                        if let Some(c) = current.named_child(j) {
                            stack.push(c);
                        }
                    }
                }
            }
        }
    }
    false
}

/// Does a classic for loop's init section declare `name`?
fn for_init_declares(for_stmt: Node, name: &str, source: &str) -> bool {
    for_stmt
        .child_by_field_name("init")
        .map(|init| init.kind() == "local_variable_declaration" && declares_name(init, name, source))
        .unwrap_or(false)
}

/// Is `node` inside `ancestor`'s byte range?
fn within(node: Node, ancestor: Node) -> bool {
    node.start_byte() >= ancestor.start_byte() && node.end_byte() <= ancestor.end_byte()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::find_call_sites;
    use crate::parser::parse_source;

    /// Wrap a callback body in a full compilation unit and return bindings
    /// plus the body's statements for inspection.
    fn with_body<F: FnOnce(&ParamBindings, Node, &str)>(body: &str, check: F) {
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
        let bindings =
            ParamBindings::from_lambda(site.lambda, site.value_param, site.error_param, &source);
        check(&bindings, site.body, &source);
    }

    fn nth_statement<'t>(body: Node<'t>, n: usize) -> Node<'t> {
        body.named_child(n).expect("statement should exist")
    }

    #[test]
    fn test_direct_reference() {
        with_body("System.out.println(result);", |bindings, body, source| {
            let stmt = nth_statement(body, 0);
            assert!(references(stmt, &bindings.value, source));
            assert!(!references(stmt, &bindings.error, source));
        });
    }

    #[test]
    fn test_method_name_is_not_a_reference() {
        // A method called `result` does not reference the parameter
        with_body("this.result();", |bindings, body, source| {
            let stmt = nth_statement(body, 0);
            assert!(!references(stmt, &bindings.value, source));
        });
    }

    #[test]
    fn test_field_access_is_not_a_reference() {
        with_body("System.out.println(this.error);", |bindings, body, source| {
            let stmt = nth_statement(body, 0);
            assert!(!references(stmt, &bindings.error, source));
        });
    }

    #[test]
    fn test_receiver_of_call_is_a_reference() {
        with_body("error.printStackTrace();", |bindings, body, source| {
            let stmt = nth_statement(body, 0);
            assert!(references(stmt, &bindings.error, source));
        });
    }

    #[test]
    fn test_shadowed_by_inner_lambda() {
        with_body(
            "list.forEach(result -> System.out.println(result));",
            |bindings, body, source| {
                let stmt = nth_statement(body, 0);
                assert!(!references(stmt, &bindings.value, source));
            },
        );
    }

    #[test]
    fn test_shadowed_by_local_declaration() {
        with_body(
            "{ String result = compute(); System.out.println(result); }",
            |bindings, body, source| {
                let stmt = nth_statement(body, 0);
                assert!(!references(stmt, &bindings.value, source));
            },
        );
    }

    #[test]
    fn test_use_before_shadowing_declaration_counts() {
        with_body(
            "{ System.out.println(result); String result = compute(); }",
            |bindings, body, source| {
                let stmt = nth_statement(body, 0);
                assert!(references(stmt, &bindings.value, source));
            },
        );
    }

    #[test]
    fn test_declaration_itself_is_not_a_reference() {
        with_body("String error = null;", |bindings, body, source| {
            let stmt = nth_statement(body, 0);
            assert!(!references(stmt, &bindings.error, source));
        });
    }
}
