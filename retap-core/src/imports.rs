//! Import registrar
//!
//! Idempotently ensures fully-qualified names are imported in a compilation
//! unit. Re-adding an existing import is a no-op; a wildcard import of the
//! type's package also counts. New imports are inserted in sorted position
//! among the existing imports, after the package declaration, or at the top
//! of the file, whichever applies.

use tree_sitter::Node;

use crate::edit::Edit;
use crate::parser::node_text;

/// Listener type constructed by the rewritten call site
pub const DEFAULT_SIGNAL_LISTENER: &str = "reactor.core.observability.DefaultSignalListener";
/// Termination-kind enum taken by the catch-all method
pub const SIGNAL_TYPE: &str = "reactor.core.publisher.SignalType";

/// Produce insertion edits for every wanted import not already present.
pub fn ensure_imports(root: Node, source: &str, wanted: &[&str]) -> Vec<Edit> {
    let imports = collect_imports(root, source);

    let mut missing: Vec<&str> = wanted
        .iter()
        .filter(|path| !is_imported(&imports, path))
        .copied()
        .collect();
    // Sorted so same-position insertions come out in import order
    missing.sort_unstable();

    missing
        .into_iter()
        .map(|path| insertion_edit(root, source, &imports, path))
        .collect()
}

/// An existing import declaration: its path and node span
struct ImportDecl<'t> {
    path: String,
    node: Node<'t>,
}

fn collect_imports<'t>(root: Node<'t>, source: &str) -> Vec<ImportDecl<'t>> {
    let mut imports = Vec::new();
    for i in 0..root.named_child_count() {
        if let Some(child) = root.named_child(i) {
            if child.kind() == "import_declaration" {
                if let Some(path) = import_path(child, source) {
                    imports.push(ImportDecl { path, node: child });
                }
            }
        }
    }
    imports
}

/// Extract the dotted path of an import, with `.*` appended for wildcards.
/// Static imports never satisfy a type import and are returned verbatim.
fn import_path(import: Node, source: &str) -> Option<String> {
    let text = node_text(import, source);
    let inner = text.strip_prefix("import")?.trim().trim_end_matches(';').trim();
    Some(inner.to_string())
}

fn is_imported(imports: &[ImportDecl], path: &str) -> bool {
    imports.iter().any(|import| {
        if import.path == path {
            return true;
        }
        // `import reactor.core.publisher.*;` covers the whole package
        if let Some(package) = import.path.strip_suffix(".*") {
            if let Some(wanted_package) = path.rsplit_once('.').map(|(p, _)| p) {
                return package == wanted_package;
            }
        }
        false
    })
}

fn insertion_edit(root: Node, source: &str, imports: &[ImportDecl], path: &str) -> Edit {
    // Before the first existing import that sorts after the new one
    if let Some(later) = imports.iter().find(|import| import.path.as_str() > path) {
        return Edit::insert(later.node.start_byte(), format!("import {};\n", path));
    }
    // After the last import
    if let Some(last) = imports.last() {
        return Edit::insert(last.node.end_byte(), format!("\nimport {};", path));
    }
    // After the package declaration
    for i in 0..root.named_child_count() {
        if let Some(child) = root.named_child(i) {
            if child.kind() == "package_declaration" {
                return Edit::insert(child.end_byte(), format!("\n\nimport {};", path));
            }
        }
    }
    // Top of file
    Edit::insert(0, format!("import {};\n", path))
}
