//! TreeSitter-based Java parser
//!
//! Thin wrapper around tree-sitter that turns a compilation unit into a
//! syntax tree the matcher and rewriter can walk.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tree_sitter::{Language, Node, Tree};

/// Errors that can occur during parsing
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse: {0}")]
    Parse(String),
    #[error("TreeSitter error: {0}")]
    TreeSitter(String),
}

/// The Java grammar used for all parsing
pub fn java_language() -> Language {
    tree_sitter_java::LANGUAGE.into()
}

/// Check whether a path looks like a Java source file
pub fn is_java_file(path: &str) -> bool {
    Path::new(path)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("java"))
        .unwrap_or(false)
}

/// Parse a Java source string into a syntax tree
pub fn parse_source(source: &str) -> Result<Tree, ParseError> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&java_language())
        .map_err(|e| ParseError::TreeSitter(e.to_string()))?;

    parser
        .parse(source, None)
        .ok_or_else(|| ParseError::Parse("Failed to parse source".to_string()))
}

/// Read and parse a Java file, returning the source alongside the tree
pub fn parse_file(path: &Path) -> Result<(String, Tree), ParseError> {
    let source = fs::read_to_string(path)?;
    let tree = parse_source(&source)?;
    Ok((source, tree))
}

/// Extract the source text covered by a node
pub fn node_text<'s>(node: Node, source: &'s str) -> &'s str {
    &source[node.byte_range()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_java_file() {
        assert!(is_java_file("Foo.java"));
        assert!(is_java_file("src/main/java/Foo.JAVA"));
        assert!(!is_java_file("Foo.kt"));
        // No extension at all, even when the name itself says java
        assert!(!is_java_file("java"));
        assert!(!is_java_file("src/main/java"));
    }

    #[test]
    fn test_parse_simple_class() {
        let tree = parse_source("class Foo { void bar() { } }").unwrap();
        let root = tree.root_node();
        assert_eq!(root.kind(), "program");
        assert!(!root.has_error());
    }

    #[test]
    fn test_node_text() {
        let source = "class Foo { }";
        let tree = parse_source(source).unwrap();
        let class = tree.root_node().named_child(0).unwrap();
        assert_eq!(node_text(class, source), source);
    }
}
