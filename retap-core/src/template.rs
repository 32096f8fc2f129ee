//! Code skeleton templating
//!
//! Fills `{name}` holes in a skeleton with replacement text in a single pass.
//! Replacement values are spliced literally and never rescanned, so values
//! containing brace characters (Java statement bodies) are safe.

use once_cell::sync::Lazy;
use regex::Regex;

static HOLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([a-z_]+)\}").unwrap());

/// Fill named holes in a skeleton. Unknown holes are left as-is.
pub fn fill(skeleton: &str, values: &[(&str, &str)]) -> String {
    HOLE.replace_all(skeleton, |caps: &regex::Captures| {
        let name = &caps[1];
        values
            .iter()
            .find(|(hole, _)| *hole == name)
            .map(|(_, value)| (*value).to_string())
            .unwrap_or_else(|| caps[0].to_string())
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_basic() {
        let result = fill("{receiver}.tap({body})", &[("receiver", "mono"), ("body", "x")]);
        assert_eq!(result, "mono.tap(x)");
    }

    #[test]
    fn test_unknown_hole_kept() {
        assert_eq!(fill("{receiver}.{unknown}", &[("receiver", "mono")]), "mono.{unknown}");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        // A value containing hole-like text must not trigger substitution
        let result = fill("{a} {b}", &[("a", "{b}"), ("b", "x")]);
        assert_eq!(result, "{b} x");
    }

    #[test]
    fn test_java_braces_untouched() {
        let result = fill("run({body})", &[("body", "() -> { if (x) { y(); } }")]);
        assert_eq!(result, "run(() -> { if (x) { y(); } })");
    }
}
