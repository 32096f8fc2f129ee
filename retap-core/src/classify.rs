//! Statement classifier
//!
//! Partitions a lowered callback body into the three listener buckets in one
//! pass over the statements, preserving source order within each bucket. Every
//! statement lands in exactly one bucket; the classifier never fails. This is
//! a best-effort lexical partition, not a data-flow analysis.

use crate::ast::{Bucket, Buckets, Param, Polarity, Stmt, StmtArena, StmtId};

/// Classify the top-level statements of a callback body into buckets.
pub fn classify(arena: &StmtArena, body: &[StmtId]) -> Buckets {
    let mut buckets = Buckets::new();
    for &id in body {
        match &arena.get(id).stmt {
            Stmt::Plain { refs_value, refs_error } => {
                buckets.push(plain_bucket(*refs_value, *refs_error), id);
            }
            Stmt::Guard { param, polarity, then_branch, else_branch } => {
                // `value != null` and `error == null` both mean the then
                // branch runs on success; the other two mean it runs on error.
                let sub_param = match (param, polarity) {
                    (Param::Value, Polarity::NotNull) | (Param::Error, Polarity::IsNull) => {
                        Param::Value
                    }
                    (Param::Value, Polarity::IsNull) | (Param::Error, Polarity::NotNull) => {
                        Param::Error
                    }
                };
                sub_classify(arena, then_branch, sub_param, &mut buckets);
                if let Some(else_branch) = else_branch {
                    // The else branch covers the opposite outcome wholesale
                    let else_bucket = match sub_param {
                        Param::Value => Bucket::Error,
                        Param::Error => Bucket::Value,
                    };
                    for &stmt in else_branch {
                        buckets.push(else_bucket, stmt);
                    }
                }
            }
        }
    }
    buckets
}

/// Place a guard branch's statements: those referencing the branch's parameter
/// go to that parameter's bucket, the rest to the catch-all.
fn sub_classify(arena: &StmtArena, branch: &[StmtId], against: Param, buckets: &mut Buckets) {
    for &id in branch {
        let refs = match arena.get(id).stmt {
            Stmt::Plain { refs_value, refs_error } => match against {
                Param::Value => refs_value,
                Param::Error => refs_error,
            },
            // Branch statements are lowered as plain; a guard cannot appear
            Stmt::Guard { .. } => false,
        };
        let bucket = if refs { bucket_for(against) } else { Bucket::Finally };
        buckets.push(bucket, id);
    }
}

fn bucket_for(param: Param) -> Bucket {
    match param {
        Param::Value => Bucket::Value,
        Param::Error => Bucket::Error,
    }
}

/// Default rule for unguarded statements. The value check deliberately comes
/// first: a statement referencing both parameters is classified as Value.
/// This asymmetry matches the original migration and is kept for output
/// compatibility; it is a latent ambiguity, not an ordering guarantee.
fn plain_bucket(refs_value: bool, refs_error: bool) -> Bucket {
    if refs_value {
        Bucket::Value
    } else if refs_error {
        Bucket::Error
    } else {
        Bucket::Finally
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::StmtNode;

    fn plain(arena: &mut StmtArena, refs_value: bool, refs_error: bool) -> StmtId {
        let start = arena.len() * 10;
        arena.alloc(StmtNode {
            stmt: Stmt::Plain { refs_value, refs_error },
            start,
            end: start + 5,
        })
    }

    fn guard(
        arena: &mut StmtArena,
        param: Param,
        polarity: Polarity,
        then_branch: Vec<StmtId>,
        else_branch: Option<Vec<StmtId>>,
    ) -> StmtId {
        let start = arena.len() * 10;
        arena.alloc(StmtNode {
            stmt: Stmt::Guard { param, polarity, then_branch, else_branch },
            start,
            end: start + 5,
        })
    }

    #[test]
    fn test_plain_default_rule() {
        let mut arena = StmtArena::new();
        let uses_value = plain(&mut arena, true, false);
        let uses_error = plain(&mut arena, false, true);
        let uses_neither = plain(&mut arena, false, false);
        let buckets = classify(&arena, &[uses_value, uses_error, uses_neither]);
        assert_eq!(buckets.value, vec![uses_value]);
        assert_eq!(buckets.error, vec![uses_error]);
        assert_eq!(buckets.finally, vec![uses_neither]);
    }

    #[test]
    fn test_both_params_tie_breaks_to_value() {
        let mut arena = StmtArena::new();
        let both = plain(&mut arena, true, true);
        let buckets = classify(&arena, &[both]);
        assert_eq!(buckets.value, vec![both]);
        assert!(buckets.error.is_empty());
    }

    #[test]
    fn test_error_not_null_guard_with_else() {
        // if (error != null) { A } else { B }  =>  Error += A, Value += B
        let mut arena = StmtArena::new();
        let a = plain(&mut arena, false, true);
        let b = plain(&mut arena, true, false);
        let g = guard(&mut arena, Param::Error, Polarity::NotNull, vec![a], Some(vec![b]));
        let buckets = classify(&arena, &[g]);
        assert_eq!(buckets.error, vec![a]);
        assert_eq!(buckets.value, vec![b]);
        assert!(buckets.finally.is_empty());
    }

    #[test]
    fn test_null_guard_symmetry() {
        // if (error == null) { B } else { A } yields the same assignment
        let mut arena = StmtArena::new();
        let b = plain(&mut arena, true, false);
        let a = plain(&mut arena, false, true);
        let g = guard(&mut arena, Param::Error, Polarity::IsNull, vec![b], Some(vec![a]));
        let buckets = classify(&arena, &[g]);
        assert_eq!(buckets.error, vec![a]);
        assert_eq!(buckets.value, vec![b]);
    }

    #[test]
    fn test_branch_statement_without_reference_goes_to_finally() {
        // if (value != null) { log(); use(value); }
        let mut arena = StmtArena::new();
        let log = plain(&mut arena, false, false);
        let use_value = plain(&mut arena, true, false);
        let g = guard(&mut arena, Param::Value, Polarity::NotNull, vec![log, use_value], None);
        let buckets = classify(&arena, &[g]);
        assert_eq!(buckets.finally, vec![log]);
        assert_eq!(buckets.value, vec![use_value]);
    }

    #[test]
    fn test_else_branch_is_appended_wholesale() {
        // Statements in the else branch keep their bucket even without refs
        let mut arena = StmtArena::new();
        let silent = plain(&mut arena, false, false);
        let g = guard(&mut arena, Param::Value, Polarity::NotNull, vec![], Some(vec![silent]));
        let buckets = classify(&arena, &[g]);
        assert_eq!(buckets.error, vec![silent]);
    }

    #[test]
    fn test_totality_and_order_preservation() {
        let mut arena = StmtArena::new();
        let s0 = plain(&mut arena, false, false);
        let s1 = plain(&mut arena, false, true);
        let s2 = plain(&mut arena, true, false);
        let s3 = guard(&mut arena, Param::Error, Polarity::NotNull, vec![s1], None);
        let s4 = plain(&mut arena, false, false);
        let s5 = plain(&mut arena, true, false);
        let body = [s0, s3, s2, s4, s5];
        let buckets = classify(&arena, &body);

        // Every statement appears exactly once; the guard itself decomposes
        // into its branch statements (s1) rather than landing in a bucket.
        assert_eq!(buckets.total(), 5);
        let mut seen: Vec<StmtId> = buckets
            .value
            .iter()
            .chain(buckets.error.iter())
            .chain(buckets.finally.iter())
            .copied()
            .collect();
        seen.sort_by_key(|id| id.0);
        seen.dedup();
        assert_eq!(seen.len(), 5);

        // Relative source order is preserved within each bucket
        assert_eq!(buckets.value, vec![s2, s5]);
        assert_eq!(buckets.finally, vec![s0, s4]);
    }
}
