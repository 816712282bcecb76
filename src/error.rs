use thiserror::Error;

use crate::models::value::ScalarType;

/// Diagnostics the validator can raise. Validation is all-or-nothing: the
/// first error found is returned and the program is never partially
/// evaluated (see `crate::validate::validate`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("relation `{0}` is not declared")]
    UndeclaredRelation(String),

    #[error("`{relation}` expects {expected} column(s), found {found}")]
    ArityMismatch {
        relation: String,
        expected: usize,
        found: usize,
    },

    #[error(
        "column {column} of `{relation}` is declared `{expected}`, found a value of type `{found}`"
    )]
    TypeMismatch {
        relation: String,
        column: usize,
        expected: ScalarType,
        found: ScalarType,
    },

    #[error("rule head for `{relation}` is negated; the core only ever derives positive facts")]
    NegatedHead { relation: String },

    #[error(
        "body literal `{relation}` in the rule for `{head_relation}` is negated; negation is not supported by this evaluator"
    )]
    NegatedBodyLiteral {
        head_relation: String,
        relation: String,
    },

    #[error(
        "rule for `{relation}` is unsafe: head variable `{variable}` does not appear in the body"
    )]
    UnsafeRule { relation: String, variable: String },
}
