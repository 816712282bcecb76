use std::collections::HashMap;

use crate::models::program::{Arg, HornClause};
use crate::models::value::Value;

/// How one argument position of a compiled body literal is resolved against
/// the binding environment accumulated so far (left-to-right over the body).
#[derive(Debug, Clone, PartialEq)]
pub enum ArgPlan {
    /// First occurrence of a named variable: project this column into the
    /// binding environment.
    Bind,
    /// A later occurrence of an already-bound variable (whether bound
    /// earlier in this same literal, e.g. `p(x, x)`, or in an earlier body
    /// literal): an equality constraint against that column.
    JoinOn(usize),
    /// A literal constant: a selection predicate.
    Const(Value),
    /// The anonymous `_`: no projection, no constraint.
    Skip,
}

/// One body literal compiled into a scan-and-filter step.
#[derive(Debug, Clone)]
pub struct LiteralStep {
    pub relation: String,
    pub arg_plans: Vec<ArgPlan>,
}

/// Where a head cell's value comes from: a bound body column, or a literal
/// constant baked into the head.
#[derive(Debug, Clone)]
pub enum HeadCell {
    Bound(usize),
    Const(Value),
}

/// A rule compiled into a flat, left-deep join plan: one step per body
/// literal in textual order, plus the head's projection. Equivalent in
/// shape to a left-deep chain of selects/joins over a product — the
/// bookkeeping a tree-based relational-algebra rewrite would otherwise
/// require is unnecessary once the plan is built literal-by-literal instead
/// of as a generic binary tree.
#[derive(Debug, Clone)]
pub struct BodyPlan {
    pub steps: Vec<LiteralStep>,
    pub head_relation: String,
    pub head_cells: Vec<HeadCell>,
}

/// Compiles one rule's body into a `BodyPlan`, applying the binding rules of
/// the spec verbatim: first occurrence of a named variable binds and
/// projects; a later occurrence (including within the same literal) becomes
/// an equality constraint; constants become selections; `_` is ignored.
pub fn compile_rule(rule: &HornClause) -> BodyPlan {
    let mut bound: HashMap<&str, usize> = HashMap::new();
    let mut next_col = 0usize;
    let mut steps = Vec::with_capacity(rule.body.len());

    for literal in &rule.body {
        let mut arg_plans = Vec::with_capacity(literal.args.len());
        for arg in &literal.args {
            let plan = match arg {
                Arg::Value(v) => ArgPlan::Const(v.clone()),
                Arg::Var(mv) if mv.is_anonymous() => ArgPlan::Skip,
                Arg::Var(mv) => {
                    if let Some(&col) = bound.get(&*mv.name) {
                        ArgPlan::JoinOn(col)
                    } else {
                        bound.insert(&mv.name, next_col);
                        next_col += 1;
                        ArgPlan::Bind
                    }
                }
            };
            arg_plans.push(plan);
        }
        steps.push(LiteralStep {
            relation: literal.relation.clone(),
            arg_plans,
        });
    }

    let head_cells = rule
        .head
        .args
        .iter()
        .map(|arg| match arg {
            Arg::Value(v) => HeadCell::Const(v.clone()),
            Arg::Var(mv) => HeadCell::Bound(
                *bound
                    .get(&*mv.name)
                    .expect("validator guarantees the head is range-restricted"),
            ),
        })
        .collect();

    BodyPlan {
        steps,
        head_relation: rule.head.relation.clone(),
        head_cells,
    }
}
