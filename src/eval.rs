use std::collections::{HashMap, HashSet};

use crate::models::store::RelationStore;
use crate::models::value::{Row, Value};
use crate::plan::{ArgPlan, BodyPlan, HeadCell, LiteralStep};

/// Tells the evaluator which relations belong to the strongly connected
/// component currently being saturated: those scan `delta`, everything else
/// (an earlier, already-saturated SCC) scans `full`. This is the "simplest,
/// correct" semi-naive variant: every body literal over an in-SCC relation
/// reads only what became new last round.
pub struct EvalContext<'a> {
    pub store: &'a RelationStore,
    pub scanning_delta: &'a HashSet<&'a str>,
}

impl<'a> EvalContext<'a> {
    fn scan(&self, relation: &str) -> Vec<&'a Row> {
        if self.scanning_delta.contains(relation) {
            self.store.scan_delta(relation).collect()
        } else {
            self.store.scan_full(relation).collect()
        }
    }
}

/// Runs one compiled rule body against the store, producing the head tuples
/// it derives this round. A left-deep nested-loop join over the accumulated
/// partial bindings, indexed on the first equality constraint of each step
/// (mirrors the teacher lineage's pattern of indexing one join column before
/// merging two relations) so the common single-column-join case — including
/// every scenario in this spec — doesn't degrade to quadratic scans.
pub fn evaluate_rule(plan: &BodyPlan, ctx: &EvalContext) -> Vec<Row> {
    let mut partials: Vec<Row> = vec![Vec::new()];

    for step in &plan.steps {
        if partials.is_empty() {
            break;
        }
        let tuples = ctx.scan(&step.relation);
        partials = join_step(&partials, &tuples, step);
    }

    partials
        .into_iter()
        .map(|bound| build_head(&plan.head_cells, &bound))
        .collect()
}

fn join_step(partials: &[Row], tuples: &[&Row], step: &LiteralStep) -> Vec<Row> {
    let indexed_on = step
        .arg_plans
        .iter()
        .position(|p| matches!(p, ArgPlan::JoinOn(_)));

    let mut next = Vec::new();

    match indexed_on {
        Some(pos) => {
            let ArgPlan::JoinOn(col) = step.arg_plans[pos] else {
                unreachable!()
            };
            let mut index: HashMap<&Value, Vec<usize>> = HashMap::new();
            for (i, partial) in partials.iter().enumerate() {
                index.entry(&partial[col]).or_default().push(i);
            }
            for tuple in tuples {
                if tuple.len() <= pos {
                    continue;
                }
                if let Some(candidates) = index.get(&tuple[pos]) {
                    for &i in candidates {
                        if let Some(extended) = try_extend(&partials[i], tuple, &step.arg_plans) {
                            next.push(extended);
                        }
                    }
                }
            }
        }
        None => {
            for partial in partials {
                for tuple in tuples {
                    if let Some(extended) = try_extend(partial, tuple, &step.arg_plans) {
                        next.push(extended);
                    }
                }
            }
        }
    }

    next
}

fn try_extend(partial: &Row, tuple: &Row, arg_plans: &[ArgPlan]) -> Option<Row> {
    let mut extended = partial.clone();
    for (pos, arg_plan) in arg_plans.iter().enumerate() {
        let cell = tuple.get(pos)?;
        match arg_plan {
            ArgPlan::Skip => {}
            ArgPlan::Const(v) => {
                if cell != v {
                    return None;
                }
            }
            ArgPlan::Bind => extended.push(cell.clone()),
            ArgPlan::JoinOn(col) => {
                if extended.get(*col)? != cell {
                    return None;
                }
            }
        }
    }
    Some(extended)
}

fn build_head(head_cells: &[HeadCell], bound: &Row) -> Row {
    head_cells
        .iter()
        .map(|cell| match cell {
            HeadCell::Bound(i) => bound[*i].clone(),
            HeadCell::Const(v) => v.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::program::{HornClause, Literal, MetaVar};
    use crate::models::value::ScalarType;
    use crate::plan::compile_rule;

    fn store_with(relation: &str, rows: &[[i64; 2]]) -> RelationStore {
        use crate::models::program::{ColumnSpec, Declaration};
        let decl = Declaration::new(
            relation,
            vec![
                ColumnSpec::new("a", ScalarType::Int),
                ColumnSpec::new("b", ScalarType::Int),
            ],
        );
        let mut store = RelationStore::new(&[decl]);
        for row in rows {
            store.insert_full(relation, vec![Value::int(row[0]), Value::int(row[1])]);
        }
        store
    }

    #[test]
    fn self_join_respects_anonymous_positions() {
        use crate::models::program::{ColumnSpec, Declaration};
        let p_decl = Declaration::new(
            "p",
            vec![
                ColumnSpec::new("x", ScalarType::Int),
                ColumnSpec::new("y", ScalarType::Int),
                ColumnSpec::new("z", ScalarType::Int),
            ],
        );
        let s_decl = Declaration::new("s", vec![ColumnSpec::new("x", ScalarType::Int)]);
        let mut store = RelationStore::new(&[p_decl, s_decl]);
        for (x, y, z) in [(1, 9, 9), (1, 8, 7), (2, 2, 2)] {
            store.insert_full("p", vec![Value::int(x), Value::int(y), Value::int(z)]);
        }

        let x = MetaVar::new("x", ScalarType::Int);
        let wild = MetaVar::anonymous(ScalarType::Int);
        let rule = HornClause::new(
            Literal::new("s", vec![crate::models::program::Arg::Var(x.clone())]),
            vec![Literal::new(
                "p",
                vec![
                    crate::models::program::Arg::Var(x),
                    crate::models::program::Arg::Var(wild.clone()),
                    crate::models::program::Arg::Var(wild),
                ],
            )],
        );
        let plan = compile_rule(&rule);

        let scanning: HashSet<&str> = ["p"].into_iter().collect();
        let ctx = EvalContext {
            store: &store,
            scanning_delta: &scanning,
        };
        let mut results = evaluate_rule(&plan, &ctx);
        results.sort();
        assert_eq!(results, vec![vec![Value::int(1)], vec![Value::int(2)]]);
    }

    #[test]
    fn transitive_step_joins_on_the_right_column() {
        let store = store_with("edge", &[[1, 2], [2, 3]]);

        let x = MetaVar::new("x", ScalarType::Int);
        let y = MetaVar::new("y", ScalarType::Int);
        let rule = HornClause::new(
            Literal::new(
                "path",
                vec![
                    crate::models::program::Arg::Var(x.clone()),
                    crate::models::program::Arg::Var(y.clone()),
                ],
            ),
            vec![Literal::new(
                "edge",
                vec![
                    crate::models::program::Arg::Var(x),
                    crate::models::program::Arg::Var(y),
                ],
            )],
        );
        let plan = compile_rule(&rule);
        let scanning: HashSet<&str> = ["edge"].into_iter().collect();
        let ctx = EvalContext {
            store: &store,
            scanning_delta: &scanning,
        };
        let mut results = evaluate_rule(&plan, &ctx);
        results.sort();
        assert_eq!(
            results,
            vec![
                vec![Value::int(1), Value::int(2)],
                vec![Value::int(2), Value::int(3)],
            ]
        );
    }
}
