use std::collections::{HashMap, HashSet};

use tracing::{debug, debug_span, trace};

use crate::error::ValidationError;
use crate::eval::{evaluate_rule, EvalContext};
use crate::extract::{extract, QueryResult};
use crate::graph::{build_relation_graph, scc_schedule};
use crate::models::program::{HornClause, Program};
use crate::models::store::RelationStore;
use crate::plan::{compile_rule, BodyPlan};
use crate::validate::validate;

/// Validates `program`, computes its least fixed point and returns the
/// contents of every declared output relation. Fails only if validation
/// fails — once a program is accepted, fixed-point evaluation is infallible
/// (spec.md §7).
pub fn run(program: &Program) -> Result<QueryResult, ValidationError> {
    let program = validate(program)?;

    let mut store = RelationStore::new(&program.declarations);
    for fact in &program.facts {
        store.insert_full(&fact.relation, fact.values.clone());
    }

    let mut rules_by_head: HashMap<&str, Vec<&HornClause>> = HashMap::new();
    for rule in &program.rules {
        rules_by_head
            .entry(rule.head.relation.as_str())
            .or_default()
            .push(rule);
    }

    let graph = build_relation_graph(&program);
    for scc in scc_schedule(&graph) {
        saturate_scc(&scc, &rules_by_head, &mut store);
    }

    Ok(extract(&store, &program))
}

fn saturate_scc(
    scc: &[&str],
    rules_by_head: &HashMap<&str, Vec<&HornClause>>,
    store: &mut RelationStore,
) {
    let _span = debug_span!("scc", relations = ?scc).entered();

    let scc_set: HashSet<&str> = scc.iter().copied().collect();
    for &relation in scc {
        store.seed_delta_from_full(relation);
    }

    let plans: Vec<BodyPlan> = scc
        .iter()
        .flat_map(|relation| rules_by_head.get(relation).into_iter().flatten())
        .map(|rule| compile_rule(*rule))
        .collect();

    if plans.is_empty() {
        // Pure EDB relations (or relations with no rules at all) need no
        // rounds; their delta was seeded above for any later SCC to consume.
        return;
    }

    let mut round = 0usize;
    loop {
        round += 1;
        let ctx = EvalContext {
            store,
            scanning_delta: &scc_set,
        };

        let mut derived = Vec::with_capacity(plans.len());
        for plan in &plans {
            let rows = evaluate_rule(plan, &ctx);
            trace!(rule_head = %plan.head_relation, produced = rows.len(), round, "fired rule");
            derived.push((plan.head_relation.as_str(), rows));
        }
        for (relation, rows) in derived {
            for row in rows {
                store.insert_staging(relation, row);
            }
        }

        let new_tuples: usize = scc.iter().map(|&relation| store.promote(relation)).sum();
        debug!(round, new_tuples, "round converged check");
        if new_tuples == 0 {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::program::{Arg, ColumnSpec, Declaration, Fact, Literal, MetaVar};
    use crate::models::value::{ScalarType, Value};

    fn transitive_closure_program() -> Program {
        let mut program = Program::new("transitive-closure");
        program
            .declare(Declaration::new(
                "edge",
                vec![
                    ColumnSpec::new("from", ScalarType::Int),
                    ColumnSpec::new("to", ScalarType::Int),
                ],
            ))
            .declare(Declaration::new(
                "path",
                vec![
                    ColumnSpec::new("from", ScalarType::Int),
                    ColumnSpec::new("to", ScalarType::Int),
                ],
            ));

        for (from, to) in [(1, 2), (2, 3), (3, 4)] {
            program.fact(Fact::new("edge", vec![Value::int(from), Value::int(to)]));
        }

        let f = MetaVar::new("f", ScalarType::Int);
        let t = MetaVar::new("t", ScalarType::Int);
        let m = MetaVar::new("m", ScalarType::Int);

        program.rule(HornClause::new(
            Literal::new("path", vec![Arg::Var(f.clone()), Arg::Var(t.clone())]),
            vec![Literal::new(
                "edge",
                vec![Arg::Var(f.clone()), Arg::Var(t.clone())],
            )],
        ));
        program.rule(HornClause::new(
            Literal::new("path", vec![Arg::Var(f.clone()), Arg::Var(t.clone())]),
            vec![
                Literal::new("path", vec![Arg::Var(f), Arg::Var(m.clone())]),
                Literal::new("path", vec![Arg::Var(m), Arg::Var(t)]),
            ],
        ));

        program.output("path");
        program
    }

    #[test]
    fn computes_transitive_closure() {
        let result = run(&transitive_closure_program()).expect("valid program");
        let mut path: Vec<(i64, i64)> = result["path"]
            .iter()
            .map(|row| {
                let (Value::Int(a), Value::Int(b)) = (&row[0], &row[1]) else {
                    panic!("expected ints")
                };
                (*a, *b)
            })
            .collect();
        path.sort();
        assert_eq!(
            path,
            vec![(1, 2), (1, 3), (1, 4), (2, 3), (2, 4), (3, 4)]
        );
    }

    #[test]
    fn every_edb_fact_survives_into_the_output() {
        let result = run(&transitive_closure_program()).expect("valid program");
        assert!(result["path"].contains(&vec![Value::int(1), Value::int(2)]));
        assert!(result["path"].contains(&vec![Value::int(2), Value::int(3)]));
        assert!(result["path"].contains(&vec![Value::int(3), Value::int(4)]));
    }

    #[test]
    fn running_twice_is_idempotent() {
        let program = transitive_closure_program();
        let mut first: Vec<_> = run(&program).unwrap()["path"].clone();
        let mut second: Vec<_> = run(&program).unwrap()["path"].clone();
        first.sort();
        second.sort();
        assert_eq!(first, second);
    }
}
