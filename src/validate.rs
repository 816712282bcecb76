use std::collections::{HashMap, HashSet};

use crate::error::ValidationError;
use crate::models::program::{Arg, HornClause, Literal, MetaVar, Program};

/// Validates a program and returns a normalized copy (body-only variables
/// used exactly once are rewritten to the anonymous `_`). Fails fast with a
/// single tagged diagnostic; the evaluator never runs on an invalid program.
pub fn validate(program: &Program) -> Result<Program, ValidationError> {
    let declarations: HashMap<&str, &crate::models::program::Declaration> = program
        .declarations
        .iter()
        .map(|d| (d.name.as_str(), d))
        .collect();

    for fact in &program.facts {
        let decl = declarations
            .get(fact.relation.as_str())
            .ok_or_else(|| ValidationError::UndeclaredRelation(fact.relation.clone()))?;

        if fact.values.len() != decl.arity() {
            return Err(ValidationError::ArityMismatch {
                relation: fact.relation.clone(),
                expected: decl.arity(),
                found: fact.values.len(),
            });
        }

        for (column, value) in fact.values.iter().enumerate() {
            let expected = decl.columns[column].ty;
            let found = value.scalar_type();
            if expected != found {
                return Err(ValidationError::TypeMismatch {
                    relation: fact.relation.clone(),
                    column,
                    expected,
                    found,
                });
            }
        }
    }

    for relation in &program.outputs {
        if !declarations.contains_key(relation.as_str()) {
            return Err(ValidationError::UndeclaredRelation(relation.clone()));
        }
    }

    for rule in &program.rules {
        check_literal(&rule.head, &declarations)?;
        if rule.head.negated {
            return Err(ValidationError::NegatedHead {
                relation: rule.head.relation.clone(),
            });
        }

        for body_literal in &rule.body {
            check_literal(body_literal, &declarations)?;
            if body_literal.negated {
                return Err(ValidationError::NegatedBodyLiteral {
                    head_relation: rule.head.relation.clone(),
                    relation: body_literal.relation.clone(),
                });
            }
        }

        check_safety(rule)?;
    }

    let normalized_rules = program.rules.iter().map(anonymize_single_use).collect();

    Ok(Program {
        name: program.name.clone(),
        declarations: program.declarations.clone(),
        rules: normalized_rules,
        facts: program.facts.clone(),
        outputs: program.outputs.clone(),
    })
}

fn check_literal(
    literal: &Literal,
    declarations: &HashMap<&str, &crate::models::program::Declaration>,
) -> Result<(), ValidationError> {
    let decl = declarations
        .get(literal.relation.as_str())
        .ok_or_else(|| ValidationError::UndeclaredRelation(literal.relation.clone()))?;

    if literal.args.len() != decl.arity() {
        return Err(ValidationError::ArityMismatch {
            relation: literal.relation.clone(),
            expected: decl.arity(),
            found: literal.args.len(),
        });
    }

    for (column, arg) in literal.args.iter().enumerate() {
        let expected = decl.columns[column].ty;
        let found = match arg {
            Arg::Value(v) => v.scalar_type(),
            Arg::Var(mv) => mv.ty,
        };
        if expected != found {
            return Err(ValidationError::TypeMismatch {
                relation: literal.relation.clone(),
                column,
                expected,
                found,
            });
        }
    }

    Ok(())
}

/// Every named variable in the head must also appear, under the same name,
/// in some body literal.
fn check_safety(rule: &HornClause) -> Result<(), ValidationError> {
    let body_vars: HashSet<&str> = rule
        .body
        .iter()
        .flat_map(|literal| literal.args.iter())
        .filter_map(|arg| match arg {
            Arg::Var(mv) if !mv.is_anonymous() => Some(&*mv.name),
            _ => None,
        })
        .collect();

    for arg in &rule.head.args {
        if let Arg::Var(mv) = arg {
            if !mv.is_anonymous() && !body_vars.contains(&*mv.name) {
                return Err(ValidationError::UnsafeRule {
                    relation: rule.head.relation.clone(),
                    variable: mv.name.to_string(),
                });
            }
        }
    }

    Ok(())
}

/// A body variable used exactly once across the whole body, and not named in
/// the head, carries no join constraint — rewriting it to `_` is purely an
/// optimization, observable only in plan shape, never in output.
fn anonymize_single_use(rule: &HornClause) -> HornClause {
    let mut occurrences: HashMap<&str, usize> = HashMap::new();
    for literal in &rule.body {
        for arg in &literal.args {
            if let Arg::Var(mv) = arg {
                if !mv.is_anonymous() {
                    *occurrences.entry(&mv.name).or_insert(0) += 1;
                }
            }
        }
    }

    let head_vars: HashSet<&str> = rule
        .head
        .args
        .iter()
        .filter_map(|arg| match arg {
            Arg::Var(mv) if !mv.is_anonymous() => Some(&*mv.name),
            _ => None,
        })
        .collect();

    let new_body = rule
        .body
        .iter()
        .map(|literal| {
            let new_args = literal
                .args
                .iter()
                .map(|arg| match arg {
                    Arg::Var(mv) if !mv.is_anonymous() => {
                        let single_use = occurrences.get(&*mv.name).copied() == Some(1);
                        if single_use && !head_vars.contains(&*mv.name) {
                            Arg::Var(MetaVar::anonymous(mv.ty))
                        } else {
                            arg.clone()
                        }
                    }
                    _ => arg.clone(),
                })
                .collect();
            Literal {
                relation: literal.relation.clone(),
                args: new_args,
                negated: literal.negated,
            }
        })
        .collect();

    HornClause {
        head: rule.head.clone(),
        body: new_body,
    }
}
