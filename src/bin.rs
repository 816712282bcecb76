//! Demo binary: builds a small transitive-closure program directly through
//! the `Program` builder API (no textual front-end, no file I/O — both are
//! explicitly out of scope for this crate) and prints its fixed point.

use tracing_subscriber::EnvFilter;

use stratum::{
    run, Arg, ColumnSpec, Declaration, Fact, HornClause, Literal, MetaVar, Program, ScalarType,
    Value,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let program = family_program();
    match run(&program) {
        Ok(result) => {
            let mut ancestors: Vec<(String, String)> = result["ancestor"]
                .iter()
                .map(|row| (row[0].to_string(), row[1].to_string()))
                .collect();
            ancestors.sort();
            for (older, younger) in ancestors {
                println!("{older} is an ancestor of {younger}");
            }
        }
        Err(err) => eprintln!("invalid program: {err}"),
    }
}

fn family_program() -> Program {
    let mut program = Program::new("ancestry");
    program
        .declare(Declaration::new(
            "parent",
            vec![
                ColumnSpec::new("parent", ScalarType::Sym),
                ColumnSpec::new("child", ScalarType::Sym),
            ],
        ))
        .declare(Declaration::new(
            "ancestor",
            vec![
                ColumnSpec::new("older", ScalarType::Sym),
                ColumnSpec::new("younger", ScalarType::Sym),
            ],
        ));

    for (parent, child) in [
        ("ada", "ben"),
        ("ben", "cora"),
        ("cora", "dan"),
    ] {
        program.fact(Fact::new(
            "parent",
            vec![
                Value::sym(parent).expect("fits in Sym"),
                Value::sym(child).expect("fits in Sym"),
            ],
        ));
    }

    let x = MetaVar::new("x", ScalarType::Sym);
    let y = MetaVar::new("y", ScalarType::Sym);
    let z = MetaVar::new("z", ScalarType::Sym);

    // ancestor(x, y) <- parent(x, y)
    program.rule(HornClause::new(
        Literal::new("ancestor", vec![Arg::Var(x.clone()), Arg::Var(y.clone())]),
        vec![Literal::new(
            "parent",
            vec![Arg::Var(x.clone()), Arg::Var(y.clone())],
        )],
    ));
    // ancestor(x, z) <- parent(x, y), ancestor(y, z)
    program.rule(HornClause::new(
        Literal::new("ancestor", vec![Arg::Var(x.clone()), Arg::Var(z.clone())]),
        vec![
            Literal::new("parent", vec![Arg::Var(x), Arg::Var(y.clone())]),
            Literal::new("ancestor", vec![Arg::Var(y), Arg::Var(z)]),
        ],
    ));

    program.output("ancestor");
    program
}
