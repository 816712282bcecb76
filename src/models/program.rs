use std::fmt::{Display, Formatter};
use std::rc::Rc;

use super::value::{ScalarType, Value};

/// A rule-level variable, identified by name and the column type it is
/// expected to bind against. `name == "_"` marks an anonymous occurrence: a
/// binding position with no cross-occurrence constraint (see `MetaVar::is_anonymous`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetaVar {
    pub name: Rc<str>,
    pub ty: ScalarType,
}

impl MetaVar {
    pub fn new(name: impl Into<Rc<str>>, ty: ScalarType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    pub fn anonymous(ty: ScalarType) -> Self {
        Self::new("_", ty)
    }

    pub fn is_anonymous(&self) -> bool {
        &*self.name == "_"
    }
}

impl Display for MetaVar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "?{}", self.name)
    }
}

/// Either a scalar constant or a rule-level variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Arg {
    Value(Value),
    Var(MetaVar),
}

impl Arg {
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Arg::Var(mv) if mv.is_anonymous())
    }
}

impl From<Value> for Arg {
    fn from(v: Value) -> Self {
        Arg::Value(v)
    }
}

impl From<MetaVar> for Arg {
    fn from(mv: MetaVar) -> Self {
        Arg::Var(mv)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub ty: ScalarType,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, ty: ScalarType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// `(relation_name, [column_spec])`. Arity is the number of columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub columns: Vec<ColumnSpec>,
}

impl Declaration {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnSpec>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    pub fn arity(&self) -> usize {
        self.columns.len()
    }
}

/// `(relation_name, [Arg], negated?)`. The core only ever evaluates
/// `negated == false`; the validator rejects any other literal (see
/// `ValidationError::NegatedHead` / `NegatedBodyLiteral`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub relation: String,
    pub args: Vec<Arg>,
    pub negated: bool,
}

impl Literal {
    pub fn new(relation: impl Into<String>, args: Vec<Arg>) -> Self {
        Self {
            relation: relation.into(),
            args,
            negated: false,
        }
    }

    pub fn negated(relation: impl Into<String>, args: Vec<Arg>) -> Self {
        Self {
            relation: relation.into(),
            args,
            negated: true,
        }
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

/// `(head: Literal, body: [Literal])`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HornClause {
    pub head: Literal,
    pub body: Vec<Literal>,
}

impl HornClause {
    pub fn new(head: Literal, body: Vec<Literal>) -> Self {
        Self { head, body }
    }
}

/// Alias kept for the name the spec and its teacher lineage both use.
pub type Rule = HornClause;

/// `(declaration, [Value])`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fact {
    pub relation: String,
    pub values: Vec<Value>,
}

impl Fact {
    pub fn new(relation: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            relation: relation.into(),
            values,
        }
    }
}

/// The program value the core consumes: declarations, rules, EDB facts and
/// the relations whose contents the caller wants back.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    pub name: String,
    pub declarations: Vec<Declaration>,
    pub rules: Vec<HornClause>,
    pub facts: Vec<Fact>,
    pub outputs: Vec<String>,
}

impl Program {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn declare(&mut self, declaration: Declaration) -> &mut Self {
        self.declarations.push(declaration);
        self
    }

    pub fn rule(&mut self, rule: HornClause) -> &mut Self {
        self.rules.push(rule);
        self
    }

    pub fn fact(&mut self, fact: Fact) -> &mut Self {
        self.facts.push(fact);
        self
    }

    pub fn output(&mut self, relation: impl Into<String>) -> &mut Self {
        self.outputs.push(relation.into());
        self
    }

    pub fn declaration(&self, relation: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|d| d.name == relation)
    }
}
