use arrayvec::ArrayString;
use ordered_float::OrderedFloat;
use std::fmt::{Display, Formatter};

/// Inline capacity of a `Sym`. Chosen to keep the common case (short relation
/// tags, enum-like labels) allocation-free; anything longer belongs in `Str`.
pub const SYM_CAPACITY: usize = 31;

/// A short, bounded, printable symbol. Distinct from `Str`: a `Sym` that
/// doesn't fit is a caller error, not silently promoted to `Str`.
pub type Sym = ArrayString<SYM_CAPACITY>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymTooLong {
    pub input: String,
    pub capacity: usize,
}

impl Display for SymTooLong {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "`{}` is {} bytes, exceeds Sym capacity of {}",
            self.input,
            self.input.len(),
            self.capacity
        )
    }
}

impl std::error::Error for SymTooLong {}

/// The four scalar value kinds the core understands. Equality is structural
/// and cross-variant comparisons are always false (distinct enum variants).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Value {
    Int(i64),
    Float(OrderedFloat<f64>),
    Sym(Sym),
    Str(String),
}

/// The row-level type tag, used to validate facts and rule-literal constants
/// against declared column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Int,
    Float,
    Sym,
    Str,
}

impl Display for ScalarType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalarType::Int => write!(f, "int"),
            ScalarType::Float => write!(f, "float"),
            ScalarType::Sym => write!(f, "sym"),
            ScalarType::Str => write!(f, "str"),
        }
    }
}

impl Value {
    pub fn int(v: i64) -> Self {
        Value::Int(v)
    }

    pub fn float(v: f64) -> Self {
        Value::Float(OrderedFloat(v))
    }

    pub fn sym(s: &str) -> Result<Self, SymTooLong> {
        Sym::from(s)
            .map(Value::Sym)
            .map_err(|_| SymTooLong {
                input: s.to_string(),
                capacity: SYM_CAPACITY,
            })
    }

    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    pub fn scalar_type(&self) -> ScalarType {
        match self {
            Value::Int(_) => ScalarType::Int,
            Value::Float(_) => ScalarType::Float,
            Value::Sym(_) => ScalarType::Sym,
            Value::Str(_) => ScalarType::Str,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(inner) => write!(f, "{}", inner),
            Value::Float(inner) => write!(f, "{}", inner),
            Value::Sym(inner) => write!(f, "{}", inner),
            Value::Str(inner) => write!(f, "{:?}", inner),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(OrderedFloat(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

/// A tuple of scalar values, ordered to match a relation's declared columns.
pub type Row = Vec<Value>;
