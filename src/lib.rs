pub mod driver;
pub mod error;
pub mod eval;
pub mod extract;
pub mod graph;
pub mod models;
pub mod plan;
pub mod validate;

pub use driver::run;
pub use error::ValidationError;
pub use models::program::{
    Arg, ColumnSpec, Declaration, Fact, HornClause, Literal, MetaVar, Program, Rule,
};
pub use models::value::{ScalarType, Value};
