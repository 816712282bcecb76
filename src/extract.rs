use std::collections::HashMap;

use crate::models::program::Program;
use crate::models::store::RelationStore;
use crate::models::value::Row;

/// A mapping from each output relation name to its deduplicated tuples. The
/// core imposes no emission order; iteration order here simply follows the
/// store's insertion-ordered backing set.
pub type QueryResult = HashMap<String, Vec<Row>>;

pub fn extract(store: &RelationStore, program: &Program) -> QueryResult {
    program
        .outputs
        .iter()
        .map(|relation| (relation.clone(), store.scan_full(relation).cloned().collect()))
        .collect()
}
