use ahash::RandomState;
use indexmap::IndexSet;
use std::collections::HashMap;

use super::program::Declaration;
use super::value::Row;

/// Deduplicated tuple set, backed the way the teacher lineage backs its
/// relation's `ward`: an `IndexSet` hashed with `ahash` for speed, keeping
/// stable insertion order for deterministic fixtures even though the core
/// itself never depends on that order.
pub type TupleSet = IndexSet<Row, RandomState>;

/// The three logical tuple sets a declared relation carries during
/// evaluation: `full` (all derived/asserted tuples so far), `delta` (new at
/// the end of the previous round) and `staging` (derived this round, not
/// yet promoted).
#[derive(Debug, Clone, Default)]
pub struct Relation {
    pub full: TupleSet,
    pub delta: TupleSet,
    pub staging: TupleSet,
}

impl Relation {
    pub fn insert_full(&mut self, row: Row) -> bool {
        self.full.insert(row)
    }

    pub fn insert_staging(&mut self, row: Row) -> bool {
        self.staging.insert(row)
    }

    /// `delta := staging \ full_before`; merges `staging` into `full`;
    /// clears `staging`. Returns the number of genuinely new tuples, which
    /// the driver sums across an SCC as its convergence test.
    pub fn promote(&mut self) -> usize {
        let mut new_delta = TupleSet::default();
        for row in self.staging.drain(..) {
            if self.full.insert(row.clone()) {
                new_delta.insert(row);
            }
        }
        self.delta = new_delta;
        self.delta.len()
    }

    pub fn seed_delta_from_full(&mut self) {
        self.delta = self.full.clone();
    }

    pub fn clear_delta(&mut self) {
        self.delta.clear();
    }
}

/// Owns every declared relation's three tuple sets for the duration of one
/// evaluation run. Exclusively owned by one evaluator instance — no
/// cross-run or cross-evaluator sharing.
#[derive(Debug, Default)]
pub struct RelationStore {
    relations: HashMap<String, Relation, RandomState>,
}

impl RelationStore {
    pub fn new(declarations: &[Declaration]) -> Self {
        let mut relations: HashMap<String, Relation, RandomState> = Default::default();
        for decl in declarations {
            relations.insert(decl.name.clone(), Relation::default());
        }
        Self { relations }
    }

    fn relation(&self, name: &str) -> &Relation {
        self.relations
            .get(name)
            .unwrap_or_else(|| panic!("relation `{name}` reached the store without being declared"))
    }

    fn relation_mut(&mut self, name: &str) -> &mut Relation {
        self.relations
            .get_mut(name)
            .unwrap_or_else(|| panic!("relation `{name}` reached the store without being declared"))
    }

    pub fn insert_full(&mut self, name: &str, row: Row) -> bool {
        self.relation_mut(name).insert_full(row)
    }

    pub fn insert_staging(&mut self, name: &str, row: Row) -> bool {
        self.relation_mut(name).insert_staging(row)
    }

    pub fn promote(&mut self, name: &str) -> usize {
        self.relation_mut(name).promote()
    }

    pub fn seed_delta_from_full(&mut self, name: &str) {
        self.relation_mut(name).seed_delta_from_full()
    }

    pub fn clear_delta(&mut self, name: &str) {
        self.relation_mut(name).clear_delta()
    }

    pub fn scan_full<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Row> {
        self.relation(name).full.iter()
    }

    pub fn scan_delta<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Row> {
        self.relation(name).delta.iter()
    }

    pub fn len_full(&self, name: &str) -> usize {
        self.relation(name).full.len()
    }
}
