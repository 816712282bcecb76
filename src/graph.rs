use petgraph::algo::kosaraju_scc;
use petgraph::graphmap::DiGraphMap;

use crate::models::program::Program;

/// One node per declared relation name; an edge `body -> head` for every
/// rule literal referencing `body` in the body of a rule whose head is
/// `head`. Body-to-head, not the reverse, is the direction the spec
/// resolves its own ambiguity to (see spec.md §9, Open Question 1): it is
/// also the direction the teacher lineage already builds its rule graph in.
pub type RelationGraph<'a> = DiGraphMap<&'a str, ()>;

pub fn build_relation_graph(program: &Program) -> RelationGraph<'_> {
    let mut graph = DiGraphMap::new();
    for decl in &program.declarations {
        graph.add_node(decl.name.as_str());
    }
    for rule in &program.rules {
        for body_literal in &rule.body {
            graph.add_edge(body_literal.relation.as_str(), rule.head.relation.as_str(), ());
        }
    }
    graph
}

/// Strongly connected components of the relation graph, in the order
/// `kosaraju_scc` already returns them: a component appears only after every
/// component it depends on, so processing the list in order saturates
/// prerequisites before dependents (the reverse-topological order over the
/// condensation the fixed-point driver requires).
pub fn scc_schedule<'a>(graph: &RelationGraph<'a>) -> Vec<Vec<&'a str>> {
    kosaraju_scc(graph)
}
