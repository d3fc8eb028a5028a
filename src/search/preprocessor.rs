use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::graph::Graph;
use crate::search::candidates::{CandidateManager, CandidateStrategy};
use crate::search::clique_test::CliqueTest;
use crate::search::elimination_tree::{EliminationTree, NodeId};
use crate::vertex_set::VertexSet;

/** measure used to decide whether a sweep was worth repeating */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopCriterion {
    /// number of vertices of the working set
    Nodes,
    /// number of edges of the working set
    Edges,
}

impl Default for StopCriterion {
    fn default() -> Self { StopCriterion::Nodes }
}

/** one preprocessing step: a test, a candidate order and a recursion level */
#[derive(Debug, Clone)]
pub struct PreprocessingStep {
    /// test applied to candidates and their subgraphs
    pub test: CliqueTest,
    /// order in which candidates are examined
    pub candidates: CandidateStrategy,
    /// recursion depth (1: the test is applied on the candidate subgraphs only)
    pub level: usize,
}

/**
Recursive Graph Preprocessing Algorithm (RGPA).

Removes from a working set vertices that provably belong to no clique of a
target size. Each step is swept over the working set again and again, as
long as a sweep reduces the measured size by a factor of at least stop_ratio.
Edges disconnected while exploring a candidate subgraph are restored
before a sweep ends, so the graph is left as it was found.
*/
#[derive(Debug, Clone)]
pub struct Preprocessor {
    /// steps applied in order
    steps: Vec<PreprocessingStep>,
    /// what is measured between sweeps
    stop_criterion: StopCriterion,
    /// a sweep is repeated while size < previous size * stop_ratio
    stop_ratio: f64,
    /// eliminations of the current sweep
    eliminated: EliminationTree,
}

impl Default for Preprocessor {
    fn default() -> Self { Self::new() }
}

impl Preprocessor {

    /** creates a preprocessor without any step (stop ratio 0.9 on nodes) */
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            stop_criterion: StopCriterion::Nodes,
            stop_ratio: 0.9,
            eliminated: EliminationTree::new(),
        }
    }

    /// appends a step
    pub fn add_step(&mut self, test:CliqueTest, candidates:CandidateStrategy, level:usize) -> &mut Self {
        self.steps.push(PreprocessingStep { test, candidates, level });
        self
    }

    /// sets the measure used between sweeps
    pub fn set_stop_criterion(&mut self, criterion:StopCriterion) -> &mut Self {
        self.stop_criterion = criterion;
        self
    }

    /// sets the reduction ratio required to repeat a sweep
    pub fn set_stop_ratio(&mut self, ratio:f64) -> &mut Self {
        self.stop_ratio = ratio;
        self
    }

    /// steps of the preprocessor
    pub fn steps(&self) -> &[PreprocessingStep] { &self.steps }

    /**
    reduces set to vertices that may belong to a clique of size target.
    Returns true if the whole set was proven to contain no such clique (the
    set is then left in a partially reduced state).
    */
    pub fn run(&mut self, g:&mut Graph, set:&mut VertexSet, target:usize) -> bool {
        let mut size = measure(self.stop_criterion, g, set);
        for step in self.steps.iter() {
            loop {
                self.eliminated.clear();
                let infeasible = prep(
                    g, set, target, step.level, &step.test, step.candidates,
                    &mut self.eliminated, EliminationTree::ROOT, 0
                );
                self.eliminated.clear();
                if infeasible {
                    debug!("preprocessing ({:?}, level {}): no clique of size {}", step.test.kind(), step.level, target);
                    return true;
                }
                let previous = size;
                size = measure(self.stop_criterion, g, set);
                trace!("preprocessing sweep ({:?}, level {}): {} -> {}", step.test.kind(), step.level, previous, size);
                if previous as f64 * self.stop_ratio <= size as f64 { break; }
            }
        }
        false
    }

    /**
    preprocesses the whole graph: vertices that belong to no clique of size
    target are removed from it. Returns true if the graph contains no such clique
    (every vertex is removed in that case).
    */
    pub fn run_on_graph(&mut self, g:&mut Graph, target:usize) -> bool {
        let mut set = VertexSet::full(g);
        let infeasible = self.run(g, &mut set, target);
        if infeasible { set.clear(); }
        g.remove_all_except(&set);
        infeasible
    }
}

fn measure(criterion:StopCriterion, g:&Graph, set:&VertexSet) -> usize {
    match criterion {
        StopCriterion::Nodes => set.len(),
        StopCriterion::Edges => set.nb_edges(g),
    }
}

/**
one sweep of the given level over set. Candidates proven to belong to no
clique of size target are removed from set and recorded as children of node.
When a candidate subgraph is only partially eliminated, the edges between
the candidate and its eliminated vertices are disconnected while the sweep
goes on, and reconnected before returning.
Returns true if set contains no clique of size target.
*/
#[allow(clippy::too_many_arguments)]
fn prep(
    g:&mut Graph,
    set:&mut VertexSet,
    target:usize,
    level:usize,
    test:&CliqueTest,
    strategy:CandidateStrategy,
    tree:&mut EliminationTree,
    node:NodeId,
    depth:usize,
) -> bool {
    if level == 0 { return test.is_infeasible(g, set, target, None); }
    let mut candidates = CandidateManager::new(strategy);
    candidates.init(g, set, 0);
    let mut nb_removed = 0;
    while let Some(cand) = candidates.next(g, set, 0, None) {
        if !test.needs_subgraph() {
            if test.is_infeasible(g, set, target, Some(cand)) {
                set.remove(cand);
                tree.add_child(node, cand);
                nb_removed += 1;
                continue;
            }
            if level == 1 { continue; }
        }
        let mut subgraph = set.clone();
        subgraph.remove_non_neighbors(g, cand);
        subgraph.insert(cand);
        if test.needs_subgraph() {
            if test.is_infeasible(g, &subgraph, target, None) {
                set.remove(cand);
                tree.add_child(node, cand);
                nb_removed += 1;
                continue;
            }
            if level == 1 { continue; }
        }
        let child = tree.add_child(node, cand);
        if prep(g, &mut subgraph, target, level-1, test, strategy, tree, child, depth+1) {
            set.remove(cand);
            tree.delete_all_children(child);
            nb_removed += 1;
        } else if tree.nb_children(child) == 0 {
            tree.delete_child(node, cand);
        } else {
            for x in tree.leaf_children(child) {
                g.disconnect(cand, x);
            }
        }
    }
    if level > 1 {
        let children:Vec<_> = tree.children(node).collect();
        for (cand, child) in children {
            for x in tree.leaf_children(child) {
                g.connect(cand, x);
            }
        }
    }
    if nb_removed > 0 {
        trace!("prep depth {}: {} vertices removed", depth, nb_removed);
    }
    test.is_infeasible(g, set, target, None)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{brute_force_clique_size, random_graph};
    use crate::search::clique_test::TestKind;

    fn edges(g:&Graph) -> Vec<(usize, usize)> {
        let mut res = Vec::new();
        for a in g.vertices() {
            for b in g.neighbors(a) {
                if a < b { res.push((a,b)); }
            }
        }
        res.sort_unstable();
        res
    }

    #[test]
    fn test_star_leaves_are_removed() {
        let mut g = Graph::new(6);
        for leaf in 1..6 { g.connect(0, leaf); }
        let mut set = VertexSet::full(&g);
        let mut p = Preprocessor::new();
        p.add_step(CliqueTest::Size, CandidateStrategy::Default, 1);
        // only the center survives, which is not enough for a triangle
        assert!(p.run(&mut g, &mut set, 3));
        for leaf in 1..6 { assert!(!set.contains(leaf)); }
        assert!(set.contains(0));
        let mut set = VertexSet::full(&g);
        assert!(!p.run(&mut g, &mut set, 2));
        assert_eq!(set.len(), 6);
    }

    #[test]
    fn test_infeasible_target() {
        let mut g = Graph::new(4);
        g.connect(0, 1);
        g.connect(2, 3);
        let mut p = Preprocessor::new();
        p.add_step(CliqueTest::Color, CandidateStrategy::LowDegreeLazy, 1);
        assert!(p.run_on_graph(&mut g, 3));
        assert_eq!(g.nb_vertices(), 0);
        assert_eq!(g.nb_edges(), 0);
        // a feasible target only removes the irrelevant vertices
        let mut g = Graph::new(5);
        for a in 0..3 { for b in a+1..3 { g.connect(a, b); } }
        g.connect(3, 4);
        assert!(!p.run_on_graph(&mut g, 3));
        assert_eq!(g.vertices().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(g.nb_edges(), 3);
    }

    #[test]
    fn test_never_removes_maximum_clique_vertices() {
        for seed in 0..10 {
            let g0 = random_graph(14, 0.5, seed);
            let omega = brute_force_clique_size(&g0);
            for kind in &[TestKind::Size, TestKind::Edge, TestKind::Color, TestKind::Match, TestKind::LazyMatch, TestKind::LazyColor] {
                for level in 1..=3 {
                    let mut g = g0.clone();
                    let full = VertexSet::full(&g);
                    let mut p = Preprocessor::new();
                    p.add_step(CliqueTest::build(*kind, &g, &full), CandidateStrategy::HighDegreePreprocessing, level);
                    assert!(!p.run_on_graph(&mut g, omega));
                    assert_eq!(brute_force_clique_size(&g), omega, "{:?} level {} seed {}", kind, level, seed);
                }
            }
        }
    }

    #[test]
    fn test_edges_are_restored() {
        for seed in 0..10 {
            let mut g = random_graph(14, 0.6, seed);
            let before = edges(&g);
            let mut set = VertexSet::full(&g);
            let mut p = Preprocessor::new();
            p.add_step(CliqueTest::Color, CandidateStrategy::Default, 3);
            let target = brute_force_clique_size(&g) + 1;
            p.run(&mut g, &mut set, target);
            assert_eq!(edges(&g), before);
        }
    }

    #[test]
    fn test_stop_on_edges() {
        let mut g = random_graph(20, 0.3, 3);
        let omega = brute_force_clique_size(&g);
        let mut p = Preprocessor::new();
        p.add_step(CliqueTest::Size, CandidateStrategy::LowDegreeLazy, 1)
            .set_stop_criterion(StopCriterion::Edges)
            .set_stop_ratio(1.);
        assert!(!p.run_on_graph(&mut g, omega));
        assert_eq!(brute_force_clique_size(&g), omega);
        for v in g.vertices() { assert!(g.degree(v) + 1 >= omega); }
    }
}
