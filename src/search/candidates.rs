use serde::{Deserialize, Serialize};

use crate::coloring::color_subgraph;
use crate::graph::{Graph, VertexId};
use crate::vertex_set::VertexSet;

/** strategies available to select the next branching (or preprocessing) vertex */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStrategy {
    /// vertices in traversal order (snapshot taken at init)
    Default,
    /// vertices sorted by increasing degree once, at init
    LowDegreeLazy,
    /// highest degree vertex first, applies the forced-decision rules at each call
    HighDegreePreprocessing,
    /// lowest degree vertex first, applies the forced-decision rules at each call
    LowDegreePreprocessing,
    /// vertices by decreasing color of a greedy coloring computed at init,
    /// stops as soon as the coloring bound proves no improvement is possible
    HighColorLazy,
}

impl Default for CandidateStrategy {
    fn default() -> Self { CandidateStrategy::Default }
}

/**
Selects the next candidate vertex of a working set.

A manager is not a pure iterator: the preprocessing strategies may remove
vertices from the working set and move vertices into the current clique while
looking for the next candidate. Callers rely on it to shrink their state.
The forced-decision rules only fire when a clique container is given.

Deterministic: same inputs and state give the same candidates.
*/
#[derive(Debug, Clone)]
pub struct CandidateManager {
    /// selection strategy
    strategy: CandidateStrategy,
    /// candidates snapshot (None: already consumed or discarded)
    candidates: Vec<Option<VertexId>>,
    /// next position in the snapshot (lazy strategies)
    next_cand: usize,
    /// colors[v]: color of v (HighColorLazy only)
    colors: Vec<usize>,
}

impl CandidateManager {

    /** creates a fresh manager for a strategy */
    pub fn new(strategy:CandidateStrategy) -> Self {
        Self { strategy, candidates: Vec::new(), next_cand: 0, colors: Vec::new() }
    }

    /// strategy of the manager
    pub fn strategy(&self) -> CandidateStrategy { self.strategy }

    /**
    prepares the manager for a working set.
    target: size of the clique the caller looks for (0 if none)
    */
    pub fn init(&mut self, g:&Graph, set:&VertexSet, _target:usize) {
        self.next_cand = 0;
        match self.strategy {
            CandidateStrategy::HighColorLazy => {
                let coloring = color_subgraph(g, set);
                self.colors = vec![0 ; g.capacity()];
                for v in coloring.order() {
                    self.colors[*v] = coloring.color(*v).unwrap_or(0);
                }
                self.candidates = coloring.order().iter().map(|v| Some(*v)).collect();
            },
            CandidateStrategy::LowDegreeLazy => {
                let mut vertices = set.to_vec(g);
                vertices.sort_by_key(|v| set.degree(g, *v));
                self.candidates = vertices.into_iter().map(Some).collect();
            },
            _ => {
                self.candidates = set.iter(g).map(Some).collect();
            }
        }
    }

    /**
    returns the next candidate (None if there is none left, or if the
    strategy proves that no clique of size target can be found).
    */
    pub fn next(
        &mut self,
        g:&Graph,
        set:&mut VertexSet,
        target:usize,
        clique:Option<&mut VertexSet>
    ) -> Option<VertexId> {
        match self.strategy {
            CandidateStrategy::Default | CandidateStrategy::LowDegreeLazy => self.next_lazy(set),
            CandidateStrategy::HighColorLazy => {
                let clique_size = clique.map_or(0, |c| c.len());
                self.next_color(set, target, clique_size)
            },
            CandidateStrategy::HighDegreePreprocessing => self.next_preprocessing(g, set, target, clique, true),
            CandidateStrategy::LowDegreePreprocessing => self.next_preprocessing(g, set, target, clique, false),
        }
    }

    /// next snapshot vertex still in the set
    fn next_lazy(&mut self, set:&VertexSet) -> Option<VertexId> {
        while self.next_cand < self.candidates.len() {
            let cand = self.candidates[self.next_cand];
            self.next_cand += 1;
            match cand {
                Some(v) if set.contains(v) => return Some(v),
                _ => {}
            }
        }
        None
    }

    /// next vertex by decreasing color, with the coloring bound
    fn next_color(&mut self, set:&VertexSet, target:usize, clique_size:usize) -> Option<VertexId> {
        while self.next_cand < self.candidates.len() {
            if let Some(v) = self.candidates[self.next_cand] {
                if set.contains(v) {
                    // remaining vertices use colors 0..=colors[v]
                    if clique_size + self.colors[v] + 1 < target { return None; }
                    self.next_cand += 1;
                    return Some(v);
                }
            }
            self.next_cand += 1;
        }
        None
    }

    /**
    scans the candidates, applying on the way:
     - low degree rule: a vertex that cannot reach target with the clique is removed
     - n-1 rule: a vertex adjacent to all the others goes to the clique
     - n-2 rule: a vertex missing a single neighbor goes to the clique, its non-neighbor is removed
    then returns the remaining candidate of highest (or lowest) degree. Ties
    are broken by the traversal order.
    */
    fn next_preprocessing(
        &mut self,
        g:&Graph,
        set:&mut VertexSet,
        target:usize,
        mut clique:Option<&mut VertexSet>,
        highest:bool,
    ) -> Option<VertexId> {
        let mut clique_size = clique.as_ref().map_or(0, |c| c.len());
        let mut best:Option<(usize, usize)> = None; // (position, degree)
        for pos in 0..self.candidates.len() {
            let cand = match self.candidates[pos] {
                None => continue,
                Some(v) if !set.contains(v) => { self.candidates[pos] = None; continue; },
                Some(v) => v,
            };
            let degree = set.degree(g, cand);
            let size = set.len();
            if let Some(c) = clique.as_deref_mut() {
                if degree + clique_size + 1 < target {
                    set.remove(cand);
                    self.candidates[pos] = None;
                    continue;
                }
                if degree + 1 == size {
                    set.remove(cand);
                    c.insert(cand);
                    clique_size += 1;
                    self.candidates[pos] = None;
                    continue;
                }
                if degree + 2 == size {
                    set.remove_non_neighbors(g, cand);
                    c.insert(cand);
                    clique_size += 1;
                    self.candidates[pos] = None;
                    continue;
                }
            }
            let better = match best {
                None => true,
                Some((_, d)) => if highest { degree > d } else { degree < d },
            };
            if better { best = Some((pos, degree)); }
        }
        let (pos, _) = best?;
        let cand = self.candidates[pos].take()?;
        // the n-2 rule may have removed the best candidate afterwards
        if set.contains(cand) {
            Some(cand)
        } else if highest {
            set.highest_degree_vertex(g)
        } else {
            set.lowest_degree_vertex(g)
        }
    }
}
