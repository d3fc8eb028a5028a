use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::Graph;
use crate::search::candidates::{CandidateManager, CandidateStrategy};
use crate::search::degree::degree_preprocessing;
use crate::search::preprocessor::Preprocessor;
use crate::vertex_set::VertexSet;

/** order in which the two branches of a candidate are explored */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchDirection {
    /// include the candidate first, then exclude it
    BestToWorst,
    /// exclude the candidate first, then include it
    WorstToBest,
}

impl Default for SearchDirection {
    fn default() -> Self { SearchDirection::WorstToBest }
}

/**
hook called by the brancher before exploring a subtree. An implementation
may take the subtree over (for instance by sending it to another process);
the brancher then skips it.
*/
pub trait SubtreeDispatch {
    /**
    offers the subtree (set, clique) rooted at depth (the root of the search is
    at depth 0). best may be improved.
    Returns true if the subtree was taken over.
    */
    fn dispatch(&mut self, depth:usize, set:&VertexSet, clique:&VertexSet, best:&mut VertexSet) -> bool;
}

/** explores every subtree locally */
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalSearch;

impl SubtreeDispatch for LocalSearch {
    fn dispatch(&mut self, _depth:usize, _set:&VertexSet, _clique:&VertexSet, _best:&mut VertexSet) -> bool {
        false
    }
}

/** counters of a branch-and-bound run */
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BranchStatistics {
    /// number of explored nodes
    pub nb_nodes: u64,
    /// number of subtrees taken over by the dispatcher
    pub nb_dispatched: u64,
    /// maximum depth reached
    pub max_depth: usize,
    /// number of vertices forced into a clique by degree preprocessing
    pub nb_forced: u64,
}

/**
Branch-and-bound maximum clique search.

Each node holds a working set (vertices that may extend the current clique).
Candidates are picked by a CandidateManager; each one is either included
(the working set is restricted to its neighbors) or excluded. A node is
pruned as soon as `|working set| + |clique| <= |best|`. Degree
preprocessing and RGPA can be interleaved at the beginning of each node
(branch) and after each candidate (node).
*/
#[derive(Debug, Clone)]
pub struct Brancher {
    /// branching order
    direction: SearchDirection,
    /// candidate selection
    candidates: CandidateStrategy,
    /// degree preprocessing when entering a node
    branch_dpp: bool,
    /// degree preprocessing after each candidate
    node_dpp: bool,
    /// RGPA when entering a node
    branch_ipp: Option<Preprocessor>,
    /// RGPA after each candidate
    node_ipp: Option<Preprocessor>,
    /// counters
    stats: BranchStatistics,
}

impl Default for Brancher {
    fn default() -> Self { Self::new() }
}

impl Brancher {

    /** creates a brancher with the default candidate manager, exploring worst to best */
    pub fn new() -> Self {
        Self {
            direction: SearchDirection::default(),
            candidates: CandidateStrategy::default(),
            branch_dpp: false,
            node_dpp: false,
            branch_ipp: None,
            node_ipp: None,
            stats: BranchStatistics::default(),
        }
    }

    /// sets the branching order
    pub fn with_direction(mut self, direction:SearchDirection) -> Self {
        self.direction = direction;
        self
    }

    /// sets the candidate selection strategy
    pub fn with_candidates(mut self, candidates:CandidateStrategy) -> Self {
        self.candidates = candidates;
        self
    }

    /// enables degree preprocessing when entering a node
    pub fn with_branch_degree_preprocessing(mut self, enabled:bool) -> Self {
        self.branch_dpp = enabled;
        self
    }

    /// enables degree preprocessing after each candidate
    pub fn with_node_degree_preprocessing(mut self, enabled:bool) -> Self {
        self.node_dpp = enabled;
        self
    }

    /// runs a preprocessor when entering a node
    pub fn with_branch_preprocessor(mut self, preprocessor:Preprocessor) -> Self {
        self.branch_ipp = Some(preprocessor);
        self
    }

    /// runs a preprocessor after each candidate
    pub fn with_node_preprocessor(mut self, preprocessor:Preprocessor) -> Self {
        self.node_ipp = Some(preprocessor);
        self
    }

    /// counters of the previous searches
    pub fn statistics(&self) -> BranchStatistics { self.stats }

    /** searches a maximum clique of the whole graph. Returns its size. */
    pub fn search(&mut self, g:&mut Graph, best:&mut VertexSet) -> usize {
        let set = VertexSet::full(g);
        let clique = VertexSet::new(g);
        self.search_from(g, set, best, &clique, &mut LocalSearch)
    }

    /**
    searches a clique larger than best that extends clique with vertices of set.
    best is updated in place. Returns the size of best.
    */
    pub fn search_from(
        &mut self,
        g:&mut Graph,
        set:VertexSet,
        best:&mut VertexSet,
        clique:&VertexSet,
        dispatch:&mut dyn SubtreeDispatch,
    ) -> usize {
        let nb_nodes = self.stats.nb_nodes;
        self.find_mcl(g, set, best, clique, 0, dispatch);
        debug!(
            "branch and bound: {} nodes explored, best clique {}",
            self.stats.nb_nodes - nb_nodes, best.len()
        );
        best.len()
    }

    fn find_mcl(
        &mut self,
        g:&mut Graph,
        mut set:VertexSet,
        best:&mut VertexSet,
        clique_so_far:&VertexSet,
        depth:usize,
        dispatch:&mut dyn SubtreeDispatch,
    ) {
        self.stats.nb_nodes += 1;
        self.stats.max_depth = self.stats.max_depth.max(depth);
        let mut clique = clique_so_far.clone();
        update_best(best, &clique);
        self.interleaved_preprocessing(g, &mut set, best, &mut clique, true);
        if set.len() + clique.len() <= best.len() { return; }
        let mut candidates = CandidateManager::new(self.candidates);
        candidates.init(g, &set, best.len() + 1);
        while let Some(cand) = candidates.next(g, &mut set, best.len() + 1, Some(&mut clique)) {
            match self.direction {
                SearchDirection::BestToWorst => {
                    clique.insert(cand);
                    update_best(best, &clique);
                    let mut subset = set.clone();
                    subset.remove_non_neighbors(g, cand);
                    if dispatch.dispatch(depth+1, &subset, &clique, best) {
                        self.stats.nb_dispatched += 1;
                    } else {
                        self.find_mcl(g, subset, best, &clique, depth+1, dispatch);
                    }
                    clique.remove(cand);
                    set.remove(cand);
                },
                SearchDirection::WorstToBest => {
                    update_best(best, &clique);
                    set.remove(cand);
                    if dispatch.dispatch(depth+1, &set, &clique, best) {
                        self.stats.nb_dispatched += 1;
                    } else {
                        self.find_mcl(g, set.clone(), best, &clique, depth+1, dispatch);
                    }
                    clique.insert(cand);
                    update_best(best, &clique);
                    set.remove_non_neighbors(g, cand);
                },
            }
            self.interleaved_preprocessing(g, &mut set, best, &mut clique, false);
            if set.len() + clique.len() <= best.len() { break; }
        }
        update_best(best, &clique);
    }

    /// degree preprocessing and RGPA, at the node entry (branch) or after a candidate
    fn interleaved_preprocessing(
        &mut self,
        g:&mut Graph,
        set:&mut VertexSet,
        best:&mut VertexSet,
        clique:&mut VertexSet,
        branch:bool,
    ) {
        let ipp = if branch { self.branch_ipp.as_mut() } else { self.node_ipp.as_mut() };
        if let Some(preprocessor) = ipp {
            let needed = (best.len() + 1).saturating_sub(clique.len());
            if needed > 1 && preprocessor.run(g, set, needed) {
                set.clear();
            }
        }
        let dpp = if branch { self.branch_dpp } else { self.node_dpp };
        if dpp {
            self.stats.nb_forced += degree_preprocessing(g, set, clique) as u64;
            update_best(best, clique);
        }
    }
}

/// replaces best by clique if clique is larger
fn update_best(best:&mut VertexSet, clique:&VertexSet) {
    if clique.len() > best.len() {
        *best = clique.clone();
    }
}
