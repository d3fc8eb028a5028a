use std::time::Instant;

use serde::Serialize;
use tracing::info;

use crate::config::SearchConfig;
use crate::error::Result;
use crate::graph::Graph;
use crate::search::brancher::BranchStatistics;
use crate::search::distributed::distributed_search;
use crate::search::heuristic::greedy_clique;
use crate::vertex_set::VertexSet;

/** statistics of a maximum clique search */
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchStatistics {
    /// size of the clique found by the heuristic
    pub heuristic_size: usize,
    /// number of vertices after preprocessing
    pub nb_vertices_preprocessed: usize,
    /// number of edges after preprocessing
    pub nb_edges_preprocessed: usize,
    /// branch-and-bound counters (coordinator side when distributed)
    pub branching: BranchStatistics,
    /// size of the maximum clique
    pub clique_size: usize,
    /// time spent (seconds)
    pub time_searched: f32,
}

/**
finds a maximum clique of g with the default configuration.
g is preprocessed in place (vertices that belong to no maximum clique may be
removed and the graph compacted); the returned set is a set of g after this
transformation.
*/
pub fn find_maximum_clique(g:&mut Graph) -> VertexSet {
    let config = SearchConfig::default();
    let mut stats = SearchStatistics::default();
    let mut best = prepare(g, &config, &mut stats);
    let mut brancher = config.brancher(g);
    brancher.search(g, &mut best);
    best
}

/** finds a maximum clique of g with the given configuration (see [`find_maximum_clique`]) */
pub fn find_maximum_clique_with(g:&mut Graph, config:&SearchConfig) -> Result<VertexSet> {
    find_maximum_clique_with_stats(g, config).map(|(clique, _)| clique)
}

/** finds a maximum clique of g and returns the statistics of the search */
pub fn find_maximum_clique_with_stats(g:&mut Graph, config:&SearchConfig) -> Result<(VertexSet, SearchStatistics)> {
    config.validate()?;
    let t_start = Instant::now();
    let mut stats = SearchStatistics::default();
    let mut best = prepare(g, config, &mut stats);
    if config.workers == 0 {
        let mut brancher = config.brancher(g);
        brancher.search(g, &mut best);
        stats.branching = brancher.statistics();
    } else {
        distributed_search(g, config, &mut best)?;
    }
    stats.clique_size = best.len();
    stats.time_searched = t_start.elapsed().as_secs_f32();
    info!("maximum clique: {} ({:.3} seconds)", best.len(), stats.time_searched);
    Ok((best, stats))
}

/**
heuristic, preprocessing, shrink and sort. Returns the initial incumbent
(a clique of the transformed graph).
*/
fn prepare(g:&mut Graph, config:&SearchConfig, stats:&mut SearchStatistics) -> VertexSet {
    let mut lower_bound = 0;
    if config.heuristic {
        lower_bound = greedy_clique(g, &VertexSet::full(g)).len();
        stats.heuristic_size = lower_bound;
        info!("greedy clique: {}", lower_bound);
    }
    if let Some(p) = &config.preprocessing {
        if lower_bound > 1 {
            let mut preprocessor = p.build(g);
            preprocessor.run_on_graph(g, lower_bound);
            info!("preprocessed graph: {} vertices, {} edges", g.nb_vertices(), g.nb_edges());
        }
    }
    stats.nb_vertices_preprocessed = g.nb_vertices();
    stats.nb_edges_preprocessed = g.nb_edges();
    if config.shrink { g.shrink(); }
    if let Some(order) = config.sort_by_degree { g.sort_by_degree(order); }
    if config.heuristic {
        greedy_clique(g, &VertexSet::full(g))
    } else {
        VertexSet::new(g)
    }
}
