use crate::graph::{Graph, VertexId};
use crate::vertex_set::VertexSet;

/**
finds a large (not necessarily maximum) anti-matching of the subgraph induced
by set: pairs of non-adjacent vertices, each vertex in at most one pair.
Since a clique contains at most one vertex of each pair, the clique number of
the subgraph is at most `|set| - |anti-matching|`.

Greedy: vertices are scanned in traversal order, each unmatched vertex is
paired with the first following unmatched non-neighbor.
*/
pub fn find_large_anti_matching(g:&Graph, set:&VertexSet) -> Vec<(VertexId, VertexId)> {
    let vertices = set.to_vec(g);
    let mut matched = vec![false ; vertices.len()];
    let mut res = Vec::new();
    for i in 0..vertices.len() {
        if matched[i] { continue; }
        let partner = (i+1..vertices.len())
            .find(|j| !matched[*j] && !g.are_adjacent(vertices[i], vertices[*j]));
        if let Some(j) = partner {
            matched[i] = true;
            matched[j] = true;
            res.push((vertices[i], vertices[j]));
        }
    }
    res
}

/// size of the anti-matching found by [`find_large_anti_matching`]
pub fn anti_matching_size(g:&Graph, set:&VertexSet) -> usize {
    find_large_anti_matching(g, set).len()
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::random_graph;

    #[test]
    fn test_anti_matching_is_valid() {
        for seed in 0..10 {
            let g = random_graph(25, 0.6, seed);
            let pairs = find_large_anti_matching(&g, &VertexSet::full(&g));
            let mut seen = VertexSet::new(&g);
            for (a,b) in pairs {
                assert!(!g.are_adjacent(a, b));
                assert!(!seen.contains(a) && !seen.contains(b));
                seen.insert(a);
                seen.insert(b);
            }
        }
    }

    #[test]
    fn test_anti_matching_sizes() {
        let mut g = Graph::new(6);
        assert_eq!(anti_matching_size(&g, &VertexSet::full(&g)), 3);
        for a in 0..6 { for b in a+1..6 { g.connect(a, b); } }
        assert_eq!(anti_matching_size(&g, &VertexSet::full(&g)), 0);
        g.disconnect(1, 4);
        assert_eq!(find_large_anti_matching(&g, &VertexSet::full(&g)), vec![(1, 4)]);
    }
}
