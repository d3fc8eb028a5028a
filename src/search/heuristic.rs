use tracing::debug;

use crate::graph::Graph;
use crate::vertex_set::VertexSet;

/** implements a greedy algorithm that finds a "large" size clique in set.
The algorithm chooses the candidate with the largest degree (within the
candidates) and keeps its neighbors as candidates. Then, while the set of
candidates is not empty, it chooses again the candidate of largest degree.
*/
pub fn greedy_clique(g:&Graph, set:&VertexSet) -> VertexSet {
    let mut candidates = set.clone();
    let mut res = VertexSet::new(g);
    while let Some(v) = candidates.highest_degree_vertex(g) {
        res.insert(v);
        candidates.remove_non_neighbors(g, v);
    }
    debug!("greedy clique: {}", res.len());
    res
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{brute_force_clique_size, random_graph};

    #[test]
    fn test_greedy_finds_a_clique() {
        for seed in 0..20 {
            let g = random_graph(16, 0.5, seed);
            let clique = greedy_clique(&g, &VertexSet::full(&g));
            assert!(clique.is_clique(&g));
            assert!(clique.len() >= 1);
            assert!(clique.len() <= brute_force_clique_size(&g));
        }
    }

    #[test]
    fn test_greedy_on_empty_set() {
        let g = Graph::new(3);
        assert!(greedy_clique(&g, &VertexSet::new(&g)).is_empty());
    }

    #[test]
    fn test_greedy_restricted_to_set() {
        let mut g = Graph::new(5);
        for a in 0..4 { for b in a+1..4 { g.connect(a, b); } }
        g.connect(3, 4);
        let set = VertexSet::from_vertices(&g, vec![2, 3, 4]);
        let clique = greedy_clique(&g, &set);
        assert_eq!(clique.len(), 2);
        assert!(clique.contains(3));
    }
}
