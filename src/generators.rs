use crate::graph::{Graph, VertexId};

/**
generates a G(n,p) random graph: each of the n(n-1)/2 edges exists with
probability density. Same seed, same graph.
*/
pub fn random_graph(n:usize, density:f64, seed:u64) -> Graph {
    let rng = fastrand::Rng::with_seed(seed);
    let mut res = Graph::with_capacity(n);
    for i in 0..n {
        res.create_vertex(Some(&format!("v{}", i)));
    }
    for a in 0..n {
        for b in a+1..n {
            if rng.f64() < density { res.connect(a, b); }
        }
    }
    res
}

/**
size of a maximum clique by enumerating every vertex subset.
Only meant to check the search on tiny graphs.

# Panics
 - if the graph has more than 20 active vertices
*/
pub fn brute_force_clique_size(g:&Graph) -> usize {
    let vertices:Vec<VertexId> = g.vertices().collect();
    assert!(vertices.len() <= 20, "brute force called on a graph with {} vertices", vertices.len());
    let mut best = 0;
    for mask in 0u32..(1 << vertices.len()) {
        let size = mask.count_ones() as usize;
        if size <= best { continue; }
        let members:Vec<VertexId> = (0..vertices.len())
            .filter(|i| mask & (1 << i) != 0)
            .map(|i| vertices[i])
            .collect();
        let is_clique = members.iter().enumerate()
            .all(|(i,a)| members[i+1..].iter().all(|b| g.are_adjacent(*a, *b)));
        if is_clique { best = size; }
    }
    best
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_graph_is_reproducible() {
        let a = random_graph(20, 0.5, 42);
        let b = random_graph(20, 0.5, 42);
        assert_eq!(a.nb_edges(), b.nb_edges());
        for u in 0..20 {
            assert_eq!(a.neighbors(u).collect::<Vec<_>>(), b.neighbors(u).collect::<Vec<_>>());
        }
        assert_eq!(random_graph(10, 0., 1).nb_edges(), 0);
        assert_eq!(random_graph(10, 1., 1).nb_edges(), 45);
    }

    #[test]
    fn test_brute_force() {
        let mut g = Graph::new(5);
        assert_eq!(brute_force_clique_size(&g), 1);
        g.connect(0, 1);
        g.connect(1, 2);
        g.connect(0, 2);
        g.connect(2, 3);
        assert_eq!(brute_force_clique_size(&g), 3);
        assert_eq!(brute_force_clique_size(&Graph::new(0)), 0);
    }
}
