use crate::graph::Graph;
use crate::vertex_set::VertexSet;

/**
moves into clique the vertices of set whose decision is forced:
 - a vertex adjacent to every other vertex of set belongs to some maximum
   clique of set, it is moved to clique.
 - a vertex missing exactly one neighbor in set: some maximum clique contains
   it, its only non-neighbor is discarded and the vertex moved to clique.
Vertices are examined once, in traversal order.
Returns the number of vertices moved to clique.
*/
pub fn degree_preprocessing(g:&Graph, set:&mut VertexSet, clique:&mut VertexSet) -> usize {
    let mut nb_added = 0;
    let vertices = set.to_vec(g);
    for v in vertices {
        if !set.contains(v) { continue; }
        let degree = set.degree(g, v);
        let size = set.len();
        if degree + 1 == size {
            set.remove(v);
            clique.insert(v);
            nb_added += 1;
        } else if degree + 2 == size {
            set.remove_non_neighbors(g, v);
            clique.insert(v);
            nb_added += 1;
        }
    }
    nb_added
}
