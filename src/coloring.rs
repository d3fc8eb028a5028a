use crate::graph::{Graph, VertexId};
use crate::vertex_set::VertexSet;

/**
result of a greedy coloring of an induced subgraph.
The number of colors is an upper bound on the clique number of the subgraph.
*/
#[derive(Debug, Clone)]
pub struct Coloring {
    /// number of colors used
    nb_colors: usize,
    /// colors[v]: color of vertex v (None if v was not colored)
    colors: Vec<Option<usize>>,
    /// colored vertices sorted by decreasing color
    order: Vec<VertexId>,
}

impl Coloring {
    /// number of colors used
    pub fn nb_colors(&self) -> usize { self.nb_colors }

    /// color of v (colors start at 0)
    pub fn color(&self, v:VertexId) -> Option<usize> { self.colors.get(v).copied().flatten() }

    /// colored vertices, highest color first
    pub fn order(&self) -> &[VertexId] { &self.order }
}

/**
greedily colors the subgraph induced by set. Vertices are considered in
REVERSE traversal order (the traversal order should ideally go from lowest to
highest degree). Each pass builds one color class: a vertex gets the current
color unless it is adjacent to a vertex that already got it.
*/
pub fn color_subgraph(g:&Graph, set:&VertexSet) -> Coloring {
    let mut vertices:Vec<Option<VertexId>> = set.iter(g).map(Some).collect();
    let mut nb_left = vertices.len();
    let mut colors = vec![None ; g.capacity()];
    let mut order = vec![0 ; nb_left];
    let mut current_color = 0;
    let mut color_neighbors = VertexSet::new(g);
    while nb_left > 0 {
        color_neighbors.clear();
        for slot in vertices.iter_mut().rev() {
            let v = match slot {
                Some(v) if !color_neighbors.contains(*v) => *v,
                _ => continue,
            };
            colors[v] = Some(current_color);
            order[nb_left-1] = v;
            color_neighbors.insert_neighbors(g, v);
            nb_left -= 1;
            *slot = None;
        }
        current_color += 1;
    }
    Coloring { nb_colors: current_color, colors, order }
}

/// number of colors used by [`color_subgraph`] on set
pub fn nb_colors(g:&Graph, set:&VertexSet) -> usize {
    color_subgraph(g, set).nb_colors()
}
