use std::collections::HashMap;

use bit_set::BitSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::vertex_set::VertexSet;

/** Vertex Id (index in the adjacency matrix) */
pub type VertexId = usize;

/** order used when sorting the traversal order by degree */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegreeOrder {
    /// lowest degree first
    Ascending,
    /// highest degree first
    Descending,
}

/**
Undirected graph stored as a symmetric bit matrix.

The capacity is fixed at creation. Vertices can be removed (their slot becomes
inactive) and created again until the capacity is reached. The traversal order
is a permutation of the vertex ids that does not depend on how vertices are
stored, so sorting by degree never moves adjacency rows.

Invariants: the adjacency matrix is symmetric and irreflexive, an inactive
vertex has no edges, `degree(v) == |adj_matrix[v]|`.
*/
#[derive(Debug, Clone)]
pub struct Graph {
    /// nb active vertices
    n: usize,
    /// nb edges
    m: usize,
    /// max number of vertices
    capacity: usize,
    /// adj_matrix[v]: bitset of the neighbors of v
    adj_matrix: Vec<BitSet>,
    /// active (non-deleted) vertices
    active: BitSet,
    /// labels[v]: label of vertex v (if any)
    labels: Vec<Option<String>>,
    /// label -> vertex mapping
    label_to_vertex: HashMap<String, VertexId>,
    /// order in which vertices are traversed
    order: Vec<VertexId>,
}

impl Graph {

    /** creates an edgeless graph with n unlabeled vertices (capacity n) */
    pub fn new(n:usize) -> Self {
        let mut res = Self::with_capacity(n);
        for i in 0..n {
            res.active.insert(i);
            res.order.push(i);
        }
        res.n = n;
        res
    }

    /** creates an empty graph able to hold up to capacity vertices */
    pub fn with_capacity(capacity:usize) -> Self {
        Self {
            n: 0,
            m: 0,
            capacity,
            adj_matrix: vec![BitSet::with_capacity(capacity) ; capacity],
            active: BitSet::with_capacity(capacity),
            labels: vec![None ; capacity],
            label_to_vertex: HashMap::new(),
            order: Vec::with_capacity(capacity),
        }
    }

    /** resets the graph to an empty graph (the capacity is kept) */
    pub fn clear(&mut self) {
        self.n = 0;
        self.m = 0;
        for row in self.adj_matrix.iter_mut() { row.clear(); }
        self.active.clear();
        for l in self.labels.iter_mut() { *l = None; }
        self.label_to_vertex.clear();
        self.order.clear();
    }

    /**
    creates a new vertex and returns its id. If a vertex with the same label
    already exists, its id is returned instead.

    # Panics
     - if the capacity of the graph is exceeded
    */
    pub fn create_vertex(&mut self, label:Option<&str>) -> VertexId {
        if let Some(l) = label {
            if let Some(v) = self.label_to_vertex.get(l) { return *v; }
        }
        let free_slot = (0..self.capacity).find(|i| !self.active.contains(*i));
        let v = match free_slot {
            Some(v) => v,
            None => panic!("cannot create a new vertex: capacity exceeded ({})", self.capacity),
        };
        self.n += 1;
        self.active.insert(v);
        // a reused slot may still appear in the traversal order
        self.order.retain(|u| *u != v);
        self.order.push(v);
        if let Some(l) = label {
            self.labels[v] = Some(l.to_string());
            self.label_to_vertex.insert(l.to_string(), v);
        }
        v
    }

    /** removes a vertex and all its incident edges. Does nothing if the vertex is not active. */
    pub fn remove(&mut self, v:VertexId) {
        if v >= self.capacity || !self.active.contains(v) { return; }
        self.n -= 1;
        let neighbors:Vec<VertexId> = self.adj_matrix[v].iter().collect();
        for u in neighbors {
            self.adj_matrix[u].remove(v);
            self.m -= 1;
        }
        self.adj_matrix[v].clear();
        self.active.remove(v);
        if let Some(l) = self.labels[v].take() {
            self.label_to_vertex.remove(&l);
        }
    }

    /** removes every vertex of the set */
    pub fn remove_set(&mut self, set:&VertexSet) {
        for v in set.ids() { self.remove(v); }
    }

    /** removes every vertex that is not in the set */
    pub fn remove_all_except(&mut self, set:&VertexSet) {
        for v in 0..self.capacity {
            if !set.contains(v) { self.remove(v); }
        }
    }

    /** adds the edge {a,b}. Self-edges are silently ignored. */
    pub fn connect(&mut self, a:VertexId, b:VertexId) {
        if a == b { return; }
        debug_assert!(self.is_active(a) && self.is_active(b), "connecting inactive vertices {} {}", a, b);
        if !self.adj_matrix[a].contains(b) {
            self.adj_matrix[a].insert(b);
            self.adj_matrix[b].insert(a);
            self.m += 1;
        }
    }

    /** removes the edge {a,b} (if it exists) */
    pub fn disconnect(&mut self, a:VertexId, b:VertexId) {
        if self.adj_matrix[a].contains(b) {
            self.adj_matrix[a].remove(b);
            self.adj_matrix[b].remove(a);
            self.m -= 1;
        }
    }

    /// number of active vertices
    pub fn nb_vertices(&self) -> usize { self.n }

    /// number of edges
    pub fn nb_edges(&self) -> usize { self.m }

    /// maximum number of vertices
    pub fn capacity(&self) -> usize { self.capacity }

    /// true iff v is an active vertex
    pub fn is_active(&self, v:VertexId) -> bool { self.active.contains(v) }

    /// true iff a and b are adjacent
    pub fn are_adjacent(&self, a:VertexId, b:VertexId) -> bool { self.adj_matrix[a].contains(b) }

    /// number of neighbors of v
    pub fn degree(&self, v:VertexId) -> usize { self.adj_matrix[v].len() }

    /// number of common neighbors of a and b
    pub fn common_neighbors(&self, a:VertexId, b:VertexId) -> usize {
        self.adj_matrix[a].intersection(&self.adj_matrix[b]).count()
    }

    /// label of v (if any)
    pub fn label(&self, v:VertexId) -> Option<&str> { self.labels[v].as_deref() }

    /// vertex having the given label
    pub fn vertex(&self, label:&str) -> Option<VertexId> { self.label_to_vertex.get(label).copied() }

    /// label of v, or its id if it has none
    pub fn display_label(&self, v:VertexId) -> String {
        match self.label(v) {
            Some(l) => l.to_string(),
            None => v.to_string(),
        }
    }

    /// neighbors of v (by increasing id)
    pub fn neighbors(&self, v:VertexId) -> impl Iterator<Item=VertexId> + '_ {
        self.adj_matrix[v].iter()
    }

    /// adjacency row of v
    pub(crate) fn adjacency(&self, v:VertexId) -> &BitSet { &self.adj_matrix[v] }

    /// active vertices
    pub(crate) fn active(&self) -> &BitSet { &self.active }

    /// traversal order (may contain inactive vertices, they are skipped by the traversals)
    pub fn order(&self) -> &[VertexId] { &self.order }

    /// active vertices in traversal order
    pub fn vertices(&self) -> Vertices<'_> { Vertices::new(self, None) }

    /// true iff the graph is complete
    pub fn is_clique(&self) -> bool {
        self.n == 0 || self.m == self.n * (self.n - 1) / 2
    }

    /// lowest degree vertex (first one in the traversal order in case of ties)
    pub fn lowest_degree_vertex(&self) -> Option<VertexId> {
        self.vertices().min_by_key(|v| self.degree(*v))
    }

    /// highest degree vertex (first one in the traversal order in case of ties)
    pub fn highest_degree_vertex(&self) -> Option<VertexId> {
        let mut res:Option<(VertexId, usize)> = None;
        for v in self.vertices() {
            let d = self.degree(v);
            if res.map_or(true, |(_,best)| d > best) { res = Some((v,d)); }
        }
        res.map(|(v,_)| v)
    }

    /** replaces the graph by its complement (on the active vertices) */
    pub fn complement(&mut self) {
        for v in 0..self.capacity {
            if !self.active.contains(v) { continue; }
            self.adj_matrix[v].symmetric_difference_with(&self.active);
            self.adj_matrix[v].remove(v);
        }
        self.m = self.n * self.n.saturating_sub(1) / 2 - self.m;
    }

    /**
    recomputes the traversal order: all active vertices sorted by degree.
    Vertices with the same degree keep their id order.
    */
    pub fn sort_by_degree(&mut self, order:DegreeOrder) {
        let mut res:Vec<VertexId> = self.active.iter().collect();
        match order {
            DegreeOrder::Ascending => res.sort_by_key(|v| self.degree(*v)),
            DegreeOrder::Descending => res.sort_by_key(|v| std::cmp::Reverse(self.degree(*v))),
        }
        self.order = res;
    }

    /**
    renumbers the active vertices into a graph of minimal capacity (max(1,n)).
    Labels, edges and the relative traversal order are kept. Any VertexSet
    created before is invalidated.
    Expensive (O(capacity²)): call it after a large reduction of the graph,
    never during the search.
    */
    pub fn shrink(&mut self) {
        let old_capacity = self.capacity;
        let new_capacity = std::cmp::max(1, self.n);
        let mut old_to_new:Vec<Option<VertexId>> = vec![None ; old_capacity];
        let mut next_id = 0;
        for (v, slot) in old_to_new.iter_mut().enumerate() {
            if self.active.contains(v) {
                *slot = Some(next_id);
                next_id += 1;
            }
        }
        assert_eq!(next_id, self.n, "internal consistency error in Graph::shrink");
        let mut adj_matrix = vec![BitSet::with_capacity(new_capacity) ; new_capacity];
        let mut active = BitSet::with_capacity(new_capacity);
        let mut labels = vec![None ; new_capacity];
        self.label_to_vertex.clear();
        for (old, new) in old_to_new.iter().enumerate() {
            let new = match new { Some(x) => *x, None => continue };
            active.insert(new);
            for u in self.adj_matrix[old].iter() {
                if let Some(new_u) = old_to_new[u] { adj_matrix[new].insert(new_u); }
            }
            if let Some(l) = self.labels[old].take() {
                self.label_to_vertex.insert(l.clone(), new);
                labels[new] = Some(l);
            }
        }
        self.order = self.order.iter()
            .filter_map(|v| if self.active.contains(*v) { old_to_new[*v] } else { None })
            .collect();
        self.adj_matrix = adj_matrix;
        self.active = active;
        self.labels = labels;
        self.capacity = new_capacity;
        debug!("graph shrunk: capacity {} -> {}", old_capacity, new_capacity);
    }

    /** logs statistics of the graph */
    pub fn display_statistics(&self) {
        info!("\t{} \t vertices", self.nb_vertices());
        info!("\t{} \t edges", self.nb_edges());
        info!("\t{} \t capacity", self.capacity());
        info!("\t{:.3} \t density", VertexSet::full(self).density(self));
        if let Some(v) = self.lowest_degree_vertex() {
            info!("\t{} \t min degree", self.degree(v));
        }
        if let Some(v) = self.highest_degree_vertex() {
            info!("\t{} \t max degree", self.degree(v));
        }
    }
}


/**
Lazy traversal of the active vertices of a graph in its traversal order,
optionally restricted to a set. Finite; create a new one to restart.
*/
#[derive(Debug, Clone)]
pub struct Vertices<'a> {
    /// graph traversed
    graph: &'a Graph,
    /// if defined, vertices not in this set are skipped
    filter: Option<&'a BitSet>,
    /// next position in the traversal order
    pos: usize,
}

impl<'a> Vertices<'a> {
    pub(crate) fn new(graph:&'a Graph, filter:Option<&'a BitSet>) -> Self {
        Self { graph, filter, pos: 0 }
    }
}

impl<'a> Iterator for Vertices<'a> {
    type Item = VertexId;

    fn next(&mut self) -> Option<VertexId> {
        while self.pos < self.graph.order.len() {
            let v = self.graph.order[self.pos];
            self.pos += 1;
            if !self.graph.active.contains(v) { continue; }
            match self.filter {
                Some(f) if !f.contains(v) => continue,
                _ => return Some(v),
            }
        }
        None
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::random_graph;

    fn path(n:usize) -> Graph {
        let mut g = Graph::new(n);
        for i in 1..n { g.connect(i-1, i); }
        g
    }

    #[test]
    fn test_connect_is_symmetric() {
        let mut g = Graph::new(3);
        g.connect(0, 2);
        g.connect(2, 0);
        g.connect(1, 1);
        assert!(g.are_adjacent(0, 2));
        assert!(g.are_adjacent(2, 0));
        assert!(!g.are_adjacent(1, 1));
        assert_eq!(g.nb_edges(), 1);
        g.disconnect(2, 0);
        assert_eq!(g.nb_edges(), 0);
        assert!(!g.are_adjacent(0, 2));
    }

    #[test]
    fn test_create_vertex_reuses_labels() {
        let mut g = Graph::with_capacity(3);
        let a = g.create_vertex(Some("A"));
        let b = g.create_vertex(Some("B"));
        assert_eq!(g.create_vertex(Some("A")), a);
        assert_ne!(a, b);
        assert_eq!(g.nb_vertices(), 2);
        assert_eq!(g.vertex("B"), Some(b));
        assert_eq!(g.label(a), Some("A"));
    }

    #[test]
    #[should_panic(expected = "capacity exceeded")]
    fn test_create_vertex_over_capacity() {
        let mut g = Graph::with_capacity(1);
        g.create_vertex(Some("A"));
        g.create_vertex(Some("B"));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut g = Graph::with_capacity(4);
        let a = g.create_vertex(Some("a"));
        let b = g.create_vertex(Some("b"));
        let c = g.create_vertex(Some("c"));
        g.connect(a, b);
        g.connect(a, c);
        g.connect(b, c);
        g.remove(a);
        g.remove(a);
        assert_eq!(g.nb_vertices(), 2);
        assert_eq!(g.nb_edges(), 1);
        assert_eq!(g.degree(b), 1);
        assert_eq!(g.vertex("a"), None);
        // the freed slot is reused and traversed once
        let d = g.create_vertex(Some("d"));
        assert_eq!(d, a);
        assert_eq!(g.vertices().filter(|v| *v == d).count(), 1);
    }

    #[test]
    fn test_common_neighbors() {
        let mut g = Graph::new(5);
        for v in 1..4 { g.connect(0, v); }
        g.connect(4, 1);
        g.connect(4, 2);
        assert_eq!(g.common_neighbors(0, 4), 2);
        assert_eq!(g.common_neighbors(1, 2), 2);
        assert_eq!(g.common_neighbors(3, 4), 0);
        g.remove(0);
        assert_eq!(g.common_neighbors(1, 2), 1);
    }

    #[test]
    fn test_clear_keeps_the_capacity() {
        let mut g = Graph::with_capacity(3);
        let a = g.create_vertex(Some("A"));
        let b = g.create_vertex(Some("B"));
        g.connect(a, b);
        g.clear();
        assert_eq!(g.nb_vertices(), 0);
        assert_eq!(g.nb_edges(), 0);
        assert_eq!(g.capacity(), 3);
        assert_eq!(g.vertex("A"), None);
        assert_eq!(g.vertices().count(), 0);
        for l in &["C", "D", "E"] { g.create_vertex(Some(l)); }
        assert_eq!(g.nb_vertices(), 3);
        assert_eq!(g.degree(g.vertex("C").unwrap()), 0);
    }

    #[test]
    fn test_degree_sum_is_twice_the_edges() {
        for seed in 0..10 {
            let mut g = random_graph(30, 0.4, seed);
            g.remove(3);
            g.remove(17);
            let sum:usize = g.vertices().map(|v| g.degree(v)).sum();
            assert_eq!(sum, 2*g.nb_edges());
        }
    }

    #[test]
    fn test_sort_by_degree() {
        let mut g = path(4);
        g.connect(1, 3);
        g.sort_by_degree(DegreeOrder::Ascending);
        assert_eq!(g.vertices().collect::<Vec<_>>(), vec![0, 2, 3, 1]);
        g.sort_by_degree(DegreeOrder::Descending);
        assert_eq!(g.vertices().collect::<Vec<_>>(), vec![1, 2, 3, 0]);
        assert_eq!(g.highest_degree_vertex(), Some(1));
        assert_eq!(g.lowest_degree_vertex(), Some(0));
    }

    #[test]
    fn test_complement() {
        let mut g = path(4);
        g.complement();
        assert_eq!(g.nb_edges(), 3);
        assert!(g.are_adjacent(0, 2));
        assert!(g.are_adjacent(0, 3));
        assert!(g.are_adjacent(1, 3));
        assert!(!g.are_adjacent(0, 1));
        g.complement();
        assert_eq!(g.nb_edges(), 3);
        assert!(g.are_adjacent(0, 1));
    }

    #[test]
    fn test_shrink_keeps_labels_and_edges() {
        let mut g = Graph::with_capacity(6);
        for l in &["a", "b", "c", "d", "e", "f"] { g.create_vertex(Some(l)); }
        g.connect(0, 5);
        g.connect(2, 5);
        g.connect(0, 2);
        g.connect(1, 4);
        g.sort_by_degree(DegreeOrder::Descending);
        g.remove(1);
        g.remove(3);
        g.remove(4);
        g.shrink();
        assert_eq!(g.capacity(), 3);
        assert_eq!(g.nb_vertices(), 3);
        assert_eq!(g.nb_edges(), 3);
        let labels:Vec<String> = g.vertices().map(|v| g.display_label(v)).collect();
        assert_eq!(labels, vec!["a", "c", "f"]);
        let f = g.vertex("f").unwrap();
        assert_eq!(g.degree(f), 2);
        assert!(g.is_clique());
    }

    #[test]
    fn test_shrink_empty_graph() {
        let mut g = Graph::new(3);
        for v in 0..3 { g.remove(v); }
        g.shrink();
        assert_eq!(g.capacity(), 1);
        assert_eq!(g.nb_vertices(), 0);
        assert_eq!(g.vertices().count(), 0);
    }
}
