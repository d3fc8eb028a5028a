use std::cell::Cell;
use std::fmt;

use bit_set::BitSet;

use crate::error::CliqueError;
use crate::graph::{Graph, VertexId, Vertices};

/// number of bits in a packed word
pub const WORD_BITS:usize = 32;

/**
Set of vertices of a graph (a selection, not a graph).

The induced subgraph of the set is read through the owning graph, which is
passed to every operation that needs edges. A set keeps the capacity of its
graph so that operations mixing sets of different graphs are detected.
The size is memoized and invalidated by every mutation.
*/
#[derive(Clone)]
pub struct VertexSet {
    /// capacity of the graph the set belongs to
    capacity: usize,
    /// members of the set
    bits: BitSet,
    /// memoized size
    size: Cell<Option<usize>>,
}

impl VertexSet {

    /** creates an empty set for graph g */
    pub fn new(g:&Graph) -> Self { Self::with_capacity(g.capacity()) }

    /** creates an empty set over vertex ids 0..capacity */
    pub fn with_capacity(capacity:usize) -> Self {
        Self { capacity, bits: BitSet::with_capacity(capacity), size: Cell::new(Some(0)) }
    }

    /** creates the set of all active vertices of g */
    pub fn full(g:&Graph) -> Self {
        let mut res = Self::new(g);
        res.fill(g);
        res
    }

    /** creates a set from a list of vertices */
    pub fn from_vertices<I:IntoIterator<Item=VertexId>>(g:&Graph, vertices:I) -> Self {
        let mut res = Self::new(g);
        for v in vertices { res.insert(v); }
        res
    }

    /** creates a set from its packed representation (see [`VertexSet::pack`]) */
    pub fn from_packed(capacity:usize, words:&[u32]) -> Result<Self, CliqueError> {
        let mut res = Self::with_capacity(capacity);
        res.unpack(words)?;
        Ok(res)
    }

    #[inline]
    fn touch(&mut self) { self.size.set(None); }

    fn check_capacity(&self, other:&VertexSet) {
        assert_eq!(
            self.capacity, other.capacity,
            "vertex set operation between sets of different capacities"
        );
    }

    /// capacity of the graph the set belongs to
    pub fn capacity(&self) -> usize { self.capacity }

    /// removes all vertices
    pub fn clear(&mut self) {
        self.bits.clear();
        self.size.set(Some(0));
    }

    /// set becomes the set of all active vertices of g
    pub fn fill(&mut self, g:&Graph) {
        self.bits.clone_from(g.active());
        self.touch();
    }

    /// set becomes the active vertices of g not in the set
    pub fn complement(&mut self, g:&Graph) {
        self.bits.symmetric_difference_with(g.active());
        self.bits.intersect_with(g.active());
        self.touch();
    }

    /// inserts v
    pub fn insert(&mut self, v:VertexId) {
        debug_assert!(v < self.capacity, "vertex {} out of range ({})", v, self.capacity);
        if self.bits.insert(v) { self.touch(); }
    }

    /// removes v
    pub fn remove(&mut self, v:VertexId) {
        if self.bits.remove(v) { self.touch(); }
    }

    /// true iff v is in the set
    pub fn contains(&self, v:VertexId) -> bool { self.bits.contains(v) }

    /// inserts all the vertices of other
    pub fn insert_set(&mut self, other:&VertexSet) {
        self.check_capacity(other);
        self.bits.union_with(&other.bits);
        self.touch();
    }

    /// removes all the vertices of other
    pub fn remove_set(&mut self, other:&VertexSet) {
        self.check_capacity(other);
        self.bits.difference_with(&other.bits);
        self.touch();
    }

    /// keeps only the vertices that are also in other
    pub fn retain_set(&mut self, other:&VertexSet) {
        self.check_capacity(other);
        self.bits.intersect_with(&other.bits);
        self.touch();
    }

    /// union of two sets
    pub fn union(&self, other:&VertexSet) -> VertexSet {
        let mut res = self.clone();
        res.insert_set(other);
        res
    }

    /// intersection of two sets
    pub fn intersection(&self, other:&VertexSet) -> VertexSet {
        let mut res = self.clone();
        res.retain_set(other);
        res
    }

    /// inserts the neighbors of v
    pub fn insert_neighbors(&mut self, g:&Graph, v:VertexId) {
        self.bits.union_with(g.adjacency(v));
        self.touch();
    }

    /// removes the neighbors of v
    pub fn remove_neighbors(&mut self, g:&Graph, v:VertexId) {
        self.bits.difference_with(g.adjacency(v));
        self.touch();
    }

    /// inserts the active vertices that are not adjacent to v (v excluded)
    pub fn insert_non_neighbors(&mut self, g:&Graph, v:VertexId) {
        let mut non_neighbors = g.active().clone();
        non_neighbors.difference_with(g.adjacency(v));
        non_neighbors.remove(v);
        self.bits.union_with(&non_neighbors);
        self.touch();
    }

    /// keeps only the neighbors of v (v itself is removed)
    pub fn remove_non_neighbors(&mut self, g:&Graph, v:VertexId) {
        self.bits.intersect_with(g.adjacency(v));
        self.touch();
    }

    /// number of vertices in the set
    pub fn len(&self) -> usize {
        match self.size.get() {
            Some(s) => s,
            None => {
                let s = self.bits.len();
                self.size.set(Some(s));
                s
            }
        }
    }

    /// true iff the set is empty
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// number of neighbors of v inside the set
    pub fn degree(&self, g:&Graph, v:VertexId) -> usize {
        g.adjacency(v).intersection(&self.bits).count()
    }

    /// number of common neighbors of a and b inside the set
    pub fn common_neighbors(&self, g:&Graph, a:VertexId, b:VertexId) -> usize {
        g.adjacency(a).intersection(g.adjacency(b))
            .filter(|v| self.bits.contains(*v))
            .count()
    }

    /// number of vertices in both sets
    pub fn overlap(&self, other:&VertexSet) -> usize {
        self.check_capacity(other);
        self.bits.intersection(&other.bits).count()
    }

    /// number of edges of the induced subgraph
    pub fn nb_edges(&self, g:&Graph) -> usize {
        self.bits.iter().map(|v| self.degree(g, v)).sum::<usize>() / 2
    }

    /// edge density of the induced subgraph (0 if less than 2 vertices)
    pub fn density(&self, g:&Graph) -> f64 {
        let n = self.len();
        if n < 2 { return 0.; }
        self.nb_edges(g) as f64 / (n * (n-1) / 2) as f64
    }

    /// true iff the induced subgraph is complete
    pub fn is_clique(&self, g:&Graph) -> bool {
        let n = self.len();
        self.bits.iter().all(|v| self.degree(g, v) + 1 >= n)
    }

    /// lowest degree vertex of the induced subgraph (first in traversal order on ties)
    pub fn lowest_degree_vertex(&self, g:&Graph) -> Option<VertexId> {
        self.iter(g).min_by_key(|v| self.degree(g, *v))
    }

    /// highest degree vertex of the induced subgraph (first in traversal order on ties)
    pub fn highest_degree_vertex(&self, g:&Graph) -> Option<VertexId> {
        let mut res:Option<(VertexId, usize)> = None;
        for v in self.iter(g) {
            let d = self.degree(g, v);
            if res.map_or(true, |(_,best)| d > best) { res = Some((v,d)); }
        }
        res.map(|(v,_)| v)
    }

    /// members of the set that are active in g, in the traversal order of g
    pub fn iter<'a>(&'a self, g:&'a Graph) -> Vertices<'a> {
        Vertices::new(g, Some(&self.bits))
    }

    /// members of the set by increasing id
    pub fn ids(&self) -> impl Iterator<Item=VertexId> + '_ { self.bits.iter() }

    /// members of the set in traversal order
    pub fn to_vec(&self, g:&Graph) -> Vec<VertexId> { self.iter(g).collect() }

    /// labels of the members (ids for unlabeled vertices), in traversal order
    pub fn labels(&self, g:&Graph) -> Vec<String> {
        self.iter(g).map(|v| g.display_label(v)).collect()
    }

    /// number of words in the packed representation of a set of this capacity
    pub fn pack_size(capacity:usize) -> usize {
        (capacity + WORD_BITS - 1) / WORD_BITS
    }

    /**
    packs the set in an array of words. Vertex i is bit (31 - i%32) of word
    i/32 (most significant bit first). Unused trailing bits are 0.
    */
    pub fn pack(&self) -> Vec<u32> {
        let mut res = vec![0u32 ; Self::pack_size(self.capacity)];
        for v in self.bits.iter() {
            if v >= self.capacity { break; }
            res[v / WORD_BITS] |= 1u32 << (WORD_BITS - 1 - v % WORD_BITS);
        }
        res
    }

    /** replaces the content of the set by a packed set (see [`VertexSet::pack`]) */
    pub fn unpack(&mut self, words:&[u32]) -> Result<(), CliqueError> {
        let expected = Self::pack_size(self.capacity);
        if words.len() < expected {
            return Err(CliqueError::PacketTooShort { expected, found: words.len() });
        }
        self.clear();
        for v in 0..self.capacity {
            if words[v / WORD_BITS] & (1u32 << (WORD_BITS - 1 - v % WORD_BITS)) != 0 {
                self.bits.insert(v);
            }
        }
        self.touch();
        Ok(())
    }
}

impl PartialEq for VertexSet {
    fn eq(&self, other:&Self) -> bool {
        self.capacity == other.capacity && self.bits.iter().eq(other.bits.iter())
    }
}

impl Eq for VertexSet {}

impl fmt::Debug for VertexSet {
    fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.bits.iter()).finish()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::random_graph;

    fn random_subset(g:&Graph, seed:u64) -> VertexSet {
        let rng = fastrand::Rng::with_seed(seed);
        VertexSet::from_vertices(g, g.vertices().filter(|_| rng.bool()))
    }

    #[test]
    fn test_union_size() {
        let g = random_graph(70, 0.3, 1);
        for seed in 0..20 {
            let a = random_subset(&g, 2*seed);
            let b = random_subset(&g, 2*seed+1);
            assert_eq!(
                a.union(&b).len(),
                a.len() + b.len() - a.intersection(&b).len()
            );
            assert_eq!(a.overlap(&b), a.intersection(&b).len());
        }
    }

    #[test]
    fn test_complement_twice() {
        let mut g = random_graph(40, 0.5, 3);
        g.remove(5);
        let s = random_subset(&g, 4);
        let mut c = s.clone();
        c.complement(&g);
        assert_eq!(c.len() + s.len(), g.nb_vertices());
        assert!(!c.contains(5));
        c.complement(&g);
        assert_eq!(c, s);
    }

    #[test]
    fn test_pack_unpack() {
        for (n, seed) in &[(1, 0), (31, 1), (32, 2), (33, 3), (100, 4)] {
            let g = random_graph(*n, 0.5, *seed);
            let s = random_subset(&g, *seed);
            let words = s.pack();
            assert_eq!(words.len(), VertexSet::pack_size(*n));
            assert_eq!(VertexSet::from_packed(*n, &words).unwrap(), s);
        }
    }

    #[test]
    fn test_pack_is_msb_first() {
        let g = Graph::new(40);
        let s = VertexSet::from_vertices(&g, vec![0, 1, 33]);
        assert_eq!(s.pack(), vec![0xC000_0000, 0x4000_0000]);
    }

    #[test]
    fn test_unpack_short_packet() {
        let mut s = VertexSet::with_capacity(64);
        assert!(s.unpack(&[0]).is_err());
    }

    #[test]
    fn test_neighbor_operations() {
        let mut g = Graph::new(5);
        g.connect(0, 1);
        g.connect(0, 2);
        g.connect(1, 2);
        let mut s = VertexSet::full(&g);
        s.remove_non_neighbors(&g, 0);
        assert_eq!(s.ids().collect::<Vec<_>>(), vec![1, 2]);
        s.insert_non_neighbors(&g, 0);
        assert_eq!(s.ids().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        s.remove_neighbors(&g, 0);
        assert_eq!(s.ids().collect::<Vec<_>>(), vec![3, 4]);
        s.insert_neighbors(&g, 2);
        assert_eq!(s.len(), 4);
        assert_eq!(s.degree(&g, 0), 1);
        assert_eq!(s.common_neighbors(&g, 1, 2), 1);
        assert_eq!(VertexSet::from_vertices(&g, vec![1, 2]).common_neighbors(&g, 1, 2), 0);
    }

    #[test]
    fn test_is_clique() {
        let mut g = Graph::new(4);
        g.connect(0, 1);
        g.connect(0, 2);
        g.connect(1, 2);
        g.connect(2, 3);
        assert!(VertexSet::from_vertices(&g, vec![0, 1, 2]).is_clique(&g));
        assert!(!VertexSet::from_vertices(&g, vec![0, 1, 3]).is_clique(&g));
        assert!(VertexSet::new(&g).is_clique(&g));
        assert_eq!(VertexSet::full(&g).nb_edges(&g), 4);
    }

    #[test]
    fn test_density() {
        let mut g = Graph::new(4);
        g.connect(0, 1);
        g.connect(0, 2);
        g.connect(1, 2);
        assert_eq!(VertexSet::from_vertices(&g, vec![0, 1, 2]).density(&g), 1.);
        assert_eq!(VertexSet::full(&g).density(&g), 0.5);
        assert_eq!(VertexSet::from_vertices(&g, vec![3]).density(&g), 0.);
        assert_eq!(VertexSet::new(&g).density(&g), 0.);
    }

    #[test]
    fn test_traversal_follows_graph_order() {
        let mut g = Graph::new(4);
        g.connect(0, 3);
        g.connect(1, 3);
        g.sort_by_degree(crate::graph::DegreeOrder::Descending);
        let s = VertexSet::from_vertices(&g, vec![0, 2, 3]);
        assert_eq!(s.to_vec(&g), vec![3, 0, 2]);
        // restartable
        assert_eq!(s.iter(&g).count(), s.iter(&g).count());
        g.remove(0);
        assert_eq!(s.to_vec(&g), vec![3, 2]);
    }

    #[test]
    fn test_size_is_invalidated() {
        let g = Graph::new(10);
        let mut s = VertexSet::from_vertices(&g, 0..5);
        assert_eq!(s.len(), 5);
        s.remove(0);
        assert_eq!(s.len(), 4);
        s.fill(&g);
        assert_eq!(s.len(), 10);
        s.clear();
        assert!(s.is_empty());
    }

    #[test]
    #[should_panic(expected = "different capacities")]
    fn test_capacity_mismatch() {
        let mut a = VertexSet::with_capacity(3);
        let b = VertexSet::with_capacity(4);
        a.insert_set(&b);
    }
}
