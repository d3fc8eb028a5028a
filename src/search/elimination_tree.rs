use std::collections::BTreeMap;

use crate::graph::VertexId;

/** node index in an elimination tree */
pub type NodeId = usize;

/// node of the elimination tree: its children, by vertex
#[derive(Debug, Clone, Default)]
struct Node {
    children: BTreeMap<VertexId, NodeId>,
}

/**
Records the vertices eliminated during a preprocessing sweep.

The children of a node are the vertices eliminated within the subgraph
of that node's vertex. A leaf child c of node x means "c cannot be in a
target clique together with x", hence the edge (x,c) is irrelevant.

Nodes live in an arena. Deleted nodes stay there until the next `clear`.
*/
#[derive(Debug, Clone)]
pub struct EliminationTree {
    nodes: Vec<Node>,
}

impl Default for EliminationTree {
    fn default() -> Self { Self::new() }
}

impl EliminationTree {
    /// root of the tree
    pub const ROOT:NodeId = 0;

    /** creates a tree with only a root */
    pub fn new() -> Self {
        Self { nodes: vec![Node::default()] }
    }

    /** removes every node except the root */
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[Self::ROOT].children.clear();
    }

    /** adds (or replaces) the child of node for vertex v and returns it */
    pub fn add_child(&mut self, node:NodeId, v:VertexId) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node::default());
        self.nodes[node].children.insert(v, id);
        id
    }

    /// detaches the child of node for vertex v (and its subtree)
    pub fn delete_child(&mut self, node:NodeId, v:VertexId) {
        self.nodes[node].children.remove(&v);
    }

    /// detaches every child of node
    pub fn delete_all_children(&mut self, node:NodeId) {
        self.nodes[node].children.clear();
    }

    /// number of children of node
    pub fn nb_children(&self, node:NodeId) -> usize { self.nodes[node].children.len() }

    /// children of node as (vertex, node) pairs, by increasing vertex
    pub fn children(&self, node:NodeId) -> impl Iterator<Item=(VertexId, NodeId)> + '_ {
        self.nodes[node].children.iter().map(|(v,c)| (*v, *c))
    }

    /// vertices of the children of node that have no children themselves
    pub fn leaf_children(&self, node:NodeId) -> Vec<VertexId> {
        self.children(node)
            .filter(|(_,c)| self.nb_children(*c) == 0)
            .map(|(v,_)| v)
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_delete() {
        let mut t = EliminationTree::new();
        let a = t.add_child(EliminationTree::ROOT, 4);
        let b = t.add_child(EliminationTree::ROOT, 2);
        t.add_child(a, 7);
        assert_eq!(t.nb_children(EliminationTree::ROOT), 2);
        assert_eq!(t.children(EliminationTree::ROOT).collect::<Vec<_>>(), vec![(2, b), (4, a)]);
        assert_eq!(t.leaf_children(EliminationTree::ROOT), vec![2]);
        t.delete_child(EliminationTree::ROOT, 2);
        assert_eq!(t.nb_children(EliminationTree::ROOT), 1);
        t.delete_all_children(a);
        assert_eq!(t.leaf_children(EliminationTree::ROOT), vec![4]);
    }

    #[test]
    fn test_add_replaces_child() {
        let mut t = EliminationTree::new();
        let a = t.add_child(EliminationTree::ROOT, 1);
        t.add_child(a, 3);
        let b = t.add_child(EliminationTree::ROOT, 1);
        assert_ne!(a, b);
        assert_eq!(t.nb_children(EliminationTree::ROOT), 1);
        assert_eq!(t.nb_children(b), 0);
        t.clear();
        assert_eq!(t.nb_children(EliminationTree::ROOT), 0);
    }
}
