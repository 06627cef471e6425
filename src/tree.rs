//! Search tree with arena allocation.
//!
//! Nodes live in a contiguous `Vec` and refer to each other by [`NodeId`].
//! Each node owns its children through the arena and keeps a plain index
//! back to its parent, so the structure is a strict tree with no reference
//! cycles. The root is always `NodeId(0)`.
//!
//! Utility is stored so that `U / n` of a child reads directly from the
//! perspective of the player choosing among its siblings. Backpropagation
//! negates the value at every ply to keep that true on the way up.

use crate::game::GameState;

/// Index into the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// A node in the search tree.
#[derive(Debug, Clone)]
pub struct TreeNode<A> {
    /// Parent node (`None` for the root)
    pub parent: Option<NodeId>,
    /// Actions legal at this node's state, captured at creation
    pub actions: Vec<A>,
    /// Expanded children in insertion order
    pub children: Vec<(A, NodeId)>,
    /// Number of updates applied to this node
    pub visits: u32,
    /// Accumulated utility
    pub utility: f64,
}

impl<A: Copy + PartialEq> TreeNode<A> {
    fn new(parent: Option<NodeId>, actions: Vec<A>) -> Self {
        Self {
            parent,
            actions,
            children: Vec::new(),
            visits: 0,
            utility: 0.0,
        }
    }

    /// Mean utility `U / n`, or 0.0 if never visited.
    #[inline]
    pub fn mean_value(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.utility / self.visits as f64
        }
    }

    /// Child reached by `action`, if it has been expanded.
    pub fn child(&self, action: A) -> Option<NodeId> {
        self.children
            .iter()
            .find(|(a, _)| *a == action)
            .map(|&(_, id)| id)
    }

    /// Whether every captured action has a child.
    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.children.len() == self.actions.len()
    }
}

/// Upper confidence bound for a node with `visits` updates summing to
/// `utility`, whose parent has `parent_visits` updates.
///
/// `U/n + c * sqrt(ln(N) / n)`. Both visit counts must be at least 1.
#[inline]
pub fn ucb_score(utility: f64, visits: u32, parent_visits: u32, c: f64) -> f64 {
    debug_assert!(visits > 0, "UCB requested for an unvisited node");
    debug_assert!(parent_visits > 0, "UCB requested under an unvisited parent");
    let n = visits as f64;
    utility / n + c * ((parent_visits as f64).ln() / n).sqrt()
}

/// Search tree over actions of type `A`.
#[derive(Debug)]
pub struct Tree<A> {
    nodes: Vec<TreeNode<A>>,
}

impl<A: Copy + PartialEq> Tree<A> {
    /// Create a tree holding only a root for `state`.
    pub fn new<G>(state: &G) -> Self
    where
        G: GameState<Action = A>,
    {
        Self::with_root_actions(state.legal_actions())
    }

    /// Create a tree whose root captured the given actions.
    pub fn with_root_actions(actions: Vec<A>) -> Self {
        Self {
            nodes: vec![TreeNode::new(None, actions)],
        }
    }

    /// Root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Get a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &TreeNode<A> {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut TreeNode<A> {
        &mut self.nodes[id.0 as usize]
    }

    /// Number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Attach a child under `parent` for `action`, with the given action
    /// snapshot.
    ///
    /// # Panics
    ///
    /// If `action` already has a child under `parent`.
    pub fn add_child(&mut self, parent: NodeId, action: A, actions: Vec<A>) -> NodeId {
        assert!(
            self.get(parent).child(action).is_none(),
            "action expanded twice under the same node"
        );
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(TreeNode::new(Some(parent), actions));
        self.get_mut(parent).children.push((action, id));
        id
    }

    /// Create the child reached from `parent` by `action`, whose state is
    /// `next_state`.
    pub fn expand<G>(&mut self, parent: NodeId, action: A, next_state: &G) -> NodeId
    where
        G: GameState<Action = A>,
    {
        self.add_child(parent, action, next_state.legal_actions())
    }

    /// UCB of `id` from its parent's perspective.
    pub fn ucb(&self, id: NodeId, c: f64) -> f64 {
        let node = self.get(id);
        let parent_visits = node.parent.map_or(node.visits, |p| self.get(p).visits);
        ucb_score(node.utility, node.visits, parent_visits, c)
    }

    /// Child of `id` with the highest UCB. Ties go to the earliest expanded
    /// child.
    pub fn select(&self, id: NodeId, c: f64) -> Option<(A, NodeId)> {
        let mut best: Option<(A, NodeId, f64)> = None;
        for &(action, child) in &self.get(id).children {
            let score = self.ucb(child, c);
            if best.is_none_or(|(_, _, top)| score > top) {
                best = Some((action, child, score));
            }
        }
        best.map(|(action, child, _)| (action, child))
    }

    /// Record one update on a single node.
    #[inline]
    pub fn update(&mut self, id: NodeId, leaf_value: f64) {
        let node = self.get_mut(id);
        node.visits += 1;
        node.utility += leaf_value;
    }

    /// Update `id` and all its ancestors, negating the value at each ply.
    pub fn update_recursive(&mut self, id: NodeId, leaf_value: f64) {
        let mut current = Some(id);
        let mut value = leaf_value;
        while let Some(node_id) = current {
            self.update(node_id, value);
            value = -value;
            current = self.get(node_id).parent;
        }
    }

    /// Captured actions of `id` that have no child yet, in capture order.
    pub fn unexpanded_actions(&self, id: NodeId) -> Vec<A> {
        let node = self.get(id);
        node.actions
            .iter()
            .copied()
            .filter(|&a| node.child(a).is_none())
            .collect()
    }

    /// Action of the most visited root child. Ties go to the earliest
    /// expanded child.
    pub fn best_action(&self) -> Option<A> {
        let mut best: Option<(A, u32)> = None;
        for &(action, child) in &self.get(self.root()).children {
            let visits = self.get(child).visits;
            if best.is_none_or(|(_, top)| visits > top) {
                best = Some((action, visits));
            }
        }
        best.map(|(action, _)| action)
    }

    /// Visit and value summary of every root child.
    pub fn root_children(&self) -> Vec<ChildSummary<A>> {
        self.get(self.root())
            .children
            .iter()
            .map(|&(action, id)| {
                let node = self.get(id);
                ChildSummary {
                    action,
                    visits: node.visits,
                    mean_value: node.mean_value(),
                }
            })
            .collect()
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root());
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visits,
            max_depth: self.compute_max_depth(self.root(), 0),
        }
    }

    fn compute_max_depth(&self, id: NodeId, depth: u32) -> u32 {
        self.get(id)
            .children
            .iter()
            .map(|&(_, child)| self.compute_max_depth(child, depth + 1))
            .max()
            .unwrap_or(depth)
    }
}

/// Statistics of one root child.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildSummary<A> {
    pub action: A,
    pub visits: u32,
    pub mean_value: f64,
}

/// Statistics about a search tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub max_depth: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tree() {
        let tree = Tree::with_root_actions(vec![0u8, 1, 2]);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root(), NodeId(0));
        let root = tree.get(tree.root());
        assert!(root.parent.is_none());
        assert_eq!(root.visits, 0);
        assert_eq!(tree.unexpanded_actions(tree.root()), vec![0, 1, 2]);
    }

    #[test]
    fn test_add_child() {
        let mut tree = Tree::with_root_actions(vec![0u8, 1, 2]);
        let child = tree.add_child(tree.root(), 1, vec![0, 2]);

        assert_eq!(child, NodeId(1));
        assert_eq!(tree.get(child).parent, Some(tree.root()));
        assert_eq!(tree.get(tree.root()).child(1), Some(child));
        assert_eq!(tree.unexpanded_actions(tree.root()), vec![0, 2]);
    }

    #[test]
    #[should_panic(expected = "expanded twice")]
    fn test_add_child_twice_panics() {
        let mut tree = Tree::with_root_actions(vec![0u8, 1]);
        tree.add_child(tree.root(), 1, vec![]);
        tree.add_child(tree.root(), 1, vec![]);
    }

    #[test]
    fn test_update_recursive_alternates_sign() {
        let mut tree = Tree::with_root_actions(vec![0u8]);
        let child = tree.add_child(tree.root(), 0, vec![0]);
        let grandchild = tree.add_child(child, 0, vec![]);

        tree.update_recursive(grandchild, 1.0);

        assert_eq!(tree.get(grandchild).visits, 1);
        assert_eq!(tree.get(child).visits, 1);
        assert_eq!(tree.get(tree.root()).visits, 1);
        assert!((tree.get(grandchild).utility - 1.0).abs() < 1e-12);
        assert!((tree.get(child).utility + 1.0).abs() < 1e-12);
        assert!((tree.get(tree.root()).utility - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ucb_formula() {
        // 0.5 + 2 * sqrt(ln(100) / 10)
        let expected = 0.5 + 2.0 * (100f64.ln() / 10.0).sqrt();
        assert!((ucb_score(5.0, 10, 100, 2.0) - expected).abs() < 1e-12);
        // ln(1) = 0: no exploration bonus
        assert!((ucb_score(3.0, 4, 1, 10.0) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_select_prefers_higher_ucb() {
        let mut tree = Tree::with_root_actions(vec![0u8, 1]);
        let a = tree.add_child(tree.root(), 0, vec![]);
        let b = tree.add_child(tree.root(), 1, vec![]);
        tree.update_recursive(a, -1.0);
        tree.update_recursive(b, 1.0);

        assert_eq!(tree.select(tree.root(), 0.0), Some((1, b)));
    }

    #[test]
    fn test_select_tie_goes_to_first_child() {
        let mut tree = Tree::with_root_actions(vec![3u8, 1, 2]);
        for action in [3u8, 1, 2] {
            let id = tree.add_child(tree.root(), action, vec![]);
            tree.update_recursive(id, 0.5);
        }
        let (action, _) = tree.select(tree.root(), 1.0).unwrap();
        assert_eq!(action, 3);
    }

    #[test]
    fn test_best_action_by_visits() {
        let mut tree = Tree::with_root_actions(vec![0u8, 1, 2]);
        for (action, visits, utility) in [(0u8, 5, 4.0), (1, 10, -3.0), (2, 3, 3.0)] {
            let id = tree.add_child(tree.root(), action, vec![]);
            let node = tree.get_mut(id);
            node.visits = visits;
            node.utility = utility;
        }
        assert_eq!(tree.best_action(), Some(1));
    }

    #[test]
    fn test_best_action_empty_root() {
        let tree: Tree<u8> = Tree::with_root_actions(vec![]);
        assert_eq!(tree.best_action(), None);
    }

    #[test]
    fn test_tree_stats() {
        let mut tree = Tree::with_root_actions(vec![0u8, 1]);
        let child = tree.add_child(tree.root(), 0, vec![0]);
        tree.add_child(child, 0, vec![]);
        tree.update_recursive(child, 1.0);

        let stats = tree.stats();
        assert_eq!(stats.total_nodes, 3);
        assert_eq!(stats.root_visits, 1);
        assert_eq!(stats.max_depth, 2);
    }
}
