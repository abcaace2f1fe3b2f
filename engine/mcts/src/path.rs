//! Root-to-leaf path walked by a single search iteration.
//!
//! Board states along the path are stored in a contiguous arena and referenced by
//! [`NodeId`]. Each node caches its canonical key so backpropagation never has to
//! re-encode a board.

use engine_core::Game;

/// Index into the path arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// A position visited during one iteration.
#[derive(Debug, Clone)]
pub struct PathNode<G: Game> {
    pub state: G,
    pub key: G::Key,
}

impl<G: Game> PathNode<G> {
    pub fn new(state: G) -> Self {
        let key = state.canonical_key();
        Self { state, key }
    }

    /// Whether the player who moved into this position is the first player.
    #[inline]
    pub fn moved_by_first_player(&self) -> bool {
        !self.state.to_move().is_first()
    }
}

/// Arena of path nodes, root at index 0.
#[derive(Debug)]
pub struct SearchPath<G: Game> {
    nodes: Vec<PathNode<G>>,
}

impl<G: Game> SearchPath<G> {
    pub fn new(root: G) -> Self {
        Self {
            nodes: vec![PathNode::new(root)],
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &PathNode<G> {
        &self.nodes[id.0 as usize]
    }

    /// The deepest node so far.
    #[inline]
    pub fn leaf(&self) -> &PathNode<G> {
        &self.nodes[self.nodes.len() - 1]
    }

    /// Append a child of the current leaf and return its ID.
    pub fn push(&mut self, node: PathNode<G>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Remove the leaf, returning it along with the depth it sat at (root = 0).
    pub fn pop(&mut self) -> Option<(usize, PathNode<G>)> {
        let node = self.nodes.pop()?;
        Some((self.nodes.len(), node))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
