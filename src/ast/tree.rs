use crate::ast::nodes::NodeKind;

/// Index handle into a [`PatternTree`]. Cheap to copy and only meaningful
/// for the tree that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Flat arena holding every node of a parsed pattern.
///
/// Nodes live in a single vector and refer to each other by [`NodeId`], so
/// the whole tree is freed at once and child lists stay in written order.
/// The root is always an `Expression` created by [`PatternTree::new`].
///
/// # Examples
///
/// ```
/// use lexidec::ast::{NodeKind, PatternTree};
///
/// let mut tree = PatternTree::new();
/// let digit = tree.push_detached(NodeKind::SingleChar('7'));
/// tree.attach(tree.root(), digit);
///
/// assert_eq!(tree.children(tree.root()), &[digit]);
/// assert_eq!(tree.parent(digit), Some(tree.root()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternTree {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl PatternTree {
    /// Creates a tree containing only the root `Expression` node.
    pub fn new() -> Self {
        let root = NodeData {
            kind: NodeKind::Expression,
            parent: None,
            children: Vec::new(),
        };
        PatternTree {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Allocates a node without a parent. The node is invisible to
    /// traversals until [`attach`](PatternTree::attach) links it in.
    pub fn push_detached(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Appends `child` to the end of `parent`'s child list.
    ///
    /// The child must be detached; nodes are attached exactly once.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(self.nodes[child.0].parent.is_none());
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Sibling immediately before `id` under the same parent, if any.
    /// A `Repetition` node's previous sibling is the node it repeats.
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|s| *s == id)?;
        if pos == 0 { None } else { Some(siblings[pos - 1]) }
    }

    /// Total number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl Default for PatternTree {
    fn default() -> Self {
        Self::new()
    }
}
