use crate::game::arena::Key;

/// Storage for a tree vertex.
#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub label: String,
    pub parent: Option<Key>,
    pub children: Vec<Key>,

    // `None` exactly when the node is terminal.
    pub infoset: Option<Key>,
    pub outcome: Option<Key>,

    // Canonical depth-first number; the root is 0.
    pub number: usize,
}

impl NodeData {
    pub fn new(parent: Option<Key>) -> NodeData {
        NodeData {
            label: String::new(),
            parent,
            children: vec![],
            infoset: None,
            outcome: None,
            number: 0,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child_position(&self, child: Key) -> Option<usize> {
        self.children.iter().position(|&c| c == child)
    }
}
