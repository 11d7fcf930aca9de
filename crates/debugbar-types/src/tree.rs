use serde::Serialize;

use crate::SnapshotRecord;

/// A request together with the requests inferred to have been caused by it.
#[derive(Debug, Clone, Serialize)]
pub struct RequestNode {
    #[serde(flatten)]
    pub record: SnapshotRecord,
    pub children: Vec<RequestNode>,
}

impl RequestNode {
    pub fn leaf(record: SnapshotRecord) -> Self {
        Self {
            record,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_size(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(RequestNode::subtree_size)
            .sum::<usize>()
    }

    /// Depth-first pre-order walk.
    pub fn walk(&self, visit: &mut impl FnMut(&RequestNode, usize)) {
        self.walk_at(0, visit);
    }

    fn walk_at(&self, depth: usize, visit: &mut impl FnMut(&RequestNode, usize)) {
        visit(self, depth);
        for child in &self.children {
            child.walk_at(depth + 1, visit);
        }
    }
}
