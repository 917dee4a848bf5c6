//! Path tree built during one search.
//!
//! Each discovered line becomes a node holding the index of the node it was
//! reached from. Nodes live in one flat vector and are dropped with the
//! tree once the answer has been read off.

use serde::Serialize;

use crate::domain::{LineName, StopName};

/// One line of a journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathStep {
    /// The line ridden.
    pub line: LineName,
    /// Where the line is boarded: the origin for the first step, otherwise
    /// the transfer stop.
    pub boarded_at: StopName,
    /// The line ridden before this one. `None` for the first step.
    pub transferred_from: Option<LineName>,
}

/// Handle to a node in a [`PathTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Node {
    line: LineName,
    boarded_at: StopName,
    parent: Option<NodeId>,
}

/// Arena of search nodes linked to their parents.
#[derive(Debug, Default)]
pub struct PathTree {
    nodes: Vec<Node>,
}

impl PathTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a starting line boarded at the origin.
    pub fn push_root(&mut self, line: LineName, boarded_at: StopName) -> NodeId {
        self.push(line, boarded_at, None)
    }

    /// Add a line reached from `parent` by changing at `boarded_at`.
    pub fn push_child(&mut self, parent: NodeId, line: LineName, boarded_at: StopName) -> NodeId {
        self.push(line, boarded_at, Some(parent))
    }

    fn push(&mut self, line: LineName, boarded_at: StopName, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            line,
            boarded_at,
            parent,
        });
        id
    }

    /// The line at a node.
    pub fn line(&self, id: NodeId) -> &LineName {
        &self.nodes[id.0].line
    }

    /// Number of nodes created.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Steps from the root down to `id`, in travel order.
    pub fn path_to(&self, id: NodeId) -> Vec<PathStep> {
        let mut chain = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = &self.nodes[current.0];
            chain.push(node);
            cursor = node.parent;
        }
        chain.reverse();

        chain
            .iter()
            .map(|node| PathStep {
                line: node.line.clone(),
                boarded_at: node.boarded_at.clone(),
                transferred_from: node.parent.map(|p| self.line(p).clone()),
            })
            .collect()
    }
}
