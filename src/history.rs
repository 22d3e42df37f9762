//! Undo/redo over full graph snapshots.

use crate::graph::{Edge, Node};

/// An independent full copy of `(nodes, edges)`. Snapshots own all their
/// storage; pushing one never aliases the live graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Snapshot {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }
}

/// Three-slot history: a past stack, the present snapshot, and a future
/// stack consumed by redo.
#[derive(Debug, Default)]
pub struct History {
    past: Vec<Snapshot>,
    present: Option<Snapshot>,
    future: Vec<Snapshot>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a new present snapshot. Any existing present moves to the
    /// past and the redo stack is cleared.
    pub fn push(&mut self, nodes: &[Node], edges: &[Edge]) {
        let snapshot = Snapshot::new(nodes.to_vec(), edges.to_vec());
        if let Some(present) = self.present.take() {
            self.past.push(present);
            self.future.clear();
        }
        self.present = Some(snapshot);
    }

    /// Steps back one snapshot; a no-op returning `None` when the past is
    /// empty.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        let previous = self.past.pop()?;
        if let Some(present) = self.present.replace(previous) {
            self.future.push(present);
        }
        self.present.as_ref()
    }

    /// Steps forward one snapshot; a no-op returning `None` when the future
    /// is empty.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        let next = self.future.pop()?;
        if let Some(present) = self.present.replace(next) {
            self.past.push(present);
        }
        self.present.as_ref()
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn present(&self) -> Option<&Snapshot> {
        self.present.as_ref()
    }

    pub fn reset(&mut self) {
        self.past.clear();
        self.present = None;
        self.future.clear();
    }
}
