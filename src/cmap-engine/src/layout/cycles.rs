// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Heuristic cycle breaking ahead of layout.
//!
//! Every node, in insertion order, serves as a traversal root unless an
//! earlier root already reached it. The traversal follows outgoing and then
//! incoming edges, and each candidate edge is classified against the
//! ordered set of visited nodes:
//!
//! 1. closing back onto the root, once the root's own traversal has visited
//!    a second node, from anywhere but the root's first visited neighbor
//!    removes the edge;
//! 2. reaching a visited node at least [`LONG_RANGE_DISTANCE`] entries back
//!    in visit order removes the edge;
//! 3. reaching a visited node closer than that skips the edge;
//! 4. anything else descends into the unvisited node.
//!
//! This over-approximates a minimum feedback edge set and depends on
//! enumeration order, which the graph keeps stable.

use tracing::debug;

use super::graph::{EdgeIndex, Graph, NodeIndex};

/// Visit-order distance at which revisiting a node counts as a cycle.
pub const LONG_RANGE_DISTANCE: usize = 4;

#[derive(Debug, PartialEq, Eq)]
enum Step {
    Remove,
    Skip,
    Descend,
}

/// Visited nodes and edge marks for one pass over the graph.
struct BreakState {
    visited: Vec<NodeIndex>,
    visit_order: Vec<Option<usize>>,
    examined: Vec<bool>,
    removed: Vec<bool>,
}

impl BreakState {
    fn new(graph: &Graph) -> Self {
        Self {
            visited: Vec::with_capacity(graph.node_count()),
            visit_order: vec![None; graph.node_count()],
            examined: vec![false; graph.edge_count()],
            removed: vec![false; graph.edge_count()],
        }
    }

    fn visit(&mut self, node: NodeIndex) {
        let slot = &mut self.visit_order[node.index()];
        if slot.is_none() {
            *slot = Some(self.visited.len());
            self.visited.push(node);
        }
    }

    fn is_visited(&self, node: NodeIndex) -> bool {
        self.visit_order[node.index()].is_some()
    }

    /// The node visited right after `root`, i.e. the first hop taken from it.
    fn first_hop_from(&self, root: NodeIndex) -> Option<NodeIndex> {
        let pos = self.visit_order[root.index()]?;
        self.visited.get(pos + 1).copied()
    }

    /// Nodes visited since `root` was entered, counting the root itself.
    fn visited_since(&self, root: NodeIndex) -> usize {
        self.visit_order[root.index()].map_or(0, |pos| self.visited.len() - pos)
    }

    fn classify(&self, root: NodeIndex, current: NodeIndex, next: NodeIndex) -> Step {
        let len = self.visited.len();
        if next == root
            && self.visited_since(root) >= 2
            && self.first_hop_from(root) != Some(current)
        {
            return Step::Remove;
        }
        match self.visit_order[next.index()] {
            Some(pos) if len - pos >= LONG_RANGE_DISTANCE => Step::Remove,
            Some(_) => Step::Skip,
            None => Step::Descend,
        }
    }

    fn removed_edges(&self) -> Vec<EdgeIndex> {
        self.removed
            .iter()
            .enumerate()
            .filter(|(_, removed)| **removed)
            .map(|(i, _)| EdgeIndex::from_raw(i))
            .collect()
    }
}

/// Pending candidate edges of one node on the traversal stack: outgoing
/// edges first, then incoming, each paired with the node on the far end.
struct Frame {
    node: NodeIndex,
    candidates: Vec<(EdgeIndex, NodeIndex)>,
    cursor: usize,
}

impl Frame {
    fn new(graph: &Graph, node: NodeIndex) -> Self {
        let outgoing = graph.outgoing(node).iter().map(|&e| (e, graph.edge(e).to));
        let incoming = graph.incoming(node).iter().map(|&e| (e, graph.edge(e).from));
        Self {
            node,
            candidates: outgoing.chain(incoming).collect(),
            cursor: 0,
        }
    }

    fn next_candidate(&mut self) -> Option<(EdgeIndex, NodeIndex)> {
        let candidate = self.candidates.get(self.cursor).copied();
        self.cursor += 1;
        candidate
    }
}

/// Run one root-by-root pass and return the edges it marks for removal, in
/// edge order.
///
/// The traversal uses an explicit stack, so its depth is bounded by the node
/// count rather than the call stack. Each edge is examined at most once, and
/// each node is entered at most once, so the pass terminates after
/// O(nodes + edges) steps.
pub fn find_cycle_edges(graph: &Graph) -> Vec<EdgeIndex> {
    let mut state = BreakState::new(graph);

    for root in graph.node_indices() {
        if state.is_visited(root) {
            continue;
        }
        state.visit(root);

        let mut stack = vec![Frame::new(graph, root)];
        while let Some(frame) = stack.last_mut() {
            let current = frame.node;
            let Some((edge, next)) = frame.next_candidate() else {
                stack.pop();
                continue;
            };
            let idx = edge.index();
            if state.removed[idx] || state.examined[idx] {
                continue;
            }
            state.examined[idx] = true;

            match state.classify(root, current, next) {
                Step::Remove => {
                    debug!(
                        from = %graph.node(graph.edge(edge).from).label,
                        to = %graph.node(graph.edge(edge).to).label,
                        "breaking cycle edge"
                    );
                    state.removed[idx] = true;
                }
                Step::Skip => {}
                Step::Descend => {
                    state.visit(current);
                    state.visit(next);
                    stack.push(Frame::new(graph, next));
                }
            }
        }
    }

    state.removed_edges()
}

/// Result of cycle breaking: the filtered graph and the edges left out.
pub struct BrokenCycles {
    pub graph: Graph,
    pub removed: Vec<EdgeIndex>,
}

/// Copy of `graph` with every edge chosen by [`find_cycle_edges`] left out.
/// Nodes, coordinates and sizes carry over unchanged.
pub fn break_cycles(graph: &Graph) -> BrokenCycles {
    let removed = find_cycle_edges(graph);
    let graph = graph.retain_edges(|e| removed.binary_search(&e).is_err());
    debug!(
        removed = removed.len(),
        remaining = graph.edge_count(),
        "cycle breaking finished"
    );
    BrokenCycles { graph, removed }
}
