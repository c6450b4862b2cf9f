// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::HashMap;
use std::ops::{Add, Sub};

use crate::model::Term;

/// 2D position/vector used throughout the layout pipeline. Maps are planar,
/// so the depth coordinate is always zero and is not stored.
#[derive(Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl std::fmt::Debug for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

impl Add for Position {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Position {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(usize);

impl NodeIndex {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeIndex(usize);

impl EdgeIndex {
    pub fn index(self) -> usize {
        self.0
    }

    pub(crate) fn from_raw(idx: usize) -> Self {
        EdgeIndex(idx)
    }
}

/// A graph node standing for one model resource.
#[derive(Clone, Debug)]
pub struct Node {
    pub resource: Term,
    pub label: String,
    pub position: Position,
    pub size: f64,
}

/// A directed, weighted, labeled edge.
#[derive(Clone, Debug)]
pub struct Edge {
    pub from: NodeIndex,
    pub to: NodeIndex,
    pub weight: f64,
    pub label: String,
}

/// Mutable directed multigraph.
///
/// Nodes and edges are enumerated in insertion order. Each resource maps to
/// at most one node; several edges may join the same ordered pair.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    outgoing: Vec<Vec<EdgeIndex>>,
    incoming: Vec<Vec<EdgeIndex>>,
    by_resource: HashMap<Term, NodeIndex>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, or return the existing node for the same resource.
    pub fn add_node(&mut self, node: Node) -> NodeIndex {
        if let Some(&idx) = self.by_resource.get(&node.resource) {
            return idx;
        }
        let idx = NodeIndex(self.nodes.len());
        self.by_resource.insert(node.resource.clone(), idx);
        self.nodes.push(node);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        idx
    }

    pub fn add_edge(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
        weight: f64,
        label: impl Into<String>,
    ) -> EdgeIndex {
        debug_assert!(from.0 < self.nodes.len() && to.0 < self.nodes.len());
        let idx = EdgeIndex(self.edges.len());
        self.edges.push(Edge {
            from,
            to,
            weight,
            label: label.into(),
        });
        self.outgoing[from.0].push(idx);
        self.incoming[to.0].push(idx);
        idx
    }

    pub fn node(&self, idx: NodeIndex) -> &Node {
        &self.nodes[idx.0]
    }

    pub fn node_mut(&mut self, idx: NodeIndex) -> &mut Node {
        &mut self.nodes[idx.0]
    }

    pub fn edge(&self, idx: EdgeIndex) -> &Edge {
        &self.edges[idx.0]
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeIndex(i), n))
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.iter_mut()
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + use<> {
        (0..self.nodes.len()).map(NodeIndex)
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeIndex, &Edge)> {
        self.edges.iter().enumerate().map(|(i, e)| (EdgeIndex(i), e))
    }

    pub fn outgoing(&self, idx: NodeIndex) -> &[EdgeIndex] {
        &self.outgoing[idx.0]
    }

    pub fn incoming(&self, idx: NodeIndex) -> &[EdgeIndex] {
        &self.incoming[idx.0]
    }

    pub fn find(&self, resource: &Term) -> Option<NodeIndex> {
        self.by_resource.get(resource).copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// A new graph with the same nodes (positions and sizes included) and
    /// only the edges for which `keep` returns true, in original order.
    pub fn retain_edges(&self, mut keep: impl FnMut(EdgeIndex) -> bool) -> Graph {
        let mut graph = Graph {
            nodes: self.nodes.clone(),
            edges: Vec::new(),
            outgoing: vec![Vec::new(); self.nodes.len()],
            incoming: vec![Vec::new(); self.nodes.len()],
            by_resource: self.by_resource.clone(),
        };
        for (idx, edge) in self.edges() {
            if keep(idx) {
                graph.add_edge(edge.from, edge.to, edge.weight, edge.label.clone());
            }
        }
        graph
    }
}
