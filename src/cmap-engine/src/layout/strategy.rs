// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use crate::config::{Config, LayoutStrategy};

use super::graph::Graph;
use super::sfdp::{auto_stages, compute_layout};

/// Translate every node so the smallest x and the smallest y both equal
/// `margin`.
pub fn normalize_coordinates(graph: &mut Graph, margin: f64) {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;

    for (_, node) in graph.nodes() {
        min_x = min_x.min(node.position.x);
        min_y = min_y.min(node.position.y);
    }

    if min_x == f64::INFINITY || min_y == f64::INFINITY {
        return;
    }

    if min_x == margin && min_y == margin {
        return;
    }

    // offset from the minimum first, so the minimum lands on margin exactly
    for node in graph.nodes_mut() {
        node.position.x = margin + (node.position.x - min_x);
        node.position.y = margin + (node.position.y - min_y);
    }
}

/// Assign coordinates to `graph` with the configured strategy, then
/// normalize them into positive space. The node set is unchanged.
///
/// Radial, circular and external-tool layouts are not implemented; they
/// keep the incoming coordinates, which are still normalized.
pub fn run_layout(mut graph: Graph, config: &Config) -> Graph {
    match config.strategy {
        LayoutStrategy::Auto => {
            let stages = auto_stages(config.max_layout_iterations);
            let layout = compute_layout(&graph, &stages, config.layout_duration(), config.seed);
            for (node, position) in graph.nodes_mut().zip(layout) {
                node.position = position;
            }
        }
        strategy @ (LayoutStrategy::Radial
        | LayoutStrategy::Circular
        | LayoutStrategy::ExternalTool) => {
            tracing::warn!(%strategy, "layout strategy not implemented, keeping current positions");
        }
    }

    normalize_coordinates(&mut graph, config.origin_margin);
    graph
}
