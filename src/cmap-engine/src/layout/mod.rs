// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

pub mod builder;
pub mod cycles;
pub mod graph;
pub mod overlap;
pub mod sfdp;
pub mod strategy;

use std::collections::HashMap;

use crate::common::Result;
use crate::config::{Config, GraphMode};
use crate::model::{Model, Term};
use crate::vocab;

use self::builder::build_graph;
use self::cycles::break_cycles;
use self::graph::{Graph, Position};
use self::overlap::place_links;
use self::strategy::run_layout;

/// Counts describing one layout run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayoutSummary {
    pub nodes: usize,
    pub edges: usize,
    pub removed_edges: usize,
    pub positioned_links: usize,
}

fn write_position(model: &mut Model, resource: &Term, x: i64, y: i64) {
    model.set_literal(
        resource,
        vocab::X,
        Term::typed_literal(x.to_string(), vocab::XSD_INTEGER),
    );
    model.set_literal(
        resource,
        vocab::Y,
        Term::typed_literal(y.to_string(), vocab::XSD_INTEGER),
    );
}

/// Lay out the concept map held in `model` and write the resulting
/// positions back onto its resources.
///
/// The graph is rebuilt from the model on every call. Cycle breaking only
/// affects which edges the layout sees; every node is positioned. In
/// concept-graph mode links are not part of the layout and are placed
/// between their endpoints afterwards.
pub fn generate_layout(model: &mut Model, config: &Config) -> Result<LayoutSummary> {
    let graph = build_graph(model, config)?;
    let mut summary = LayoutSummary {
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        ..LayoutSummary::default()
    };

    let graph = if config.break_cycles {
        let broken = break_cycles(&graph);
        summary.removed_edges = broken.removed.len();
        broken.graph
    } else {
        graph
    };

    let graph: Graph = run_layout(graph, config);

    let mut placed: HashMap<Term, Position> = HashMap::with_capacity(graph.node_count());
    for (_, node) in graph.nodes() {
        write_position(
            model,
            &node.resource,
            node.position.x.round() as i64,
            node.position.y.round() as i64,
        );
        placed.insert(node.resource.clone(), node.position);
    }

    if config.graph_mode == GraphMode::Concept {
        let links = place_links(model, &placed, config.avoid_link_overlap);
        summary.positioned_links = links.len();
        for link in &links {
            write_position(model, &link.link, link.x, link.y);
        }
    }

    tracing::info!(
        nodes = summary.nodes,
        edges = summary.edges,
        removed_edges = summary.removed_edges,
        positioned_links = summary.positioned_links,
        strategy = %config.strategy,
        "layout written to model"
    );
    Ok(summary)
}
