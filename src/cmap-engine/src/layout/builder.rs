// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::HashSet;

use crate::common::Result;
use crate::config::{Config, GraphMode, LayoutStrategy};
use crate::model::{Model, Term};
use crate::vocab;

use super::graph::{Graph, Node, NodeIndex, Position};

const LEVEL_SIZE_NUMERATOR: f64 = 500.0;
const LEVEL_SIZE_LOWER: f64 = 100.0;
const LEVEL_SIZE_UPPER: f64 = 500.0;

/// Node size for an optional hierarchy level.
///
/// The bounds are applied as `max(min(500 / level, 100), 500)`: min against
/// the lower bound, then max against the upper bound. Every leveled node
/// therefore gets the upper bound under the auto strategy.
pub fn node_size(level: Option<f64>, config: &Config) -> f64 {
    match level {
        Some(level) if level > 0.0 && config.strategy == LayoutStrategy::Auto => {
            (LEVEL_SIZE_NUMERATOR / level)
                .min(LEVEL_SIZE_LOWER)
                .max(LEVEL_SIZE_UPPER)
        }
        _ => config.default_node_size,
    }
}

struct GraphBuilder<'a> {
    model: &'a Model,
    config: &'a Config,
    graph: Graph,
}

impl<'a> GraphBuilder<'a> {
    fn new(model: &'a Model, config: &'a Config) -> Self {
        Self {
            model,
            config,
            graph: Graph::new(),
        }
    }

    /// Node for `resource`, created on first reference. Positions must
    /// already be present in the model.
    fn ensure_node(&mut self, resource: &Term) -> Result<NodeIndex> {
        if let Some(idx) = self.graph.find(resource) {
            return Ok(idx);
        }

        let x = self.model.literal_f64(resource, vocab::X)?;
        let y = self.model.literal_f64(resource, vocab::Y)?;
        let (Some(x), Some(y)) = (x, y) else {
            return crate::layout_err!(
                MissingPosition,
                format!("{resource} has no x/y position")
            );
        };
        let level = self.model.literal_f64(resource, vocab::HIERARCHY_LEVEL)?;

        Ok(self.graph.add_node(Node {
            resource: resource.clone(),
            label: self.model.label(resource),
            position: Position::new(x, y),
            size: node_size(level, self.config),
        }))
    }

    fn add_edge(&mut self, from: &Term, to: &Term, label: String) -> Result<()> {
        let from = self.ensure_node(from)?;
        let to = self.ensure_node(to)?;
        self.graph
            .add_edge(from, to, self.config.edge_weight, label);
        Ok(())
    }

    /// One edge per connection resource, from its `from` end to its `to` end.
    fn add_connections(&mut self) -> Result<()> {
        let model = self.model;
        for connection in model.resources_of_type(vocab::CONNECTION) {
            let from = model.object(&connection, vocab::FROM);
            let to = model.object(&connection, vocab::TO);
            let (Some(from), Some(to)) = (from, to) else {
                tracing::warn!(%connection, "connection without both endpoints skipped");
                continue;
            };
            let label = model.label(&connection);
            self.add_edge(from, to, label)?;
        }
        Ok(())
    }

    /// One edge per semantic statement joining two concepts.
    fn add_concept_relations(&mut self) -> Result<()> {
        let model = self.model;
        let concepts: HashSet<Term> = model
            .resources_of_type(vocab::CONCEPT)
            .into_iter()
            .collect();
        for statement in &model.statements {
            if !vocab::is_semantic(&statement.predicate)
                || !concepts.contains(&statement.subject)
                || !concepts.contains(&statement.object)
            {
                continue;
            }
            let label = model.label(&Term::iri(statement.predicate.as_str()));
            self.add_edge(&statement.subject, &statement.object, label)?;
        }
        Ok(())
    }

    fn add_remaining_concepts(&mut self) -> Result<()> {
        for concept in self.model.resources_of_type(vocab::CONCEPT) {
            self.ensure_node(&concept)?;
        }
        Ok(())
    }

    fn build(mut self) -> Result<Graph> {
        match self.config.graph_mode {
            GraphMode::Link => self.add_connections()?,
            GraphMode::Concept => self.add_concept_relations()?,
        }
        self.add_remaining_concepts()?;

        tracing::debug!(
            mode = ?self.config.graph_mode,
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            "built layout graph"
        );
        Ok(self.graph)
    }
}

/// Build the layout graph for `model`.
///
/// In link mode every connection becomes an edge and its endpoints (concepts
/// and links alike) become nodes. In concept mode only concepts are nodes.
/// Concepts not reached through any edge are appended last, so every
/// concept is part of the layout.
pub fn build_graph(model: &Model, config: &Config) -> Result<Graph> {
    GraphBuilder::new(model, config).build()
}
