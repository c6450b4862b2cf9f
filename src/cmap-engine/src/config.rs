// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Coordinate assignment strategy.
///
/// Only `Auto` computes new coordinates. `Radial`, `Circular` and
/// `ExternalTool` are accepted but currently leave positions as they are;
/// normalization still runs after them.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutStrategy {
    #[default]
    Auto,
    Radial,
    Circular,
    ExternalTool,
}

impl LayoutStrategy {
    pub fn is_inert(self) -> bool {
        !matches!(self, LayoutStrategy::Auto)
    }
}

impl fmt::Display for LayoutStrategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            LayoutStrategy::Auto => "auto",
            LayoutStrategy::Radial => "radial",
            LayoutStrategy::Circular => "circular",
            LayoutStrategy::ExternalTool => "external_tool",
        };
        write!(f, "{name}")
    }
}

impl FromStr for LayoutStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "auto" => Ok(LayoutStrategy::Auto),
            "radial" => Ok(LayoutStrategy::Radial),
            "circular" => Ok(LayoutStrategy::Circular),
            "external_tool" | "external" => Ok(LayoutStrategy::ExternalTool),
            other => Err(format!("unknown layout strategy '{other}'")),
        }
    }
}

/// Which resources become graph members for layout.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphMode {
    /// Concepts and links are nodes, connections are edges.
    #[default]
    Link,
    /// Only concepts are nodes, concept-to-concept statements are edges;
    /// links are placed afterwards between their endpoints.
    Concept,
}

impl FromStr for GraphMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "link" => Ok(GraphMode::Link),
            "concept" => Ok(GraphMode::Concept),
            other => Err(format!("unknown graph mode '{other}'")),
        }
    }
}

/// Settings consumed by the layout, query and report components. Passed by
/// reference into each call; nothing reads configuration from global state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub strategy: LayoutStrategy,
    pub graph_mode: GraphMode,
    /// Wall-clock budget for the auto strategy, across all of its stages.
    pub layout_duration_ms: u64,
    /// Node size when no usable hierarchy level is present.
    pub default_node_size: f64,
    /// Weight given to every edge; only calibrates attractive forces.
    pub edge_weight: f64,
    pub break_cycles: bool,
    /// Run a second overlap pass of links against each other.
    pub avoid_link_overlap: bool,

    // Query extensions
    pub include_all_nodes: bool,
    pub include_path_properties: bool,

    /// Seed for the force-directed engine's jitter of coincident nodes.
    pub seed: u64,
    /// Minimum x and y after normalization.
    pub origin_margin: f64,
    /// Iteration ceiling per auto stage, applied on top of the time budget.
    pub max_layout_iterations: usize,
}

impl Config {
    pub fn layout_duration(&self) -> Duration {
        Duration::from_millis(self.layout_duration_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: LayoutStrategy::Auto,
            graph_mode: GraphMode::Link,
            layout_duration_ms: 2000,
            default_node_size: 10.0,
            edge_weight: 0.1,
            break_cycles: true,
            avoid_link_overlap: false,
            include_all_nodes: false,
            include_path_properties: false,
            seed: 42,
            origin_margin: 100.0,
            max_layout_iterations: 600,
        }
    }
}
