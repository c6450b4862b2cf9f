// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::time::{Duration, Instant};

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::graph::{Graph, Position};

/// Ideal edge length used when the initial layout has no measurable edges.
const FALLBACK_EDGE_LENGTH: f64 = 100.0;

/// Configuration for one SFDP (Scalable Force-Directed Placement) pass.
#[derive(Clone, Debug)]
pub struct SfdpConfig {
    /// Ideal edge length. When negative, auto-calculated from the average
    /// edge length in the initial layout.
    pub k: f64,
    /// Maximum number of force-directed iterations.
    pub max_iterations: usize,
    /// The pass stops when the adaptive step size drops below
    /// `convergence_threshold * k`.
    pub convergence_threshold: f64,
    /// Starting step size, as a fraction of `k`.
    pub initial_step_size: f64,
    /// Multiplicative cooling applied to the step size when total energy
    /// increases between iterations.
    pub cooling_factor: f64,
    /// Repulsive exponent controlling how repulsion scales with distance.
    pub p: f64,
    /// Attractive constant scaling the spring forces along edges.
    pub c: f64,
    /// Measure repulsion from node borders instead of centers, so large
    /// nodes push harder against their neighbors.
    pub adjust_sizes: bool,
}

impl Default for SfdpConfig {
    fn default() -> Self {
        Self {
            k: -1.0,
            max_iterations: 600,
            convergence_threshold: 1e-4,
            initial_step_size: 1.0,
            cooling_factor: 0.9,
            p: -1.0,
            c: 0.2,
            adjust_sizes: false,
        }
    }
}

/// One stage of the auto strategy and its share of the time budget.
#[derive(Clone, Debug)]
pub struct ForceStage {
    pub name: &'static str,
    pub config: SfdpConfig,
    pub weight: f64,
}

/// Stages run by the auto strategy: an expansion pass followed by two
/// refinement passes with different repulsion and size handling.
pub fn auto_stages(max_iterations: usize) -> Vec<ForceStage> {
    vec![
        ForceStage {
            name: "expansion",
            config: SfdpConfig {
                max_iterations,
                ..SfdpConfig::default()
            },
            weight: 0.5,
        },
        ForceStage {
            name: "refine_sizes",
            config: SfdpConfig {
                max_iterations,
                initial_step_size: 0.5,
                c: 0.3,
                adjust_sizes: true,
                ..SfdpConfig::default()
            },
            weight: 0.3,
        },
        ForceStage {
            name: "refine_spread",
            config: SfdpConfig {
                max_iterations,
                initial_step_size: 0.2,
                cooling_factor: 0.95,
                p: -1.5,
                adjust_sizes: true,
                ..SfdpConfig::default()
            },
            weight: 0.2,
        },
    ]
}

/// SFDP layout engine. Positions graph nodes by iterating repulsive forces
/// between all node pairs and attractive spring forces along edges.
struct Sfdp<'a> {
    graph: &'a Graph,
    config: &'a SfdpConfig,
}

impl<'a> Sfdp<'a> {
    fn new(graph: &'a Graph, config: &'a SfdpConfig) -> Self {
        Self { graph, config }
    }

    /// Main force-directed loop. Returns the number of iterations run before
    /// convergence, the iteration limit or the deadline.
    fn force_directed(&self, layout: &mut [Position], k: f64, deadline: Instant) -> usize {
        let config = self.config;
        let kp = k.powf(1.0 - config.p);
        let crk = config.c.powf((2.0 - config.p) / 3.0) / k;

        let mut step = config.initial_step_size * k;
        let mut prev_norm = f64::MAX;
        let sizes: Vec<f64> = self.graph.nodes().map(|(_, n)| n.size).collect();

        let mut iterations = 0;
        while iterations < config.max_iterations && Instant::now() < deadline {
            iterations += 1;
            let mut forces = vec![Position::default(); layout.len()];

            // O(n^2) repulsive forces between all node pairs
            for i in 0..layout.len() {
                let pos1 = layout[i];
                for j in (i + 1)..layout.len() {
                    let pos2 = layout[j];

                    let dx = pos1.x - pos2.x;
                    let dy = pos1.y - pos2.y;
                    let dist = (dx * dx + dy * dy).sqrt().max(1e-9);
                    let gap = if config.adjust_sizes {
                        (dist - (sizes[i] + sizes[j]) / 2.0).max(1e-2)
                    } else {
                        dist
                    };

                    let f = kp / gap.powf(1.0 - config.p);
                    let fx = f * dx / dist;
                    let fy = f * dy / dist;

                    forces[i].x += fx;
                    forces[i].y += fy;
                    forces[j].x -= fx;
                    forces[j].y -= fy;
                }
            }

            // O(edges) attractive forces along edges
            for (_, edge) in self.graph.edges() {
                let (from, to) = (edge.from.index(), edge.to.index());
                if from == to {
                    continue;
                }
                let dx = layout[from].x - layout[to].x;
                let dy = layout[from].y - layout[to].y;
                let dist = (dx * dx + dy * dy).sqrt();
                if dist < 1e-9 {
                    continue;
                }

                let f = crk * dist * edge.weight;
                let fx = f * dx / dist;
                let fy = f * dy / dist;

                forces[from].x -= fx;
                forces[from].y -= fy;
                forces[to].x += fx;
                forces[to].y += fy;
            }

            let mut norm = 0.0;
            for (pos, force) in layout.iter_mut().zip(&forces) {
                let mag = force.length();
                norm += mag;
                if mag > 0.0 {
                    pos.x += step * force.x / mag;
                    pos.y += step * force.y / mag;
                }
            }

            // Adaptive cooling: increase step when energy drops significantly,
            // cool when energy rises, hold steady for small improvements.
            if norm >= prev_norm {
                step *= config.cooling_factor;
            } else if norm <= 0.95 * prev_norm {
                step *= 0.99 / config.cooling_factor;
            }
            prev_norm = norm;

            if step < config.convergence_threshold * k {
                break;
            }
        }
        iterations
    }
}

fn average_edge_length(graph: &Graph, layout: &[Position]) -> f64 {
    let mut total_dist = 0.0;
    let mut count = 0usize;

    for (_, edge) in graph.edges() {
        let dist = (layout[edge.from.index()] - layout[edge.to.index()]).length();
        if dist > 0.0 {
            total_dist += dist;
            count += 1;
        }
    }

    if count == 0 {
        FALLBACK_EDGE_LENGTH
    } else {
        total_dist / count as f64
    }
}

/// Attempts per node before a coincident position is left as is.
const MAX_SEPARATION_ATTEMPTS: usize = 16;

/// Jitter amplitude for a coordinate: one unit, or a few ulps at
/// magnitudes where a unit step no longer changes the value.
fn jitter_scale(v: f64) -> f64 {
    (v.abs() * f64::EPSILON * 4.0).max(1.0)
}

/// Nudge nodes sharing a position apart; coincident nodes exert no
/// directional force on each other.
fn separate_coincident(layout: &mut [Position], rng: &mut StdRng) {
    for i in 1..layout.len() {
        let mut attempts = 0;
        while attempts < MAX_SEPARATION_ATTEMPTS && layout[..i].contains(&layout[i]) {
            attempts += 1;
            let (sx, sy) = (jitter_scale(layout[i].x), jitter_scale(layout[i].y));
            layout[i].x += (rng.random::<f64>() - 0.5) * sx;
            layout[i].y += (rng.random::<f64>() - 0.5) * sy;
        }
    }
}

/// Run `stages` in order starting from the graph's current coordinates.
/// Each stage gets `weight * budget` of wall-clock time and never more than
/// its iteration limit. Returns new positions indexed like the graph's nodes.
pub fn compute_layout(
    graph: &Graph,
    stages: &[ForceStage],
    budget: Duration,
    seed: u64,
) -> Vec<Position> {
    let mut layout: Vec<Position> = graph.nodes().map(|(_, n)| n.position).collect();
    if layout.len() < 2 {
        return layout;
    }

    let mut rng = StdRng::seed_from_u64(seed);
    separate_coincident(&mut layout, &mut rng);

    let ideal = average_edge_length(graph, &layout);
    for stage in stages {
        let k = if stage.config.k < 0.0 {
            ideal
        } else {
            stage.config.k
        };
        let deadline = Instant::now() + budget.mul_f64(stage.weight.max(0.0));
        let iterations = Sfdp::new(graph, &stage.config).force_directed(&mut layout, k, deadline);
        tracing::debug!(stage = stage.name, iterations, k, "force-directed stage done");
    }

    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::graph::NodeIndex;
    use crate::layout::graph::tests::graph_of;

    fn place(graph: &mut Graph, coords: &[(f64, f64)]) {
        for (i, &(x, y)) in coords.iter().enumerate() {
            let idx = nth(graph, i);
            graph.node_mut(idx).position = Position::new(x, y);
        }
    }

    fn nth(graph: &Graph, i: usize) -> NodeIndex {
        graph.node_indices().nth(i).unwrap()
    }

    #[test]
    fn test_auto_stages_weights() {
        let stages = auto_stages(100);
        assert_eq!(stages.len(), 3);
        let total: f64 = stages.iter().map(|s| s.weight).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(!stages[0].config.adjust_sizes);
        assert!(stages[1].config.adjust_sizes && stages[2].config.adjust_sizes);
        assert!(stages.iter().all(|s| s.config.max_iterations == 100));
    }

    #[test]
    fn test_separates_coincident_nodes() {
        let mut graph = graph_of(&["a", "b", "c"], &[(0, 1), (1, 2)]);
        place(&mut graph, &[(0.0, 0.0), (0.0, 0.0), (0.0, 0.0)]);

        let layout = compute_layout(&graph, &auto_stages(50), Duration::from_secs(5), 1);
        assert_eq!(layout.len(), 3);
        assert_ne!(layout[0], layout[1]);
        assert_ne!(layout[1], layout[2]);
        assert!(layout.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn test_separates_coincident_nodes_at_large_magnitude() {
        let mut graph = graph_of(&["a", "b"], &[]);
        place(&mut graph, &[(1e17, 1e17), (1e17, 1e17)]);

        let mut layout: Vec<Position> = graph.nodes().map(|(_, n)| n.position).collect();
        let mut rng = StdRng::seed_from_u64(7);
        separate_coincident(&mut layout, &mut rng);
        assert_ne!(layout[0], layout[1]);

        let layout = compute_layout(&graph, &auto_stages(20), Duration::from_millis(50), 1);
        assert!(layout.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn test_jitter_scale() {
        assert_eq!(jitter_scale(0.0), 1.0);
        assert_eq!(jitter_scale(-250.0), 1.0);
        assert!(jitter_scale(1e17) > 16.0);
    }

    #[test]
    fn test_repulsion_spreads_close_nodes() {
        let mut graph = graph_of(&["a", "b"], &[]);
        place(&mut graph, &[(0.0, 0.0), (1.0, 0.0)]);

        let stages = vec![ForceStage {
            name: "test",
            config: SfdpConfig {
                k: 50.0,
                max_iterations: 100,
                ..SfdpConfig::default()
            },
            weight: 1.0,
        }];
        let layout = compute_layout(&graph, &stages, Duration::from_secs(5), 1);
        let dist = (layout[0] - layout[1]).length();
        assert!(dist > 1.0, "nodes should move apart, got {dist}");
    }

    #[test]
    fn test_zero_budget_keeps_positions() {
        let mut graph = graph_of(&["a", "b"], &[(0, 1)]);
        place(&mut graph, &[(3.0, 4.0), (30.0, 40.0)]);
        let layout = compute_layout(&graph, &auto_stages(600), Duration::ZERO, 1);
        assert_eq!(layout, vec![Position::new(3.0, 4.0), Position::new(30.0, 40.0)]);
    }

    #[test]
    fn test_average_edge_length() {
        let mut graph = graph_of(&["a", "b", "c"], &[(0, 1), (1, 2)]);
        place(&mut graph, &[(0.0, 0.0), (3.0, 4.0), (3.0, 14.0)]);
        let layout: Vec<Position> = graph.nodes().map(|(_, n)| n.position).collect();
        assert!((average_edge_length(&graph, &layout) - 7.5).abs() < 1e-9);

        let empty = graph_of(&["a"], &[]);
        let fallback = average_edge_length(&empty, &[Position::default()]);
        assert!((fallback - FALLBACK_EDGE_LENGTH).abs() < 1e-9);
    }
}
