// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::HashMap;

use float_cmp::approx_eq;

use cmap_engine::layout::cycles::{break_cycles, find_cycle_edges};
use cmap_engine::layout::graph::{Graph, Node, Position};
use cmap_engine::layout::overlap::place_links;
use cmap_engine::{
    Config, ErrorCode, ErrorKind, GraphMode, LayoutStrategy, Model, Term, generate_layout, vocab,
};

fn iri(name: &str) -> Term {
    Term::iri(format!("http://example.org/map#{name}"))
}

fn node(name: &str) -> Node {
    Node {
        resource: iri(name),
        label: name.to_uppercase(),
        position: Position::default(),
        size: 10.0,
    }
}

fn add_concept(model: &mut Model, name: &str, x: f64, y: f64) {
    model
        .add(iri(name), vocab::RDF_TYPE, Term::iri(vocab::CONCEPT))
        .add(iri(name), vocab::RDFS_LABEL, Term::literal(name.to_uppercase()))
        .add(iri(name), vocab::X, Term::literal(x.to_string()))
        .add(iri(name), vocab::Y, Term::literal(y.to_string()));
}

fn add_link(model: &mut Model, name: &str, from: &str, to: &str) {
    model
        .add(iri(name), vocab::RDF_TYPE, Term::iri(vocab::LINK))
        .add(iri(name), vocab::WIDTH, Term::literal("10"))
        .add(iri(name), vocab::X, Term::literal("0"))
        .add(iri(name), vocab::Y, Term::literal("0"));
    for (suffix, start, end) in [("in", iri(from), iri(name)), ("out", iri(name), iri(to))] {
        let connection = iri(&format!("{name}_{suffix}"));
        model
            .add(connection.clone(), vocab::RDF_TYPE, Term::iri(vocab::CONNECTION))
            .add(connection.clone(), vocab::FROM, start)
            .add(connection, vocab::TO, end);
    }
}

fn position_of(model: &Model, name: &str) -> (f64, f64) {
    let x = model.literal_f64(&iri(name), vocab::X).unwrap().unwrap();
    let y = model.literal_f64(&iri(name), vocab::Y).unwrap().unwrap();
    (x, y)
}

#[test]
fn four_node_cycle_loses_exactly_one_edge() {
    let mut graph = Graph::new();
    let ids: Vec<_> = ["a", "b", "c", "d"]
        .iter()
        .map(|n| graph.add_node(node(n)))
        .collect();
    for i in 0..4 {
        graph.add_edge(ids[i], ids[(i + 1) % 4], 0.1, "next");
    }

    let broken = break_cycles(&graph);
    assert_eq!(broken.removed.len(), 1);
    assert_eq!(broken.graph.node_count(), 4);
    assert_eq!(broken.graph.edge_count(), 3);

    // the remaining edges form the chain A -> B -> C -> D
    let chain: Vec<(String, String)> = broken
        .graph
        .edges()
        .map(|(_, e)| {
            (
                broken.graph.node(e.from).label.clone(),
                broken.graph.node(e.to).label.clone(),
            )
        })
        .collect();
    assert_eq!(
        chain,
        vec![
            ("A".to_owned(), "B".to_owned()),
            ("B".to_owned(), "C".to_owned()),
            ("C".to_owned(), "D".to_owned()),
        ]
    );
    assert!(find_cycle_edges(&broken.graph).is_empty());
}

#[test]
fn link_between_two_concepts_sits_at_midpoint() {
    let mut model = Model::new();
    add_concept(&mut model, "a", 0.0, 0.0);
    add_concept(&mut model, "b", 100.0, 0.0);
    add_link(&mut model, "rel", "a", "b");

    let concepts: HashMap<Term, Position> = [
        (iri("a"), Position::new(0.0, 0.0)),
        (iri("b"), Position::new(100.0, 0.0)),
    ]
    .into_iter()
    .collect();
    let links = place_links(&model, &concepts, true);
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].link, iri("rel"));
    assert_eq!((links[0].x, links[0].y), (50, 0));
}

#[test]
fn concept_mode_pipeline_places_link_after_normalizing() {
    let mut model = Model::new();
    add_concept(&mut model, "a", 0.0, 0.0);
    add_concept(&mut model, "b", 100.0, 0.0);
    add_link(&mut model, "rel", "a", "b");

    let config = Config {
        strategy: LayoutStrategy::Circular,
        graph_mode: GraphMode::Concept,
        ..Config::default()
    };
    let summary = generate_layout(&mut model, &config).unwrap();
    assert_eq!(summary.nodes, 2);
    assert_eq!(summary.edges, 0);
    assert_eq!(summary.positioned_links, 1);

    assert_eq!(position_of(&model, "a"), (100.0, 100.0));
    assert_eq!(position_of(&model, "b"), (200.0, 100.0));
    assert_eq!(position_of(&model, "rel"), (150.0, 100.0));
}

#[test]
fn auto_layout_keeps_nodes_and_normalizes() {
    let mut model = Model::new();
    let names = ["hub", "n1", "n2", "n3", "n4", "n5"];
    for (i, name) in names.iter().enumerate() {
        add_concept(&mut model, name, (i as f64) * 7.0 - 20.0, (i % 2) as f64 * -15.0);
    }
    for name in &names[1..] {
        add_link(&mut model, &format!("hub_{name}"), "hub", name);
    }
    add_link(&mut model, "back", "n5", "hub");

    let config = Config {
        layout_duration_ms: 300,
        max_layout_iterations: 80,
        ..Config::default()
    };
    let summary = generate_layout(&mut model, &config).unwrap();
    assert_eq!(summary.nodes, names.len() + names.len());

    let positions: Vec<(f64, f64)> = model
        .resources_of_type(vocab::CONCEPT)
        .into_iter()
        .chain(model.resources_of_type(vocab::LINK))
        .map(|r| {
            (
                model.literal_f64(&r, vocab::X).unwrap().unwrap(),
                model.literal_f64(&r, vocab::Y).unwrap().unwrap(),
            )
        })
        .collect();
    assert_eq!(positions.len(), summary.nodes);

    let min_x = positions.iter().map(|p| p.0).fold(f64::MAX, f64::min);
    let min_y = positions.iter().map(|p| p.1).fold(f64::MAX, f64::min);
    // written positions are rounded, so the minimum is within half a unit
    assert!(approx_eq!(f64, min_x, 100.0, epsilon = 0.5));
    assert!(approx_eq!(f64, min_y, 100.0, epsilon = 0.5));
    assert!(positions.iter().all(|p| p.0.fract() == 0.0 && p.1.fract() == 0.0));
}

#[test]
fn auto_layout_finishes_for_coincident_far_concepts() {
    let mut model = Model::new();
    add_concept(&mut model, "a", 1e17, 1e17);
    add_concept(&mut model, "b", 1e17, 1e17);

    let config = Config {
        layout_duration_ms: 50,
        ..Config::default()
    };
    let summary = generate_layout(&mut model, &config).unwrap();
    assert_eq!(summary.nodes, 2);

    let (ax, ay) = position_of(&model, "a");
    let (bx, by) = position_of(&model, "b");
    assert!(approx_eq!(f64, ax.min(bx), 100.0, epsilon = 0.5));
    assert!(approx_eq!(f64, ay.min(by), 100.0, epsilon = 0.5));
}

#[test]
fn missing_position_aborts_layout() {
    let mut model = Model::new();
    add_concept(&mut model, "a", 0.0, 0.0);
    model.add(iri("b"), vocab::RDF_TYPE, Term::iri(vocab::CONCEPT));

    let err = generate_layout(&mut model, &Config::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Layout);
    assert_eq!(err.code, ErrorCode::MissingPosition);
    assert!(err.is_precondition());
}

#[test]
fn layout_survives_json_round_trip() {
    let mut model = Model::new();
    add_concept(&mut model, "a", 5.0, 5.0);
    add_concept(&mut model, "b", 25.0, 45.0);
    add_link(&mut model, "rel", "a", "b");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("map.json");
    model.save(&path).unwrap();

    let mut loaded = Model::load(&path).unwrap();
    assert_eq!(loaded, model);

    let config = Config {
        strategy: LayoutStrategy::Radial,
        ..Config::default()
    };
    generate_layout(&mut loaded, &config).unwrap();
    loaded.save(&path).unwrap();

    let reloaded = Model::load(&path).unwrap();
    // the link node at the origin sets the minimum in link-graph mode
    assert_eq!(position_of(&reloaded, "rel"), (100.0, 100.0));
    assert_eq!(position_of(&reloaded, "a"), (105.0, 105.0));
    assert_eq!(position_of(&reloaded, "b"), (125.0, 145.0));
}
