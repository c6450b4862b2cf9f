// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Placement of link resources that were left out of the layout graph.
//!
//! A link sits at the rounded midpoint of the two concepts it joins and is
//! then nudged along each axis independently, away from coordinates that are
//! already taken. The nudge is a greedy one-dimensional search and only
//! guarantees separation above the tolerance against the reference points,
//! in placement order.

use std::collections::HashMap;

use crate::model::{Model, Term};
use crate::vocab;

use super::graph::Position;

/// Distance at or below which two coordinates collide.
pub const OVERLAP_TOLERANCE: i64 = 5;
/// Step applied to a colliding coordinate.
pub const OVERLAP_SHIFT: i64 = 10;
/// Upper bound on nudges per coordinate.
pub const MAX_OVERLAP_RETRIES: usize = 20;

/// Computed position of one link resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkPosition {
    pub link: Term,
    pub x: i64,
    pub y: i64,
}

/// Push `candidate` upward past any reference value within tolerance at or
/// above it. `sorted` must be in ascending order.
pub fn remove_overlap(candidate: i64, sorted: &[i64]) -> i64 {
    debug_assert!(sorted.is_sorted());
    let mut pos = candidate;
    for _ in 0..MAX_OVERLAP_RETRIES {
        let ceiling = sorted.partition_point(|&v| v < pos);
        match sorted.get(ceiling) {
            Some(&reference) if reference - pos <= OVERLAP_TOLERANCE => pos += OVERLAP_SHIFT,
            _ => break,
        }
    }
    pos
}

/// Concepts a link joins: the `from` end of the first connection arriving at
/// the link and the `to` end of the first connection leaving it.
pub fn link_endpoints(model: &Model, link: &Term) -> Option<(Term, Term)> {
    let mut from = None;
    let mut to = None;
    for connection in model.resources_of_type(vocab::CONNECTION) {
        let start = model.object(&connection, vocab::FROM);
        let end = model.object(&connection, vocab::TO);
        if from.is_none() && end == Some(link) {
            from = start.cloned();
        }
        if to.is_none() && start == Some(link) {
            to = end.cloned();
        }
    }
    Some((from?, to?))
}

fn rounded(value: f64) -> i64 {
    value.round() as i64
}

fn sorted_axes(points: impl Iterator<Item = (i64, i64)>) -> (Vec<i64>, Vec<i64>) {
    let (mut xs, mut ys): (Vec<i64>, Vec<i64>) = points.unzip();
    xs.sort_unstable();
    ys.sort_unstable();
    (xs, ys)
}

/// Position every link of `model` between its endpoints in `concepts`.
///
/// Each link is checked against the coordinates of every concept other than
/// its own two endpoints. With `avoid_link_overlap` a second pass checks
/// each link, in order, against the current coordinates of all other links.
/// Links with a missing or unplaced endpoint are skipped.
pub fn place_links(
    model: &Model,
    concepts: &HashMap<Term, Position>,
    avoid_link_overlap: bool,
) -> Vec<LinkPosition> {
    let mut placed = Vec::new();

    for link in model.resources_of_type(vocab::LINK) {
        let Some((from, to)) = link_endpoints(model, &link) else {
            tracing::warn!(%link, "link without both endpoints left unplaced");
            continue;
        };
        let (Some(&a), Some(&b)) = (concepts.get(&from), concepts.get(&to)) else {
            tracing::warn!(%link, "link endpoint has no position, left unplaced");
            continue;
        };

        let mid = a.midpoint(b);
        let (xs, ys) = sorted_axes(
            concepts
                .iter()
                .filter(|(concept, _)| **concept != from && **concept != to)
                .map(|(_, p)| (rounded(p.x), rounded(p.y))),
        );
        let x = remove_overlap(rounded(mid.x), &xs);
        let y = remove_overlap(rounded(mid.y), &ys);
        if (x, y) != (rounded(mid.x), rounded(mid.y)) {
            tracing::debug!(%link, x, y, "link nudged off concept coordinates");
        }
        placed.push(LinkPosition { link, x, y });
    }

    if avoid_link_overlap {
        for i in 0..placed.len() {
            let (xs, ys) = sorted_axes(
                placed
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, p)| (p.x, p.y)),
            );
            let x = remove_overlap(placed[i].x, &xs);
            let y = remove_overlap(placed[i].y, &ys);
            placed[i].x = x;
            placed[i].y = y;
        }
    }

    placed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iri(name: &str) -> Term {
        Term::iri(format!("http://example.org/{name}"))
    }

    fn linked_model(links: &[(&str, &str, &str)]) -> Model {
        let mut model = Model::new();
        for (i, (link, from, to)) in links.iter().enumerate() {
            model.add(iri(link), vocab::RDF_TYPE, Term::iri(vocab::LINK));
            let into = iri(&format!("c{i}a"));
            let out = iri(&format!("c{i}b"));
            model
                .add(into.clone(), vocab::RDF_TYPE, Term::iri(vocab::CONNECTION))
                .add(into.clone(), vocab::FROM, iri(from))
                .add(into, vocab::TO, iri(link))
                .add(out.clone(), vocab::RDF_TYPE, Term::iri(vocab::CONNECTION))
                .add(out.clone(), vocab::FROM, iri(link))
                .add(out, vocab::TO, iri(to));
        }
        model
    }

    fn at(entries: &[(&str, f64, f64)]) -> HashMap<Term, Position> {
        entries
            .iter()
            .map(|(name, x, y)| (iri(name), Position::new(*x, *y)))
            .collect()
    }

    #[test]
    fn test_remove_overlap_no_collision() {
        assert_eq!(remove_overlap(50, &[0, 100]), 50);
        assert_eq!(remove_overlap(50, &[]), 50);
        // references below the candidate never collide
        assert_eq!(remove_overlap(50, &[48, 49, 50 - 1]), 50);
    }

    #[test]
    fn test_remove_overlap_nudges() {
        assert_eq!(remove_overlap(50, &[50]), 60);
        assert_eq!(remove_overlap(50, &[55]), 60);
        assert_eq!(remove_overlap(50, &[56]), 50);
        // a run of references pushes the candidate past all of them
        assert_eq!(remove_overlap(0, &[0, 10, 20, 30]), 40);
    }

    #[test]
    fn test_remove_overlap_bounded_retries() {
        let wall: Vec<i64> = (0..100).map(|i| i * 10).collect();
        let pos = remove_overlap(0, &wall);
        assert_eq!(pos, MAX_OVERLAP_RETRIES as i64 * OVERLAP_SHIFT);
    }

    #[test]
    fn test_link_between_two_concepts() {
        let model = linked_model(&[("l", "a", "b")]);
        let concepts = at(&[("a", 0.0, 0.0), ("b", 100.0, 0.0)]);
        let placed = place_links(&model, &concepts, false);
        assert_eq!(
            placed,
            vec![LinkPosition {
                link: iri("l"),
                x: 50,
                y: 0
            }]
        );
    }

    #[test]
    fn test_link_nudged_off_third_concept() {
        let model = linked_model(&[("l", "a", "b")]);
        let concepts = at(&[("a", 0.0, 0.0), ("b", 100.0, 20.0), ("c", 52.0, 300.0)]);
        let placed = place_links(&model, &concepts, false);
        assert_eq!((placed[0].x, placed[0].y), (60, 10));
    }

    #[test]
    fn test_rounded_midpoint() {
        let model = linked_model(&[("l", "a", "b")]);
        let concepts = at(&[("a", 0.0, 0.0), ("b", 101.0, 3.0)]);
        let placed = place_links(&model, &concepts, false);
        assert_eq!((placed[0].x, placed[0].y), (51, 2));
    }

    #[test]
    fn test_link_link_pass() {
        // two links between the same pair of concepts land on one spot
        let model = linked_model(&[("l1", "a", "b"), ("l2", "a", "b")]);
        let concepts = at(&[("a", 0.0, 0.0), ("b", 100.0, 0.0)]);

        let plain = place_links(&model, &concepts, false);
        assert_eq!((plain[0].x, plain[0].y), (plain[1].x, plain[1].y));

        let separated = place_links(&model, &concepts, true);
        assert_eq!((separated[0].x, separated[0].y), (60, 10));
        assert_eq!((separated[1].x, separated[1].y), (50, 0));
    }

    #[test]
    fn test_unplaceable_links_skipped() {
        let mut model = linked_model(&[("l", "a", "b")]);
        model.add(iri("dangling"), vocab::RDF_TYPE, Term::iri(vocab::LINK));
        let concepts = at(&[("a", 0.0, 0.0)]);
        assert!(place_links(&model, &concepts, false).is_empty());
    }
}
