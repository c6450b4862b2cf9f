// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Depth-first search for one chain of statements joining two resources.
//!
//! From each node the search first follows statements the node is the
//! subject of, then statements pointing at it, so a path may walk
//! properties in either direction. The first chain reaching the target is
//! kept; the search neither backtracks for alternatives nor looks for the
//! shortest one.

use std::collections::HashSet;

use crate::model::{Model, Statement, Term};
use crate::vocab;

/// Search state for one synthesis call.
#[derive(Clone, Debug, Default)]
pub struct PathState {
    /// Node keys (IRI or blank node label) already entered.
    pub visited: HashSet<String>,
    pub found_target: bool,
    /// Statements of the path in traversal order, once `found_target` is set.
    pub statements: Vec<Statement>,
}

impl PathState {
    fn visit(&mut self, term: &Term) -> bool {
        match term.node_key() {
            Some(key) => self.visited.insert(key.to_owned()),
            None => false,
        }
    }
}

/// Statements a search may walk along: semantic and pointing at a resource.
fn traversable(statement: &Statement) -> bool {
    vocab::is_semantic(&statement.predicate) && !statement.object.is_literal()
}

struct Frame<'a> {
    /// Statement that led here; `None` for the source.
    via: Option<&'a Statement>,
    candidates: Vec<(&'a Statement, &'a Term)>,
    cursor: usize,
}

impl<'a> Frame<'a> {
    fn new(model: &'a Model, node: &'a Term, via: Option<&'a Statement>) -> Self {
        let outgoing = model
            .statements_about(node)
            .filter(|s| traversable(s))
            .map(|s| (s, &s.object));
        let incoming = model
            .statements_pointing_at(node)
            .filter(|s| traversable(s))
            .map(|s| (s, &s.subject));
        Frame {
            via,
            candidates: outgoing.chain(incoming).collect(),
            cursor: 0,
        }
    }
}

/// Search `model` for a chain of statements from `source` to `target`.
///
/// The walk keeps its own stack, and every node is entered at most once, so
/// the number of steps is bounded by the model size.
pub fn find_path(model: &Model, source: &Term, target: &Term) -> PathState {
    let mut state = PathState::default();
    if source.node_key().is_some() && source.node_key() == target.node_key() {
        state.found_target = true;
        return state;
    }
    state.visit(source);

    let mut stack = vec![Frame::new(model, source, None)];
    while let Some(frame) = stack.last_mut() {
        let Some(&(statement, next)) = frame.candidates.get(frame.cursor) else {
            stack.pop();
            continue;
        };
        frame.cursor += 1;

        if next.node_key() == target.node_key() {
            state.statements = stack.iter().filter_map(|f| f.via).cloned().collect();
            state.statements.push(statement.clone());
            state.found_target = true;
            break;
        }
        if state.visit(next) {
            stack.push(Frame::new(model, next, Some(statement)));
        }
    }

    tracing::debug!(
        found = state.found_target,
        hops = state.statements.len(),
        visited = state.visited.len(),
        "path search finished"
    );
    state
}
