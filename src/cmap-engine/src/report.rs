// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Hop-count path report from the map's root concept to every other
//! concept, at instance level and at type level.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fs;
use std::path::Path;

use crate::common::{ErrorCode, Result, io_error};
use crate::model::{Model, Statement, Term};
use crate::vocab;

pub const INSTANCE_SECTION: &str = "instance graphs";
pub const TYPE_SECTION: &str = "type graphs";

/// Path search over a model, by statement-hop count.
pub trait ShortestPathSearch {
    /// Statements of a shortest path from `start` to `end`, or `None` when
    /// `end` is unreachable. A path from a node to itself is empty.
    fn shortest_path(&self, model: &Model, start: &Term, end: &Term) -> Option<Vec<Statement>>;
}

/// Breadth-first search along statements in their stated direction,
/// skipping type assertions, literals and drawing data.
#[derive(Clone, Copy, Debug, Default)]
pub struct BreadthFirstSearch;

impl ShortestPathSearch for BreadthFirstSearch {
    fn shortest_path(&self, model: &Model, start: &Term, end: &Term) -> Option<Vec<Statement>> {
        if start == end {
            return Some(Vec::new());
        }

        let mut adjacency: HashMap<&Term, Vec<&Statement>> = HashMap::new();
        for statement in &model.statements {
            if vocab::is_semantic(&statement.predicate) && !statement.object.is_literal() {
                adjacency
                    .entry(&statement.subject)
                    .or_default()
                    .push(statement);
            }
        }

        let mut reached_by: HashMap<&Term, &Statement> = HashMap::new();
        let mut seen: HashSet<&Term> = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);

        while let Some(node) = queue.pop_front() {
            for &statement in adjacency.get(node).into_iter().flatten() {
                let next = &statement.object;
                if !seen.insert(next) {
                    continue;
                }
                reached_by.insert(next, statement);
                if next == end {
                    let mut path = Vec::new();
                    let mut cursor = end;
                    while let Some(&step) = reached_by.get(cursor) {
                        path.push(step.clone());
                        cursor = &step.subject;
                    }
                    path.reverse();
                    return Some(path);
                }
                queue.push_back(next);
            }
        }
        None
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathOutcome {
    Found(Vec<Statement>),
    NoPath,
}

/// Outcome of one root-to-target search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShortestPathResult {
    pub start: Term,
    pub end: Term,
    pub outcome: PathOutcome,
}

impl ShortestPathResult {
    pub fn hops(&self) -> Option<usize> {
        match &self.outcome {
            PathOutcome::Found(path) => Some(path.len()),
            PathOutcome::NoPath => None,
        }
    }

    /// Resources along the path, start first.
    fn nodes(&self) -> Vec<&Term> {
        let mut nodes = vec![&self.start];
        if let PathOutcome::Found(path) = &self.outcome {
            nodes.extend(path.iter().map(|s| &s.object));
        }
        nodes
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportLine {
    pub hops: usize,
    pub text: String,
}

/// Both report sections, already sorted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathReport {
    pub instance_lines: Vec<ReportLine>,
    pub type_lines: Vec<ReportLine>,
    /// One "no path found" entry per unreachable target.
    pub unreachable: Vec<String>,
}

impl PathReport {
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        for (heading, body) in [
            (INSTANCE_SECTION, &self.instance_lines),
            (TYPE_SECTION, &self.type_lines),
        ] {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push(heading.to_owned());
            lines.extend(body.iter().map(|l| format!("{}: {}", l.hops, l.text)));
            lines.extend(self.unreachable.iter().cloned());
        }
        let mut text = lines.join("\n");
        text.push('\n');
        text
    }
}

/// The first subject drawn with an oval border.
pub fn find_root(model: &Model) -> Result<Term> {
    let root = model.subjects().into_iter().find(|subject| {
        model
            .literal(subject, vocab::BORDER_SHAPE)
            .is_some_and(|shape| shape.trim().eq_ignore_ascii_case(vocab::OVAL))
    });
    match root {
        Some(root) => Ok(root.clone()),
        None => crate::report_err!(
            MissingRootNode,
            "no concept has an oval border shape".to_owned()
        ),
    }
}

fn instance_text(model: &Model, result: &ShortestPathResult) -> String {
    let mut text = model.label(&result.start);
    if let PathOutcome::Found(path) = &result.outcome {
        for statement in path {
            let predicate = model.label(&Term::iri(statement.predicate.as_str()));
            text.push_str(&format!(" -[{predicate}]-> {}", model.label(&statement.object)));
        }
    }
    text
}

fn type_text(model: &Model, result: &ShortestPathResult) -> String {
    let hops: Vec<String> = result
        .nodes()
        .into_iter()
        .map(|node| {
            let mut classes: Vec<String> = model
                .types_of(node)
                .into_iter()
                .filter(|class| !vocab::is_marker_type(class))
                .map(|class| model.label(&Term::iri(class)))
                .collect();
            classes.sort();
            classes.dedup();
            format!("{{{}}}", classes.join(", "))
        })
        .collect();
    hops.join(" -> ")
}

/// Search from the root to every other concept and collect both report
/// sections. Unreachable targets are listed, not treated as failures.
pub fn build_report(model: &Model, search: &dyn ShortestPathSearch) -> Result<PathReport> {
    let root = find_root(model)?;
    let targets: Vec<Term> = model
        .resources_of_type(vocab::CONCEPT)
        .into_iter()
        .filter(|t| *t != root)
        .collect();

    let mut report = PathReport::default();
    let mut seen_types = HashSet::new();
    for target in targets {
        let outcome = match search.shortest_path(model, &root, &target) {
            Some(path) => PathOutcome::Found(path),
            None => PathOutcome::NoPath,
        };
        let result = ShortestPathResult {
            start: root.clone(),
            end: target,
            outcome,
        };
        let Some(hops) = result.hops() else {
            report.unreachable.push(format!(
                "no path found: {} -> {}",
                model.label(&result.start),
                model.label(&result.end)
            ));
            continue;
        };

        report.instance_lines.push(ReportLine {
            hops,
            text: instance_text(model, &result),
        });
        let types = type_text(model, &result);
        if seen_types.insert(types.clone()) {
            report.type_lines.push(ReportLine { hops, text: types });
        }
    }

    report.instance_lines.sort_by_key(|l| l.hops);
    report.type_lines.sort_by_key(|l| l.hops);

    tracing::debug!(
        root = %root,
        reached = report.instance_lines.len(),
        unreachable = report.unreachable.len(),
        "path report built"
    );
    Ok(report)
}

/// Build the report and write its rendering to `path`. Nothing is written
/// when the model has no root.
pub fn write_report(
    model: &Model,
    search: &dyn ShortestPathSearch,
    path: &Path,
) -> Result<PathReport> {
    let report = build_report(model, search)?;
    fs::write(path, report.render()).map_err(|err| io_error(ErrorCode::FileWrite, path, err))?;
    tracing::info!(report = %path.display(), "path report written");
    Ok(report)
}
