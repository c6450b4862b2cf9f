// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::{HashMap, HashSet};

use crate::config::Config;
use crate::model::{Model, PrefixMap, Statement, Term, local_name};
use crate::vocab;

use super::QueryText;
use super::path::PathState;

const INDENT: &str = "  ";

/// Replace anything that cannot appear in a query name with `_`.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Statements the query extensions never add: flags, drawing data and
/// assertions of the vocabulary's own marker types.
fn is_auxiliary(statement: &Statement) -> bool {
    vocab::is_flag(&statement.predicate)
        || vocab::is_presentation(&statement.predicate)
        || (statement.predicate == vocab::RDF_TYPE
            && statement.object.as_iri().is_some_and(vocab::is_marker_type))
}

/// Query-text names for terms, stable for the lifetime of one rendering.
struct TermNames<'a> {
    model: &'a Model,
    prefixes: PrefixMap,
    assigned: HashMap<Term, String>,
    next_var: usize,
    next_blank: usize,
}

impl<'a> TermNames<'a> {
    fn new(model: &'a Model) -> Self {
        TermNames {
            model,
            prefixes: PrefixMap::for_model(model),
            assigned: HashMap::new(),
            next_var: 0,
            next_blank: 0,
        }
    }

    /// Prefixed name when a namespace matches, otherwise a fresh `?rN`
    /// variable on first sight. Blank nodes are named after their first
    /// declared type.
    fn term(&mut self, term: &Term) -> String {
        match term {
            Term::Iri(iri) => {
                if let Some(compact) = self.prefixes.compact(iri) {
                    return compact;
                }
                if let Some(name) = self.assigned.get(term) {
                    return name.clone();
                }
                let name = format!("?r{}", self.next_var);
                self.next_var += 1;
                self.assigned.insert(term.clone(), name.clone());
                name
            }
            Term::Blank(_) => {
                if let Some(name) = self.assigned.get(term) {
                    return name.clone();
                }
                let kind = self
                    .model
                    .types_of(term)
                    .first()
                    .map(|class| sanitize(local_name(class)))
                    .unwrap_or_else(|| "node".to_owned());
                self.next_blank += 1;
                let name = format!("_:{kind}{}", self.next_blank);
                self.assigned.insert(term.clone(), name.clone());
                name
            }
            Term::Literal {
                value,
                datatype: None,
            } => quote(value),
            Term::Literal {
                value,
                datatype: Some(datatype),
            } => format!("{}^^{}", quote(value), self.predicate(datatype)),
        }
    }

    fn predicate(&self, iri: &str) -> String {
        self.prefixes
            .compact(iri)
            .unwrap_or_else(|| format!("<{iri}>"))
    }
}

/// One triple pattern line, with the labels used by the readable variant.
struct Pattern {
    text: String,
    labels: String,
}

impl Pattern {
    fn line(&self, readable: bool) -> String {
        if readable {
            format!("{INDENT}{} # {}", self.text, self.labels)
        } else {
            format!("{INDENT}{}", self.text)
        }
    }
}

struct QueryRenderer<'a> {
    model: &'a Model,
    config: &'a Config,
    target: &'a Term,
    names: TermNames<'a>,
    emitted: HashSet<&'a Statement>,
    body: Vec<Pattern>,
}

impl<'a> QueryRenderer<'a> {
    fn new(model: &'a Model, config: &'a Config, target: &'a Term) -> Self {
        QueryRenderer {
            model,
            config,
            target,
            names: TermNames::new(model),
            emitted: HashSet::new(),
            body: Vec::new(),
        }
    }

    fn emit(&mut self, statement: &'a Statement) {
        if !self.emitted.insert(statement) {
            return;
        }
        let text = format!(
            "{} {} {} .",
            self.names.term(&statement.subject),
            self.names.predicate(&statement.predicate),
            self.names.term(&statement.object)
        );
        let labels = format!(
            "{} {} {}",
            self.model.label(&statement.subject),
            self.model.label(&Term::iri(statement.predicate.as_str())),
            self.model.label(&statement.object)
        );
        self.body.push(Pattern { text, labels });
    }

    /// Other properties of every subject on the path.
    fn add_path_properties(&mut self, path: &'a [Statement]) {
        let model = self.model;
        let mut seen = HashSet::new();
        for subject in path.iter().map(|s| &s.subject) {
            if subject == self.target || !seen.insert(subject) {
                continue;
            }
            for statement in model.statements_about(subject) {
                if &statement.object != subject && !is_auxiliary(statement) {
                    self.emit(statement);
                }
            }
        }
    }

    /// Every remaining statement except those about the target itself.
    fn add_all_statements(&mut self) {
        let model = self.model;
        for statement in &model.statements {
            if &statement.subject != self.target && !is_auxiliary(statement) {
                self.emit(statement);
            }
        }
    }

    /// The target's own properties, each bound to a variable derived from
    /// its predicate name.
    fn target_properties(&mut self) -> (Vec<String>, Vec<Pattern>) {
        let mut used = HashSet::new();
        let mut variables = Vec::new();
        let mut patterns = Vec::new();
        let target_name = self.names.term(self.target);
        let target_label = self.model.label(self.target);

        for statement in self.model.statements_about(self.target) {
            if statement.predicate == vocab::RDF_TYPE
                || vocab::is_flag(&statement.predicate)
                || vocab::is_presentation(&statement.predicate)
            {
                continue;
            }
            let mut base = sanitize(local_name(&statement.predicate));
            if base.is_empty() {
                base = "value".to_owned();
            }
            let mut name = base.clone();
            let mut n = 2;
            while !used.insert(name.clone()) {
                name = format!("{base}{n}");
                n += 1;
            }
            let variable = format!("?{name}");
            patterns.push(Pattern {
                text: format!(
                    "{target_name} {} {variable} .",
                    self.names.predicate(&statement.predicate)
                ),
                labels: format!(
                    "{target_label} {} {variable}",
                    self.model.label(&Term::iri(statement.predicate.as_str()))
                ),
            });
            variables.push(variable);
        }
        (variables, patterns)
    }

    fn assemble(&self, variables: &[String], properties: &[Pattern], readable: bool) -> String {
        let mut lines: Vec<String> = self
            .names
            .prefixes
            .entries()
            .map(|(prefix, ns)| format!("PREFIX {prefix}: <{ns}>"))
            .collect();
        lines.push(String::new());

        if variables.is_empty() {
            lines.push("SELECT DISTINCT *".to_owned());
        } else {
            lines.push(format!("SELECT DISTINCT {}", variables.join(" ")));
        }
        lines.push("WHERE {".to_owned());
        lines.extend(self.body.iter().map(|p| p.line(readable)));
        if !properties.is_empty() {
            lines.push(String::new());
            lines.extend(properties.iter().map(|p| p.line(readable)));
        }
        lines.push("}".to_owned());

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    fn render(mut self, state: &'a PathState) -> QueryText {
        for statement in &state.statements {
            self.emit(statement);
        }
        let hops = self.body.len();
        if self.config.include_path_properties {
            self.add_path_properties(&state.statements);
        }
        if self.config.include_all_nodes {
            self.add_all_statements();
        }
        let (variables, properties) = self.target_properties();

        QueryText {
            query: self.assemble(&variables, &properties, false),
            readable: self.assemble(&variables, &properties, true),
            found_path: state.found_target,
            hops,
        }
    }
}

/// Render the query for a finished search: prefixes, a `SELECT DISTINCT`
/// over the target's properties, and a `WHERE` block holding the path, any
/// configured extension statements and then the target's property patterns.
pub fn render(model: &Model, config: &Config, target: &Term, state: &PathState) -> QueryText {
    QueryRenderer::new(model, config, target).render(state)
}
