// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! In-memory triple model.
//!
//! Statements are kept in insertion order; every enumeration in the graph
//! algorithms follows that order, which is what makes cycle breaking and
//! path search reproducible for a given model.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::{Error, ErrorCode, ErrorKind, Result, io_error};
use crate::vocab;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Term {
    Iri(String),
    Blank(String),
    Literal {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        datatype: Option<String>,
    },
}

impl Term {
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    pub fn blank(label: impl Into<String>) -> Self {
        Term::Blank(label.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal {
            value: value.into(),
            datatype: None,
        }
    }

    pub fn typed_literal(value: impl Into<String>, datatype: &str) -> Self {
        Term::Literal {
            value: value.into(),
            datatype: Some(datatype.to_owned()),
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal { .. })
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn literal_value(&self) -> Option<&str> {
        match self {
            Term::Literal { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Identity used for visited-tracking: the IRI, or the blank node label.
    /// Literals have no identity as graph nodes.
    pub fn node_key(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            Term::Blank(label) => Some(label),
            Term::Literal { .. } => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{iri}>"),
            Term::Blank(label) => write!(f, "_:{label}"),
            Term::Literal {
                value,
                datatype: None,
            } => write!(f, "{value:?}"),
            Term::Literal {
                value,
                datatype: Some(dt),
            } => write!(f, "{value:?}^^<{dt}>"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Statement {
    pub subject: Term,
    pub predicate: String,
    pub object: Term,
}

impl Statement {
    pub fn new(subject: Term, predicate: &str, object: Term) -> Self {
        Statement {
            subject,
            predicate: predicate.to_owned(),
            object,
        }
    }

    /// True when either end of the statement is `term`.
    pub fn touches(&self, term: &Term) -> bool {
        &self.subject == term || &self.object == term
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} <{}> {} .", self.subject, self.predicate, self.object)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    #[serde(default)]
    pub prefixes: BTreeMap<String, String>,
    #[serde(default)]
    pub statements: Vec<Statement>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, subject: Term, predicate: &str, object: Term) -> &mut Self {
        self.statements
            .push(Statement::new(subject, predicate, object));
        self
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn statements_about<'a, 'b>(
        &'a self,
        subject: &'b Term,
    ) -> impl Iterator<Item = &'a Statement> + use<'a, 'b> {
        self.statements.iter().filter(move |s| &s.subject == subject)
    }

    pub fn statements_pointing_at<'a, 'b>(
        &'a self,
        object: &'b Term,
    ) -> impl Iterator<Item = &'a Statement> + use<'a, 'b> {
        self.statements.iter().filter(move |s| &s.object == object)
    }

    /// First object of `predicate` on `subject`, in model order.
    pub fn object(&self, subject: &Term, predicate: &str) -> Option<&Term> {
        self.statements_about(subject)
            .find(|s| s.predicate == predicate)
            .map(|s| &s.object)
    }

    pub fn literal(&self, subject: &Term, predicate: &str) -> Option<&str> {
        self.statements_about(subject)
            .filter(|s| s.predicate == predicate)
            .find_map(|s| s.object.literal_value())
    }

    /// Numeric value of a literal. A literal that is present but not a number
    /// is an error rather than an absent value.
    pub fn literal_f64(&self, subject: &Term, predicate: &str) -> Result<Option<f64>> {
        let Some(value) = self.literal(subject, predicate) else {
            return Ok(None);
        };
        match value.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Some(n)),
            _ => crate::model_err!(
                BadLiteral,
                format!("{subject} {predicate}: '{value}' is not a finite number")
            ),
        }
    }

    /// Replace every `predicate` literal on `subject` with a single new one,
    /// keeping the position of the first replaced statement.
    pub fn set_literal(&mut self, subject: &Term, predicate: &str, object: Term) {
        let mut replaced = false;
        self.statements.retain_mut(|s| {
            if &s.subject != subject || s.predicate != predicate || !s.object.is_literal() {
                return true;
            }
            if replaced {
                return false;
            }
            s.object = object.clone();
            replaced = true;
            true
        });
        if !replaced {
            self.add(subject.clone(), predicate, object);
        }
    }

    /// IRIs of the classes `subject` is declared an instance of.
    pub fn types_of(&self, subject: &Term) -> Vec<&str> {
        self.statements_about(subject)
            .filter(|s| s.predicate == vocab::RDF_TYPE)
            .filter_map(|s| s.object.as_iri())
            .collect()
    }

    /// Distinct subjects in order of first appearance.
    pub fn subjects(&self) -> Vec<&Term> {
        let mut seen = HashSet::new();
        self.statements
            .iter()
            .map(|s| &s.subject)
            .filter(|t| seen.insert(*t))
            .collect()
    }

    /// Distinct resources typed with `class`, in model order.
    pub fn resources_of_type(&self, class: &str) -> Vec<Term> {
        let mut seen = HashSet::new();
        let mut resources = Vec::new();
        for s in &self.statements {
            if s.predicate == vocab::RDF_TYPE
                && s.object.as_iri() == Some(class)
                && seen.insert(&s.subject)
            {
                resources.push(s.subject.clone());
            }
        }
        resources
    }

    /// True when `subject` carries a boolean flag literal set to true.
    pub fn is_flagged(&self, subject: &Term, flag: &str) -> bool {
        self.statements_about(subject)
            .filter(|s| s.predicate == flag)
            .filter_map(|s| s.object.literal_value())
            .any(|v| matches!(v.trim(), "true" | "1"))
    }

    /// Resources carrying `flag`, in model order.
    pub fn flagged(&self, flag: &str) -> Vec<Term> {
        self.subjects()
            .into_iter()
            .filter(|t| self.is_flagged(t, flag))
            .cloned()
            .collect()
    }

    /// Human-readable label: title, preferred label, generic label, then the
    /// IRI's local name or the blank node label.
    pub fn label(&self, term: &Term) -> String {
        if !term.is_literal() {
            for property in vocab::LABEL_PROPERTIES {
                if let Some(label) = self.literal(term, property) {
                    return label.to_owned();
                }
            }
        }
        match term {
            Term::Iri(iri) => local_name(iri).to_owned(),
            Term::Blank(label) => label.clone(),
            Term::Literal { value, .. } => value.clone(),
        }
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn to_writer(&self, writer: impl Write) -> Result<()> {
        serde_json::to_writer_pretty(writer, self).map_err(|err| {
            Error::new(
                ErrorKind::Model,
                ErrorCode::JsonSerialization,
                Some(err.to_string()),
            )
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|err| io_error(ErrorCode::FileRead, path, err))?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|err| io_error(ErrorCode::FileWrite, path, err))?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer)?;
        writer
            .flush()
            .map_err(|err| io_error(ErrorCode::FileWrite, path, err))
    }
}

/// Portion of an IRI after its last `#`, `/` or `:`.
pub fn local_name(iri: &str) -> &str {
    match iri.rfind(['#', '/', ':']) {
        Some(idx) if idx + 1 < iri.len() => &iri[idx + 1..],
        _ => iri,
    }
}

/// Namespace prefix table used to compact IRIs when rendering queries.
#[derive(Clone, Debug)]
pub struct PrefixMap {
    entries: Vec<(String, String)>,
}

impl PrefixMap {
    /// Standard prefixes merged with the model's own declarations. A model
    /// prefix with a standard name replaces the standard namespace.
    pub fn for_model(model: &Model) -> Self {
        let mut entries: Vec<(String, String)> = vocab::STANDARD_PREFIXES
            .iter()
            .filter(|(prefix, _)| !model.prefixes.contains_key(*prefix))
            .map(|(prefix, ns)| ((*prefix).to_owned(), (*ns).to_owned()))
            .collect();
        entries.extend(
            model
                .prefixes
                .iter()
                .map(|(prefix, ns)| (prefix.clone(), ns.clone())),
        );
        PrefixMap { entries }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, ns)| (p.as_str(), ns.as_str()))
    }

    /// `prefix:local` for the longest matching namespace, provided the local
    /// part is a plain name.
    pub fn compact(&self, iri: &str) -> Option<String> {
        let (prefix, ns) = self
            .entries
            .iter()
            .filter(|(_, ns)| iri.starts_with(ns.as_str()))
            .max_by_key(|(_, ns)| ns.len())?;
        let local = &iri[ns.len()..];
        let plain = !local.is_empty()
            && local
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '-');
        plain.then(|| format!("{prefix}:{local}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Model {
        let mut model = Model::new();
        let alice = Term::iri("http://example.org/alice");
        model
            .add(alice.clone(), vocab::RDF_TYPE, Term::iri(vocab::CONCEPT))
            .add(alice.clone(), vocab::RDFS_LABEL, Term::literal("generic"))
            .add(alice.clone(), vocab::SKOS_PREF_LABEL, Term::literal("Alice"))
            .add(alice.clone(), vocab::X, Term::literal("12.5"))
            .add(alice, vocab::IS_SOURCE, Term::literal("true"));
        model
    }

    #[test]
    fn test_label_priority() {
        let model = sample();
        let alice = Term::iri("http://example.org/alice");
        assert_eq!(model.label(&alice), "Alice");

        let mut model = model;
        model.add(alice.clone(), vocab::DC_TITLE, Term::literal("Dr. Alice"));
        assert_eq!(model.label(&alice), "Dr. Alice");

        assert_eq!(model.label(&Term::iri("http://example.org/ns#bob")), "bob");
        assert_eq!(model.label(&Term::blank("b7")), "b7");
    }

    #[test]
    fn test_literal_f64() {
        let model = sample();
        let alice = Term::iri("http://example.org/alice");
        assert_eq!(model.literal_f64(&alice, vocab::X).unwrap(), Some(12.5));
        assert_eq!(model.literal_f64(&alice, vocab::Y).unwrap(), None);

        let err = model.literal_f64(&alice, vocab::RDFS_LABEL).unwrap_err();
        assert_eq!(err.code, ErrorCode::BadLiteral);
    }

    #[test]
    fn test_set_literal_replaces_in_place() {
        let mut model = sample();
        let alice = Term::iri("http://example.org/alice");
        let before = model.len();
        model.set_literal(&alice, vocab::X, Term::literal("100"));
        assert_eq!(model.len(), before);
        assert_eq!(model.literal(&alice, vocab::X), Some("100"));
        assert_eq!(model.statements[3].predicate, vocab::X);

        model.set_literal(&alice, vocab::Y, Term::literal("7"));
        assert_eq!(model.len(), before + 1);
        assert_eq!(model.literal(&alice, vocab::Y), Some("7"));
    }

    #[test]
    fn test_lookups_outlive_subject_key() {
        let model = sample();
        let (object, label, types, about, pointing) = {
            let key = Term::iri("http://example.org/alice");
            let concept = Term::iri(vocab::CONCEPT);
            (
                model.object(&key, vocab::X),
                model.literal(&key, vocab::SKOS_PREF_LABEL),
                model.types_of(&key),
                model.statements_about(&key).collect::<Vec<_>>(),
                model.statements_pointing_at(&concept).collect::<Vec<_>>(),
            )
        };
        assert_eq!(object, Some(&Term::literal("12.5")));
        assert_eq!(label, Some("Alice"));
        assert_eq!(types, vec![vocab::CONCEPT]);
        assert_eq!(about.len(), 5);
        assert_eq!(pointing.len(), 1);
        assert_eq!(pointing[0].predicate, vocab::RDF_TYPE);
    }

    #[test]
    fn test_flags_and_types() {
        let model = sample();
        let alice = Term::iri("http://example.org/alice");
        assert!(model.is_flagged(&alice, vocab::IS_SOURCE));
        assert!(!model.is_flagged(&alice, vocab::IS_TARGET));
        assert_eq!(model.flagged(vocab::IS_SOURCE), vec![alice.clone()]);
        assert_eq!(model.types_of(&alice), vec![vocab::CONCEPT]);
        assert_eq!(model.resources_of_type(vocab::CONCEPT), vec![alice]);
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name("http://example.org/ns#thing"), "thing");
        assert_eq!(local_name("http://example.org/thing"), "thing");
        assert_eq!(local_name("urn:cmap:vocab#x"), "x");
        assert_eq!(local_name("http://example.org/"), "http://example.org/");
    }

    #[test]
    fn test_prefix_map_compact() {
        let mut model = Model::new();
        model
            .prefixes
            .insert("ex".to_owned(), "http://example.org/".to_owned());
        model
            .prefixes
            .insert("exv".to_owned(), "http://example.org/vocab/".to_owned());
        let prefixes = PrefixMap::for_model(&model);

        assert_eq!(
            prefixes.compact(vocab::RDF_TYPE).as_deref(),
            Some("rdf:type")
        );
        assert_eq!(
            prefixes.compact("http://example.org/vocab/knows").as_deref(),
            Some("exv:knows")
        );
        assert_eq!(
            prefixes.compact("http://example.org/alice").as_deref(),
            Some("ex:alice")
        );
        assert_eq!(prefixes.compact("http://example.org/a/b"), None);
        assert_eq!(prefixes.compact("http://elsewhere.net/x"), None);
    }

    #[test]
    fn test_json_roundtrip_shape() {
        let model = sample();
        let mut buf = Vec::new();
        model.to_writer(&mut buf).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.contains("\"iri\""));
        assert!(text.contains("\"literal\""));
        let back = Model::from_reader(buf.as_slice()).unwrap();
        assert_eq!(back, model);

        let err = Model::from_reader("{\"statements\": 3}".as_bytes()).unwrap_err();
        assert_eq!(err.code, ErrorCode::JsonDeserialization);
    }
}
