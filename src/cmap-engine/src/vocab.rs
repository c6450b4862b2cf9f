// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Fixed vocabulary shared by the concept-map converter and the graph
//! algorithms: resource type markers, presentation literals, connection
//! endpoints, source/target flags and label properties.

pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
pub const SKOS: &str = "http://www.w3.org/2004/02/skos/core#";
pub const DC: &str = "http://purl.org/dc/elements/1.1/";
pub const CMAP: &str = "urn:cmap:vocab#";

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

pub const DC_TITLE: &str = "http://purl.org/dc/elements/1.1/title";
pub const SKOS_PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

/// Label properties in lookup priority order.
pub const LABEL_PROPERTIES: [&str; 3] = [DC_TITLE, SKOS_PREF_LABEL, RDFS_LABEL];

pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

// Resource types
pub const CONCEPT: &str = "urn:cmap:vocab#Concept";
pub const LINK: &str = "urn:cmap:vocab#Link";
pub const CONNECTION: &str = "urn:cmap:vocab#Connection";

// Presentation literals
pub const X: &str = "urn:cmap:vocab#x";
pub const Y: &str = "urn:cmap:vocab#y";
pub const WIDTH: &str = "urn:cmap:vocab#width";
pub const HIERARCHY_LEVEL: &str = "urn:cmap:vocab#hierarchyLevel";
pub const BORDER_SHAPE: &str = "urn:cmap:vocab#borderShape";

/// Border shape marking the single root concept of a map.
pub const OVAL: &str = "oval";

// Connection endpoints
pub const FROM: &str = "urn:cmap:vocab#from";
pub const TO: &str = "urn:cmap:vocab#to";

// Query flags
pub const IS_SOURCE: &str = "urn:cmap:vocab#isSource";
pub const IS_TARGET: &str = "urn:cmap:vocab#isTarget";

/// Prefixes known to every model, in declaration order.
pub const STANDARD_PREFIXES: [(&str, &str); 7] = [
    ("rdf", RDF),
    ("rdfs", RDFS),
    ("owl", OWL),
    ("xsd", XSD),
    ("skos", SKOS),
    ("dc", DC),
    ("cmap", CMAP),
];

pub fn is_flag(predicate: &str) -> bool {
    predicate == IS_SOURCE || predicate == IS_TARGET
}

/// Predicates that only describe how the map is drawn, not what it says.
pub fn is_presentation(predicate: &str) -> bool {
    matches!(
        predicate,
        X | Y | WIDTH | HIERARCHY_LEVEL | BORDER_SHAPE | FROM | TO
    )
}

/// Predicates that carry meaning in the semantic model: not a type
/// assertion, not a flag and not a presentation literal.
pub fn is_semantic(predicate: &str) -> bool {
    predicate != RDF_TYPE && !is_flag(predicate) && !is_presentation(predicate)
}

/// Vocabulary resource types that are markers rather than ontology classes.
pub fn is_marker_type(class: &str) -> bool {
    matches!(class, CONCEPT | LINK | CONNECTION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicate_classification() {
        assert!(is_flag(IS_SOURCE));
        assert!(is_flag(IS_TARGET));
        assert!(!is_flag(X));

        assert!(is_presentation(X));
        assert!(is_presentation(FROM));
        assert!(!is_presentation(RDFS_LABEL));

        assert!(!is_semantic(RDF_TYPE));
        assert!(!is_semantic(IS_TARGET));
        assert!(!is_semantic(WIDTH));
        assert!(is_semantic("http://example.org/knows"));
    }

    #[test]
    fn test_vocabulary_lives_in_cmap_namespace() {
        for term in [CONCEPT, LINK, CONNECTION, X, Y, FROM, TO, IS_SOURCE] {
            assert!(term.starts_with(CMAP), "{term} outside {CMAP}");
        }
        assert!(RDF_TYPE.starts_with(RDF));
    }
}
