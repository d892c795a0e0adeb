//! Road-network vocabulary
//!
//! Namespace IRIs and term names shared by the query builders and the
//! RDF converter. Instances live in the `road:` namespace, schema terms in
//! `roadonto:`, the classification scheme uses SKOS.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{Result, RoadnetError};

/// Instance namespace (`road:`)
pub const ROAD_NS: &str = "http://example.org/roadnet/pa#";

/// Ontology namespace (`roadonto:`)
pub const ROADONTO_NS: &str = "http://example.org/roadnet/ontology#";

pub const SKOS_NS: &str = "http://www.w3.org/2004/02/skos/core#";
pub const OWL_NS: &str = "http://www.w3.org/2002/07/owl#";

pub const ROAD_PREFIX: &str = "PREFIX road: <http://example.org/roadnet/pa#>";
pub const ROADONTO_PREFIX: &str = "PREFIX roadonto: <http://example.org/roadnet/ontology#>";
pub const SKOS_PREFIX: &str = "PREFIX skos: <http://www.w3.org/2004/02/skos/core#>";

// roadonto: classes and properties
pub const ROAD_NODE: &str = "RoadNode";
pub const ROAD_EDGE: &str = "RoadEdge";
pub const HAS_NODE_ID: &str = "hasNodeId";
pub const HAS_DEGREE: &str = "hasDegree";
pub const HAS_IN_DEGREE: &str = "hasInDegree";
pub const HAS_OUT_DEGREE: &str = "hasOutDegree";
pub const CONNECTS_TO: &str = "connectsTo";
pub const HAS_CLASSIFICATION: &str = "hasClassification";
pub const MIN_DEGREE: &str = "minDegree";
pub const MAX_DEGREE: &str = "maxDegree";

/// SKOS concept scheme local name in `road:`
pub const CONCEPT_SCHEME: &str = "ConceptScheme";

static NODE_ID_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// Full IRI of a term in the ontology namespace
pub fn roadonto(local: &str) -> String {
    format!("{}{}", ROADONTO_NS, local)
}

/// Full IRI of a term in the instance namespace
pub fn road(local: &str) -> String {
    format!("{}{}", ROAD_NS, local)
}

pub fn skos(local: &str) -> String {
    format!("{}{}", SKOS_NS, local)
}

pub fn owl(local: &str) -> String {
    format!("{}{}", OWL_NS, local)
}

/// Check that a node id can be spliced into a prefixed name
///
/// Ids are limited to ASCII letters, digits, `_` and `-`, which keeps
/// `road:node_<id>` a valid SPARQL prefixed name and rules out injection.
pub fn validate_node_id(id: &str) -> Result<()> {
    if NODE_ID_PATTERN.is_match(id) {
        Ok(())
    } else {
        Err(RoadnetError::InvalidNodeId(id.to_string()))
    }
}

/// Prefixed name of a node (`road:node_42`)
pub fn node_prefixed(id: &str) -> Result<String> {
    validate_node_id(id)?;
    Ok(format!("road:node_{}", id))
}

/// Full IRI of a node (`http://example.org/roadnet/pa#node_42`)
pub fn node_iri(id: i64) -> String {
    road(&format!("node_{}", id))
}

/// Space-separated prefixed names for a VALUES block
pub fn node_list<S: AsRef<str>>(ids: &[S]) -> Result<String> {
    let names = ids
        .iter()
        .map(|id| node_prefixed(id.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    Ok(names.join(" "))
}
