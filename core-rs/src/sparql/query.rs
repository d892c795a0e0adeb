/**
 * query.rs
 * SPARQL query builders for the road-network catalog
 */

use std::fmt;

use crate::errors::Result;
use crate::ontology::classification::Classification;
use crate::ontology::vocab::{self, ROADONTO_PREFIX, ROAD_PREFIX, SKOS_PREFIX};

/// Default page size for node listings
pub const DEFAULT_NODE_LIMIT: u64 = 100;

/// Default page size for edge listings
pub const DEFAULT_EDGE_LIMIT: u64 = 1000;

/// Hard cap on subgraph rows
pub const SUBGRAPH_LIMIT: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparqlQuery {
    query: String,
}

impl SparqlQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.query
    }

    pub fn into_string(self) -> String {
        self.query
    }

    /// Nodes with their degrees, highest degree first
    pub fn nodes(limit: u64, offset: u64) -> Self {
        Self::new(format!(
            r#"
            {roadonto}

            SELECT ?nodeId ?degree ?inDegree ?outDegree
            WHERE {{
                ?node a roadonto:RoadNode ;
                      roadonto:hasNodeId ?nodeId ;
                      roadonto:hasDegree ?degree ;
                      roadonto:hasInDegree ?inDegree ;
                      roadonto:hasOutDegree ?outDegree .
            }}
            ORDER BY DESC(?degree)
            LIMIT {limit}
            OFFSET {offset}
            "#,
            roadonto = ROADONTO_PREFIX,
            limit = limit,
            offset = offset
        ))
    }

    /// Nodes whose degree lies in `min_degree..=max_degree`
    pub fn nodes_by_degree(min_degree: u64, max_degree: u64, limit: u64) -> Self {
        Self::new(format!(
            r#"
            {roadonto}
            {road}
            {skos}

            SELECT ?nodeId ?degree ?classification
            WHERE {{
                ?node a roadonto:RoadNode ;
                      roadonto:hasNodeId ?nodeId ;
                      roadonto:hasDegree ?degree .

                OPTIONAL {{
                    ?node roadonto:hasClassification ?class .
                    ?class skos:prefLabel ?classification .
                }}

                FILTER(?degree >= {min} && ?degree <= {max})
            }}
            ORDER BY DESC(?degree)
            LIMIT {limit}
            "#,
            roadonto = ROADONTO_PREFIX,
            road = ROAD_PREFIX,
            skos = SKOS_PREFIX,
            min = min_degree,
            max = max_degree,
            limit = limit
        ))
    }

    /// `connectsTo` edges, restricted to the given source nodes unless `node_ids` is empty
    pub fn edges<S: AsRef<str>>(limit: u64, offset: u64, node_ids: &[S]) -> Result<Self> {
        let node_filter = if node_ids.is_empty() {
            String::new()
        } else {
            format!("VALUES ?from {{ {} }}", vocab::node_list(node_ids)?)
        };

        Ok(Self::new(format!(
            r#"
            {road}
            {roadonto}

            SELECT ?fromId ?toId ?fromDegree ?toDegree
            WHERE {{
                {node_filter}

                ?from roadonto:connectsTo ?to ;
                      roadonto:hasNodeId ?fromId ;
                      roadonto:hasDegree ?fromDegree .

                ?to roadonto:hasNodeId ?toId ;
                    roadonto:hasDegree ?toDegree .
            }}
            LIMIT {limit}
            OFFSET {offset}
            "#,
            road = ROAD_PREFIX,
            roadonto = ROADONTO_PREFIX,
            node_filter = node_filter,
            limit = limit,
            offset = offset
        )))
    }

    /// Edges touching any center node, in either direction (one hop)
    ///
    /// `?degree` is the degree of the edge's source node.
    pub fn subgraph<S: AsRef<str>>(node_ids: &[S]) -> Result<Self> {
        let node_list = vocab::node_list(node_ids)?;

        Ok(Self::new(format!(
            r#"
            {road}
            {roadonto}

            SELECT DISTINCT ?fromId ?toId ?degree
            WHERE {{
                VALUES ?center {{ {node_list} }}

                {{
                    ?center roadonto:connectsTo ?to .
                    BIND(?center AS ?from)
                }}
                UNION
                {{
                    ?from roadonto:connectsTo ?center .
                    BIND(?center AS ?to)
                }}

                ?from roadonto:hasNodeId ?fromId ;
                      roadonto:hasDegree ?degree .
                ?to roadonto:hasNodeId ?toId .
            }}
            LIMIT {limit}
            "#,
            road = ROAD_PREFIX,
            roadonto = ROADONTO_PREFIX,
            node_list = node_list,
            limit = SUBGRAPH_LIMIT
        )))
    }

    /// Node count per classification label
    pub fn classification_stats() -> Self {
        Self::new(format!(
            r#"
            {road}
            {roadonto}
            {skos}

            SELECT ?label (COUNT(?node) AS ?count)
            WHERE {{
                ?node a roadonto:RoadNode ;
                      roadonto:hasClassification ?class .

                ?class skos:prefLabel ?label .
            }}
            GROUP BY ?label
            ORDER BY DESC(?count)
            "#,
            road = ROAD_PREFIX,
            roadonto = ROADONTO_PREFIX,
            skos = SKOS_PREFIX
        ))
    }

    /// Node count per degree, lowest degree first
    pub fn degree_distribution() -> Self {
        Self::new(format!(
            r#"
            {roadonto}

            SELECT ?degree (COUNT(?node) AS ?count)
            WHERE {{
                ?node a roadonto:RoadNode ;
                      roadonto:hasDegree ?degree .
            }}
            GROUP BY ?degree
            ORDER BY ?degree
            "#,
            roadonto = ROADONTO_PREFIX
        ))
    }

    pub fn network_stats() -> Self {
        Self::new(format!(
            r#"
            {roadonto}

            SELECT
                (COUNT(DISTINCT ?node) AS ?totalNodes)
                (AVG(?degree) AS ?avgDegree)
                (MAX(?degree) AS ?maxDegree)
                (MIN(?degree) AS ?minDegree)
            WHERE {{
                ?node a roadonto:RoadNode ;
                      roadonto:hasDegree ?degree .
            }}
            "#,
            roadonto = ROADONTO_PREFIX
        ))
    }

    /// SKOS concepts of the classification scheme
    pub fn concept_hierarchy() -> Self {
        Self::new(format!(
            r#"
            {road}
            {skos}
            {roadonto}

            SELECT ?concept ?label ?definition ?broader ?minDegree ?maxDegree
            WHERE {{
                ?concept a skos:Concept ;
                         skos:inScheme road:ConceptScheme ;
                         skos:prefLabel ?label ;
                         skos:definition ?definition .

                OPTIONAL {{ ?concept skos:broader ?broader }}
                OPTIONAL {{ ?concept roadonto:minDegree ?minDegree }}
                OPTIONAL {{ ?concept roadonto:maxDegree ?maxDegree }}
            }}
            "#,
            road = ROAD_PREFIX,
            skos = SKOS_PREFIX,
            roadonto = ROADONTO_PREFIX
        ))
    }

    /// Degree-1 nodes classified as dead ends
    pub fn dead_ends(limit: u64) -> Self {
        Self::new(format!(
            r#"
            {road}
            {roadonto}

            SELECT ?nodeId
            WHERE {{
                ?node a roadonto:RoadNode ;
                      roadonto:hasNodeId ?nodeId ;
                      roadonto:hasDegree 1 ;
                      roadonto:hasClassification {dead_end} .
            }}
            LIMIT {limit}
            "#,
            road = ROAD_PREFIX,
            roadonto = ROADONTO_PREFIX,
            dead_end = Classification::DeadEnd.prefixed(),
            limit = limit
        ))
    }

    /// Nodes labelled "Major Hub" or "Super Hub", highest degree first
    ///
    /// Labels are compared by lexical form so language-tagged labels match.
    pub fn major_hubs(limit: u64) -> Self {
        Self::new(format!(
            r#"
            {road}
            {roadonto}
            {skos}

            SELECT ?nodeId ?degree ?label
            WHERE {{
                ?node a roadonto:RoadNode ;
                      roadonto:hasNodeId ?nodeId ;
                      roadonto:hasDegree ?degree ;
                      roadonto:hasClassification ?class .

                ?class skos:prefLabel ?label .
                FILTER(STR(?label) IN ("{major}", "{super_hub}"))
            }}
            ORDER BY DESC(?degree)
            LIMIT {limit}
            "#,
            road = ROAD_PREFIX,
            roadonto = ROADONTO_PREFIX,
            skos = SKOS_PREFIX,
            major = Classification::MajorHub.label(),
            super_hub = Classification::SuperHub.label(),
            limit = limit
        ))
    }
}

impl fmt::Display for SparqlQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.query)
    }
}

impl AsRef<str> for SparqlQuery {
    fn as_ref(&self) -> &str {
        &self.query
    }
}

impl From<String> for SparqlQuery {
    fn from(query: String) -> Self {
        Self::new(query)
    }
}

impl From<&str> for SparqlQuery {
    fn from(query: &str) -> Self {
        Self::new(query)
    }
}
