//! # roadnet-sparql
//!
//! Client library for a road-network knowledge graph served over the SPARQL
//! 1.1 protocol.
//!
//! ## Key Features
//!
//! - Fixed catalog of analytical queries (node degree, connectivity,
//!   classification, SKOS hierarchy)
//! - SPARQL Results JSON flattened into plain `variable → value` rows
//! - Converter from SNAP edge lists to the RDF graph the catalog queries
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  POST application/sparql-query   ┌──────────────┐
//! │ SparqlClient │ ───────────────────────────────▶ │ triplestore  │
//! │  (catalog)   │ ◀─────────────────────────────── │  (Fuseki…)   │
//! └──────────────┘  application/sparql-results+json └──────────────┘
//!        ▲                                                 ▲
//!        │ ResultSet                        roadnet_complete.ttl
//!        │                                                 │
//!     caller                                  RdfConverter (edge list)
//! ```

pub mod config;
pub mod errors;
pub mod ontology;
pub mod sparql;

pub use config::{ClientConfig, DEFAULT_ENDPOINT};
pub use errors::{Result, RoadnetError};
pub use ontology::{Classification, EdgeListOptions, NetworkSummary, RdfConverter, RoadNetwork};
pub use sparql::{flatten_bindings, ResultRow, ResultSet, SparqlClient, SparqlQuery};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
