/**
 * ontology module
 *
 * - vocab: road-network namespaces, terms and node IRIs
 * - classification: SKOS degree classification scheme
 * - converter: edge list → RDF graph (oxigraph) → Turtle / N-Triples
 */

pub mod classification;
pub mod converter;
pub mod vocab;

pub use classification::Classification;
pub use converter::{ConversionOutput, EdgeListOptions, NetworkSummary, NodeDegree, RdfConverter, RoadNetwork};
