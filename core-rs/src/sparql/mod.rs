/**
 * sparql module
 *
 * - query: SPARQL query builders for the road-network catalog
 * - results: SPARQL Results JSON flattening
 * - client: HTTP client executing catalog queries against an endpoint
 */

pub mod client;
pub mod query;
pub mod results;

pub use client::{SparqlClient, SPARQL_QUERY_CONTENT_TYPE, SPARQL_RESULTS_JSON};
pub use query::{SparqlQuery, DEFAULT_EDGE_LIMIT, DEFAULT_NODE_LIMIT, SUBGRAPH_LIMIT};
pub use results::{flatten_bindings, ResultRow, ResultSet};
