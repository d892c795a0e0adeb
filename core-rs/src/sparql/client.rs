//! HTTP client for the road-network SPARQL endpoint
//!
//! Every catalog method builds a [`SparqlQuery`], POSTs it with
//! `Content-Type: application/sparql-query` and flattens the JSON bindings.
//! There is no retry and no timeout unless one is configured.

use once_cell::sync::OnceCell;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, warn};

use super::query::SparqlQuery;
use super::results::{flatten_bindings, ResultRow, ResultSet};
use crate::config::{ClientConfig, DEFAULT_ENDPOINT};
use crate::errors::{Result, RoadnetError};

pub const SPARQL_QUERY_CONTENT_TYPE: &str = "application/sparql-query";
pub const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

static SHARED_CLIENT: OnceCell<SparqlClient> = OnceCell::new();

/// Query client bound to one SPARQL endpoint
#[derive(Debug, Clone)]
pub struct SparqlClient {
    endpoint: String,
    http: Client,
}

impl Default for SparqlClient {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl SparqlClient {
    /// Create a client for `endpoint`; the URL is stored verbatim
    ///
    /// # Example
    ///
    /// ```
    /// use roadnet_sparql::SparqlClient;
    ///
    /// let client = SparqlClient::new("http://localhost:3030/roadnet/sparql");
    /// assert_eq!(client.endpoint(), "http://localhost:3030/roadnet/sparql");
    /// ```
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: Client::new(),
        }
    }

    /// Create a client applying the configured timeout and user agent
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }

        Ok(Self {
            endpoint: config.endpoint.clone(),
            http: builder.build()?,
        })
    }

    /// Process-wide client built from the default configuration
    ///
    /// Initialized on first use; `ROADNET_SPARQL_ENDPOINT` is honoured.
    pub fn shared() -> &'static SparqlClient {
        SHARED_CLIENT.get_or_init(|| {
            let config = ClientConfig::from_env();
            Self::from_config(&config).unwrap_or_else(|e| {
                warn!("Falling back to plain HTTP client: {}", e);
                Self::new(config.endpoint)
            })
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run raw SPARQL text and flatten the bindings
    ///
    /// Failures are logged before they are returned.
    pub async fn query(&self, sparql: &str) -> Result<ResultSet> {
        match self.send_query(sparql).await {
            Ok(rows) => {
                debug!("SPARQL query returned {} rows", rows.len());
                Ok(rows)
            }
            Err(e) => {
                error!("SPARQL query error against {}: {}", self.endpoint, e);
                Err(e)
            }
        }
    }

    pub async fn execute(&self, query: &SparqlQuery) -> Result<ResultSet> {
        self.query(query.as_str()).await
    }

    async fn send_query(&self, sparql: &str) -> Result<ResultSet> {
        debug!("Executing SPARQL query against {}", self.endpoint);
        debug!("Query: {}", sparql);

        let response = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, SPARQL_QUERY_CONTENT_TYPE)
            .header(ACCEPT, SPARQL_RESULTS_JSON)
            .body(sparql.to_string())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RoadnetError::from_status(status));
        }

        let body = response.bytes().await?;
        let data: Value = serde_json::from_slice(&body)?;

        Ok(flatten_bindings(&data))
    }

    /// Build a query that may reject its input, logging the rejection
    fn build(&self, built: Result<SparqlQuery>) -> Result<SparqlQuery> {
        built.map_err(|e| {
            error!("SPARQL query error: {}", e);
            e
        })
    }

    /// nodeId, degree, inDegree, outDegree; highest degree first
    pub async fn get_nodes(&self, limit: u64, offset: u64) -> Result<ResultSet> {
        self.execute(&SparqlQuery::nodes(limit, offset)).await
    }

    /// nodeId, degree and optional classification label
    pub async fn get_nodes_by_degree(
        &self,
        min_degree: u64,
        max_degree: u64,
        limit: u64,
    ) -> Result<ResultSet> {
        self.execute(&SparqlQuery::nodes_by_degree(min_degree, max_degree, limit))
            .await
    }

    /// fromId, toId, fromDegree, toDegree; `node_ids` restricts the source node
    pub async fn get_edges<S: AsRef<str>>(
        &self,
        limit: u64,
        offset: u64,
        node_ids: &[S],
    ) -> Result<ResultSet> {
        let query = self.build(SparqlQuery::edges(limit, offset, node_ids))?;
        self.execute(&query).await
    }

    /// fromId, toId, degree for edges incident to any of `node_ids`
    ///
    /// Only direct neighbours are returned whatever `depth` is.
    pub async fn get_subgraph<S: AsRef<str>>(&self, node_ids: &[S], depth: u32) -> Result<ResultSet> {
        if depth > 1 {
            debug!("Subgraph depth {} requested, returning one hop", depth);
        }
        let query = self.build(SparqlQuery::subgraph(node_ids))?;
        self.execute(&query).await
    }

    /// label, count
    pub async fn get_classification_stats(&self) -> Result<ResultSet> {
        self.execute(&SparqlQuery::classification_stats()).await
    }

    /// degree, count
    pub async fn get_degree_distribution(&self) -> Result<ResultSet> {
        self.execute(&SparqlQuery::degree_distribution()).await
    }

    /// totalNodes, avgDegree, maxDegree, minDegree; empty row when nothing came back
    pub async fn get_network_stats(&self) -> Result<ResultRow> {
        let rows = self.execute(&SparqlQuery::network_stats()).await?;
        Ok(rows.into_iter().next().unwrap_or_default())
    }

    /// concept, label, definition and optional broader/minDegree/maxDegree
    pub async fn get_concept_hierarchy(&self) -> Result<ResultSet> {
        self.execute(&SparqlQuery::concept_hierarchy()).await
    }

    pub async fn get_dead_ends(&self, limit: u64) -> Result<ResultSet> {
        self.execute(&SparqlQuery::dead_ends(limit)).await
    }

    /// nodeId, degree, label for major and super hubs
    pub async fn get_major_hubs(&self, limit: u64) -> Result<ResultSet> {
        self.execute(&SparqlQuery::major_hubs(limit)).await
    }
}
