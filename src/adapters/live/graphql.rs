//! Live adapter for the `RowSource` port querying a GraphQL endpoint.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::graph::Rows;
use crate::ports::rows::{RowSource, RowsFuture};

/// Selects every column the linker needs from the three tables.
pub const ROWS_QUERY: &str = "query reachcheckRows {
  nodes { id }
  links { id source_id target_id type_id node_id }
  indexes { id list_node_id index_node_id index_link_id list_id depth }
}";

/// Header carrying the admin secret on Hasura-style endpoints.
const ADMIN_SECRET_HEADER: &str = "x-hasura-admin-secret";

/// Row source that POSTs [`ROWS_QUERY`] to a GraphQL endpoint.
pub struct GraphqlRowSource {
    client: Client,
    endpoint: String,
    admin_secret: Option<String>,
}

impl GraphqlRowSource {
    /// Creates a row source for `endpoint`, optionally authenticating with `admin_secret`.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, admin_secret: Option<String>) -> Self {
        Self { client: Client::new(), endpoint: endpoint.into(), admin_secret }
    }
}

/// Request body sent to the endpoint.
#[derive(Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
}

/// Top-level GraphQL response envelope.
#[derive(Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<Rows>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

/// One entry of the GraphQL `errors` array.
#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}

/// Turns a response body into rows, surfacing GraphQL-level errors.
fn parse_response(body: &str) -> Result<Rows, Box<dyn std::error::Error + Send + Sync>> {
    let response: GraphqlResponse = serde_json::from_str(body)
        .map_err(|e| format!("Failed to parse GraphQL response: {e}"))?;
    if !response.errors.is_empty() {
        let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(format!("GraphQL errors: {}", messages.join("; ")).into());
    }
    response.data.ok_or_else(|| "GraphQL response has no data".into())
}

impl GraphqlRowSource {
    async fn fetch(&self) -> Result<Rows, Box<dyn std::error::Error + Send + Sync>> {
        tracing::debug!(endpoint = %self.endpoint, "fetching rows");

        let mut request =
            self.client.post(&self.endpoint).json(&GraphqlRequest { query: ROWS_QUERY });
        if let Some(secret) = &self.admin_secret {
            request = request.header(ADMIN_SECRET_HEADER, secret);
        }

        let response = request
            .send()
            .await
            .map_err(|e| format!("GraphQL request to {} failed: {e}", self.endpoint))?;

        let status = response.status();
        let body =
            response.text().await.map_err(|e| format!("Failed to read GraphQL response: {e}"))?;

        if !status.is_success() {
            return Err(format!("GraphQL endpoint returned {}: {body}", status.as_u16()).into());
        }

        parse_response(&body)
    }
}

impl RowSource for GraphqlRowSource {
    fn fetch_all(&self) -> RowsFuture<'_> {
        Box::pin(self.fetch())
    }
}
