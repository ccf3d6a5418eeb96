use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::config::SubgraphConfig;
use super::{QueryError, SubgraphSource};

/// GraphQL-over-HTTP client for a single subgraph endpoint.
pub struct SubgraphClient {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Serialize)]
struct GraphRequest<'a> {
    query: &'a str,
    variables: &'a Value,
}

#[derive(Debug, Deserialize)]
struct GraphResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct GraphErrorMessage {
    message: String,
}

impl SubgraphClient {
    pub fn new(config: &SubgraphConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder()
                .timeout(config.timeout())
                .build()?,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl SubgraphSource for SubgraphClient {
    fn name(&self) -> &str {
        &self.endpoint
    }

    async fn execute(&self, query: &str, variables: &Value) -> Result<Value, QueryError> {
        let resp = self.client.post(&self.endpoint)
            .header("Accept", "application/json")
            .json(&GraphRequest { query, variables })
            .send()
            .await
            .map_err(|e| QueryError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(QueryError::Status(resp.status().as_u16()));
        }

        let body: GraphResponse = resp.json()
            .await
            .map_err(|e| QueryError::Decode(e.to_string()))?;

        into_data(body)
    }
}

fn into_data(body: GraphResponse) -> Result<Value, QueryError> {
    if !body.errors.is_empty() {
        let messages: Vec<String> = body.errors.into_iter().map(|e| e.message).collect();
        return Err(QueryError::GraphQl(messages.join("; ")));
    }
    match body.data {
        Some(Value::Null) | None => Err(QueryError::MissingField("data".to_string())),
        Some(data) => Ok(data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: Value) -> GraphResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn data_is_returned() {
        let data = into_data(response(json!({ "data": { "tokens": [] } }))).unwrap();
        assert_eq!(data, json!({ "tokens": [] }));
    }

    #[test]
    fn graphql_errors_are_joined() {
        let err = into_data(response(json!({
            "data": null,
            "errors": [{ "message": "indexing error" }, { "message": "bad skip" }]
        })))
        .unwrap_err();
        assert_eq!(err, QueryError::GraphQl("indexing error; bad skip".into()));
    }

    #[test]
    fn null_data_is_missing() {
        let err = into_data(response(json!({ "data": null }))).unwrap_err();
        assert_eq!(err, QueryError::MissingField("data".into()));
    }

    #[test]
    fn request_body_shape() {
        let variables = json!({ "first": 5 });
        let body = serde_json::to_value(GraphRequest { query: "{ x }", variables: &variables }).unwrap();
        assert_eq!(body, json!({ "query": "{ x }", "variables": { "first": 5 } }));
    }
}
