use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use uuid::Uuid;

use super::errors::{GatewayError, GatewayResult};
use super::gateway::AgentGateway;
use crate::config::ClientSettings;
use crate::domain::agent::{Agent, RegisterAgent, UpdateAgent};
use crate::domain::execution::{Execution, Parameters};

/// Talks to the agent service's `/api/agents` endpoints
#[derive(Clone)]
pub struct HttpAgentGateway {
    client: Client,
    base_url: String,
}

impl HttpAgentGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> Self {
        Self::new(settings.service_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/agents{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> GatewayResult<T> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return response.json::<T>().await.map_err(GatewayError::from);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = extract_detail(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });
        tracing::debug!(status = status.as_u16(), %detail, "Agent service rejected request");

        Err(GatewayError::Status {
            status: status.as_u16(),
            detail,
        })
    }
}

/// Pulls `detail` out of an error body, or the raw body when it is not JSON
fn extract_detail(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("detail") {
            Some(Value::String(detail)) => Some(detail.clone()),
            Some(other) => Some(other.to_string()),
            None => Some(body.to_string()),
        },
        _ => Some(body.to_string()),
    }
}

#[async_trait]
impl AgentGateway for HttpAgentGateway {
    async fn create_agent(&self, request: &RegisterAgent) -> GatewayResult<Agent> {
        self.send(self.client.post(self.url("")).json(request)).await
    }

    async fn list_agents(&self) -> GatewayResult<Vec<Agent>> {
        self.send(self.client.get(self.url(""))).await
    }

    async fn get_agent(&self, id: Uuid) -> GatewayResult<Agent> {
        self.send(self.client.get(self.url(&format!("/{}", id)))).await
    }

    async fn update_agent(&self, id: Uuid, update: &UpdateAgent) -> GatewayResult<Agent> {
        self.send(self.client.put(self.url(&format!("/{}", id))).json(update))
            .await
    }

    async fn execute_agent(&self, id: Uuid, parameters: Parameters) -> GatewayResult<Execution> {
        let body = json!({ "parameters": parameters });
        self.send(
            self.client
                .post(self.url(&format!("/{}/execute", id)))
                .json(&body),
        )
        .await
    }

    async fn get_execution(&self, agent_id: Uuid, execution_id: Uuid) -> GatewayResult<Execution> {
        self.send(
            self.client
                .get(self.url(&format!("/{}/executions/{}", agent_id, execution_id))),
        )
        .await
    }
}
