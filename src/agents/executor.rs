use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use super::errors::{ExecutorError, ExecutorResult};
use crate::domain::agent::{AgentConfig, AgentType};
use crate::domain::execution::{ExecutionResult, Parameters};

/// Runs one agent invocation on the service side
#[async_trait]
pub trait AgentExecutor: Send + Sync {
    /// Short name used in logs
    fn kind(&self) -> &'static str;

    /// Checks the agent config before an execution starts
    ///
    /// An error here rejects the execution without it ever running.
    fn check(&self, _config: &AgentConfig) -> ExecutorResult<()> {
        Ok(())
    }

    /// Invokes the agent with its config and the call parameters
    async fn execute(
        &self,
        config: &AgentConfig,
        parameters: &Parameters,
    ) -> ExecutorResult<ExecutionResult>;
}

/// Builds executors for each agent type
#[derive(Clone)]
pub struct ExecutorFactory {
    client: reqwest::Client,
    timeout: Duration,
}

impl ExecutorFactory {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    /// Protocol agents are forwarded over HTTP; the rest are served locally
    pub fn build(&self, agent_type: AgentType) -> Box<dyn AgentExecutor> {
        match agent_type {
            AgentType::A2a | AgentType::Mcp => Box::new(ForwardingExecutor {
                client: self.client.clone(),
                timeout: self.timeout,
            }),
            AgentType::Adk | AgentType::FinancialHost | AgentType::Custom => {
                Box::new(LoopbackExecutor { agent_type })
            }
        }
    }
}

/// Forwards `{"parameters": ...}` to the agent's `url` and returns its JSON reply
pub struct ForwardingExecutor {
    client: reqwest::Client,
    timeout: Duration,
}

impl ForwardingExecutor {
    fn endpoint<'a>(&self, config: &'a AgentConfig) -> ExecutorResult<&'a str> {
        let url = config
            .get("url")
            .and_then(Value::as_str)
            .ok_or_else(|| ExecutorError::Misconfigured("config has no `url`".to_string()))?;

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ExecutorError::Misconfigured(format!(
                "`url` must be an http(s) URL, got {}",
                url
            )));
        }
        Ok(url)
    }
}

#[async_trait]
impl AgentExecutor for ForwardingExecutor {
    fn kind(&self) -> &'static str {
        "forwarding"
    }

    fn check(&self, config: &AgentConfig) -> ExecutorResult<()> {
        self.endpoint(config).map(|_| ())
    }

    async fn execute(
        &self,
        config: &AgentConfig,
        parameters: &Parameters,
    ) -> ExecutorResult<ExecutionResult> {
        let url = self.endpoint(config)?;

        let response = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(&json!({ "parameters": parameters }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExecutorError::Timeout(self.timeout.as_secs())
                } else {
                    ExecutorError::Remote(format!("request to {} failed: {}", url, e))
                }
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ExecutorError::Remote(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            let detail = serde_json::from_slice::<Value>(&body)
                .ok()
                .and_then(|v| v.get("detail").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| String::from_utf8_lossy(&body).into_owned());
            return Err(ExecutorError::Remote(format!("{}: {}", status, detail)));
        }

        match serde_json::from_slice::<Value>(&body)? {
            Value::Object(map) => Ok(map),
            other => {
                let mut map = ExecutionResult::new();
                map.insert("response".to_string(), other);
                Ok(map)
            }
        }
    }
}

/// Acknowledges the call in-process, echoing config and parameters
pub struct LoopbackExecutor {
    agent_type: AgentType,
}

#[async_trait]
impl AgentExecutor for LoopbackExecutor {
    fn kind(&self) -> &'static str {
        "loopback"
    }

    async fn execute(
        &self,
        config: &AgentConfig,
        parameters: &Parameters,
    ) -> ExecutorResult<ExecutionResult> {
        let mut result = ExecutionResult::new();
        result.insert("status".to_string(), json!("success"));
        result.insert(
            "message".to_string(),
            json!(format!("{} agent acknowledged the request", self.agent_type)),
        );
        result.insert("config".to_string(), Value::Object(config.as_map().clone()));
        result.insert("params".to_string(), Value::Object(parameters.clone()));
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory() -> ExecutorFactory {
        ExecutorFactory::new(Duration::from_secs(2))
    }

    #[test]
    fn protocol_agents_are_forwarded() {
        assert_eq!(factory().build(AgentType::A2a).kind(), "forwarding");
        assert_eq!(factory().build(AgentType::Mcp).kind(), "forwarding");
        assert_eq!(factory().build(AgentType::Adk).kind(), "loopback");
        assert_eq!(factory().build(AgentType::Custom).kind(), "loopback");
    }

    #[test]
    fn forwarding_requires_http_url() {
        let executor = factory().build(AgentType::A2a);

        assert!(matches!(
            executor.check(&AgentConfig::default()),
            Err(ExecutorError::Misconfigured(_))
        ));
        assert!(executor
            .check(&AgentConfig::parse(r#"{"url": "ftp://flights"}"#).unwrap())
            .is_err());
        assert!(executor
            .check(&AgentConfig::parse(r#"{"url": "http://flights:8001/run"}"#).unwrap())
            .is_ok());
    }

    #[tokio::test]
    async fn loopback_echoes_config_and_params() {
        let executor = factory().build(AgentType::Adk);
        let config = AgentConfig::parse(r#"{"project_id": "demo"}"#).unwrap();
        let params = json!({"prompt": "hello"}).as_object().cloned().unwrap();

        let result = executor.execute(&config, &params).await.unwrap();

        assert_eq!(result["status"], json!("success"));
        assert_eq!(result["config"], json!({"project_id": "demo"}));
        assert_eq!(result["params"], json!({"prompt": "hello"}));
    }

    #[tokio::test]
    async fn forwarding_reports_unreachable_endpoint() {
        let executor = factory().build(AgentType::A2a);
        // Port 9 (discard) is closed on test machines.
        let config = AgentConfig::parse(r#"{"url": "http://127.0.0.1:9/run"}"#).unwrap();

        let err = executor
            .execute(&config, &Parameters::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ExecutorError::Remote(_) | ExecutorError::Timeout(_)
        ));
    }
}
