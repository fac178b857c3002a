//! 图数据库客户端
//!
//! 通过 Neo4j HTTP 事务接口（`/db/{database}/tx/commit`）执行单条语句。
//! 客户端在进程启动时创建一次，之后由所有请求共享。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use common::config::GraphDbConfig;
use common::errors::{AppError, AppResult};
use common::models::graph::{GraphQueryResult, Parameters};

/// Executes a query statement against a graph database.
#[async_trait]
pub trait GraphClient: Send + Sync {
    /// 执行查询语句，参数原样提交，由数据库引擎完成替换
    async fn execute(&self, statement: &str, params: &Parameters) -> AppResult<GraphQueryResult>;
}

/// Neo4j REST (HTTP transactional API) client.
pub struct Neo4jHttpClient {
    commit_url: String,
    credentials: Option<(String, String)>,
    http_client: reqwest::Client,
}

#[derive(Serialize)]
struct CommitRequest<'a> {
    statements: [StatementRequest<'a>; 1],
}

#[derive(Serialize)]
struct StatementRequest<'a> {
    statement: &'a str,
    parameters: &'a Parameters,
}

#[derive(Deserialize)]
struct CommitResponse {
    #[serde(default)]
    results: Vec<GraphQueryResult>,
    #[serde(default)]
    errors: Vec<ServerError>,
    #[serde(default)]
    notifications: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct ServerError {
    code: String,
    #[serde(default)]
    message: String,
}

impl Neo4jHttpClient {
    /// 根据配置创建客户端
    pub fn new(config: &GraphDbConfig) -> AppResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| AppError::Config(format!("无法创建 HTTP 客户端: {}", e)))?;

        Ok(Self {
            commit_url: format!("{}/db/{}/tx/commit", config.url, config.database),
            credentials: config
                .credentials()
                .map(|(user, password)| (user.to_string(), password.to_string())),
            http_client,
        })
    }
}

#[async_trait]
impl GraphClient for Neo4jHttpClient {
    async fn execute(&self, statement: &str, params: &Parameters) -> AppResult<GraphQueryResult> {
        let body = CommitRequest {
            statements: [StatementRequest {
                statement,
                parameters: params,
            }],
        };

        let mut request = self
            .http_client
            .post(&self.commit_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body);
        if let Some((user, password)) = &self.credentials {
            request = request.basic_auth(user, Some(password));
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::RemoteQuery(format!("无法连接到图数据库: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::RemoteQuery(format!("图数据库返回 HTTP {}: {}", status, text)));
        }

        let payload: CommitResponse = response
            .json()
            .await
            .map_err(|e| AppError::RemoteQuery(format!("图数据库返回无效响应: {}", e)))?;

        if !payload.errors.is_empty() {
            let detail = payload
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.code, e.message))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(AppError::RemoteQuery(detail));
        }

        let mut result = payload
            .results
            .into_iter()
            .next()
            .unwrap_or_else(GraphQueryResult::empty);
        if !payload.notifications.is_empty() {
            tracing::warn!(count = payload.notifications.len(), "图数据库返回通知");
            result.notifications.extend(payload.notifications);
        }
        tracing::debug!(rows = result.row_count(), "图查询完成");
        Ok(result)
    }
}
