//! 查询执行模块
//!
//! 读取查询模板，连同参数一起提交给图数据库，结果原样返回。

use std::sync::Arc;

use common::errors::AppResult;
use common::models::graph::{GraphQueryResult, Parameters};

use crate::graph::GraphClient;
use crate::template::TemplateReader;

/// Runs named query templates against the injected graph client.
#[derive(Clone)]
pub struct QueryExecutor {
    templates: TemplateReader,
    client: Arc<dyn GraphClient>,
}

impl QueryExecutor {
    pub fn new(templates: TemplateReader, client: Arc<dyn GraphClient>) -> Self {
        Self { templates, client }
    }

    /// 执行指定模板
    ///
    /// 模板读取失败时直接返回错误，不会发起网络请求。不重试，也不在本地校验语法。
    pub async fn query(&self, name: &str, params: Parameters) -> AppResult<GraphQueryResult> {
        let statement = self.templates.read(name).await?;

        tracing::debug!(template = name, params = params.len(), "执行查询模板");
        self.client.execute(&statement, &params).await
    }
}
