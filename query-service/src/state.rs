//! Application state for the graph query service.

use std::sync::Arc;

use common::config::AppConfig;
use common::errors::AppResult;

use crate::executor::QueryExecutor;
use crate::graph::Neo4jHttpClient;
use crate::template::TemplateReader;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub executor: Arc<QueryExecutor>,
}

impl AppState {
    /// Creates the application state, connecting the executor to the configured database.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let client = Arc::new(Neo4jHttpClient::new(&config.graph)?);
        let executor = QueryExecutor::new(TemplateReader::new(config.query_dir.clone()), client);
        Ok(Self::with_executor(config, executor))
    }

    /// Creates the application state around an already built executor.
    pub fn with_executor(config: AppConfig, executor: QueryExecutor) -> Self {
        Self {
            config,
            executor: Arc::new(executor),
        }
    }
}
