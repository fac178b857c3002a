//! Handler模块

use std::time::Instant;

use axum::{
    extract::State,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use common::errors::AppError;
use common::middleware::RequestId;
use common::models::graph::{GraphQueryResult, Parameters};
use common::response::ApiResponse;
use crate::state::AppState;

/// `/nodes` 绑定的查询模板
pub const ALL_NODES_TEMPLATE: &str = "all_nodes.cypher";

/// 查询图中所有节点
#[utoipa::path(
    get,
    path = "/nodes",
    tag = "query",
    responses(
        (status = 200, description = "查询执行成功", body = ApiResponse<GraphQueryResult>),
        (status = 500, description = "模板读取失败或图数据库查询失败")
    )
)]
pub async fn list_nodes(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<GraphQueryResult>>, AppError> {
    let start = Instant::now();
    let result = state
        .executor
        .query(ALL_NODES_TEMPLATE, Parameters::default())
        .await?;

    tracing::info!(rows = result.row_count(), "节点查询完成");
    Ok(Json(
        ApiResponse::ok(result)
            .with_request_id(request_id.as_str())
            .with_duration(start.elapsed().as_millis() as u64)
            .with_service(state.config.service_name.as_str()),
    ))
}

/// 健康检查端点
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "服务运行正常", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: state.config.service_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}
