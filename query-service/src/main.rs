//! 图查询服务
//!
//! 对外暴露一个 HTTP 端点，执行磁盘上的查询模板并返回图数据库的结果：
//! - 从模板目录读取查询文本
//! - 通过 REST 接口提交给图数据库
//! - 查询结果原样返回

mod executor;
mod graph;
mod handlers;
mod routes;
mod state;
mod template;

use std::path::Path;

use anyhow::Context;
use axum::{middleware, routing::get, Json, Router};
use common::config::{load_dotenv, AppConfig};
use common::middleware::request_id::request_id_middleware;
use state::AppState;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;

const SERVICE_NAME: &str = "graph-query-service";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "图查询服务 API",
        version = "0.1.0",
        description = "执行查询模板并返回图数据库结果"
    ),
    paths(
        handlers::list_nodes,
        handlers::health_check,
    ),
    components(schemas(
        common::models::GraphQueryResult,
        common::models::GraphRow,
        handlers::HealthResponse,
    )),
    tags(
        (name = "query", description = "查询执行端点"),
        (name = "health", description = "健康检查端点")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv(Path::new(".env"));

    // 初始化日志追踪
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // 加载配置
    let config = AppConfig::load_with_service(SERVICE_NAME).context("加载配置失败")?;

    // 创建应用状态（图数据库客户端只创建一次）
    let state = AppState::new(config.clone()).context("初始化应用状态失败")?;

    let app = create_router(state);

    // 启动服务
    let addr = config.bind_addr();
    info!(
        service = SERVICE_NAME,
        address = %addr,
        graph_url = %config.graph.url,
        query_dir = %config.query_dir.display(),
        "启动服务"
    );

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("绑定地址失败: {addr}"))?;
    axum::serve(listener, app).await.context("服务运行失败")?;
    Ok(())
}

fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::router())
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use tempfile::{tempdir, TempDir};
    use tower::ServiceExt;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ALL_NODES: &str = "MATCH (n) RETURN n";

    fn app(graph_url: &str, with_template: bool) -> (TempDir, Router) {
        let dir = tempdir().unwrap();
        if with_template {
            std::fs::write(dir.path().join(handlers::ALL_NODES_TEMPLATE), ALL_NODES).unwrap();
        }

        let vars: HashMap<&str, String> = HashMap::from([
            ("GRAPH_DB_URL", graph_url.to_string()),
            ("QUERY_DIR", dir.path().display().to_string()),
        ]);
        let config = AppConfig::from_lookup(SERVICE_NAME, |key| vars.get(key).cloned()).unwrap();
        let state = AppState::new(config).unwrap();
        (dir, create_router(state))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, String, Option<String>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let request_id = response
            .headers()
            .get("x-request-id")
            .map(|v| v.to_str().unwrap().to_string());
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap(), request_id)
    }

    #[tokio::test]
    async fn test_nodes_returns_records() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/db/neo4j/tx/commit"))
            .and(body_json(json!({
                "statements": [{"statement": ALL_NODES, "parameters": {}}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{
                    "columns": ["n"],
                    "data": [
                        {"row": [{"name": "Alice"}], "meta": [{"id": 0, "type": "node", "deleted": false}]},
                        {"row": [{"name": "Bob"}], "meta": [{"id": 1, "type": "node", "deleted": false}]}
                    ]
                }],
                "errors": []
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (_dir, app) = app(&mock_server.uri(), true);
        let (status, body, request_id) = get_json(app, "/nodes").await;

        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["data"]["columns"], json!(["n"]));
        assert_eq!(value["data"]["data"].as_array().unwrap().len(), 2);
        assert_eq!(value["data"]["data"][0]["row"][0]["name"], "Alice");
        assert_eq!(value["data"]["data"][1]["meta"][0]["id"], 1);
        assert_eq!(value["meta"]["service"], SERVICE_NAME);
        assert_eq!(value["meta"]["request_id"].as_str(), request_id.as_deref());
    }

    #[tokio::test]
    async fn test_nodes_database_unreachable() {
        let (_dir, app) = app("http://127.0.0.1:1", true);
        let (status, body, _) = get_json(app, "/nodes").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.contains(ALL_NODES));
        assert!(!body.contains("127.0.0.1"));
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"]["code"], "INTERNAL_ERROR");
    }

    #[tokio::test]
    async fn test_nodes_query_rejected() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [],
                "errors": [{"code": "Neo.ClientError.Statement.SyntaxError", "message": "MATCH (n) RETURN n"}]
            })))
            .mount(&mock_server)
            .await;

        let (_dir, app) = app(&mock_server.uri(), true);
        let (status, body, _) = get_json(app, "/nodes").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.contains(ALL_NODES));
        assert!(!body.contains("SyntaxError"));
    }

    #[tokio::test]
    async fn test_nodes_missing_template_makes_no_call() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let (_dir, app) = app(&mock_server.uri(), false);
        let (status, body, _) = get_json(app, "/nodes").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.contains(handlers::ALL_NODES_TEMPLATE));
    }

    #[tokio::test]
    async fn test_health_check() {
        let (_dir, app) = app("http://127.0.0.1:1", true);
        let (status, body, _) = get_json(app, "/api/health").await;

        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["status"], "healthy");
        assert_eq!(value["service"], SERVICE_NAME);
    }

    #[tokio::test]
    async fn test_openapi_lists_routes() {
        let (_dir, app) = app("http://127.0.0.1:1", true);
        let (status, body, _) = get_json(app, "/api-docs/openapi.json").await;

        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert!(value["paths"].get("/nodes").is_some());
        assert!(value["paths"].get("/api/health").is_some());
    }

    #[tokio::test]
    async fn test_post_is_not_routed() {
        let (_dir, app) = app("http://127.0.0.1:1", true);
        let response = app
            .oneshot(Request::builder().method("POST").uri("/nodes").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
