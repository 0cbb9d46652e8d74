//! Example procedures served under the `example-test` app

use axum::routing::get;
use axum::{Json, Router};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use wirebind_core::{Procedure, Registry, RequestContext};

pub const APP_NAME: &str = "example-test";

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetOutputInput {
    pub foo: i64,
    pub bar: String,
    #[serde(default)]
    pub my_option: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GetOutputOutput {
    pub hello: i64,
    pub world: String,
}

/// Recursive input and output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TreeNode {
    pub label: String,
    pub child: Option<Box<TreeNode>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct HealthInput {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HealthOutput {
    pub status: String,
    pub version: String,
}

pub async fn get_output(ctx: RequestContext, input: GetOutputInput) -> GetOutputOutput {
    info!(url = %ctx.url(), my_option = input.my_option, "get-output called");
    GetOutputOutput {
        hello: input.foo,
        world: input.bar,
    }
}

pub async fn echo_tree(_ctx: RequestContext, input: TreeNode) -> TreeNode {
    input
}

pub async fn health(_ctx: RequestContext, _input: HealthInput) -> HealthOutput {
    HealthOutput {
        status: "ok".to_string(),
        version: VERSION.to_string(),
    }
}

/// Registry of every example procedure
pub fn build_registry() -> wirebind_core::Result<Registry> {
    Registry::builder(APP_NAME)
        .procedure(Procedure::new("get-output", get_output))
        .procedure(Procedure::new("echo-tree", echo_tree))
        .procedure(Procedure::new("health", health))
        .build()
}

/// Non-RPC routes (`GET /`)
pub fn homepage_routes() -> Router {
    Router::new().route("/", get(homepage))
}

async fn homepage() -> Json<Value> {
    Json(json!({ "hello": "world" }))
}
