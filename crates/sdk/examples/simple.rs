//! Simple SDK Example
//!
//! Calls the procedures of the bundled example server.
//!
//! # Usage
//!
//! 1. Start the server:
//!    ```bash
//!    cargo run --package wirebind-daemon
//!    ```
//!
//! 2. Run this example:
//!    ```bash
//!    cargo run --example simple
//!    ```

use serde_json::json;
use wirebind_sdk::{RpcClient, SdkError};

const APP: &str = "example-test";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Wirebind SDK - Simple Example");
    println!("=============================\n");

    let client = RpcClient::new("http://127.0.0.1:9530")?;

    // 1. Health
    println!("1. Checking health...");
    let health = client.call_raw(APP, "health", &json!({})).await?;
    println!("   ✓ {}\n", health);

    // 2. Typed-looking call with optional field omitted
    println!("2. Calling get-output...");
    let output = client
        .call_raw(APP, "get-output", &json!({"foo": 42, "bar": "world"}))
        .await?;
    println!("   ✓ hello = {}, world = {}\n", output["hello"], output["world"]);

    // 3. Recursive input
    println!("3. Calling echo-tree...");
    let tree = client
        .call_raw(
            APP,
            "echo-tree",
            &json!({"label": "root", "child": {"label": "leaf", "child": null}}),
        )
        .await?;
    println!("   ✓ {}\n", tree);

    // 4. Rejected input
    println!("4. Calling get-output with a missing field...");
    match client.call_raw(APP, "get-output", &json!({"bar": "x"})).await {
        Err(SdkError::Rpc { status, kind, message }) => {
            println!("   ✓ Rejected: {} {} ({})", status, kind, message)
        }
        other => println!("   ⚠ Unexpected: {:?}", other),
    }

    println!("\n✓ Example completed successfully!");

    Ok(())
}
