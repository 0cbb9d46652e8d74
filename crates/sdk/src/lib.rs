//! Wirebind SDK - Rust Client Library
//!
//! Calls procedures served by a Wirebind server.
//!
//! # Example
//!
//! ```no_run
//! use serde::{Deserialize, Serialize};
//! use wirebind_sdk::RpcClient;
//!
//! #[derive(Serialize)]
//! #[serde(rename_all = "camelCase")]
//! struct GetOutputInput {
//!     foo: i64,
//!     bar: String,
//!     my_option: bool,
//! }
//!
//! #[derive(Deserialize)]
//! struct GetOutputOutput {
//!     hello: i64,
//!     world: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RpcClient::new("http://127.0.0.1:9530")?;
//!
//!     let output: GetOutputOutput = client
//!         .call(
//!             "example-test",
//!             "get-output",
//!             &GetOutputInput { foo: 1, bar: "x".into(), my_option: false },
//!         )
//!         .await?;
//!
//!     println!("{} {}", output.hello, output.world);
//!     Ok(())
//! }
//! ```

mod client;
mod error;

pub use client::RpcClient;
pub use error::{Result, SdkError};
