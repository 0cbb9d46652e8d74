// Wirebind Core - Typed RPC registry, dispatch and TypeScript bindings
// NO transport dependencies (Hexagonal Architecture)

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use application::{DispatchHandler, Procedure, Registry, RequestContext};
pub use domain::{Route, RpcRequest, RpcResponse};
pub use error::{DispatchError, GenerateError, RegistryError, Result};
