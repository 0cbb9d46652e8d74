// Domain Layer - Pure types and transformations

pub mod casing;
pub mod descriptor;
pub mod route;
pub mod transport;

// Re-exports
pub use casing::{is_kebab_case, to_camel_case, to_kebab_case, to_snake_case};
pub use descriptor::{
    extract, extract_all, FieldDescriptor, PrimitiveKind, StructDescriptor, TypeDescriptor,
    TypeShape,
};
pub use route::Route;
pub use transport::{ErrorEnvelope, RpcRequest, RpcResponse, JSON_CONTENT_TYPE};
