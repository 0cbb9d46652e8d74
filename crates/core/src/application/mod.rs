// Application Layer - Registry, dispatch and code generation

pub mod codegen;
pub mod context;
pub mod dispatch;
pub mod procedure;
pub mod registry;

// Re-exports
pub use codegen::GeneratedBindingFile;
pub use context::RequestContext;
pub use dispatch::DispatchHandler;
pub use procedure::Procedure;
pub use registry::{Registry, RegistryBuilder};
