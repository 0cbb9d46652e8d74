//! TypeScript binding file model.
//!
//! Built transiently per procedure and discarded after rendering.

use std::path::PathBuf;

/// `import type { A, B } from "./other";`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStatement {
    pub from: String,
    /// Sorted
    pub symbols: Vec<String>,
}

/// Typed `fetch` wrapper for one procedure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchBinding {
    /// camelCase function name
    pub name: String,
    /// Rendered TypeScript input type
    pub input: String,
    /// Rendered TypeScript output type
    pub output: String,
    pub route: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceMember {
    pub name: String,
    pub optional: bool,
    pub ts_type: String,
}

/// `export interface Name { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceBinding {
    pub name: String,
    /// Sorted by member name
    pub members: Vec<InterfaceMember>,
}

/// One generated `.ts` file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedBindingFile {
    pub path: PathBuf,
    pub imports: Vec<ImportStatement>,
    pub fetch_methods: Vec<FetchBinding>,
    pub interfaces: Vec<InterfaceBinding>,
}
