//! Procedure Registry (Router)
//!
//! Built once at startup, read-only afterwards. Owns every procedure, derives
//! routes, hands out dispatch handlers and writes TypeScript bindings.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use super::codegen::{build_binding_file, render_file, GeneratedBindingFile};
use super::dispatch::DispatchHandler;
use super::procedure::Procedure;
use crate::domain::{is_kebab_case, to_kebab_case, Route, StructDescriptor};
use crate::error::{GenerateError, RegistryError, Result};
use crate::port::{IdProvider, SystemTimeProvider, TimeProvider, UuidProvider};

pub struct Registry {
    app_name: String,
    /// Insertion order
    procedures: Vec<Arc<Procedure>>,
    index: HashMap<String, usize>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

/// Incremental construction of a [`Registry`]; validation happens in `build`.
pub struct RegistryBuilder {
    app_name: String,
    procedures: Vec<Procedure>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl RegistryBuilder {
    pub fn procedure(mut self, procedure: Procedure) -> Self {
        self.procedures.push(procedure);
        self
    }

    /// Request ID source for contexts (default: UUID v4)
    pub fn id_provider(mut self, id_provider: Arc<dyn IdProvider>) -> Self {
        self.id_provider = id_provider;
        self
    }

    pub fn time_provider(mut self, time_provider: Arc<dyn TimeProvider>) -> Self {
        self.time_provider = time_provider;
        self
    }

    /// Validate naming and uniqueness. Total-or-fail: nothing is registered on error.
    pub fn build(self) -> Result<Registry> {
        if !is_kebab_case(&self.app_name) {
            return Err(RegistryError::Config(format!(
                "app name '{}' expected to be kebab-case ('{}')",
                self.app_name,
                to_kebab_case(&self.app_name)
            )));
        }

        let mut procedures = Vec::with_capacity(self.procedures.len());
        let mut index = HashMap::with_capacity(self.procedures.len());
        let mut type_owners: HashMap<String, (String, StructDescriptor)> = HashMap::new();

        for procedure in self.procedures {
            let name = procedure.name().to_string();
            if !is_kebab_case(&name) {
                return Err(RegistryError::Config(format!(
                    "procedure name '{}' expected to be kebab-case ('{}')",
                    name,
                    to_kebab_case(&name)
                )));
            }
            if index.contains_key(&name) {
                return Err(RegistryError::Config(format!(
                    "procedure '{}' registered more than once in app '{}'",
                    name, self.app_name
                )));
            }
            if let Some(type_name) = procedure.name_clashes().first() {
                return Err(RegistryError::Config(format!(
                    "procedure '{}' uses two different types named '{}'",
                    name, type_name
                )));
            }
            for (type_name, def) in procedure.definitions() {
                if let Some((owner, existing)) = type_owners.get(type_name.as_str()) {
                    if existing != def {
                        return Err(RegistryError::Config(format!(
                            "type '{}' of procedure '{}' differs from the type of the same name in procedure '{}'",
                            type_name, name, owner
                        )));
                    }
                    continue;
                }
                type_owners.insert(type_name.clone(), (name.clone(), def.clone()));
            }
            index.insert(name, procedures.len());
            procedures.push(Arc::new(procedure));
        }

        debug!(
            app = %self.app_name,
            procedures = procedures.len(),
            "Procedure registry built"
        );

        Ok(Registry {
            app_name: self.app_name,
            procedures,
            index,
            id_provider: self.id_provider,
            time_provider: self.time_provider,
        })
    }
}

impl Registry {
    /// Register `procedures` under `app_name`.
    ///
    /// # Errors
    /// - `RegistryError::Config` if a name is not kebab-case or a procedure
    ///   name is registered twice
    pub fn new(app_name: impl Into<String>, procedures: Vec<Procedure>) -> Result<Self> {
        procedures
            .into_iter()
            .fold(Self::builder(app_name), RegistryBuilder::procedure)
            .build()
    }

    pub fn builder(app_name: impl Into<String>) -> RegistryBuilder {
        RegistryBuilder {
            app_name: app_name.into(),
            procedures: Vec::new(),
            id_provider: Arc::new(UuidProvider),
            time_provider: Arc::new(SystemTimeProvider),
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Registered procedures in insertion order
    pub fn procedures(&self) -> impl Iterator<Item = &Procedure> {
        self.procedures.iter().map(Arc::as_ref)
    }

    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }

    /// Route of `procedure_name`. Pure; does not require registration.
    pub fn route_for(&self, procedure_name: &str) -> Route {
        Route::derive(&self.app_name, procedure_name)
    }

    fn get(&self, procedure_name: &str) -> Result<&Arc<Procedure>> {
        self.index
            .get(procedure_name)
            .map(|&i| &self.procedures[i])
            .ok_or_else(|| RegistryError::NotFound(procedure_name.to_string()))
    }

    /// # Errors
    /// - `RegistryError::NotFound` if `procedure_name` is not registered
    pub fn handler_for(&self, procedure_name: &str) -> Result<DispatchHandler> {
        let procedure = self.get(procedure_name)?;
        Ok(self.dispatch_handler(procedure))
    }

    fn dispatch_handler(&self, procedure: &Arc<Procedure>) -> DispatchHandler {
        DispatchHandler::new(
            Arc::clone(procedure),
            Arc::clone(&self.id_provider),
            Arc::clone(&self.time_provider),
        )
    }

    /// Every route with its handler, in insertion order
    pub fn all_routes(&self) -> Vec<(Route, DispatchHandler)> {
        self.procedures
            .iter()
            .map(|p| (self.route_for(p.name()), self.dispatch_handler(p)))
            .collect()
    }

    /// Binding file model of one procedure, without writing it
    pub fn binding_file(
        &self,
        procedure_name: &str,
        output_root: &Path,
    ) -> Result<GeneratedBindingFile> {
        let procedure = self.get(procedure_name)?;
        Ok(build_binding_file(
            &self.app_name,
            procedure,
            &self.procedures,
            output_root,
        ))
    }

    /// Write `output_root/<app>/<procedure>.ts` for every procedure.
    ///
    /// Whole-overwrite; unchanged procedures produce byte-identical files.
    /// Returns the written paths in registration order.
    pub fn generate_bindings(
        &self,
        output_root: impl AsRef<Path>,
    ) -> std::result::Result<Vec<PathBuf>, GenerateError> {
        let output_root = output_root.as_ref();
        let mut written = Vec::with_capacity(self.procedures.len());

        for procedure in &self.procedures {
            let file = build_binding_file(&self.app_name, procedure, &self.procedures, output_root);

            if let Some(parent) = file.path.parent() {
                fs::create_dir_all(parent).map_err(|source| GenerateError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }

            let source = render_file(&file);
            fs::write(&file.path, &source).map_err(|source| GenerateError::Io {
                path: file.path.clone(),
                source,
            })?;

            debug!(
                procedure = %procedure.name(),
                path = %file.path.display(),
                bytes = source.len(),
                "Wrote TypeScript bindings"
            );
            written.push(file.path);
        }

        info!(
            app = %self.app_name,
            files = written.len(),
            output_root = %output_root.display(),
            "TypeScript bindings generated"
        );

        Ok(written)
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("app_name", &self.app_name)
            .field(
                "procedures",
                &self.procedures.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::RequestContext;
    use crate::domain::RpcRequest;
    use schemars::JsonSchema;
    use serde::{Deserialize, Serialize};

    #[derive(Deserialize, JsonSchema)]
    #[serde(rename_all = "camelCase")]
    struct Input {
        foo: i64,
        bar: String,
        #[serde(default)]
        my_option: bool,
    }

    #[derive(Serialize, JsonSchema)]
    struct Output {
        hello: i64,
        world: String,
    }

    async fn get_output(_ctx: RequestContext, input: Input) -> Output {
        Output {
            hello: input.foo,
            world: input.bar,
        }
    }

    fn named(name: &str) -> Procedure {
        Procedure::new(name.to_string(), get_output)
    }

    mod orders {
        #[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
        pub struct Item {
            pub sku: String,
        }
    }

    mod stock {
        #[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
        pub struct Item {
            pub count: i64,
        }
    }

    #[test]
    fn test_rejects_same_type_name_with_different_shapes_in_one_procedure() {
        let conv = Procedure::new("convert", |_ctx, i: orders::Item| async move {
            stock::Item {
                count: i.sku.len() as i64,
            }
        });
        let err = Registry::new("shop", vec![conv]).unwrap_err();
        match err {
            RegistryError::Config(msg) => {
                assert!(msg.contains("convert") && msg.contains("'Item'"), "{msg}")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_same_type_name_with_different_shapes_across_procedures() {
        let err = Registry::new(
            "shop",
            vec![
                Procedure::new("order", |_ctx, i: orders::Item| async move { i }),
                Procedure::new("restock", |_ctx, i: stock::Item| async move { i }),
            ],
        )
        .unwrap_err();
        match err {
            RegistryError::Config(msg) => {
                assert!(msg.contains("order") && msg.contains("restock"), "{msg}")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_accepts_same_type_shared_across_procedures() {
        let registry = Registry::new(
            "shop",
            vec![
                Procedure::new("order", |_ctx, i: orders::Item| async move { i }),
                Procedure::new("reorder", |_ctx, i: orders::Item| async move { i.sku }),
            ],
        )
        .unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_rejects_non_kebab_app_name() {
        for app in ["exampleTest", "example_test", "Example", ""] {
            let err = Registry::new(app, vec![named("get-output")]).unwrap_err();
            assert!(matches!(err, RegistryError::Config(_)), "{app:?}: {err:?}");
        }
    }

    #[test]
    fn test_rejects_non_kebab_procedure_name() {
        let err = Registry::new("example-test", vec![named("getOutput")]).unwrap_err();
        assert!(matches!(err, RegistryError::Config(ref msg) if msg.contains("get-output")));
    }

    #[test]
    fn test_rejects_duplicate_procedure() {
        let err = Registry::new(
            "example-test",
            vec![named("get-output"), named("other"), named("get-output")],
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::Config(ref msg) if msg.contains("more than once")));
    }

    #[test]
    fn test_route_for_every_procedure() {
        let registry = Registry::new("example-test", vec![named("get-output"), named("b2")]).unwrap();
        for procedure in registry.procedures() {
            let route = registry.route_for(procedure.name());
            assert_eq!(
                route.path,
                format!("/rpc/{}/{}", to_kebab_case("example-test"), to_kebab_case(procedure.name()))
            );
        }
    }

    #[test]
    fn test_handler_for_unknown_is_not_found() {
        let registry = Registry::new("example-test", vec![named("get-output")]).unwrap();
        assert!(registry.handler_for("get-output").is_ok());
        assert!(matches!(
            registry.handler_for("missing"),
            Err(RegistryError::NotFound(_))
        ));
        assert!(matches!(
            registry.binding_file("missing", Path::new("x")),
            Err(RegistryError::NotFound(_))
        ));
    }

    #[test]
    fn test_all_routes_in_insertion_order() {
        let names = ["zeta", "alpha", "mid-point"];
        let registry =
            Registry::new("app", names.iter().map(|n| named(n)).collect()).unwrap();

        let routes = registry.all_routes();
        let got: Vec<&str> = routes.iter().map(|(r, _)| r.procedure_name.as_str()).collect();
        assert_eq!(got, names);
        for (route, handler) in &routes {
            assert_eq!(route.procedure_name, handler.procedure_name());
        }
    }

    #[tokio::test]
    async fn test_handler_dispatches() {
        let registry = Registry::new("example-test", vec![named("get-output")]).unwrap();
        let handler = registry.handler_for("get-output").unwrap();

        let resp = handler
            .call(RpcRequest::new(
                "/rpc/example-test/get-output",
                r#"{"foo": 7, "bar": "seven"}"#,
            ))
            .await;
        assert_eq!(resp.status, 200);
        let body: serde_json::Value = serde_json::from_slice(&resp.body).unwrap();
        assert_eq!(body, serde_json::json!({"hello": 7, "world": "seven"}));
    }

    #[test]
    fn test_generate_bindings_is_idempotent() {
        let registry = Registry::new("example-test", vec![named("get-output"), named("again")]).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let first = registry.generate_bindings(dir.path()).unwrap();
        assert_eq!(
            first,
            vec![
                dir.path().join("example-test").join("get-output.ts"),
                dir.path().join("example-test").join("again.ts"),
            ]
        );
        let snapshot: Vec<Vec<u8>> = first.iter().map(|p| fs::read(p).unwrap()).collect();

        let second = registry.generate_bindings(dir.path()).unwrap();
        assert_eq!(first, second);
        let again: Vec<Vec<u8>> = second.iter().map(|p| fs::read(p).unwrap()).collect();
        assert_eq!(snapshot, again);
    }

    #[test]
    fn test_generated_file_contents() {
        let registry = Registry::new("example-test", vec![named("get-output")]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let paths = registry.generate_bindings(dir.path()).unwrap();
        let source = fs::read_to_string(&paths[0]).unwrap();

        assert!(source.contains("export function getOutput(input: Input): Promise<Output> {"));
        assert!(source.contains("fetch(\"/rpc/example-test/get-output\""));
        assert!(source.contains(
            "export interface Input {\n  bar: string;\n  foo: number;\n  myOption?: boolean;\n}\n"
        ));
        assert!(source.contains("export interface Output {\n  hello: number;\n  world: string;\n}\n"));
        assert!(!source.contains("import"));
    }

    #[test]
    fn test_generate_bindings_reports_io_errors() {
        let registry = Registry::new("example-test", vec![named("get-output")]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        // A file where the app directory should be
        let blocker = dir.path().join("example-test");
        fs::write(&blocker, b"not a directory").unwrap();

        let err = registry.generate_bindings(dir.path()).unwrap_err();
        assert!(matches!(err, GenerateError::Io { .. }), "got {err:?}");
    }
}
