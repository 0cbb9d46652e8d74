// Route derivation

use serde::Serialize;

use super::casing::to_kebab_case;

/// Prefix shared by every procedure route
pub const RPC_PREFIX: &str = "/rpc";

/// The only method a procedure route accepts
pub const RPC_METHOD: &str = "POST";

/// HTTP route of one procedure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub path: String,
    pub methods: Vec<&'static str>,
    pub procedure_name: String,
}

impl Route {
    /// Derive the route for `procedure_name` under `app_name`.
    /// Pure: no registry lookup.
    pub fn derive(app_name: &str, procedure_name: &str) -> Self {
        Self {
            path: Self::path_for(app_name, procedure_name),
            methods: vec![RPC_METHOD],
            procedure_name: procedure_name.to_string(),
        }
    }

    /// `/rpc/{kebab(app)}/{kebab(procedure)}`
    pub fn path_for(app_name: &str, procedure_name: &str) -> String {
        format!(
            "{}/{}/{}",
            RPC_PREFIX,
            to_kebab_case(app_name),
            to_kebab_case(procedure_name)
        )
    }
}
