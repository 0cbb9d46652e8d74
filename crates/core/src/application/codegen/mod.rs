// Binding Code Generator - TypeScript client bindings per procedure

pub mod emit;
pub mod types;

pub use emit::{render_file, Emit, BANNER};
pub use types::{
    FetchBinding, GeneratedBindingFile, ImportStatement, InterfaceBinding, InterfaceMember,
};

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::Path;
use std::sync::Arc;

use super::procedure::Procedure;
use crate::domain::{to_camel_case, PrimitiveKind, Route, StructDescriptor, TypeDescriptor};

/// Extension of generated files
pub const BINDING_EXTENSION: &str = "ts";

/// Rendered TypeScript type for a descriptor
pub fn ts_type(descriptor: &TypeDescriptor) -> String {
    match descriptor {
        TypeDescriptor::Primitive(PrimitiveKind::Int) => "number".to_string(),
        TypeDescriptor::Primitive(PrimitiveKind::String) => "string".to_string(),
        TypeDescriptor::Primitive(PrimitiveKind::Bool) => "boolean".to_string(),
        TypeDescriptor::Struct(s) => s.name.clone(),
        TypeDescriptor::Unknown => "unknown".to_string(),
    }
}

pub fn interface_for(def: &StructDescriptor) -> InterfaceBinding {
    let mut members: Vec<InterfaceMember> = def
        .fields
        .iter()
        .map(|f| InterfaceMember {
            name: f.name.clone(),
            optional: !f.required,
            ts_type: ts_type(&f.ty),
        })
        .collect();
    members.sort_by(|a, b| a.name.cmp(&b.name));

    InterfaceBinding {
        name: def.name.clone(),
        members,
    }
}

fn root_structs(procedure: &Procedure) -> BTreeSet<String> {
    [procedure.input_type(), procedure.output_type()]
        .into_iter()
        .filter_map(TypeDescriptor::struct_name)
        .map(str::to_string)
        .collect()
}

/// Build the binding file of `procedure`.
///
/// A nested struct that is the input or output type of another procedure in
/// `procedures` is imported from that procedure's file instead of being
/// redeclared. The first procedure (in registration order) declaring it wins.
pub fn build_binding_file(
    app_name: &str,
    procedure: &Procedure,
    procedures: &[Arc<Procedure>],
    output_root: &Path,
) -> GeneratedBindingFile {
    let own_roots = root_structs(procedure);

    let mut exporters: BTreeMap<String, &str> = BTreeMap::new();
    for other in procedures.iter().filter(|p| p.name() != procedure.name()) {
        for name in root_structs(other) {
            exporters.entry(name).or_insert(other.name());
        }
    }

    let mut local: BTreeMap<String, &StructDescriptor> = BTreeMap::new();
    let mut imported: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut queue: VecDeque<String> = own_roots.iter().cloned().collect();

    while let Some(name) = queue.pop_front() {
        if local.contains_key(&name) {
            continue;
        }
        if !own_roots.contains(&name) {
            if let Some(exporter) = exporters.get(&name) {
                imported
                    .entry(format!("./{exporter}"))
                    .or_default()
                    .insert(name);
                continue;
            }
        }
        // Every struct reference is materialized by the extractor
        let Some(def) = procedure.definitions().get(&name) else {
            debug_assert!(false, "struct '{name}' referenced without a definition");
            continue;
        };
        queue.extend(def.referenced_structs().into_iter().map(str::to_string));
        local.insert(name, def);
    }

    let imports = imported
        .into_iter()
        .map(|(from, symbols)| ImportStatement {
            from,
            symbols: symbols.into_iter().collect(),
        })
        .collect();

    let interfaces = local.into_values().map(interface_for).collect();

    let fetch = FetchBinding {
        name: to_camel_case(procedure.name()),
        input: ts_type(procedure.input_type()),
        output: ts_type(procedure.output_type()),
        route: Route::path_for(app_name, procedure.name()),
    };

    GeneratedBindingFile {
        path: output_root
            .join(app_name)
            .join(format!("{}.{}", procedure.name(), BINDING_EXTENSION)),
        imports,
        fetch_methods: vec![fetch],
        interfaces,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::JsonSchema;
    use serde::{Deserialize, Serialize};

    #[derive(Deserialize, Serialize, JsonSchema)]
    struct Address {
        city: String,
    }

    #[derive(Deserialize, Serialize, JsonSchema)]
    struct Person {
        name: String,
        address: Address,
        #[serde(default)]
        nickname: String,
    }

    #[derive(Deserialize, JsonSchema)]
    struct LookupInput {
        id: i64,
    }

    #[derive(Deserialize, JsonSchema)]
    struct Family {
        head: Person,
        size: i64,
    }

    #[derive(Serialize, JsonSchema)]
    struct Ack {
        ok: bool,
    }

    fn lookup() -> Arc<Procedure> {
        Arc::new(Procedure::new("lookup-person", |_ctx, input: LookupInput| async move {
            Person {
                name: input.id.to_string(),
                address: Address {
                    city: String::new(),
                },
                nickname: String::new(),
            }
        }))
    }

    fn register_family() -> Arc<Procedure> {
        Arc::new(Procedure::new("register-family", |_ctx, _f: Family| async move {
            Ack { ok: true }
        }))
    }

    #[test]
    fn test_single_procedure_declares_everything() {
        let p = lookup();
        let file = build_binding_file("people", &p, &[p.clone()], Path::new("out"));

        assert_eq!(file.path, Path::new("out/people/lookup-person.ts"));
        assert!(file.imports.is_empty());
        assert_eq!(
            file.fetch_methods,
            vec![FetchBinding {
                name: "lookupPerson".into(),
                input: "LookupInput".into(),
                output: "Person".into(),
                route: "/rpc/people/lookup-person".into(),
            }]
        );

        let names: Vec<&str> = file.interfaces.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Address", "LookupInput", "Person"]);

        let person = &file.interfaces[2];
        let members: Vec<(&str, bool, &str)> = person
            .members
            .iter()
            .map(|m| (m.name.as_str(), m.optional, m.ts_type.as_str()))
            .collect();
        assert_eq!(
            members,
            vec![
                ("address", false, "Address"),
                ("name", false, "string"),
                ("nickname", true, "string"),
            ]
        );
    }

    #[test]
    fn test_shared_struct_is_imported_from_its_procedure() {
        let lookup = lookup();
        let family = register_family();
        let all = vec![lookup.clone(), family.clone()];

        let file = build_binding_file("people", &family, &all, Path::new("out"));
        assert_eq!(
            file.imports,
            vec![ImportStatement {
                from: "./lookup-person".into(),
                symbols: vec!["Person".into()],
            }]
        );

        // Address is only reachable through Person, which is imported
        let names: Vec<&str> = file.interfaces.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Ack", "Family"]);
    }

    #[test]
    fn test_every_referenced_name_is_declared_or_imported() {
        #[derive(Deserialize, JsonSchema)]
        #[allow(dead_code)]
        enum Color {
            Red,
            Green,
        }

        #[derive(Deserialize, JsonSchema)]
        #[allow(dead_code)]
        struct UserId(i64);

        #[derive(Deserialize, JsonSchema)]
        #[allow(dead_code)]
        struct Paint {
            color: Color,
            owner: UserId,
            address: Address,
        }

        let p = Arc::new(Procedure::new("paint", |_ctx, _p: Paint| async move { true }));
        let file = build_binding_file("shop", &p, &[p.clone()], Path::new("out"));

        let declared: BTreeSet<&str> = file
            .interfaces
            .iter()
            .map(|i| i.name.as_str())
            .chain(file.imports.iter().flat_map(|i| i.symbols.iter().map(String::as_str)))
            .collect();
        assert_eq!(declared, BTreeSet::from(["Address", "Paint"]));

        let builtin = ["number", "string", "boolean", "unknown"];
        for interface in &file.interfaces {
            for member in &interface.members {
                assert!(
                    builtin.contains(&member.ts_type.as_str())
                        || declared.contains(member.ts_type.as_str()),
                    "{}.{} references undeclared {}",
                    interface.name,
                    member.name,
                    member.ts_type
                );
            }
        }

        let paint = file.interfaces.iter().find(|i| i.name == "Paint").unwrap();
        let members: Vec<(&str, &str)> = paint
            .members
            .iter()
            .map(|m| (m.name.as_str(), m.ts_type.as_str()))
            .collect();
        assert_eq!(
            members,
            vec![("address", "Address"), ("color", "unknown"), ("owner", "number")]
        );
    }

    #[test]
    fn test_ts_type_mapping() {
        assert_eq!(ts_type(&TypeDescriptor::Primitive(PrimitiveKind::Int)), "number");
        assert_eq!(ts_type(&TypeDescriptor::Primitive(PrimitiveKind::String)), "string");
        assert_eq!(ts_type(&TypeDescriptor::Primitive(PrimitiveKind::Bool)), "boolean");
        assert_eq!(ts_type(&TypeDescriptor::struct_ref("Node")), "Node");
        assert_eq!(ts_type(&TypeDescriptor::Unknown), "unknown");
    }

    #[test]
    fn test_interface_orders_members() {
        let def = StructDescriptor {
            name: "Zoo".into(),
            fields: vec![
                crate::domain::FieldDescriptor {
                    name: "zebra".into(),
                    ty: TypeDescriptor::Primitive(PrimitiveKind::String),
                    required: true,
                },
                crate::domain::FieldDescriptor {
                    name: "apple".into(),
                    ty: TypeDescriptor::Primitive(PrimitiveKind::Int),
                    required: true,
                },
            ],
        };
        let rendered = interface_for(&def).emit();
        assert_eq!(
            rendered,
            "export interface Zoo {\n  apple: number;\n  zebra: string;\n}\n"
        );
    }
}
