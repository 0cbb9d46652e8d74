//! Type Descriptor Extractor
//!
//! Builds a language-neutral [`TypeDescriptor`] from the JSON Schema of a
//! `schemars::JsonSchema` type. The schema carries the serde view of the
//! type: renamed fields, `#[serde(default)]` fields missing from `required`,
//! and nested structs as `$ref`s into `$defs`.
//!
//! Nested structs are referenced by name and never inlined. Each definition
//! is materialized once, so self-referential types terminate.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;

/// Primitive kinds understood by the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PrimitiveKind {
    Int,
    String,
    Bool,
}

/// Language-neutral type shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TypeDescriptor {
    Primitive(PrimitiveKind),
    /// Nested references carry an empty field list
    Struct(StructDescriptor),
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructDescriptor {
    pub name: String,
    /// Sorted lexicographically by name
    pub fields: Vec<FieldDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: TypeDescriptor,
    pub required: bool,
}

impl TypeDescriptor {
    /// By-name reference to a struct
    pub fn struct_ref(name: impl Into<String>) -> Self {
        TypeDescriptor::Struct(StructDescriptor {
            name: name.into(),
            fields: Vec::new(),
        })
    }

    pub fn struct_name(&self) -> Option<&str> {
        match self {
            TypeDescriptor::Struct(s) => Some(&s.name),
            _ => None,
        }
    }
}

impl StructDescriptor {
    /// Names of structs referenced by this struct's fields (sorted, deduplicated)
    pub fn referenced_structs(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .fields
            .iter()
            .filter_map(|f| f.ty.struct_name())
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

/// Extracted shape of a Rust type plus every struct definition it references
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeShape {
    /// The type itself (a by-name reference when it is a struct)
    pub root: TypeDescriptor,
    /// All struct definitions reachable from the root, including the root
    pub definitions: BTreeMap<String, StructDescriptor>,
}

impl TypeShape {
    /// Extract the shape of `T` from its JSON Schema
    pub fn of<T: JsonSchema>() -> Self {
        let schema = schemars::schema_for!(T);
        let value = serde_json::to_value(&schema).unwrap_or_default();
        Self::from_schema(&T::schema_name(), &value)
    }

    /// Extract from an already-rendered root schema. `root_name` names the
    /// root type and resolves `{"$ref": "#"}` self-references.
    pub fn from_schema(root_name: &str, schema: &Value) -> Self {
        let resolver = Resolver::new(root_name, schema);
        let mut definitions = BTreeMap::new();

        for (&name, &def) in &resolver.defs {
            if is_struct_schema(def) {
                definitions.insert(name.to_string(), resolver.describe_struct(name, def));
            }
        }

        let root = if is_struct_schema(schema) {
            definitions.insert(
                root_name.to_string(),
                resolver.describe_struct(root_name, schema),
            );
            TypeDescriptor::struct_ref(root_name)
        } else {
            resolver.classify(schema, &mut Vec::new())
        };

        Self { root, definitions }
    }

    /// Full descriptor of the root (fields materialized when it is a struct)
    pub fn descriptor(&self) -> TypeDescriptor {
        match self.root.struct_name() {
            Some(name) => self
                .definitions
                .get(name)
                .cloned()
                .map(TypeDescriptor::Struct)
                .unwrap_or_else(|| self.root.clone()),
            None => self.root.clone(),
        }
    }
}

/// Root descriptor followed by every nested struct definition, sorted by name
pub fn extract_all<T: JsonSchema>() -> Vec<TypeDescriptor> {
    let shape = TypeShape::of::<T>();
    let root_name = shape.root.struct_name().map(str::to_string);
    let mut out = vec![shape.descriptor()];
    out.extend(
        shape
            .definitions
            .into_iter()
            .filter(|(name, _)| Some(name) != root_name.as_ref())
            .map(|(_, def)| TypeDescriptor::Struct(def)),
    );
    out
}

/// Descriptor of `T` with one level of fields materialized
pub fn extract<T: JsonSchema>() -> TypeDescriptor {
    TypeShape::of::<T>().descriptor()
}

fn is_struct_schema(schema: &Value) -> bool {
    let is_object = match schema.get("type") {
        Some(Value::String(t)) => t == "object",
        _ => false,
    };
    is_object && !schema.get("additionalProperties").is_some_and(Value::is_object)
}

/// Resolves field schemas against the definitions of one root schema
struct Resolver<'a> {
    root_name: &'a str,
    root_is_struct: bool,
    defs: BTreeMap<&'a str, &'a Value>,
}

impl<'a> Resolver<'a> {
    fn new(root_name: &'a str, schema: &'a Value) -> Self {
        let mut defs = BTreeMap::new();
        for key in ["definitions", "$defs"] {
            if let Some(map) = schema.get(key).and_then(Value::as_object) {
                for (name, def) in map {
                    defs.insert(name.as_str(), def);
                }
            }
        }
        Self {
            root_name,
            root_is_struct: is_struct_schema(schema),
            defs,
        }
    }

    fn describe_struct(&self, name: &str, schema: &'a Value) -> StructDescriptor {
        let required: Vec<&str> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|r| r.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let mut fields: Vec<FieldDescriptor> = schema
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| {
                props
                    .iter()
                    .map(|(field, field_schema)| FieldDescriptor {
                        name: field.clone(),
                        ty: self.classify(field_schema, &mut Vec::new()),
                        required: required.contains(&field.as_str()),
                    })
                    .collect()
            })
            .unwrap_or_default();

        fields.sort_by(|a, b| a.name.cmp(&b.name));

        StructDescriptor {
            name: name.to_string(),
            fields,
        }
    }

    /// Total mapping from a field schema to a descriptor. Never fails.
    ///
    /// `visiting` holds the non-struct definitions being expanded, so alias
    /// cycles end in `Unknown`.
    fn classify(&self, schema: &'a Value, visiting: &mut Vec<&'a str>) -> TypeDescriptor {
        if let Some(reference) = schema.get("$ref").and_then(Value::as_str) {
            return self.classify_ref(reference, visiting);
        }

        for key in ["anyOf", "oneOf", "allOf"] {
            if let Some(variants) = schema.get(key).and_then(Value::as_array) {
                let non_null: Vec<&Value> =
                    variants.iter().filter(|v| !is_null_schema(v)).collect();
                return match non_null.as_slice() {
                    [single] => self.classify(*single, visiting),
                    _ => TypeDescriptor::Unknown,
                };
            }
        }

        if schema.get("enum").is_some() || schema.get("const").is_some() {
            return TypeDescriptor::Unknown;
        }

        match schema.get("type") {
            Some(Value::String(kind)) => classify_kind(kind),
            Some(Value::Array(kinds)) => {
                let non_null: Vec<&str> = kinds
                    .iter()
                    .filter_map(Value::as_str)
                    .filter(|k| *k != "null")
                    .collect();
                match non_null.as_slice() {
                    [single] => classify_kind(single),
                    _ => TypeDescriptor::Unknown,
                }
            }
            _ => TypeDescriptor::Unknown,
        }
    }

    /// Structs stay by-name references; any other definition is classified
    /// in place (a newtype over `i64` is an `Int`, an enum is `Unknown`).
    fn classify_ref(&self, reference: &str, visiting: &mut Vec<&'a str>) -> TypeDescriptor {
        if reference == "#" {
            return if self.root_is_struct {
                TypeDescriptor::struct_ref(self.root_name)
            } else {
                TypeDescriptor::Unknown
            };
        }

        let Some(name) = reference
            .strip_prefix("#/$defs/")
            .or_else(|| reference.strip_prefix("#/definitions/"))
        else {
            return TypeDescriptor::Unknown;
        };
        let Some((&name, &def)) = self.defs.get_key_value(name) else {
            return TypeDescriptor::Unknown;
        };

        if is_struct_schema(def) {
            return TypeDescriptor::struct_ref(name);
        }
        if visiting.contains(&name) {
            return TypeDescriptor::Unknown;
        }
        visiting.push(name);
        let resolved = self.classify(def, visiting);
        visiting.pop();
        resolved
    }
}

fn classify_kind(kind: &str) -> TypeDescriptor {
    match kind {
        "integer" => TypeDescriptor::Primitive(PrimitiveKind::Int),
        "string" => TypeDescriptor::Primitive(PrimitiveKind::String),
        "boolean" => TypeDescriptor::Primitive(PrimitiveKind::Bool),
        _ => TypeDescriptor::Unknown,
    }
}

fn is_null_schema(schema: &Value) -> bool {
    matches!(schema.get("type"), Some(Value::String(t)) if t == "null")
}
