//! TypeScript emission via the Emit trait.
//!
//! Each binding model type renders itself; [`render_file`] assembles a file
//! in fixed order: banner, imports, fetch wrappers, interfaces.

use super::types::{
    FetchBinding, GeneratedBindingFile, ImportStatement, InterfaceBinding, InterfaceMember,
};

/// First line of every generated file
pub const BANNER: &str = "// Generated by wirebind. Do not edit by hand.\n";

/// Trait for emitting TypeScript source from binding models.
pub trait Emit {
    fn emit(&self) -> String;
}

impl Emit for ImportStatement {
    fn emit(&self) -> String {
        format!(
            "import type {{ {} }} from {};\n",
            self.symbols.join(", "),
            string_literal(&self.from)
        )
    }
}

impl Emit for FetchBinding {
    fn emit(&self) -> String {
        format!(
            r#"export function {name}(input: {input}): Promise<{output}> {{
  return fetch({route}, {{
    method: "POST",
    headers: {{ "Content-Type": "application/json" }},
    body: JSON.stringify(input),
  }}).then((res) => res.json());
}}
"#,
            name = self.name,
            input = self.input,
            output = self.output,
            route = string_literal(&self.route),
        )
    }
}

impl Emit for InterfaceMember {
    fn emit(&self) -> String {
        format!(
            "{}{}: {};",
            property_name(&self.name),
            if self.optional { "?" } else { "" },
            self.ts_type
        )
    }
}

impl Emit for InterfaceBinding {
    fn emit(&self) -> String {
        if self.members.is_empty() {
            return format!("export interface {} {{}}\n", self.name);
        }
        let mut out = format!("export interface {} {{\n", self.name);
        for member in &self.members {
            out.push_str("  ");
            out.push_str(&member.emit());
            out.push('\n');
        }
        out.push_str("}\n");
        out
    }
}

/// Render a whole file. Empty blocks are skipped; the rest are separated by
/// one blank line.
pub fn render_file(file: &GeneratedBindingFile) -> String {
    let mut blocks = vec![BANNER.to_string()];

    if !file.imports.is_empty() {
        blocks.push(file.imports.iter().map(Emit::emit).collect());
    }
    if !file.fetch_methods.is_empty() {
        blocks.push(join_emitted(&file.fetch_methods));
    }
    if !file.interfaces.is_empty() {
        blocks.push(join_emitted(&file.interfaces));
    }

    blocks.join("\n")
}

fn join_emitted<T: Emit>(items: &[T]) -> String {
    items
        .iter()
        .map(Emit::emit)
        .collect::<Vec<_>>()
        .join("\n")
}

fn string_literal(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Bare identifier when valid, quoted otherwise
fn property_name(name: &str) -> String {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    };
    if valid {
        name.to_string()
    } else {
        string_literal(name)
    }
}
