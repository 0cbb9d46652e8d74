//! Binding Generation Tests
//!
//! Generated TypeScript for the example app: layout, content and determinism.

use std::fs;

use wirebind_core::application::codegen::BANNER;
use wirebind_daemon::{build_registry, APP_NAME};

/// Test 1: One file per procedure under `<root>/<app>/`
#[test]
fn test_layout() {
    let registry = build_registry().unwrap();
    let dir = tempfile::tempdir().unwrap();

    let written = registry.generate_bindings(dir.path()).unwrap();
    let app_dir = dir.path().join(APP_NAME);
    assert_eq!(
        written,
        vec![
            app_dir.join("get-output.ts"),
            app_dir.join("echo-tree.ts"),
            app_dir.join("health.ts"),
        ]
    );

    let mut on_disk: Vec<String> = fs::read_dir(&app_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    on_disk.sort();
    assert_eq!(on_disk, vec!["echo-tree.ts", "get-output.ts", "health.ts"]);
}

/// Test 2: Full text of the get-output binding
#[test]
fn test_get_output_file() {
    let registry = build_registry().unwrap();
    let dir = tempfile::tempdir().unwrap();
    registry.generate_bindings(dir.path()).unwrap();

    let source = fs::read_to_string(dir.path().join(APP_NAME).join("get-output.ts")).unwrap();
    let expected = format!(
        "{BANNER}\n\
export function getOutput(input: GetOutputInput): Promise<GetOutputOutput> {{
  return fetch(\"/rpc/example-test/get-output\", {{
    method: \"POST\",
    headers: {{ \"Content-Type\": \"application/json\" }},
    body: JSON.stringify(input),
  }}).then((res) => res.json());
}}

export interface GetOutputInput {{
  bar: string;
  foo: number;
  myOption?: boolean;
}}

export interface GetOutputOutput {{
  hello: number;
  world: string;
}}
"
    );
    assert_eq!(source, expected);
}

/// Test 3: Regenerating without changes yields identical bytes
#[test]
fn test_regeneration_is_byte_identical() {
    let registry = build_registry().unwrap();
    let dir = tempfile::tempdir().unwrap();

    let first: Vec<Vec<u8>> = registry
        .generate_bindings(dir.path())
        .unwrap()
        .iter()
        .map(|p| fs::read(p).unwrap())
        .collect();

    let rebuilt = build_registry().unwrap();
    let second: Vec<Vec<u8>> = rebuilt
        .generate_bindings(dir.path())
        .unwrap()
        .iter()
        .map(|p| fs::read(p).unwrap())
        .collect();

    assert_eq!(first, second);
}

/// Test 4: Stale content is overwritten
#[test]
fn test_overwrites_existing_file() {
    let registry = build_registry().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(APP_NAME).join("health.ts");

    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "stale").unwrap();

    registry.generate_bindings(dir.path()).unwrap();
    let source = fs::read_to_string(&path).unwrap();
    assert!(source.starts_with(BANNER));
    assert!(!source.contains("stale"));
}

/// Test 5: Self-referential type is declared once and referenced by name
#[test]
fn test_recursive_type_declared_once() {
    let registry = build_registry().unwrap();
    let file = registry
        .binding_file("echo-tree", std::path::Path::new("rpc"))
        .unwrap();

    assert!(file.imports.is_empty());
    assert_eq!(file.interfaces.len(), 1);
    assert_eq!(file.interfaces[0].name, "TreeNode");
}
