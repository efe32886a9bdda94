use std::fs;
use std::path::PathBuf;

use projgen::error::Error;
use projgen::params::Store;
use projgen::processor::{is_template, list_files, list_templates, materialize, resolve_target_path};
use projgen::renderer::MiniJinjaRenderer;
use serde_json::json;
use tempfile::TempDir;

#[test]
fn test_is_template() {
    assert!(is_template("foo.tmpl", "tmpl"));
    assert!(is_template("pom.xml.tmpl", "tmpl"));
    assert!(is_template("src/main/App.java.tmpl", "tmpl"));
    assert!(!is_template("foo.tmpl.txt", "tmpl"));
    assert!(!is_template("foo.tmpls", "tmpl"));
    assert!(!is_template("tmpl", "tmpl"));
    assert!(!is_template("readme.md", "tmpl"));
    assert!(is_template("index.html.j2", "j2"));
}

#[test]
fn test_marker_with_leading_dot() {
    assert!(is_template("foo.tmpl", ".tmpl"));
    assert!(!is_template("foo.tmpl.txt", ".tmpl"));

    let (path, is_template) = resolve_target_path("pom.xml.tmpl", "output", ".tmpl");
    assert_eq!(path, PathBuf::from("output/pom.xml"));
    assert!(is_template);
}

#[test]
fn test_resolve_target_path() {
    let (path, is_template) = resolve_target_path("greeting.txt.tmpl", "output", "tmpl");
    assert_eq!(path, PathBuf::from("output/greeting.txt"));
    assert!(is_template);

    let (path, is_template) = resolve_target_path("docs/readme.md", "output", "tmpl");
    assert_eq!(path, PathBuf::from("output/docs/readme.md"));
    assert!(!is_template);

    let (path, is_template) = resolve_target_path("notes.tmpl.txt", "output", "tmpl");
    assert_eq!(path, PathBuf::from("output/notes.tmpl.txt"));
    assert!(!is_template);
}

#[test]
fn test_list_files_and_templates() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("src/nested")).unwrap();
    fs::write(root.join("b.txt"), "").unwrap();
    fs::write(root.join("a.tmpl"), "").unwrap();
    fs::write(root.join("src/nested/c.rs.tmpl"), "").unwrap();

    let files = list_files(root).unwrap();
    assert_eq!(
        files,
        vec![root.join("a.tmpl"), root.join("b.txt"), root.join("src/nested/c.rs.tmpl")]
    );

    let templates = list_templates(root, "tmpl").unwrap();
    assert_eq!(templates, vec![root.join("a.tmpl"), root.join("src/nested/c.rs.tmpl")]);
}

#[test]
fn test_list_missing_root() {
    let temp_dir = TempDir::new().unwrap();
    let result = list_files(temp_dir.path().join("missing"));
    assert!(matches!(result, Err(Error::TemplateNotFound { .. })));
}

#[test]
fn test_materialize_renders_and_copies() {
    let template_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();
    let root = template_dir.path();
    fs::create_dir_all(root.join("src/app")).unwrap();
    fs::write(root.join("greeting.txt.tmpl"), "Hello, {{ Name }}!").unwrap();
    fs::write(root.join("src/app/main.rs.tmpl"), "// {{ Name | lower }}\n").unwrap();
    fs::write(root.join("logo.bin"), [0u8, 159, 146, 150]).unwrap();

    let store = Store::try_from(json!({"Name": "World"})).unwrap();
    let project =
        materialize(&MiniJinjaRenderer::new(), root, output_dir.path(), &store, "tmpl").unwrap();

    let out = output_dir.path();
    assert_eq!(fs::read_to_string(out.join("greeting.txt")).unwrap(), "Hello, World!");
    assert_eq!(fs::read_to_string(out.join("src/app/main.rs")).unwrap(), "// world\n");
    assert_eq!(fs::read(out.join("logo.bin")).unwrap(), vec![0u8, 159, 146, 150]);
    assert!(!out.join("greeting.txt.tmpl").exists());

    assert_eq!(
        project.files_rendered,
        vec![PathBuf::from("greeting.txt"), PathBuf::from("src/app/main.rs")]
    );
    assert_eq!(project.files_copied, vec![PathBuf::from("logo.bin")]);
}

#[test]
fn test_materialize_overwrites_existing_output() {
    let template_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();
    fs::write(template_dir.path().join("config.tmpl"), "port={{ port }}").unwrap();
    fs::write(output_dir.path().join("config"), "stale content that is longer").unwrap();

    let store = Store::try_from(json!({"port": "80"})).unwrap();
    materialize(&MiniJinjaRenderer::new(), template_dir.path(), output_dir.path(), &store, "tmpl")
        .unwrap();

    assert_eq!(fs::read_to_string(output_dir.path().join("config")).unwrap(), "port=80");
}

#[test]
fn test_materialize_stops_at_first_failure() {
    let template_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();
    let root = template_dir.path();
    fs::write(root.join("a.txt.tmpl"), "{{ ok }}").unwrap();
    fs::write(root.join("b.txt.tmpl"), "{{ broken ").unwrap();
    fs::write(root.join("c.txt"), "never copied").unwrap();

    let store = Store::try_from(json!({"ok": "yes"})).unwrap();
    let result = materialize(&MiniJinjaRenderer::new(), root, output_dir.path(), &store, "tmpl");

    assert!(matches!(result, Err(Error::TemplateParseError { .. })));
    assert!(output_dir.path().join("a.txt").exists());
    assert!(!output_dir.path().join("c.txt").exists());
}

#[test]
fn test_copy_failure_names_destination() {
    let template_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();
    fs::write(template_dir.path().join("readme.md"), "static").unwrap();
    // A directory where the copied file should go.
    fs::create_dir_all(output_dir.path().join("readme.md")).unwrap();

    let store = Store::new();
    let result = materialize(
        &MiniJinjaRenderer::new(),
        template_dir.path(),
        output_dir.path(),
        &store,
        "tmpl",
    );

    match result {
        Err(Error::FilesystemError { path, .. }) => {
            assert_eq!(path, output_dir.path().join("readme.md"));
        }
        other => panic!("Expected FilesystemError, got {other:?}"),
    }
}
