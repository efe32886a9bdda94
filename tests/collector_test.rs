use projgen::collector::{collect, collect_into, PlaceholderSet};
use projgen::renderer::build_environment;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_cross_file_union_without_duplicates() {
    let temp_dir = TempDir::new().unwrap();
    let pom = write(&temp_dir, "pom.xml.tmpl", "<groupId>{{ GroupID }}</groupId>");
    let readme = write(
        &temp_dir,
        "README.md.tmpl",
        "# {{ GroupID }}\nMaintainer: {{ User.Name }} / {{ User.Name | upper }}\n",
    );

    assert_eq!(collect(&[pom, readme]), vec!["GroupID", "User.Name"]);
}

#[test]
fn test_order_independent() {
    let temp_dir = TempDir::new().unwrap();
    let a = write(&temp_dir, "a.tmpl", "{{ alpha }} {{ shared }}");
    let b = write(&temp_dir, "b.tmpl", "{{ beta.gamma }} {{ shared }}");
    let c = write(&temp_dir, "c.tmpl", "{{ delta | default('x') }}");

    let forward = collect(&[a.clone(), b.clone(), c.clone()]);
    let backward = collect(&[c, b, a]);
    assert_eq!(forward, backward);
    assert_eq!(forward, vec!["alpha", "beta.gamma", "delta", "shared"]);
}

#[test]
fn test_file_without_placeholders() {
    let temp_dir = TempDir::new().unwrap();
    let plain = write(&temp_dir, "plain.tmpl", "no placeholders here\n");
    assert!(collect(&[plain]).is_empty());
}

#[test]
fn test_malformed_file_contributes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let good = write(&temp_dir, "good.tmpl", "{{ Name }}");
    let bad = write(&temp_dir, "bad.tmpl", "{{ Broken ");

    let env = build_environment();
    let mut placeholders = PlaceholderSet::new();
    let scans = collect_into(&mut placeholders, &env, &[good, bad.clone()]);

    assert_eq!(placeholders.into_vec(), vec!["Name"]);
    let failed: Vec<_> = scans.iter().filter(|scan| scan.result.is_err()).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].path, bad);
}

#[test]
fn test_accumulator_is_reused_across_batches() {
    let temp_dir = TempDir::new().unwrap();
    let first = write(&temp_dir, "first.tmpl", "{{ one }}");
    let second = write(&temp_dir, "second.tmpl", "{{ two }} {{ one }}");

    let env = build_environment();
    let mut placeholders = PlaceholderSet::new();
    collect_into(&mut placeholders, &env, &[first]);
    collect_into(&mut placeholders, &env, &[second]);

    assert_eq!(placeholders.into_vec(), vec!["one", "two"]);
}

#[test]
fn test_unreadable_file_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("gone.tmpl");
    assert!(collect(&[missing]).is_empty());
}
