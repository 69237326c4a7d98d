//! Config loading behavior against real files.

use std::path::Path;

use patchup_core::{ConfigError, ProgramConfig};
use tempfile::TempDir;

fn write_config(dir: &Path, yaml: &str) -> std::path::PathBuf {
    let path = dir.join("patchup.yaml");
    std::fs::write(&path, yaml).expect("write config");
    path
}

#[test]
fn full_document_round_trips_every_knob() {
    let tmp = TempDir::new().unwrap();
    let path = write_config(
        tmp.path(),
        r#"
chromium_src_dir: /checkout/src
patches_dir: /checkout/src/patches
submodule_dirs:
  - third_party/search_engines_data/resources
patchinfo_file:
  version: 2
  encoding: utf-8
  ext: meta
patch_file:
  ext: diff
  replacement_separator: "_"
generator:
  keep_patch_files:
    - pinned.diff
  ignore_prefixes:
    - generated
"#,
    );

    let config = ProgramConfig::load(&path).expect("load");
    assert_eq!(config.chromium_src_dir, Path::new("/checkout/src"));
    assert_eq!(config.patchinfo_file.version, 2);
    assert_eq!(config.patchinfo_file.ext, "meta");
    assert_eq!(config.patch_file.ext, "diff");
    assert_eq!(config.patch_file.replacement_separator, '_');
    assert_eq!(config.generator.keep_patch_files, vec!["pinned.diff"]);
    assert_eq!(config.generator.ignore_prefixes, vec!["generated"]);
}

#[test]
fn omitted_sections_use_defaults() {
    let tmp = TempDir::new().unwrap();
    let path = write_config(
        tmp.path(),
        r#"
chromium_src_dir: /checkout/src
patches_dir: /checkout/src/patches
submodule_dirs: []
"#,
    );

    let config = ProgramConfig::load(&path).expect("load");
    assert_eq!(config.patchinfo_file.version, 1);
    assert_eq!(config.patchinfo_file.encoding, "utf-8");
    assert_eq!(config.patchinfo_file.ext, "patchinfo");
    assert_eq!(config.patch_file.ext, "patch");
    assert_eq!(config.patch_file.replacement_separator, '-');
    assert!(config.generator.keep_patch_files.is_empty());
    assert!(config.scopes().is_empty());
}

#[test]
fn relative_dirs_resolve_against_config_file() {
    let tmp = TempDir::new().unwrap();
    let path = write_config(
        tmp.path(),
        r#"
chromium_src_dir: src
patches_dir: src/patches
submodule_dirs:
  - resources
"#,
    );

    let config = ProgramConfig::load(&path).expect("load");
    assert_eq!(config.chromium_src_dir, tmp.path().join("src"));
    assert_eq!(config.patches_dir, tmp.path().join("src").join("patches"));
    let scopes = config.scopes();
    assert_eq!(scopes[0].repo_dir, tmp.path().join("src").join("resources"));
}

#[test]
fn malformed_yaml_reports_path() {
    let tmp = TempDir::new().unwrap();
    let path = write_config(tmp.path(), "chromium_src_dir: [not: closed");

    let err = ProgramConfig::load(&path).unwrap_err();
    match err {
        ConfigError::Yaml { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected yaml error, got {other:?}"),
    }
}

#[test]
fn missing_required_field_is_a_yaml_error() {
    let tmp = TempDir::new().unwrap();
    let path = write_config(tmp.path(), "patches_dir: /p\nsubmodule_dirs: []\n");

    assert!(matches!(
        ProgramConfig::load(&path).unwrap_err(),
        ConfigError::Yaml { .. }
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let tmp = TempDir::new().unwrap();
    let err = ProgramConfig::load(&tmp.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn invalid_separator_fails_load() {
    let tmp = TempDir::new().unwrap();
    let path = write_config(
        tmp.path(),
        r#"
chromium_src_dir: /src
patches_dir: /patches
submodule_dirs: []
patch_file:
  replacement_separator: "/"
"#,
    );

    assert!(matches!(
        ProgramConfig::load(&path).unwrap_err(),
        ConfigError::Validation { .. }
    ));
}
