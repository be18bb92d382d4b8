//! Integration tests for `docscrape::extract_fs`.

use std::fs;
use std::path::{Path, PathBuf};

use docscrape::{
    ExtractConfig, ExtractError, FailurePolicy, NamespaceScope, SourceConfig, ViolationKind,
    extract_fs,
};
use tempfile::TempDir;

fn configs(dir: &Path, sources: &[&str]) -> (SourceConfig, ExtractConfig) {
    let mut source_config = SourceConfig::default();
    source_config.paths = sources.iter().map(|s| dir.join(s)).collect();
    let mut extract_config = ExtractConfig::default();
    extract_config.output = dir.join("all_interfaces.js");
    (source_config, extract_config)
}

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn artifact(dir: &Path) -> String {
    fs::read_to_string(dir.join("all_interfaces.js")).unwrap()
}

const MODEL_TS: &str = r#"///<reference path="../node_modules/d3/d3.d.ts" />

interface HTMLFileInputElement extends HTMLInputElement {
    files: FileList;
}

/**
 * The model base classes
 * @namespace Model
 */
declare module Model {

    /**
     * A feature that has a position on the chromosome.
     * @class Model.Feature
     * @abstract
     */
    export interface Feature {

        /**
         * The feature's starting position
         * @member Model.Feature#start
         * @type {number}
         */
        start:number;
    }

    /**
     * A concrete chromosome.
     * @class Model.Chromosome
     */
    export class Chromosome {
        /** Not part of any interface */
        name: string;
    }
}
"#;

#[test]
fn test_namespace_class_and_members_are_extracted() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "interfaces.d.ts", MODEL_TS);
    let (src, cfg) = configs(tmp.path(), &["interfaces.d.ts"]);

    let report = extract_fs(&src, &cfg).unwrap();

    assert!(report.ok);
    assert_eq!(report.sources_processed, 1);
    assert_eq!(report.blocks_emitted, 3);
    assert_eq!(
        artifact(tmp.path()),
        concat!(
            "/**\n",
            " * The model base classes\n",
            " * @namespace Model\n",
            " */\n",
            "/**\n",
            "     * A feature that has a position on the chromosome.\n",
            "     * @class Model.Feature\n",
            "     * @abstract\n",
            "     */\n",
            "/**\n",
            "         * The feature's starting position\n",
            "         * @member Model.Feature#start\n",
            "         * @type {number}\n",
            "         */\n",
        )
    );
}

#[test]
fn test_sources_without_blocks_leave_empty_artifact() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "all_interfaces.js", "left over from a previous run\n");
    write(tmp.path(), "plain.ts", "export const x = 1;\n");
    let (src, cfg) = configs(tmp.path(), &["plain.ts"]);

    let report = extract_fs(&src, &cfg).unwrap();

    assert_eq!(report.blocks_emitted, 0);
    assert_eq!(artifact(tmp.path()), "");
}

#[test]
fn test_no_arguments_still_truncates_artifact() {
    let tmp = TempDir::new().unwrap();
    let (src, cfg) = configs(tmp.path(), &[]);

    let report = extract_fs(&src, &cfg).unwrap();

    assert_eq!(report.sources_attempted(), 0);
    assert_eq!(artifact(tmp.path()), "");
}

#[test]
fn test_short_form_block_emitted_as_is() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "foo.ts", "/** @abstract @class Foo */\ninterface Foo {}\n");
    let (src, cfg) = configs(tmp.path(), &["foo.ts"]);

    extract_fs(&src, &cfg).unwrap();

    assert_eq!(artifact(tmp.path()), "/** @abstract @class Foo */\n");
}

#[test]
fn test_non_source_arguments_are_skipped() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "notes.js", "/** @abstract @class Js */\n");
    write(tmp.path(), "a.ts", "/** @abstract @class A */\n");
    let (mut src, cfg) = configs(tmp.path(), &["notes.js", "a.ts"]);
    src.paths.insert(0, PathBuf::from("--verbose"));

    let report = extract_fs(&src, &cfg).unwrap();

    assert_eq!(report.sources_skipped, 2);
    assert_eq!(artifact(tmp.path()), "/** @abstract @class A */\n");
}

#[test]
fn test_sources_appended_in_argument_order() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "b.ts",
        "/** @abstract @class B */\n/** b member 1 */\n/** b member 2 */\n",
    );
    write(tmp.path(), "a.ts", "/** @abstract @class A */\n/** a member */\n");
    let (src, cfg) = configs(tmp.path(), &["b.ts", "a.ts"]);

    let report = extract_fs(&src, &cfg).unwrap();

    assert_eq!(report.blocks_emitted, 5);
    assert_eq!(
        artifact(tmp.path()),
        concat!(
            "/** @abstract @class B */\n",
            "/** b member 1 */\n",
            "/** b member 2 */\n",
            "/** @abstract @class A */\n",
            "/** a member */\n",
        )
    );
}

#[test]
fn test_namespace_does_not_leak_across_sources_by_default() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "ns.ts", "/** @namespace Model */\n");
    write(tmp.path(), "cls.ts", "/** @abstract @class Other */\n");
    let (src, cfg) = configs(tmp.path(), &["ns.ts", "cls.ts"]);

    extract_fs(&src, &cfg).unwrap();

    assert_eq!(artifact(tmp.path()), "/** @abstract @class Other */\n");
}

#[test]
fn test_run_scope_carries_namespace_and_class_across_sources() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "ns.ts", "/** @namespace Model */\n");
    write(tmp.path(), "cls.ts", "/** @abstract @class Model.A */\n");
    write(tmp.path(), "member.ts", "/** a member in the next file */\n");
    let (src, mut cfg) = configs(tmp.path(), &["ns.ts", "cls.ts", "member.ts"]);
    cfg.namespace_scope = NamespaceScope::Run;

    extract_fs(&src, &cfg).unwrap();

    assert_eq!(
        artifact(tmp.path()),
        "/** @namespace Model */\n/** @abstract @class Model.A */\n/** a member in the next file */\n"
    );
}

#[test]
fn test_structural_violation_aborts_run() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "bad.ts",
        "/** @abstract @class A */\n/** start\nunexpected code */\n",
    );
    write(tmp.path(), "later.ts", "/** @abstract @class Later */\n");
    let (src, cfg) = configs(tmp.path(), &["bad.ts", "later.ts"]);

    let err = extract_fs(&src, &cfg).unwrap_err();
    let extract_err = err.downcast_ref::<ExtractError>().unwrap();
    match extract_err {
        ExtractError::Structural { path, violation } => {
            assert!(path.ends_with("bad.ts"));
            assert_eq!(violation.line, 3);
            assert_eq!(violation.kind, ViolationKind::StrayLine);
        }
        other => panic!("unexpected error: {other}"),
    }

    // Blocks emitted before the violation are kept; later sources never run.
    assert_eq!(artifact(tmp.path()), "/** @abstract @class A */\n");
}

#[test]
fn test_isolate_policy_records_failure_and_continues() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "bad.ts", "/** one\n/** two\n */\n");
    write(tmp.path(), "good.ts", "/** @abstract @class Good */\n");
    let (src, mut cfg) = configs(tmp.path(), &["bad.ts", "missing.ts", "good.ts"]);
    cfg.failure_policy = FailurePolicy::Isolate;

    let report = extract_fs(&src, &cfg).unwrap();

    assert!(!report.ok);
    assert_eq!(report.sources_processed, 1);
    assert_eq!(report.sources_failed, 2);
    assert_eq!(report.failures[0].kind, "structural_violation");
    assert_eq!(report.failures[0].line, Some(2));
    assert_eq!(report.failures[1].kind, "io_error");
    assert_eq!(artifact(tmp.path()), "/** @abstract @class Good */\n");
}

#[test]
fn test_recursive_directory_argument() {
    let tmp = TempDir::new().unwrap();
    let src_dir = tmp.path().join("src");
    fs::create_dir_all(&src_dir).unwrap();
    write(&src_dir, "b.ts", "/** @abstract @class B */\n");
    write(&src_dir, "a.ts", "/** @abstract @class A */\n");
    let (mut src, cfg) = configs(tmp.path(), &["src"]);
    src.recursive = true;

    let report = extract_fs(&src, &cfg).unwrap();

    assert_eq!(report.sources_processed, 2);
    assert_eq!(
        artifact(tmp.path()),
        "/** @abstract @class A */\n/** @abstract @class B */\n"
    );
}

#[test]
fn test_invalid_exclude_pattern_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let (mut src, cfg) = configs(tmp.path(), &[]);
    src.exclude = vec!["[".to_owned()];

    let err = extract_fs(&src, &cfg).unwrap_err();
    assert!(err.to_string().contains("Invalid exclude glob"), "got: {err}");
}

#[test]
fn test_isolate_policy_keeps_blocks_emitted_before_violation() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "bad.ts",
        "/** @abstract @class A */\n/** m */\n/** start\ncode */\n/** never reached */\n",
    );
    write(tmp.path(), "good.ts", "/** @abstract @class G */\n");
    let (src, mut cfg) = configs(tmp.path(), &["bad.ts", "good.ts"]);
    cfg.failure_policy = FailurePolicy::Isolate;

    let report = extract_fs(&src, &cfg).unwrap();

    assert_eq!(report.sources_processed, 1);
    assert_eq!(report.sources_failed, 1);
    assert_eq!(report.blocks_emitted, 3);
    assert_eq!(report.failures[0].line, Some(4));
    assert_eq!(
        artifact(tmp.path()),
        "/** @abstract @class A */\n/** m */\n/** @abstract @class G */\n"
    );
}

#[test]
fn test_crlf_sources_produce_lf_artifact() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "win.ts",
        "/**\r\n * @abstract @class A\r\n */\r\ninterface A {}\r\n/** member */\r\n",
    );
    let (src, cfg) = configs(tmp.path(), &["win.ts"]);

    extract_fs(&src, &cfg).unwrap();

    assert_eq!(
        artifact(tmp.path()),
        "/**\n * @abstract @class A\n */\n/** member */\n"
    );
}

#[cfg(target_os = "linux")]
#[test]
fn test_lost_flush_is_not_counted_as_emitted() {
    let full = Path::new("/dev/full");
    if !full.exists() {
        return;
    }
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "bad.ts", "/** @abstract @class A */\n/** start\ncode */\n");
    let (src, mut cfg) = configs(tmp.path(), &["bad.ts"]);
    cfg.output = full.to_path_buf();
    cfg.failure_policy = FailurePolicy::Isolate;

    let report = extract_fs(&src, &cfg).unwrap();

    assert_eq!(report.blocks_emitted, 0);
    assert_eq!(report.sources_failed, 1);
    assert_eq!(report.failures[0].kind, "structural_violation");
}

/// Locks `dir` for the duration of `f`, restoring permissions afterwards.
/// Returns `None` when the current user can read the directory anyway.
#[cfg(unix)]
fn with_locked_dir<T>(dir: &Path, f: impl FnOnce() -> T) -> Option<T> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(dir, fs::Permissions::from_mode(0o000)).unwrap();
    let result = if fs::read_dir(dir).is_ok() {
        None
    } else {
        Some(f())
    };
    fs::set_permissions(dir, fs::Permissions::from_mode(0o755)).unwrap();
    result
}

#[cfg(unix)]
fn locked_tree() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let src_dir = tmp.path().join("src");
    let locked = src_dir.join("locked");
    fs::create_dir_all(&locked).unwrap();
    write(&locked, "hidden.ts", "/** @abstract @class Hidden */\n");
    write(&src_dir, "a.ts", "/** @abstract @class A */\n");
    (tmp, locked)
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_aborts_recursive_run() {
    let (tmp, locked) = locked_tree();
    let (mut src, cfg) = configs(tmp.path(), &["src"]);
    src.recursive = true;

    let Some(result) = with_locked_dir(&locked, || extract_fs(&src, &cfg)) else {
        return;
    };

    let err = result.unwrap_err();
    match err.downcast_ref::<ExtractError>().unwrap() {
        ExtractError::Io { path, .. } => assert_eq!(path, &locked),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(artifact(tmp.path()), "");
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_recorded_under_isolate() {
    let (tmp, locked) = locked_tree();
    let (mut src, mut cfg) = configs(tmp.path(), &["src"]);
    src.recursive = true;
    cfg.failure_policy = FailurePolicy::Isolate;

    let Some(result) = with_locked_dir(&locked, || extract_fs(&src, &cfg)) else {
        return;
    };

    let report = result.unwrap();
    assert!(!report.ok);
    assert_eq!(report.sources_processed, 1);
    assert_eq!(report.sources_failed, 1);
    assert_eq!(report.failures[0].kind, "io_error");
    assert_eq!(report.failures[0].file, locked);
    assert_eq!(artifact(tmp.path()), "/** @abstract @class A */\n");
}
