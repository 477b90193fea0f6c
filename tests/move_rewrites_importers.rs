use std::fs;
use std::path::Path;

use tempfile::tempdir;
use tsmv::{build_move_plan, update_imports_in_moved_files, Config, MoveTracker, SourceTree};

fn write_file(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().expect("parent")).expect("create parent");
    fs::write(path, contents).expect("write file");
}

fn exts() -> Vec<String> {
    vec!["ts".into(), "tsx".into(), "js".into(), "jsx".into()]
}

/// Happy path: move one file into another directory and every module that
/// imported it keeps resolving.
#[test]
fn moving_a_file_rewrites_every_importer() {
    let td = tempdir().unwrap();
    let root = td.path();

    write_file(
        &root.join("src/utils/helpers.ts"),
        "export const toTitleCase = (s: string) => s;\n",
    );
    write_file(
        &root.join("src/components/Button.tsx"),
        "import { toTitleCase } from '../utils/helpers';\nexport const Button = () => toTitleCase('b');\n",
    );
    write_file(
        &root.join("src/pages/Home.ts"),
        "export { toTitleCase } from '../utils/helpers';\n",
    );

    let mut tree = SourceTree::scan(root, &exts()).expect("scan");
    let mut tracker = MoveTracker::new();
    let cfg = Config::default();

    let plan = build_move_plan(
        &[root.join("src/utils/helpers.ts")],
        &root.join("src/shared"),
        &cfg,
    )
    .expect("plan");
    let outcome =
        update_imports_in_moved_files(&mut tree, &plan, &mut tracker, &cfg).expect("batch");

    assert!(outcome.is_clean(), "failures: {:?}", outcome.failures);
    assert_eq!(outcome.completed.len(), 1);
    assert_eq!(outcome.import_edits, 2, "one import plus one re-export");
    assert_eq!(outcome.unresolved_after, 0);

    assert!(!root.join("src/utils/helpers.ts").exists());
    assert!(root.join("src/shared/helpers.ts").exists());

    let button = fs::read_to_string(root.join("src/components/Button.tsx")).unwrap();
    assert!(button.contains("'../shared/helpers'"), "got: {button}");

    let home = fs::read_to_string(root.join("src/pages/Home.ts")).unwrap();
    assert!(home.contains("'../shared/helpers'"), "got: {home}");

    assert_eq!(
        tracker.find_new_location(&root.join("src/utils/helpers.ts")),
        Some(tsmv::normalize_path(&root.join("src/shared/helpers.ts")))
    );
}

/// Untouched modules are not rewritten to disk.
#[test]
fn unrelated_files_are_left_alone() {
    let td = tempdir().unwrap();
    let root = td.path();

    write_file(&root.join("src/a.ts"), "export const a = 1;\n");
    write_file(&root.join("src/other.ts"), "import { z } from './zed';\n");
    write_file(&root.join("src/zed.ts"), "export const z = 2;\n");

    let mut tree = SourceTree::scan(root, &exts()).expect("scan");
    let mut tracker = MoveTracker::new();
    let cfg = Config::default();

    let before = fs::read_to_string(root.join("src/other.ts")).unwrap();
    let plan = build_move_plan(&[root.join("src/a.ts")], &root.join("lib"), &cfg).expect("plan");
    let outcome =
        update_imports_in_moved_files(&mut tree, &plan, &mut tracker, &cfg).expect("batch");

    assert!(outcome.is_clean());
    assert_eq!(outcome.import_edits, 0);
    let after = fs::read_to_string(root.join("src/other.ts")).unwrap();
    assert_eq!(before, after, "unrelated module must not change");
}
