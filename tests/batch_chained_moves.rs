use std::fs;
use std::path::Path;

use tempfile::tempdir;
use tsmv::{build_move_plan, update_imports_in_moved_files, Config, MoveTracker, SourceTree};

fn write_file(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().expect("parent")).expect("create parent");
    fs::write(path, contents).expect("write file");
}

/// Two files that import each other move in the same batch; the second move
/// must see the first one's new location, not its original.
#[test]
fn chained_moves_stay_consistent_within_one_batch() {
    let td = tempdir().unwrap();
    let root = td.path();

    write_file(&root.join("src/utils/a.ts"), "export const a = 1;\n");
    write_file(
        &root.join("src/utils/b.ts"),
        "import { a } from './a';\nexport const b = a + 1;\n",
    );
    write_file(
        &root.join("src/main.ts"),
        "import { a } from './utils/a';\nimport { b } from './utils/b';\n",
    );

    let exts: Vec<String> = vec!["ts".into()];
    let mut tree = SourceTree::scan(root, &exts).expect("scan");
    let mut tracker = MoveTracker::new();
    let cfg = Config::default();

    let plan = build_move_plan(
        &[root.join("src/utils/a.ts"), root.join("src/utils/b.ts")],
        &root.join("src/shared"),
        &cfg,
    )
    .expect("plan");
    let outcome =
        update_imports_in_moved_files(&mut tree, &plan, &mut tracker, &cfg).expect("batch");

    assert!(outcome.is_clean(), "failures: {:?}", outcome.failures);
    assert_eq!(outcome.completed.len(), 2);
    assert_eq!(outcome.unresolved_after, 0, "every import must still resolve");

    let main = fs::read_to_string(root.join("src/main.ts")).unwrap();
    assert!(main.contains("'./shared/a'"), "got: {main}");
    assert!(main.contains("'./shared/b'"), "got: {main}");

    // b moved alongside a, so its import of a stays a sibling reference.
    let b = fs::read_to_string(root.join("src/shared/b.ts")).unwrap();
    assert!(b.contains("'./a'"), "got: {b}");

    assert_eq!(tracker.len(), 2);
    let history = tracker.history();
    assert_eq!(history[0].original_path, tsmv::normalize_path(&root.join("src/utils/a.ts")));
}

/// Moving the same file twice in one session: the second request addresses it
/// by its original path and is redirected through the tracker.
#[test]
fn second_move_of_same_file_uses_tracked_location() {
    let td = tempdir().unwrap();
    let root = td.path();

    write_file(&root.join("src/x.ts"), "export const x = 1;\n");
    write_file(&root.join("src/user.ts"), "import { x } from './x';\n");

    let exts: Vec<String> = vec!["ts".into()];
    let mut tree = SourceTree::scan(root, &exts).expect("scan");
    let mut tracker = MoveTracker::new();
    let cfg = Config::default();

    let first = build_move_plan(&[root.join("src/x.ts")], &root.join("src/mid"), &cfg)
        .expect("first plan");
    update_imports_in_moved_files(&mut tree, &first, &mut tracker, &cfg).expect("first batch");
    assert!(root.join("src/mid/x.ts").exists());

    // Second request still names the original path; planning happens against
    // the tracker, so the file is found at its current home.
    let second = tsmv::MovePlan {
        moves: vec![tsmv::PlannedMove {
            source: tsmv::normalize_path(&root.join("src/x.ts")),
            dest: tsmv::normalize_path(&root.join("src/final/x.ts")),
        }],
        rejected: vec![],
    };
    let outcome =
        update_imports_in_moved_files(&mut tree, &second, &mut tracker, &cfg).expect("second");

    assert!(outcome.is_clean(), "failures: {:?}", outcome.failures);
    assert!(root.join("src/final/x.ts").exists());
    assert!(!root.join("src/mid/x.ts").exists());

    let user = fs::read_to_string(root.join("src/user.ts")).unwrap();
    assert!(user.contains("'./final/x'"), "got: {user}");

    // Last-write-wins: the original path now reports the final location.
    assert_eq!(
        tracker.find_new_location(&root.join("src/x.ts")),
        Some(tsmv::normalize_path(&root.join("src/final/x.ts")))
    );
}
