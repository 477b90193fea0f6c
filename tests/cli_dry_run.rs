use std::fs;
use std::process::Command;

use assert_cmd::cargo;
use tempfile::tempdir;

#[test]
fn dry_run_prints_the_plan_and_changes_nothing() {
    let td = tempdir().unwrap();
    let root = td.path();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("src/a.ts"), "export const a = 1;\n").unwrap();
    fs::write(root.join("src/b.ts"), "import { a } from './a';\n").unwrap();

    let me = cargo::cargo_bin!("tsmv");
    let out = Command::new(me)
        .current_dir(root)
        .args(["--dry-run", "src/a.ts", "src/shared"])
        .output()
        .expect("spawn binary");

    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Dry run"), "missing banner: {stdout}");
    assert!(stdout.contains("Total files: 1"), "missing totals: {stdout}");
    assert!(
        stdout.contains("Total import updates: 1"),
        "missing import count: {stdout}"
    );

    assert!(root.join("src/a.ts").exists(), "dry run must not move files");
    assert!(!root.join("src/shared").exists(), "dry run must not create dirs");
    let b = fs::read_to_string(root.join("src/b.ts")).unwrap();
    assert!(b.contains("'./a'"), "dry run must not rewrite imports: {b}");
}
