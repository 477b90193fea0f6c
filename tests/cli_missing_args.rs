use std::process::Command;

use assert_cmd::cargo;
use tempfile::tempdir;

#[test]
fn no_arguments_exits_nonzero_with_usage() {
    let td = tempdir().unwrap();
    let me = cargo::cargo_bin!("tsmv");
    let out = Command::new(me)
        .current_dir(td.path())
        .output()
        .expect("spawn binary");

    assert!(!out.status.success(), "expected failure with no arguments");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("missing source or destination"),
        "stderr did not mention the missing argument: {stderr}"
    );
}

#[test]
fn single_argument_exits_nonzero_and_moves_nothing() {
    let td = tempdir().unwrap();
    let src = td.path().join("lonely.ts");
    std::fs::write(&src, "export const l = 1;\n").unwrap();

    let me = cargo::cargo_bin!("tsmv");
    let out = Command::new(me)
        .current_dir(td.path())
        .arg("lonely.ts")
        .output()
        .expect("spawn binary");

    assert!(!out.status.success(), "one path is not a move request");
    assert!(src.exists(), "the named file must be untouched");
}
