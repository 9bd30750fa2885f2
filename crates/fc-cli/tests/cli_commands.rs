use std::{fs, path::Path};

use pretty_assertions::assert_eq;
use tempfile::tempdir;

use fc_cli::{Args, CliError, Command, run};

const BOARD: &str = "Hello @@ (10, 20, r0, z0)\ncat.png @@ (50, 60, r0, z0) @@ 100x100\n\n# Links\n0 -> 1";

fn args(dir: &Path, command: Command) -> Args {
    Args {
        command,
        store_dir: dir.to_path_buf(),
        key: "canvasData".to_string(),
        log_level: "off".to_string(),
        verbose: false,
    }
}

fn run_to_string(args: &Args) -> (Result<(), CliError>, String) {
    let mut out = Vec::new();
    let result = run(args, &mut out);
    (result, String::from_utf8(out).unwrap())
}

#[test]
fn import_then_export_roundtrips() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("board.md");
    fs::write(&input, BOARD).unwrap();

    let (result, out) = run_to_string(&args(dir.path(), Command::Import { input }));
    result.unwrap();
    assert_eq!(out, "imported 2 element(s), 1 link(s); skipped 0 line(s)\n");
    assert!(dir.path().join("canvasData.json").exists());

    let (result, out) = run_to_string(&args(dir.path(), Command::Export { output: None }));
    result.unwrap();
    assert_eq!(out, format!("{BOARD}\n"));
}

#[test]
fn export_to_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("board.md");
    let output = dir.path().join("out.md");
    fs::write(&input, BOARD).unwrap();
    run_to_string(&args(dir.path(), Command::Import { input }))
        .0
        .unwrap();

    let (result, out) = run_to_string(&args(
        dir.path(),
        Command::Export {
            output: Some(output.clone()),
        },
    ));
    result.unwrap();
    assert_eq!(out, "");
    assert_eq!(fs::read_to_string(output).unwrap(), BOARD);
}

#[test]
fn export_without_stored_canvas_fails() {
    let dir = tempdir().unwrap();
    let (result, _) = run_to_string(&args(dir.path(), Command::Export { output: None }));
    assert!(matches!(result, Err(CliError::MissingCanvas { .. })));
}

#[test]
fn check_text_reports_skipped_lines() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("messy.md");
    fs::write(&input, "a @@ (0, 0, r0, z0)\nnot an element\n\n# Links\n0 -> 4").unwrap();

    let (result, out) = run_to_string(&args(
        dir.path(),
        Command::Check {
            input: Some(input.clone()),
        },
    ));
    assert!(matches!(result, Err(CliError::Problems(2))));
    let prefix = input.display().to_string();
    assert_eq!(
        out,
        format!(
            "{prefix}: line 2: skipped `not an element`\n{prefix}: line 5: skipped `0 -> 4`\n1 element(s), 0 link(s)\n"
        )
    );
}

#[test]
fn check_stored_canvas_reports_dropped_data() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("canvasData.json"),
        r#"{"elements":[{"type":"text","content":"a","x":0,"y":0},{"content":"no type"}],"links":[[0,1]]}"#,
    )
    .unwrap();

    let (result, out) = run_to_string(&args(dir.path(), Command::Check { input: None }));
    assert!(matches!(result, Err(CliError::Problems(2))));
    assert!(out.starts_with("malformed record #1: "), "got:\n{out}");
    assert!(out.contains("dropped link #0: "), "got:\n{out}");
    assert!(out.ends_with("1 element(s), 0 link(s)\n"));
}

#[test]
fn check_clean_stored_canvas_passes() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("board.md");
    fs::write(&input, BOARD).unwrap();
    run_to_string(&args(dir.path(), Command::Import { input }))
        .0
        .unwrap();

    let (result, out) = run_to_string(&args(dir.path(), Command::Check { input: None }));
    result.unwrap();
    assert_eq!(out, "2 element(s), 1 link(s)\n");
}

#[test]
fn separate_keys_do_not_collide() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("board.md");
    fs::write(&input, BOARD).unwrap();
    let mut import = args(dir.path(), Command::Import { input });
    import.key = "other".to_string();
    run_to_string(&import).0.unwrap();

    assert!(dir.path().join("other.json").exists());
    let (result, _) = run_to_string(&args(dir.path(), Command::Export { output: None }));
    assert!(matches!(result, Err(CliError::MissingCanvas { .. })));
}
