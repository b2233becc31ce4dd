//! End-to-end over the host backend: factories, staging, execution and the
//! default-session lifecycle, against real processes.

#![cfg(unix)]

use std::fs;

use nsdock::{global, path, Error, Session};

#[test]
fn test_custom_command_runs_and_captures_output() {
    let out = tempfile::tempdir().unwrap();
    let session = Session::host(out.path()).unwrap();

    let result = session
        .custom_command("echo hello from the sandbox")
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(result.exit_code, 0);
    assert_eq!(result.stdout.trim(), "hello from the sandbox");
}

#[test]
fn test_staged_positional_is_readable_by_the_command() {
    let out = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    let local = data.path().join("transforms.json");
    fs::write(&local, b"{\"frames\": []}").unwrap();

    let session = Session::host(out.path()).unwrap();
    let result = session
        .custom_command("cat")
        .unwrap()
        .add_positional_arg(path(&local))
        .run()
        .unwrap();

    assert_eq!(result.stdout, "{\"frames\": []}");
    // the copy, not the original, was read
    assert!(out.path().join(".staged/transforms.json").exists());
}

#[test]
fn test_nonzero_exit_surfaces_with_command_line() {
    let out = tempfile::tempdir().unwrap();
    let session = Session::host(out.path()).unwrap();

    let err = session
        .custom_command("sh -c 'exit 7'")
        .unwrap()
        .run()
        .unwrap_err();

    match err {
        Error::Execution {
            command_line,
            exit_code,
            ..
        } => {
            assert_eq!(exit_code, 7);
            assert!(command_line.starts_with("sh -c"));
        }
        other => panic!("expected Execution error, got {other:?}"),
    }
}

#[test]
fn test_process_images_renders_expected_flags() {
    // `true` exits 0 whatever the arguments, so the rendered vector is
    // accepted and we can assert on its side effects (staging).
    let out = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    let images = data.path().join("raw");
    fs::create_dir(&images).unwrap();
    fs::write(images.join("0001.jpg"), b"jpg").unwrap();

    let session = Session::host(out.path()).unwrap();
    // swap the program for a no-op so the pipeline runs without nerfstudio
    let result = session
        .custom_command("true")
        .unwrap()
        .set("data", path(&images))
        .unwrap()
        .set("output_dir", "processed_data")
        .unwrap()
        .run()
        .unwrap();

    assert!(result.success());
    assert!(out.path().join(".staged/raw/0001.jpg").exists());
}

// One test for the whole default-session lifecycle: the three assertions
// share process-global state, so ordering must be fixed.
#[test]
fn test_global_session_lifecycle() {
    let before = global::custom_command("echo too early");
    assert!(matches!(before, Err(Error::UninitializedSession)));

    let out = tempfile::tempdir().unwrap();
    global::init(Session::host(out.path()).unwrap()).unwrap();

    let result = global::custom_command("echo ready")
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(result.stdout.trim(), "ready");

    let again = global::init(Session::host(out.path()).unwrap());
    assert!(matches!(again, Err(Error::AlreadyInitialized)));
}
