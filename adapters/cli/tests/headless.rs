use std::process::Command;

#[test]
fn short_session_writes_a_save_file() {
    let dir = std::env::temp_dir().join(format!("merge-arena-cli-{}", std::process::id()));
    let save = dir.join("save.json");
    let _ = std::fs::remove_file(&save);

    let output = Command::new(env!("CARGO_BIN_EXE_merge-arena"))
        .args(["--seconds", "2", "--speed", "3", "--seed", "5", "--save"])
        .arg(&save)
        .output()
        .expect("failed to launch merge-arena binary");

    assert!(output.status.success(), "merge-arena exited with {:?}", output.status);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("stage 1"), "unexpected summary: {stdout}");

    let contents = std::fs::read_to_string(&save).expect("save file written");
    assert!(contents.contains("\"version\":1"), "unexpected save: {contents}");
    let _ = std::fs::remove_dir_all(&dir);
}
