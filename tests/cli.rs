use assert_cmd::Command;
use predicates::prelude::*;

fn vidscript(dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("vidscript").unwrap();
    cmd.current_dir(dir.path())
        .env("XDG_CONFIG_HOME", dir.path())
        .env("HOME", dir.path())
        .env_remove("OPENAI_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn segment_reads_stdin_and_prints_srt() {
    let dir = tempfile::tempdir().unwrap();

    vidscript(&dir)
        .args(["segment", "--max-chars", "12"])
        .write_stdin("One two.\nThree four.   Five six")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "1\n00:00:00,000 --> 00:00:30,000\nOne two.\n\n\
             2\n00:00:40,000 --> 00:01:10,000\nThree four.\n\n\
             3\n00:01:20,000 --> 00:01:50,000\nFive six\n",
        ));
}

#[test]
fn segment_json_envelope_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.txt");
    std::fs::write(&input, "Short text.").unwrap();

    let output = vidscript(&dir)
        .args(["segment", "-f", "json", "-i"])
        .arg(&input)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["result"], "1\n00:00:00,000 --> 00:00:30,000\nShort text.\n");
}

#[test]
fn segment_empty_input_is_a_caller_error() {
    let dir = tempfile::tempdir().unwrap();

    vidscript(&dir)
        .args(["segment", "-f", "json"])
        .write_stdin("   \n ")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("\"error\": \"Empty text\""));
}

#[test]
fn segment_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("subs.srt");

    vidscript(&dir)
        .args(["segment", "-o"])
        .arg(&out)
        .write_stdin("A. B.")
        .assert()
        .success();

    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "1\n00:00:00,000 --> 00:00:30,000\nA. B.\n"
    );
}

#[test]
fn thumbnail_prints_url() {
    let dir = tempfile::tempdir().unwrap();

    vidscript(&dir)
        .args(["thumbnail", "https://youtu.be/dQw4w9WgXcQ"])
        .assert()
        .success()
        .stdout("https://img.youtube.com/vi/dQw4w9WgXcQ/hqdefault.jpg\n");
}

#[test]
fn transcribe_rejects_invalid_url_without_network() {
    let dir = tempfile::tempdir().unwrap();

    vidscript(&dir)
        .args(["--quiet", "transcribe", "https://example.com/video", "-f", "json"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Invalid YouTube URL"));
}

#[test]
fn paraphrase_without_api_key_fails() {
    let dir = tempfile::tempdir().unwrap();

    vidscript(&dir)
        .args(["paraphrase"])
        .write_stdin("Some text to rewrite.")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No API key configured"));
}

#[test]
fn config_init_writes_yaml() {
    let dir = tempfile::tempdir().unwrap();

    vidscript(&dir)
        .args(["config", "--init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Default configuration written to"));
}
