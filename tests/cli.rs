use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo_bin!("query-persist"))
}

#[test]
fn test_flatten_and_unflatten() {
    cmd()
        .args(["flatten", r#"{"room":{"id":"r1","tags":["a"]}}"#])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""room.id": "r1""#))
        .stdout(predicate::str::contains(r#""room.tags.0": "a""#));

    cmd()
        .args(["unflatten", r#"{"room.id":"r1","room.tags.0":"a"}"#])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""tags": ["#));
}

#[test]
fn test_flatten_reads_stdin() {
    cmd()
        .args(["--delimiter", "/", "flatten"])
        .write_stdin(r#"{"a":{"b":1}}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""a/b": 1"#));
}

#[test]
fn test_encode_writes_store_param() {
    cmd()
        .args([
            "encode",
            "--name",
            "chat-store",
            "--href",
            "/chat",
            r#"{"state":{"room":{"id":"r1"}},"version":0}"#,
        ])
        .assert()
        .success()
        .stdout("/chat?chat-store=state.room.id%3Dr1\n");
}

#[test]
fn test_decode_shared_link() {
    cmd()
        .args(["decode", "--name", "chat-store", "/chat?chat-store=state.room.id%3Dr1"])
        .assert()
        .success()
        .stdout("{\"state\":{\"room\":{\"id\":\"r1\"}},\"version\":0}\n");

    cmd()
        .args(["decode", "--name", "chat-store", "/chat"])
        .assert()
        .success()
        .stdout("null\n");
}

#[test]
fn test_conflicting_paths_fail() {
    cmd()
        .args(["unflatten", r#"{"a":1,"a.b":2}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Path conflict"));

    let conflicting = "/?s=state.a%3D1%26state.a.b%3D2";
    cmd()
        .args(["decode", "--name", "s", conflicting])
        .assert()
        .success()
        .stdout("null\n");
    cmd()
        .args(["--strict", "decode", "--name", "s", conflicting])
        .assert()
        .failure();
}
