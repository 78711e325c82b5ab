use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn setup() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let sounds = dir.path().join("sounds");
    fs::create_dir(&sounds).unwrap();
    for file in ["boo [insult].mp3", "hey [hello].mp3", "plain.mp3"] {
        fs::write(sounds.join(file), b"").unwrap();
    }
    let config = serde_json::json!({
        "sounds_dir": sounds,
        "rewards": [ { "category": "insult", "id": "8288e094" } ],
        "commands": [
            { "trigger": "!angel", "sound": "yeah [i killed].mp3" },
            { "trigger": "!hello", "sound": "" },
            { "trigger": "!ghost", "sound": "" }
        ],
        "category_commands": [ { "command": "!hello", "category": "hello" } ]
    });
    fs::write(
        dir.path().join("config.json"),
        serde_json::to_string(&config).unwrap(),
    )
    .unwrap();
    dir
}

fn cmd(dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("chat-soundboard").unwrap();
    cmd.arg("--config").arg(dir.path().join("config.json"));
    cmd
}

#[test]
fn resolve_prints_literal_command_file() {
    let dir = setup();
    cmd(&dir)
        .args(["resolve", "!angel please"])
        .assert()
        .success()
        .stdout("yeah [i killed].mp3\n");
}

#[test]
fn resolve_reward_picks_from_category() {
    let dir = setup();
    cmd(&dir)
        .args(["resolve", "--reward-id", "8288e094", "--seed", "4"])
        .assert()
        .success()
        .stdout("boo [insult].mp3\n");
}

#[test]
fn resolve_without_match_prints_nothing() {
    let dir = setup();
    cmd(&dir)
        .args(["resolve", "just chatting"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn resolve_requires_an_event() {
    let dir = setup();
    cmd(&dir).arg("resolve").assert().failure();
}

#[test]
fn index_lists_categories_and_unbound_commands() {
    let dir = setup();
    cmd(&dir)
        .arg("index")
        .assert()
        .success()
        .stdout(predicate::str::contains("insult (1)"))
        .stdout(predicate::str::contains("  hey [hello].mp3"))
        .stdout(predicate::str::contains("Commands without sounds: !ghost"));
}

#[test]
fn index_json_is_a_category_map() {
    let dir = setup();
    let output = cmd(&dir).args(["index", "--json"]).output().unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["hello"][0], "hey [hello].mp3");
    assert!(value.get("ghost").is_none());
}

#[test]
fn missing_sounds_dir_fails_startup() {
    let dir = setup();
    fs::remove_dir_all(dir.path().join("sounds")).unwrap();
    cmd(&dir)
        .args(["resolve", "!angel"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("build sound index"));
}

#[test]
fn config_init_writes_to_the_given_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fresh.json");
    Command::cargo_bin("chat-soundboard")
        .unwrap()
        .arg("--config")
        .arg(&path)
        .args(["config", "--init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fresh.json"));

    Command::cargo_bin("chat-soundboard")
        .unwrap()
        .arg("--config")
        .arg(&path)
        .args(["config", "--validate"])
        .assert()
        .success()
        .stdout("Config OK\n");
}
