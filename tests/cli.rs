use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn invtrack(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("invtrack").unwrap();
    cmd.env_remove("INVTRACK_DATA")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join("config"))
        .env("XDG_DATA_HOME", dir.path().join("data"))
        .arg("--data")
        .arg(dir.path().join("db.json"));
    cmd
}

#[test]
fn test_category_add_and_get() {
    let dir = tempfile::tempdir().unwrap();

    invtrack(&dir)
        .args(["category", "add", "--name", "Books"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\": 0"))
        .stdout(predicate::str::contains("\"name\": \"Books\""));

    invtrack(&dir)
        .args(["category", "get", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"createdAt\""));
}

#[test]
fn test_get_missing_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();

    invtrack(&dir)
        .args(["item", "get", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("item not found"));
}

#[test]
fn test_unknown_category_is_reported() {
    let dir = tempfile::tempdir().unwrap();

    invtrack(&dir)
        .args(["item", "add", "--name", "Fork", "--category", "1234"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("category with id 1234 not found"));

    invtrack(&dir)
        .args(["item", "ls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn test_update_without_fields_is_not_modified() {
    let dir = tempfile::tempdir().unwrap();

    invtrack(&dir)
        .args(["category", "add", "--name", "Books"])
        .assert()
        .success();

    invtrack(&dir)
        .args(["category", "update", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Books\""))
        .stderr(predicate::str::contains("not modified"));
}

#[test]
fn test_list_with_refs_and_self_reference() {
    let dir = tempfile::tempdir().unwrap();

    invtrack(&dir)
        .args(["item", "add", "--name", "Apple"])
        .assert()
        .success();
    invtrack(&dir)
        .args(["list", "add", "--name", "Fruit", "--item", "0:3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"itemId\": 0"))
        .stdout(predicate::str::contains("\"count\": 3"));

    invtrack(&dir)
        .args(["list", "update", "0", "--list", "0:1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("circular reference"));
}

#[test]
fn test_ls_filters_by_name() {
    let dir = tempfile::tempdir().unwrap();

    for name in ["Books", "Boots", "Bread"] {
        invtrack(&dir)
            .args(["category", "add", "--name", name])
            .assert()
            .success();
    }

    invtrack(&dir)
        .args(["category", "ls", "--name", "^boo", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Books"))
        .stdout(predicate::str::contains("Boots").not())
        .stdout(predicate::str::contains("Bread").not());

    invtrack(&dir)
        .args(["category", "ls", "--limit", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("limit"));
}

#[test]
fn test_rm_reports_presence() {
    let dir = tempfile::tempdir().unwrap();

    invtrack(&dir)
        .args(["category", "add", "--name", "Books"])
        .assert()
        .success();
    invtrack(&dir)
        .args(["category", "rm", "0"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Deleted category"));
    invtrack(&dir)
        .args(["category", "rm", "0"])
        .assert()
        .failure();
}

#[test]
fn test_negative_id_is_rejected() {
    let dir = tempfile::tempdir().unwrap();

    invtrack(&dir)
        .args(["list", "get", "-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid argument"));
}

#[test]
fn test_data_from_environment() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("env.json");

    let mut cmd = Command::cargo_bin("invtrack").unwrap();
    cmd.env("INVTRACK_DATA", &path)
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join("config"))
        .env("XDG_DATA_HOME", dir.path().join("data"))
        .args(["category", "add", "--name", "Books"])
        .assert()
        .success();

    assert!(path.exists());
}
