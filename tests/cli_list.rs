#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

const UNREACHABLE: &str = "http://127.0.0.1:9/todos";

fn seeded_cache(count: usize) -> TempDir {
    let temp = TempDir::new().unwrap();
    let records: Vec<_> = (1..=count)
        .map(|i| {
            json!({
                "userId": (i - 1) / 10 + 1,
                "id": i,
                "title": format!("todo number {}", i),
                "completed": i % 3 == 0,
            })
        })
        .collect();
    fs::write(
        temp.path().join("cache.json"),
        serde_json::to_string(&records).unwrap(),
    )
    .unwrap();
    temp
}

fn todotable_cmd(temp: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("todotable"));
    cmd.env("TODOTABLE_CACHE_DIR", temp.path())
        .env("TODOTABLE_SOURCE_URL", UNREACHABLE)
        .env("TODOTABLE_TIMEOUT_SECS", "2")
        .env_remove("TODOTABLE_CACHE_KEY")
        .env_remove("TODOTABLE_PAGE_SIZE")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(temp.path().join("todotable.toml"));
    cmd
}

#[test]
fn test_list_renders_first_page_from_cache() {
    let temp = seeded_cache(23);
    todotable_cmd(&temp)
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("userId"))
        .stdout(predicate::str::contains("todo number 10"))
        .stdout(predicate::str::contains("todo number 11").not())
        .stdout(predicate::str::contains("< Prev [1] 2 3 Next >"))
        .stdout(predicate::str::contains("Showing 1-10 of 23 records"));
}

#[test]
fn test_no_command_lists() {
    let temp = seeded_cache(5);
    todotable_cmd(&temp)
        .assert()
        .success()
        .stdout(predicate::str::contains("Showing 1-5 of 5 records"));
}

#[test]
fn test_list_query_flags() {
    let temp = seeded_cache(30);
    todotable_cmd(&temp)
        .args([
            "list", "--search", "number 2", "--filter", "done", "--sort", "id_desc",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("todo number 27"))
        .stdout(predicate::str::contains("todo number 20").not())
        .stdout(predicate::str::contains("Showing 1-3 of 3 records"))
        .stdout(predicate::str::contains("sort: ID_DESC"));
}

#[test]
fn test_list_all_on_last_page() {
    let temp = seeded_cache(23);
    todotable_cmd(&temp)
        .args(["list", "--page", "3", "--limit", "all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Showing 1-23 of 23 records"))
        .stdout(predicate::str::contains("[ALL]"));
}

#[test]
fn test_unavailable_limit_warns() {
    let temp = seeded_cache(12);
    todotable_cmd(&temp)
        .args(["list", "--limit", "50"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Page size 50 is unavailable"));
}

#[test]
fn test_empty_filter_result() {
    let temp = seeded_cache(2);
    todotable_cmd(&temp)
        .args(["list", "--filter", "done"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No records match the current query."));
}

#[test]
fn test_fetch_failure_reports_error() {
    let temp = TempDir::new().unwrap();
    todotable_cmd(&temp)
        .args(["list"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error: "));
    assert!(!temp.path().join("cache.json").exists());
}

#[test]
fn test_browse_reads_intents_from_stdin() {
    let temp = seeded_cache(23);
    todotable_cmd(&temp)
        .args(["browse"])
        .write_stdin("next\nsort id_desc\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Showing 11-20 of 23 records"))
        .stdout(predicate::str::contains("todo number 13"));
}

#[test]
fn test_config_show_reflects_env() {
    let temp = TempDir::new().unwrap();
    todotable_cmd(&temp)
        .args(["config"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("source_url = {}", UNREACHABLE)))
        .stdout(predicate::str::contains("timeout_secs = 2"));
}

#[test]
fn test_config_file_is_read() {
    let temp = seeded_cache(40);
    fs::write(temp.path().join("todotable.toml"), "page_size = 20\n").unwrap();
    todotable_cmd(&temp)
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Showing 1-20 of 40 records"));
}

#[test]
fn test_invalid_config_fails() {
    let temp = seeded_cache(5);
    fs::write(temp.path().join("todotable.toml"), "page_size = 7\n").unwrap();
    todotable_cmd(&temp)
        .args(["list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config error"));
}
