//! E2E CLI tests covering:
//! - `fm dashboard` figures over the demo seed
//! - client and project listing, filters and detail views
//! - create/update/delete/advance flows and their error contracts
//! - sign-in, profile edits and the role access table
//!
//! Each test runs `fm` as a subprocess in an isolated temp directory.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

/// Build a Command targeting the fm binary, rooted in `dir` with no user
/// config or format override leaking in.
fn fm_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fm"));
    cmd.current_dir(dir);
    cmd.env("XDG_CONFIG_HOME", dir.join("xdg"));
    cmd.env("HOME", dir);
    cmd.env_remove("FORMAT");
    cmd.env("FOREMAN_LOG", "error");
    cmd
}

fn json_of(dir: &Path, args: &[&str]) -> Value {
    let output = fm_cmd(dir)
        .args(args)
        .arg("--json")
        .output()
        .expect("fm should not crash");
    assert!(
        output.status.success(),
        "fm {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("--json should produce valid JSON")
}

fn error_of(dir: &Path, args: &[&str]) -> Value {
    let output = fm_cmd(dir)
        .args(args)
        .arg("--json")
        .output()
        .expect("fm should not crash");
    assert!(!output.status.success(), "fm {args:?} should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    let start = stderr.find('{').expect("JSON error on stderr");
    let mut stream = serde_json::Deserializer::from_str(&stderr[start..]).into_iter::<Value>();
    stream
        .next()
        .expect("one JSON value")
        .expect("valid JSON error")
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[test]
fn dashboard_reports_seed_figures() {
    let dir = TempDir::new().unwrap();
    let stats = json_of(dir.path(), &["dashboard"]);
    assert_eq!(stats["total_projects"], 2);
    assert_eq!(stats["active_projects"], 1);
    assert_eq!(stats["total_clients"], 2);
    assert_eq!(stats["company_clients"], 1);
    assert!(stats["recent_projects"].as_array().unwrap().len() <= 5);
}

#[test]
fn dashboard_text_mode_is_tab_separated() {
    let dir = TempDir::new().unwrap();
    fm_cmd(dir.path())
        .args(["dashboard", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("total_projects\t2"));
}

// ---------------------------------------------------------------------------
// Clients
// ---------------------------------------------------------------------------

#[test]
fn clients_list_and_kind_filter() {
    let dir = TempDir::new().unwrap();
    let all = json_of(dir.path(), &["clients", "list"]);
    assert_eq!(all.as_array().unwrap().len(), 2);

    let companies = json_of(dir.path(), &["clients", "list", "--kind", "company"]);
    let companies = companies.as_array().unwrap();
    assert_eq!(companies.len(), 1);
    assert_eq!(companies[0]["id"], "1");
}

#[test]
fn client_show_lists_projects_by_client_name() {
    let dir = TempDir::new().unwrap();
    let detail = json_of(dir.path(), &["clients", "show", "1"]);
    assert_eq!(detail["id"], "1");
    // Seeded projects name other clients, so none match.
    assert!(detail["project_rows"].as_array().unwrap().is_empty());
}

#[test]
fn client_show_unknown_id_fails() {
    let dir = TempDir::new().unwrap();
    let err = error_of(dir.path(), &["clients", "show", "999"]);
    assert_eq!(err["error"]["error_code"], "E2001");
}

#[test]
fn client_create_reports_field_errors() {
    let dir = TempDir::new().unwrap();
    let err = error_of(dir.path(), &["clients", "create", "-n", "Acme"]);
    assert_eq!(err["error"]["error_code"], "E3001");
    let fields: Vec<&str> = err["error"]["fields"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|f| f["field"].as_str())
        .collect();
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"phone"));
    assert!(fields.contains(&"address"));
}

#[test]
fn client_create_succeeds_with_required_fields() {
    let dir = TempDir::new().unwrap();
    let created = json_of(
        dir.path(),
        &[
            "clients", "create", "-n", "Acme", "-e", "info@acme.ru", "-p", "+7 900", "-a",
            "Москва",
        ],
    );
    assert_eq!(created["name"], "Acme");
    assert!(created["projects"].as_array().unwrap().is_empty());
}

#[test]
fn client_delete_pretty_confirms() {
    let dir = TempDir::new().unwrap();
    fm_cmd(dir.path())
        .args(["clients", "delete", "2", "--format", "pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Удален клиент"))
        .stderr(predicate::str::contains("Клиент удален"));
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[test]
fn projects_active_filter() {
    let dir = TempDir::new().unwrap();
    let rows = json_of(dir.path(), &["projects", "list", "--status", "active"]);
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["status"], "in_progress");
}

#[test]
fn projects_unknown_status_is_rejected() {
    let dir = TempDir::new().unwrap();
    let err = error_of(dir.path(), &["projects", "list", "--status", "bogus"]);
    assert_eq!(err["error"]["error_code"], "E2004");
}

#[test]
fn project_advance_moves_to_next_status() {
    let dir = TempDir::new().unwrap();
    let advanced = json_of(dir.path(), &["projects", "advance", "2"]);
    assert_eq!(advanced["status"], "tender");
}

#[test]
fn project_advance_rejects_backwards_move() {
    let dir = TempDir::new().unwrap();
    let err = error_of(dir.path(), &["projects", "advance", "1", "--to", "planning"]);
    assert_eq!(err["error"]["error_code"], "E2003");
}

#[test]
fn project_create_requires_dates() {
    let dir = TempDir::new().unwrap();
    let err = error_of(
        dir.path(),
        &[
            "projects", "create", "-n", "Склад", "-c", "Петров", "-l", "Тула", "-b", "1000000",
        ],
    );
    assert_eq!(err["error"]["error_code"], "E3001");
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[test]
fn login_returns_session_and_modules() {
    let dir = TempDir::new().unwrap();
    let view = json_of(
        dir.path(),
        &["login", "-e", "manager@construction-crm.ru", "-p", "manager123"],
    );
    assert_eq!(view["profile"]["role"], "manager");
    let modules = view["profile"]["modules"].as_array().unwrap();
    assert!(modules.iter().any(|m| m == "clients"));
}

#[test]
fn login_with_wrong_password_fails() {
    let dir = TempDir::new().unwrap();
    let err = error_of(
        dir.path(),
        &["login", "-e", "admin@construction-crm.ru", "-p", "nope-nope"],
    );
    assert_eq!(err["error"]["error_code"], "E5001");
}

#[test]
fn profile_update_is_reflected() {
    let dir = TempDir::new().unwrap();
    let view = json_of(
        dir.path(),
        &[
            "profile",
            "-e",
            "admin@construction-crm.ru",
            "-p",
            "admin123",
            "--skills",
            "BIM, Сметы",
        ],
    );
    assert_eq!(view["profile"]["skills"][0], "BIM");
    assert_eq!(view["profile"]["skills"][1], "Сметы");
}

#[test]
fn access_table_for_one_role() {
    let dir = TempDir::new().unwrap();
    fm_cmd(dir.path())
        .args(["access", "worker", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("worker\t"))
        .stdout(predicate::str::contains("clients").not());
}

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

#[test]
fn completions_bash_mentions_binary() {
    let dir = TempDir::new().unwrap();
    fm_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fm"));
}

#[test]
fn tui_refuses_without_terminal() {
    let dir = TempDir::new().unwrap();
    fm_cmd(dir.path())
        .arg("tui")
        .assert()
        .failure()
        .stderr(predicate::str::contains("interactive terminal"));
}

#[test]
fn project_config_switches_to_empty_seed() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".foreman")).unwrap();
    std::fs::write(
        dir.path().join(".foreman/config.toml"),
        "[seed]\nsource = \"empty\"\n",
    )
    .unwrap();
    let stats = json_of(dir.path(), &["dashboard"]);
    assert_eq!(stats["total_projects"], 0);
    assert_eq!(stats["total_clients"], 0);
}
