use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Builds a `rota` command against a database inside `temp_dir`, with plain
/// output and no user configuration.
fn rota_cmd(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("rota").expect("Failed to find rota binary");
    cmd.env("XDG_CONFIG_HOME", temp_dir.path())
        .arg("--no-color")
        .arg("--database-file")
        .arg(temp_dir.path().join("cli_test.db"));
    cmd
}

fn create_mon_wed_schedule(temp_dir: &TempDir) {
    rota_cmd(temp_dir)
        .args([
            "schedule",
            "upsert",
            "--org",
            "org-1",
            "--agent",
            "agent-a",
            "--day",
            "monday=09:00-12:00",
            "--day",
            "wednesday=09:00-12:00",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created schedule with ID: 1"));
}

fn generate(temp_dir: &TempDir, extra: &[&str]) -> assert_cmd::assert::Assert {
    rota_cmd(temp_dir)
        .args([
            "slots",
            "generate",
            "1",
            "--from",
            "2024-01-01",
            "--to",
            "2024-01-14",
        ])
        .args(extra)
        .assert()
}

#[test]
fn test_cli_upsert_and_show_schedule() {
    let temp_dir = TempDir::new().unwrap();
    create_mon_wed_schedule(&temp_dir);

    rota_cmd(&temp_dir)
        .args(["schedule", "show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Schedule 1: agent-a"))
        .stdout(predicate::str::contains("- **monday**: 09:00-12:00"))
        .stdout(predicate::str::contains("- **wednesday**: 09:00-12:00"));
}

#[test]
fn test_cli_upsert_same_scope_updates() {
    let temp_dir = TempDir::new().unwrap();
    create_mon_wed_schedule(&temp_dir);

    rota_cmd(&temp_dir)
        .args([
            "schedule",
            "upsert",
            "--org",
            "org-1",
            "--agent",
            "agent-a",
            "--day",
            "friday=10:00-11:00",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated schedule with ID: 1"))
        .stdout(predicate::str::contains("- **friday**: 10:00-11:00"))
        .stdout(predicate::str::contains("monday").not());
}

#[test]
fn test_cli_generate_two_weeks() {
    let temp_dir = TempDir::new().unwrap();
    create_mon_wed_schedule(&temp_dir);

    generate(&temp_dir, &["--duration", "60", "--capacity", "2"])
        .success()
        .stdout(predicate::str::contains("- Created: 12"))
        .stdout(predicate::str::contains("- Days without availability: 10"));

    rota_cmd(&temp_dir)
        .args(["slots", "list", "--schedule", "1", "--to", "2024-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("| 2024-01-01 | 09:00-10:00 | agent-a | - | 0/2 |"))
        .stdout(predicate::str::contains("| 2024-01-01 | 11:00-12:00 | agent-a | - | 0/2 |"))
        .stdout(predicate::str::contains("2024-01-03").not());
}

#[test]
fn test_cli_generate_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    create_mon_wed_schedule(&temp_dir);

    generate(&temp_dir, &["--duration", "60", "--capacity", "2"]).success();
    generate(&temp_dir, &["--duration", "60", "--capacity", "2"])
        .success()
        .stdout(predicate::str::contains("- Created: 0"))
        .stdout(predicate::str::contains("- Already present: 12"));

    generate(&temp_dir, &["--duration", "60", "--capacity", "3"])
        .success()
        .stdout(predicate::str::contains("- Capacity raised: 12"));
}

#[test]
fn test_cli_closed_exception_skips_day() {
    let temp_dir = TempDir::new().unwrap();
    create_mon_wed_schedule(&temp_dir);

    rota_cmd(&temp_dir)
        .args([
            "exception",
            "add",
            "1",
            "2024-01-03",
            "--closed",
            "--reason",
            "holiday",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("- **2024-01-03**: closed (holiday)"));

    rota_cmd(&temp_dir)
        .args(["slots", "dates", "1", "--from", "2024-01-01", "--to", "2024-01-14"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- 2024-01-01 (monday)"))
        .stdout(predicate::str::contains("2024-01-03").not())
        .stdout(predicate::str::contains("- 2024-01-10 (wednesday)"));

    generate(&temp_dir, &["--duration", "60", "--capacity", "2"])
        .success()
        .stdout(predicate::str::contains("- Created: 9"));

    rota_cmd(&temp_dir)
        .args(["exception", "remove", "1", "2024-01-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed exception for 2024-01-03"));
}

#[test]
fn test_cli_replacement_hours() {
    let temp_dir = TempDir::new().unwrap();
    create_mon_wed_schedule(&temp_dir);

    rota_cmd(&temp_dir)
        .args(["exception", "add", "1", "2024-01-06", "--hours", "10:00-11:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- **2024-01-06**: 10:00-11:00"));

    rota_cmd(&temp_dir)
        .args([
            "slots",
            "generate",
            "1",
            "--from",
            "2024-01-06",
            "--to",
            "2024-01-06",
            "--duration",
            "30",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Created: 2"));
}

#[test]
fn test_cli_closed_conflicts_with_hours() {
    let temp_dir = TempDir::new().unwrap();

    rota_cmd(&temp_dir)
        .args([
            "exception",
            "add",
            "1",
            "2024-01-06",
            "--closed",
            "--hours",
            "10:00-11:00",
        ])
        .assert()
        .failure();
}

#[test]
fn test_cli_overlapping_hours_rejected() {
    let temp_dir = TempDir::new().unwrap();

    rota_cmd(&temp_dir)
        .args([
            "schedule",
            "upsert",
            "--org",
            "org-1",
            "--agent",
            "agent-a",
            "--day",
            "monday=09:00-12:00,11:00-13:00",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Overlapping intervals"));
}

#[test]
fn test_cli_invalid_date_range() {
    let temp_dir = TempDir::new().unwrap();
    create_mon_wed_schedule(&temp_dir);

    rota_cmd(&temp_dir)
        .args([
            "slots",
            "generate",
            "1",
            "--from",
            "2024-01-14",
            "--to",
            "2024-01-01",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date range"));
}

#[test]
fn test_cli_toggle_blocks_generation() {
    let temp_dir = TempDir::new().unwrap();
    create_mon_wed_schedule(&temp_dir);

    rota_cmd(&temp_dir)
        .args(["schedule", "toggle", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Schedule 1 is now inactive"));

    generate(&temp_dir, &[])
        .failure()
        .stderr(predicate::str::contains("does not exist or is inactive"));

    rota_cmd(&temp_dir)
        .args(["schedule", "toggle", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Schedule 1 is now active"));
}

#[test]
fn test_cli_delete_requires_confirmation() {
    let temp_dir = TempDir::new().unwrap();
    create_mon_wed_schedule(&temp_dir);
    generate(&temp_dir, &["--duration", "60"]).success();

    rota_cmd(&temp_dir)
        .args(["schedule", "delete", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("explicit confirmation"));

    rota_cmd(&temp_dir)
        .args(["schedule", "delete", "1", "--confirm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Its generated slots were kept"));

    rota_cmd(&temp_dir)
        .args(["slots", "list", "--agent", "agent-a"])
        .assert()
        .success()
        .stdout(predicate::str::contains("| 2024-01-01 | 09:00-10:00 |"));

    generate(&temp_dir, &[])
        .failure()
        .stderr(predicate::str::contains("does not exist or is inactive"));
}

#[test]
fn test_cli_list_schedules() {
    let temp_dir = TempDir::new().unwrap();

    rota_cmd(&temp_dir)
        .args(["schedule", "list", "--org", "org-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No schedules found."));

    create_mon_wed_schedule(&temp_dir);

    rota_cmd(&temp_dir)
        .args(["schedule", "list", "--org", "org-1", "--service", "svc-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## agent-a (ID: 1)"))
        .stdout(predicate::str::contains("- **Service**: all services"));
}

#[test]
fn test_cli_slot_capacity_edit() {
    let temp_dir = TempDir::new().unwrap();
    create_mon_wed_schedule(&temp_dir);
    generate(&temp_dir, &["--duration", "60", "--capacity", "2"]).success();

    rota_cmd(&temp_dir)
        .args(["slots", "capacity", "1", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Capacity set to 1"))
        .stdout(predicate::str::contains("- Booked: 0/1"));

    rota_cmd(&temp_dir)
        .args(["slots", "capacity", "1", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("capacity"));

    rota_cmd(&temp_dir)
        .args(["slots", "capacity", "999", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Slot with ID 999 not found"));
}

#[test]
fn test_cli_generation_defaults_from_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("rota.toml");
    std::fs::write(
        &config_path,
        "[generation]\ndefault_duration_minutes = 30\ndefault_capacity = 4\n",
    )
    .unwrap();
    create_mon_wed_schedule(&temp_dir);

    rota_cmd(&temp_dir)
        .arg("--config")
        .arg(&config_path)
        .args([
            "slots",
            "generate",
            "1",
            "--from",
            "2024-01-01",
            "--to",
            "2024-01-01",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Created: 6"));

    rota_cmd(&temp_dir)
        .args(["slots", "list", "--open"])
        .assert()
        .success()
        .stdout(predicate::str::contains("| 2024-01-01 | 11:30-12:00 | agent-a | - | 0/4 |"));
}

#[test]
fn test_cli_invalid_config_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("broken.toml");
    std::fs::write(&config_path, "[generation]\nunknown_key = 1\n").unwrap();

    rota_cmd(&temp_dir)
        .arg("--config")
        .arg(&config_path)
        .args(["schedule", "list", "--org", "org-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}
