//! CLI subprocess integration tests.
//!
//! These tests invoke the `docker_mirror` binary as a subprocess with the
//! in-memory mock engine and verify exit codes, stdout content, and JSON
//! output stability. The mock engine starts empty, so every mirror is
//! reported unavailable, which is exactly what the strict-mode and
//! JSON-shape assertions need.

use std::process::Command;

fn docker_mirror(config_home: &std::path::Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_docker_mirror"));
    cmd.env("DOCKER_MIRROR_ENGINE", "mock");
    // Keep the host's real override file out of the tests.
    cmd.env("XDG_CONFIG_HOME", config_home);
    cmd
}

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_owned()
}

#[test]
fn help_flag_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let output = docker_mirror(dir.path()).arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--add-hosts"));
    assert!(stdout.contains("--configfile"));
}

#[test]
fn help_command_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let output = docker_mirror(dir.path()).arg("help").output().unwrap();
    assert!(output.status.success());
}

#[test]
fn unknown_command_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let output = docker_mirror(dir.path())
        .args(["frobnicate", "centos:7"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown command"));
}

#[test]
fn latest_prints_canonical_version() {
    let dir = tempfile::tempdir().unwrap();
    let output = docker_mirror(dir.path())
        .args(["latest", "centos:7"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "7.9.2009");
}

#[test]
fn image_prints_canonical_reference() {
    let dir = tempfile::tempdir().unwrap();
    let output = docker_mirror(dir.path())
        .args(["image", "centos:8"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "centos:8.4.2105");
}

#[test]
fn repo_prints_primary_mirror_image() {
    let dir = tempfile::tempdir().unwrap();
    let output = docker_mirror(dir.path())
        .args(["repo", "centos:7"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        stdout_of(&output),
        "localhost:5000/mirror-packages/centos-repo:7.9.2009"
    );
}

#[test]
fn repo_honors_prefix_flag() {
    let dir = tempfile::tempdir().unwrap();
    let output = docker_mirror(dir.path())
        .args(["repo", "debian:12", "--prefix", "mirror.example/cache"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "mirror.example/cache/debian-repo:12");
}

#[test]
fn repos_with_epel_lists_both_mirrors() {
    let dir = tempfile::tempdir().unwrap();
    let output = docker_mirror(dir.path())
        .args(["repos", "centos:7", "--epel"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "localhost:5000/mirror-packages/centos-repo:7.9.2009",
            // No epel tag exists on the mock engine, so the major is used.
            "localhost:5000/mirror-packages/epel-repo:7",
        ]
    );
}

#[test]
fn epel_command_needs_an_epel_family() {
    let dir = tempfile::tempdir().unwrap();
    let output = docker_mirror(dir.path())
        .args(["epel", "ubuntu:22.04"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn facts_json_shape() {
    let dir = tempfile::tempdir().unwrap();
    let output = docker_mirror(dir.path())
        .args(["facts", "ubuntu:jammy"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let facts: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(facts["canonical"], "22.04");
    assert_eq!(facts["mirrors"][0]["container"], "ubuntu-repo-22.04");
    assert_eq!(
        facts["mirrors"][0]["hosts"],
        serde_json::json!(["archive.ubuntu.com", "security.ubuntu.com"])
    );
}

#[test]
fn start_reports_null_address_for_unavailable_mirror() {
    let dir = tempfile::tempdir().unwrap();
    let output = docker_mirror(dir.path())
        .args(["start", "centos:7"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let map: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert!(map["centos-repo-7.9.2009"].is_null());
}

#[test]
fn start_local_fails_when_mirror_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let output = docker_mirror(dir.path())
        .args(["start", "centos:7", "--local"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("not available"));
}

#[test]
fn addhost_prints_nothing_for_unavailable_mirrors() {
    let dir = tempfile::tempdir().unwrap();
    let output = docker_mirror(dir.path())
        .args(["addhost", "centos:7"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "");
}

#[test]
fn stop_reports_did_not_exist() {
    let dir = tempfile::tempdir().unwrap();
    let output = docker_mirror(dir.path())
        .args(["stop", "centos:7"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let map: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(map["centos-repo-7.9.2009"], "did not exist");
}

#[test]
fn configfile_overrides_mount_in_facts() {
    let dir = tempfile::tempdir().unwrap();
    let ini = dir.path().join("mirror.ini");
    std::fs::write(&ini, "[centos:7.9.2009]\nmount = /data/centos\n").unwrap();
    let output = docker_mirror(dir.path())
        .args(["facts", "centos:7", "-C"])
        .arg(&ini)
        .output()
        .unwrap();
    assert!(output.status.success());
    let facts: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(facts["mirrors"][0]["mount"], "/data/centos");
    assert_eq!(facts["mirrors"][0]["container"], "centos-repo-7.9.2009");
}

#[test]
fn broken_configfile_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let ini = dir.path().join("broken.ini");
    std::fs::write(&ini, "stray line without section\n").unwrap();
    let output = docker_mirror(dir.path())
        .args(["facts", "centos:7", "-C"])
        .arg(&ini)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn dockerfile_from_line_supplies_the_image() {
    let dir = tempfile::tempdir().unwrap();
    let dockerfile = dir.path().join("Dockerfile");
    std::fs::write(&dockerfile, "FROM ubuntu:22.04 AS build\nRUN true\n").unwrap();
    let output = docker_mirror(dir.path())
        .args(["latest", "-f"])
        .arg(&dockerfile)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "22.04");
}

#[test]
fn containers_is_empty_json_on_fresh_engine() {
    let dir = tempfile::tempdir().unwrap();
    let output = docker_mirror(dir.path()).arg("containers").output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "{}");
}

#[test]
fn scripts_lists_sync_helpers() {
    let dir = tempfile::tempdir().unwrap();
    let output = docker_mirror(dir.path()).arg("scripts").output().unwrap();
    assert!(output.status.success());
    let map: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(map["centos"], "scripts/centos-repo-sync.sh");
}

#[test]
fn unknown_family_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let output = docker_mirror(dir.path())
        .args(["repo", "gentoo:17"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown distro family"));
}

#[test]
fn show_observes_without_starting() {
    let dir = tempfile::tempdir().unwrap();
    let output = docker_mirror(dir.path())
        .args(["show", "almalinux:9.1"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let map: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert!(map["almalinux-repo-9.1-20230222"].is_null());
}
