//! End-to-end tests for the `schedsim` binary.

use std::io::Write;
use std::process::{Command, Output};

use tempfile::NamedTempFile;

const WORKLOAD: &str = r#"{
    "processes": [
        { "burst": 4, "arrival": 0, "io_interrupt": -1, "priority": 1 },
        { "burst": 2, "arrival": 1, "io_interrupt": -1, "priority": 2 }
    ]
}"#;

fn workload_file(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

fn schedsim(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_schedsim"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("SCHEDSIM_MAX_TICKS")
        .env_remove("SCHEDSIM_TIME_SLICE")
        .env_remove("SCHEDSIM_IO_DURATION")
        .env_remove("SCHEDSIM_MAX_PROCESSES")
        .output()
        .unwrap()
}

#[test]
fn test_single_policy_text_report() {
    let file = workload_file(WORKLOAD);
    let out = schedsim(&[file.path().to_str().unwrap(), "-p", "fcfs", "--timeline"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.starts_with("FCFS Scheduling:\n"));
    assert!(stdout.contains("Process 2 - Waiting Time: 3, Turnaround Time: 5\n"));
    assert!(stdout.contains("Average Waiting Time: 1.50\n"));
    assert!(stdout.contains("Average Turnaround Time: 4.50\n"));
    assert!(stdout.contains("Timeline: P1 P1 P1 P1 P2 P2\n"));
}

#[test]
fn test_all_policies_json() {
    let file = workload_file(WORKLOAD);
    let out = schedsim(&[file.path().to_str().unwrap(), "--json"]);
    assert!(out.status.success());

    let reports: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let reports = reports.as_array().unwrap();
    assert_eq!(reports.len(), 6);
    assert_eq!(reports[0]["scheduler"], "FCFS");
    assert_eq!(reports[5]["scheduler"], "Preemptive Priority");
    assert_eq!(reports[0]["average_waiting_time"], 1.5);
    assert_eq!(reports[0]["processes"][1]["pid"], 2);
}

#[test]
fn test_menu_number_and_overrides() {
    let file = workload_file(WORKLOAD);
    let out = schedsim(&[
        file.path().to_str().unwrap(),
        "-p",
        "4",
        "--time-slice",
        "4",
        "--timeline",
    ]);
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.starts_with("Round Robin Scheduling:\n"));
    assert!(stdout.contains("Timeline: P1 P1 P1 P1 P2 P2\n"));
}

#[test]
fn test_max_ticks_fails() {
    let file = workload_file(WORKLOAD);
    let out = schedsim(&[file.path().to_str().unwrap(), "-p", "sjf", "--max-ticks", "3"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("did not converge"), "stderr: {stderr}");
}

#[test]
fn test_bad_inputs() {
    let out = schedsim(&["/nonexistent/workload.json"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("failed to read"));

    let file = workload_file(r#"{ "processes": [] }"#);
    let out = schedsim(&[file.path().to_str().unwrap()]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("at least one process"));

    let file = workload_file(WORKLOAD);
    let out = schedsim(&[file.path().to_str().unwrap(), "-p", "lottery"]);
    assert!(!out.status.success());
}

const THREE_PROCESSES: &str = r#"{
    "global": { "max_processes": %MAX% },
    "processes": [ { "burst": 1 }, { "burst": 2 }, { "burst": 3 } ]
}"#;

#[test]
fn test_max_processes_flag_beats_workload() {
    // Flag tighter than the file: rejected.
    let file = workload_file(&THREE_PROCESSES.replace("%MAX%", "10"));
    let out = schedsim(&[file.path().to_str().unwrap(), "-p", "fcfs", "--max-processes", "2"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("too many processes: 3 (max 2)"), "stderr: {stderr}");

    // Flag looser than the file: accepted.
    let file = workload_file(&THREE_PROCESSES.replace("%MAX%", "2"));
    let out = schedsim(&[file.path().to_str().unwrap(), "-p", "fcfs", "--max-processes", "5"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("Process 3 - Waiting Time: 3, Turnaround Time: 6\n"));
}

#[test]
fn test_zero_max_ticks_in_workload_disables_ceiling() {
    let file = workload_file(
        r#"{ "global": { "max_ticks": 0 }, "processes": [ { "burst": 2 } ] }"#,
    );
    let out = schedsim(&[file.path().to_str().unwrap(), "-p", "fcfs"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
}
