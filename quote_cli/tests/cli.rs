use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("wallquote").unwrap();
    for var in [
        "WALLQUOTE_RELAY_ACCESS_KEY",
        "WALLQUOTE_RELAY_URL",
        "WALLQUOTE_ROUTING_URL",
        "WALLQUOTE_GEOCODING_URL",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("wallquote_cli_{}_{}", name, std::process::id()))
}

const WALL: [&str; 8] = [
    "--wall-type",
    "boundary",
    "--length",
    "10",
    "--breadth",
    "8",
    "--height",
    "6",
];

#[test]
fn quote_with_known_distance() {
    cmd()
        .arg("quote")
        .args(WALL)
        .args(["--distance-km", "25"])
        .assert()
        .success()
        .stdout(contains("Estimated Cost: Rs.28,080"))
        .stdout(contains("Shipping Distance: 15.00 km (free up to 10 km)"))
        .stdout(contains("Shipping Cost: Rs.6,480"));
}

#[test]
fn quote_without_location_has_no_surcharge() {
    cmd()
        .arg("quote")
        .args(WALL)
        .assert()
        .success()
        .stdout(contains("Estimated Cost: Rs.21,600"))
        .stdout(contains("Shipping Cost: Rs.0"));
}

#[test]
fn incomplete_form_prints_zero_state() {
    cmd()
        .args(["quote", "--length", "10", "--breadth", "8", "--height", "6"])
        .assert()
        .success()
        .stdout(contains("Estimated Cost: Rs.0"))
        .stdout(contains("Cost Breakdown").not());
}

#[test]
fn unknown_wall_type_prints_zero_state() {
    cmd()
        .args(["quote", "--wall-type", "glass"])
        .args(["--length", "10", "--breadth", "8", "--height", "6"])
        .assert()
        .success()
        .stdout(contains("Estimated Cost: Rs.0"));
}

#[test]
fn quote_json() {
    cmd()
        .args(["--json", "quote", "--wall-type", "exterior"])
        .args(["--length", "10", "--breadth", "8", "--height", "6"])
        .assert()
        .success()
        .stdout(contains("\"total\": \"Rs.30,240\""))
        .stdout(contains("\"base_rate\": 140.0"));
}

#[test]
fn quote_offline_location_uses_aerial_distance() {
    cmd()
        .arg("quote")
        .args(WALL)
        .args(["--lat", "26.6886667", "--lng", "88.3493333", "--offline"])
        .assert()
        .success()
        .stdout(contains("Delivery distance: 0.00 km (aerial)"))
        .stdout(contains("Estimated Cost: Rs.21,600"));
}

#[test]
fn distance_offline() {
    cmd()
        .args(["distance", "--lat", "26.6886667", "--lng", "88.3493333", "--offline"])
        .assert()
        .success()
        .stdout(contains("0.00 km (aerial)"));
}

#[test]
fn distance_rejects_invalid_point() {
    cmd()
        .args(["distance", "--lat", "95", "--lng", "88.3", "--offline"])
        .assert()
        .failure();
}

#[test]
fn short_search_returns_nothing() {
    cmd()
        .args(["search", "ab"])
        .assert()
        .success()
        .stdout(contains("No places found"));
}

#[test]
fn settings_init_and_show() {
    let path = temp_path("settings.json");
    let _ = std::fs::remove_file(&path);

    cmd()
        .args(["settings", "init"])
        .arg(&path)
        .assert()
        .success()
        .stdout(contains("Wrote default settings"));
    assert!(path.exists());

    cmd().args(["settings", "init"]).arg(&path).assert().failure();

    cmd()
        .arg("--settings")
        .arg(&path)
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(contains("The Wall Company India"))
        .stdout(contains("Exterior Rs.140/sq.ft"));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn missing_settings_file_fails() {
    cmd()
        .args(["--settings", "/nonexistent/wallquote.json", "settings", "show"])
        .assert()
        .failure()
        .stderr(contains("loading settings"));
}

#[test]
fn export_requires_location() {
    let out = temp_path("export_no_location");
    cmd()
        .arg("export")
        .args(WALL)
        .args(["--name", "Asha Roy", "--phone", "98300 12345", "--no-relay"])
        .arg("--out")
        .arg(&out)
        .assert()
        .failure()
        .stderr(contains("No delivery location selected"));
    assert!(!out.exists());
}

#[test]
fn export_requires_customer_name() {
    cmd()
        .arg("export")
        .args(WALL)
        .args(["--lat", "26.9", "--lng", "88.5", "--offline", "--phone", "98300", "--no-relay"])
        .assert()
        .failure()
        .stderr(contains("Missing required field: customer_name"));
}

#[test]
fn export_writes_pdf_and_record() {
    let out = temp_path("export_ok");
    let record = temp_path("record.json");

    cmd()
        .arg("export")
        .args(WALL)
        .args(["--lat", "26.9", "--lng", "88.5", "--offline"])
        .args(["--name", "Asha Roy", "--phone", "98300 12345", "--no-relay"])
        .arg("--out")
        .arg(&out)
        .arg("--save-record")
        .arg(&record)
        .assert()
        .success()
        .stdout(contains("Quotation Q-"))
        .stdout(contains("Quote request not sent"));

    let pdfs: Vec<_> = std::fs::read_dir(&out)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("Quote_boundary_"))
        .collect();
    assert_eq!(pdfs.len(), 1);

    let saved = std::fs::read_to_string(&record).unwrap();
    assert!(saved.contains("\"name\": \"Asha Roy\""));

    let _ = std::fs::remove_dir_all(&out);
    let _ = std::fs::remove_file(&record);
}

#[test]
fn interactive_session() {
    cmd()
        .args(["interactive", "--offline"])
        .write_stdin("type boundary\nlength 10\nbreadth 8\n{\"field\":\"height\",\"value\":6}\nquit\n")
        .assert()
        .success()
        .stdout(contains("Estimated Cost: Rs.21,600"));
}

#[test]
fn interactive_reports_bad_lines() {
    cmd()
        .args(["interactive", "--offline"])
        .write_stdin("paint red\nshow\n")
        .assert()
        .success()
        .stderr(contains("unknown command: paint"))
        .stdout(contains("Estimated Cost: Rs.0"));
}

#[test]
fn interactive_export_right_after_pick_prices_new_location() {
    let dir = temp_path("interactive_export");
    std::fs::create_dir_all(&dir).unwrap();

    cmd()
        .current_dir(&dir)
        .args(["interactive", "--offline"])
        .write_stdin("type boundary\nlength 10\nbreadth 8\nheight 6\npick 27.5 88.9\nexport 98300 Asha Roy\nquit\n")
        .assert()
        .success()
        .stdout(contains("(aerial), shipping cost"))
        .stdout(contains("Quotation Q-"))
        .stdout(contains("(shipping Rs.0 for 0.00 km)").not());

    let _ = std::fs::remove_dir_all(&dir);
}
