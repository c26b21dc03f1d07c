mod common;

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use calamine::Data;
use predicates::str::contains;
use sheet_courier::delivery::{ENVELOPE_FILE, Envelope};

use common::{SAMPLE_PAYLOAD, TestWorkspace, cell, read_sheet};

fn courier() -> Command {
    Command::cargo_bin("sheet-courier").expect("binary exists")
}

#[test]
fn render_prints_path_of_new_workbook() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("payload.json", SAMPLE_PAYLOAD);
    let out_dir = workspace.path().join("artifacts");

    let assert = courier()
        .args([
            "render",
            "-i",
            input.to_str().unwrap(),
            "-o",
            out_dir.to_str().unwrap(),
        ])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let path = PathBuf::from(stdout.trim());
    assert!(path.starts_with(&out_dir));
    assert_eq!(path.extension().unwrap(), "xlsx");
    let range = read_sheet(&path);
    assert_eq!(cell(&range, 0, 0), Data::String("name".into()));
    assert_eq!(cell(&range, 1, 1), Data::Float(30.0));
}

#[test]
fn render_reads_payload_from_stdin() {
    let workspace = TestWorkspace::new();
    courier()
        .args(["render", "-i", "-", "-o", workspace.path().to_str().unwrap()])
        .write_stdin(r#"{"values": [{"name": "Ana", "age": 30}]}"#)
        .assert()
        .success()
        .stdout(contains(".xlsx"));
    assert_eq!(workspace.files_with_extension(".", "xlsx").len(), 1);
}

#[test]
fn render_decodes_legacy_encodings() {
    let workspace = TestWorkspace::new();
    let input = workspace.path().join("latin1.json");
    fs::write(&input, b"{\"values\": [{\"nome\": \"Jos\xe9\"}]}").unwrap();

    let assert = courier()
        .args([
            "render",
            "-i",
            input.to_str().unwrap(),
            "-o",
            workspace.path().to_str().unwrap(),
            "--input-encoding",
            "latin1",
        ])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let range = read_sheet(&PathBuf::from(stdout.trim()));
    assert_eq!(cell(&range, 1, 0), Data::String("José".into()));
}

#[test]
fn render_surfaces_error_text_for_bad_payloads() {
    let workspace = TestWorkspace::new();
    let missing = workspace.write("missing.json", r#"{"mailaddr": ["a@example.com"]}"#);
    courier()
        .args(["render", "-i", missing.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("payload has no `values` field"));

    let broken = workspace.write("broken.json", "{not json");
    courier()
        .args(["render", "-i", broken.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("payload is not valid JSON"));
}

#[test]
fn preview_shows_addresses_and_kinds() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("payload.json", SAMPLE_PAYLOAD);
    courier()
        .args(["preview", "-i", input.to_str().unwrap(), "--kinds"])
        .assert()
        .success()
        .stdout(contains("15/03/2024 <date>"))
        .stdout(contains("11987654321 <string>"))
        .stdout(contains("30 <number>"));
}

#[test]
fn address_prints_letters() {
    courier()
        .args(["address", "0", "25", "26", "51", "52", "701"])
        .assert()
        .success()
        .stdout("0\tA\n25\tZ\n26\tAA\n51\tAZ\n52\tBA\n701\tZZ\n");
}

#[test]
fn address_rejects_indices_past_zz() {
    courier()
        .args(["address", "702"])
        .assert()
        .failure()
        .stderr(contains("column index 702"));
}

#[test]
fn deliver_spools_message_and_removes_workbook() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("payload.json", SAMPLE_PAYLOAD);
    let settings = workspace.write(
        "settings.yml",
        "mail:\n  from: reports@example.com\n  host: smtp.example.com\n  password: s3cret\n",
    );
    let out_dir = workspace.path().join("artifacts");
    let outbox = workspace.path().join("outbox");

    let assert = courier()
        .args([
            "deliver",
            "-i",
            input.to_str().unwrap(),
            "-c",
            settings.to_str().unwrap(),
            "-o",
            out_dir.to_str().unwrap(),
            "--outbox",
            outbox.to_str().unwrap(),
        ])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let message_id = stdout.split('\t').next().unwrap().trim().to_string();
    let envelope = Envelope::load(&outbox.join(&message_id).join(ENVELOPE_FILE)).unwrap();
    assert_eq!(envelope.to, ["ana@example.com", "rui@example.com"]);
    assert_eq!(envelope.relay.host, "smtp.example.com");
    assert!(outbox.join(&message_id).join(&envelope.attachment).exists());
    assert!(workspace.files_with_extension("artifacts", "xlsx").is_empty());
}

#[test]
fn deliver_without_recipients_still_cleans_up() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("payload.json", r#"{"values": [{"a": 1}]}"#);
    let out_dir = workspace.path().join("artifacts");
    courier()
        .args([
            "deliver",
            "-i",
            input.to_str().unwrap(),
            "-o",
            out_dir.to_str().unwrap(),
            "--outbox",
            workspace.path().join("outbox").to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(contains("not delivered"));
    assert!(workspace.files_with_extension("artifacts", "xlsx").is_empty());
    assert!(!workspace.path().join("outbox").exists());
}
