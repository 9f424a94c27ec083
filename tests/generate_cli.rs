use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use aviqr::QrDecoder;

const URL: &str = "https://american-aviators.thorvaldrovers.com";
const OUTPUT: &str = "american_aviators_qrcode.png";

fn run_in(dir: &Path, args: &[&str]) -> Output {
    run_with_env(dir, args, &[])
}

fn run_with_env(dir: &Path, args: &[&str], envs: &[(&str, &str)]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_aviqr"));
    command
        .args(args)
        .current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join("xdg"));
    for (key, _) in std::env::vars() {
        if key.starts_with("AVIQR_") {
            command.env_remove(key);
        }
    }
    command.envs(envs.iter().copied());
    command.output().expect("spawn aviqr")
}

#[test]
fn default_run_writes_decodable_png() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = run_in(dir.path(), &[]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let path = dir.path().join(OUTPUT);
    let bytes = fs::read(&path).expect("read output");
    assert!(!bytes.is_empty());
    assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));

    let img = image::open(&path).expect("open png");
    assert_eq!((img.width(), img.height()), (450, 450));

    let payload = QrDecoder::new().decode(&img).expect("decode");
    assert_eq!(payload.as_str(), Some(URL));
}

#[test]
fn stdout_has_exactly_two_status_lines() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = run_in(dir.path(), &[]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2, "stdout: {stdout}");
    assert!(lines[0].contains(OUTPUT));
    assert!(lines[1].contains(URL));
}

#[test]
fn second_run_overwrites_with_identical_bytes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(OUTPUT);

    assert!(run_in(dir.path(), &[]).status.success());
    let first = fs::read(&path).expect("first run");

    fs::write(&path, b"stale").expect("clobber");
    assert!(run_in(dir.path(), &[]).status.success());
    let second = fs::read(&path).expect("second run");

    assert_eq!(first, second);
}

#[test]
fn unwritable_location_fails_without_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = run_in(dir.path(), &["--output", "missing/qr.png"]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(!dir.path().join("missing").exists());
}

#[test]
fn no_fit_at_version_one_is_a_capacity_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = run_in(dir.path(), &["--no-fit", "--qr-version", "1"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does not fit QR version 1"), "stderr: {stderr}");
    assert!(!dir.path().join(OUTPUT).exists());
}

#[test]
fn config_file_and_flags_override_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("aviqr.toml"),
        "[generator]\nurl = \"https://example.com/hangar\"\nbox_size = 4\nfill_color = \"navy\"\n",
    )
    .expect("write config");

    let output = run_in(dir.path(), &["--output", "hangar.png", "--verify"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let img = image::open(dir.path().join("hangar.png")).expect("open png");
    assert!(matches!(img, image::DynamicImage::ImageRgb8(_)));

    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    assert!(stdout.contains("hangar.png"));
    assert!(stdout.contains("https://example.com/hangar"));
}

#[test]
fn env_overrides_sit_between_file_and_flags() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("aviqr.toml"),
        "[generator]\nurl = \"https://example.com/from-file\"\nborder = 2\n",
    )
    .expect("write config");

    let output = run_with_env(
        dir.path(),
        &["--output", "flag.png"],
        &[
            ("AVIQR_URL", "hangar"),
            ("AVIQR_BOX_SIZE", "abc"),
            ("AVIQR_FIT", "off"),
            ("AVIQR_OUTPUT", "env.png"),
        ],
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    // Flag beats env for the output path
    assert!(dir.path().join("flag.png").exists());
    assert!(!dir.path().join("env.png").exists());

    // Env url, version 1 without fit, file border 2, default box size 10
    let img = image::open(dir.path().join("flag.png")).expect("open png");
    assert_eq!((img.width(), img.height()), ((21 + 2 * 2) * 10, (21 + 2 * 2) * 10));

    let payload = QrDecoder::new().decode(&img).expect("decode");
    assert_eq!(payload.as_str(), Some("hangar"));

    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    assert!(stdout.contains("'flag.png'"));
    assert!(stdout.contains("QR code links to: hangar"));
}

#[test]
fn env_fit_off_enforces_requested_version() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = run_with_env(dir.path(), &[], &[("AVIQR_FIT", "off")]);

    assert!(!output.status.success());
    assert!(!dir.path().join(OUTPUT).exists());
}

#[test]
fn config_file_path_is_logged() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("aviqr.toml"), "[generator]\nborder = 4\n").expect("write config");

    let output = run_with_env(
        dir.path(),
        &[],
        &[("AVIQR_LOG_LEVEL", "info"), ("AVIQR_LOG_COLOR", "off")],
    );
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Using configuration file"), "stderr: {stderr}");
    assert!(stderr.contains("aviqr.toml"));

    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    assert_eq!(stdout.lines().count(), 2);
}
