//! `msc roster-hash`, custom `--roster` layers and the `watch` driver.

use std::io::Write;

use predicates::prelude::*;

const SYDNEY: &str = r#"
markets:
  - id: asx
    name: Sydney
    city: Sydney
    time_zone: Australia/Sydney
    open_hour: 10
    open_minute: 0
    close_hour: 16
    close_minute: 0
    trading_days: [1, 2, 3, 4, 5]
    latitude: -33.8688
    longitude: 151.2093
"#;

#[allow(deprecated)]
fn msc() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("msc").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn roster_file(contents: &str) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    f
}

#[test]
fn roster_hash_prints_hash_and_canonical_json() {
    let f = roster_file(SYDNEY);
    let path = f.path().to_string_lossy().to_string();

    let expected = msc_config::load_layered_yaml(&[path.as_str()]).unwrap();
    msc()
        .args(["roster-hash", &path])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!(
            "roster_hash={}\n",
            expected.roster_hash
        )))
        .stdout(predicate::str::contains("\"time_zone\":\"Australia/Sydney\""));
}

#[test]
fn roster_hash_requires_paths() {
    msc().arg("roster-hash").assert().failure();
}

#[test]
fn invalid_roster_fails_with_code() {
    let f = roster_file(&SYDNEY.replace("close_hour: 16", "close_hour: 25"));
    let path = f.path().to_string_lossy().to_string();
    msc()
        .args(["--roster", &path, "next"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ROSTER_INVALID_MARKET id=asx"));
}

#[test]
fn custom_roster_replaces_builtin() {
    // Mon 2024-01-08 22:00Z = Tue 09:00 AEDT, one hour before the bell.
    let f = roster_file(SYDNEY);
    let path = f.path().to_string_lossy().to_string();
    msc()
        .args(["--roster", &path, "--at", "2024-01-08T22:00:00Z", "status"])
        .assert()
        .success()
        .stdout(
            "market=asx state=CLOSED local=Tue 09:00:00 next=open in=01:00:00\n\
             open_count=0/1\n\
             next_event market=asx kind=open in=01:00:00 millis=3600000\n",
        );
}

#[test]
fn watch_stops_after_requested_ticks() {
    msc()
        .args([
            "--at",
            "2024-01-08T14:29:00Z",
            "watch",
            "--interval-ms",
            "10",
            "--ticks",
            "3",
        ])
        .assert()
        .success()
        .stdout(
            "tick=1 open_count=3/5 New York opens in 00:01:00\n\
             tick=2 open_count=3/5 New York opens in 00:01:00\n\
             tick=3 open_count=3/5 New York opens in 00:01:00\n",
        );
}

#[test]
fn watch_rejects_zero_interval() {
    msc()
        .args(["watch", "--interval-ms", "0", "--ticks", "1"])
        .assert()
        .failure();
}
