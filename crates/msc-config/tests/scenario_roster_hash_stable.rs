//! Roster hash stability.
//!
//! GREEN when:
//! - identical input hashes identically
//! - key order inside the YAML does not matter
//! - any value change changes the hash
//! - overlays take effect and hash deterministically

use std::io::Write;

use msc_config::{default_roster, load_layered_yaml, load_layered_yaml_from_strings, load_roster_or_default};

const BASE: &str = r#"
markets:
  - id: tse
    name: Tokyo
    city: Tokyo
    time_zone: Asia/Tokyo
    open_hour: 9
    open_minute: 0
    close_hour: 15
    close_minute: 0
    trading_days: [1, 2, 3, 4, 5]
    latitude: 35.6762
    longitude: 139.6503
"#;

const BASE_REORDERED: &str = r#"
markets:
  - longitude: 139.6503
    latitude: 35.6762
    trading_days: [1, 2, 3, 4, 5]
    close_minute: 0
    close_hour: 15
    open_minute: 0
    open_hour: 9
    time_zone: Asia/Tokyo
    city: Tokyo
    name: Tokyo
    id: tse
"#;

/// Lists replace wholesale, so an overlay restates the full market list.
const OVERLAY: &str = r#"
markets:
  - id: tse
    name: Tokyo (extended)
    city: Tokyo
    time_zone: Asia/Tokyo
    open_hour: 9
    open_minute: 0
    close_hour: 15
    close_minute: 30
    trading_days: [1, 2, 3, 4, 5]
    latitude: 35.6762
    longitude: 139.6503
"#;

#[test]
fn same_input_produces_identical_hash() {
    let a = load_layered_yaml_from_strings(&[BASE]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE]).unwrap();
    assert_eq!(a.roster_hash, b.roster_hash);
    assert_eq!(a.canonical_json, b.canonical_json);
}

#[test]
fn reordered_keys_produce_same_hash() {
    let a = load_layered_yaml_from_strings(&[BASE]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_REORDERED]).unwrap();
    assert_eq!(
        a.roster_hash, b.roster_hash,
        "reordering keys in YAML must not change the hash"
    );
}

#[test]
fn explicit_default_hashes_like_omitted_default() {
    let explicit = BASE.replace("    latitude:", "    is_overnight: false\n    latitude:");
    let a = load_layered_yaml_from_strings(&[BASE]).unwrap();
    let b = load_layered_yaml_from_strings(&[&explicit]).unwrap();
    assert_eq!(a.roster_hash, b.roster_hash);
    assert!(a.canonical_json.contains("\"is_overnight\":false"));
}

#[test]
fn overnight_flag_changes_hash() {
    let overnight = BASE.replace("    latitude:", "    is_overnight: true\n    latitude:");
    let a = load_layered_yaml_from_strings(&[BASE]).unwrap();
    let b = load_layered_yaml_from_strings(&[&overnight]).unwrap();
    assert_ne!(a.roster_hash, b.roster_hash);
}

#[test]
fn overlay_changes_hash_and_takes_effect() {
    let base = load_layered_yaml_from_strings(&[BASE]).unwrap();
    let merged = load_layered_yaml_from_strings(&[BASE, OVERLAY]).unwrap();
    assert_ne!(base.roster_hash, merged.roster_hash);

    let tse = merged.roster.get("tse").unwrap();
    assert_eq!(tse.name, "Tokyo (extended)");
    assert_eq!(tse.close_minute, 30);
    assert_eq!(merged.roster.markets().len(), 1);
}

#[test]
fn hash_is_64_hex_chars() {
    let loaded = load_layered_yaml_from_strings(&[BASE]).unwrap();
    assert_eq!(loaded.roster_hash.len(), 64);
    assert!(loaded.roster_hash.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn files_and_strings_load_identically() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(BASE.as_bytes()).unwrap();
    let path = f.path().to_string_lossy().to_string();

    let from_file = load_layered_yaml(&[path.as_str()]).unwrap();
    let from_str = load_layered_yaml_from_strings(&[BASE]).unwrap();
    assert_eq!(from_file.roster_hash, from_str.roster_hash);
}

#[test]
fn missing_file_names_the_path() {
    let err = load_layered_yaml(&["/definitely/not/here.yaml"]).unwrap_err();
    assert!(format!("{err:#}").contains("/definitely/not/here.yaml"));
}

#[test]
fn no_paths_means_builtin_roster() {
    let a = load_roster_or_default(&[]).unwrap();
    let b = default_roster().unwrap();
    assert_eq!(a.roster_hash, b.roster_hash);
}
