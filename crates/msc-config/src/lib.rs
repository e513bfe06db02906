//! msc-config
//!
//! Market roster loading. Rosters are YAML documents merged in layer order
//! (base -> site -> local overrides), validated once at load time, and
//! identified by a SHA-256 hash of the canonical JSON form of the resolved
//! roster (after defaults are applied).
//!
//! Malformed schedules are configuration defects: they are rejected here so
//! the engine never sees them.

use anyhow::{bail, Context, Result};
use msc_calendar::MarketSchedule;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fs;

/// Roster shipped with the binaries; used when no roster path is given.
pub const DEFAULT_ROSTER_YAML: &str = include_str!("../roster/markets.yaml");

/// Ordered, fixed set of tracked markets. Order is significant only as the
/// tie-break when two markets share the soonest event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Roster {
    pub markets: Vec<MarketSchedule>,
}

impl Roster {
    pub fn markets(&self) -> &[MarketSchedule] {
        &self.markets
    }

    pub fn get(&self, id: &str) -> Option<&MarketSchedule> {
        self.markets.iter().find(|m| m.id == id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.markets.iter().map(|m| m.id.as_str()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct LoadedRoster {
    pub roster: Roster,
    pub roster_hash: String,
    pub canonical_json: String,
}

/// Built-in five-market roster.
pub fn default_roster() -> Result<LoadedRoster> {
    load_layered_yaml_from_strings(&[DEFAULT_ROSTER_YAML]).context("built-in roster is invalid")
}

/// Load from layered files, or the built-in roster when `paths` is empty.
pub fn load_roster_or_default(paths: &[&str]) -> Result<LoadedRoster> {
    if paths.is_empty() {
        default_roster()
    } else {
        load_layered_yaml(paths)
    }
}

pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedRoster> {
    let mut docs: Vec<String> = Vec::new();
    for p in paths {
        let raw =
            fs::read_to_string(p).with_context(|| format!("failed to read roster path: {p}"))?;
        docs.push(raw);
    }

    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedRoster> {
    // Earlier docs are base, later docs override. Lists are replaced, not merged.
    let mut merged = serde_json::json!({});
    for raw in yaml_docs {
        let v_yaml: serde_yaml::Value = serde_yaml::from_str(raw).context("invalid yaml")?;
        let v_json = serde_json::to_value(v_yaml).context("yaml->json conversion failed")?;
        merged = deep_merge(merged, v_json);
    }

    let roster: Roster =
        serde_json::from_value(merged).context("ROSTER_INVALID: schema mismatch")?;
    validate_roster(&roster)?;

    // Hash after defaults are filled in.
    let resolved = serde_json::to_value(&roster).context("roster->json conversion failed")?;
    let canonical_json = canonicalize_json(&resolved)?;
    let roster_hash = sha256_hex(canonical_json.as_bytes());
    Ok(LoadedRoster {
        roster,
        roster_hash,
        canonical_json,
    })
}

/// Load-time invariants: non-empty, unique ids, every schedule in range.
pub fn validate_roster(roster: &Roster) -> Result<()> {
    if roster.markets.is_empty() {
        bail!("ROSTER_EMPTY: at least one market is required");
    }

    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for m in &roster.markets {
        m.validate()
            .with_context(|| format!("ROSTER_INVALID_MARKET id={}", m.id))?;
        if !seen.insert(m.id.as_str()) {
            bail!("ROSTER_DUPLICATE_ID id={}", m.id);
        }
    }
    Ok(())
}

fn deep_merge(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Object(mut a_map), Value::Object(b_map)) => {
            for (k, b_val) in b_map {
                let a_val = a_map.remove(&k).unwrap_or(Value::Null);
                a_map.insert(k, deep_merge(a_val, b_val));
            }
            Value::Object(a_map)
        }
        (_, b_other) => b_other,
    }
}

fn canonicalize_json(v: &Value) -> Result<String> {
    // serde_json's default Map is ordered by key, so the output is independent
    // of key order in the source YAML.
    let s = serde_json::to_string(v).context("canonical json serialize failed")?;
    Ok(s)
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let out = hasher.finalize();
    hex::encode(out)
}
