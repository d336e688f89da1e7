use std::{fs, path::Path};

use anyhow::Context;
use drill_schema::Drill;

pub fn load_drill_json_from_path(path: impl AsRef<Path>) -> anyhow::Result<Drill> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("failed to read drill: {}", path.display()))?;
    let drill: Drill = serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to parse drill json: {}", path.display()))?;
    Ok(drill)
}

pub fn load_drill_json_from_str(json: &str) -> anyhow::Result<Drill> {
    let drill: Drill = serde_json::from_str(json).context("failed to parse drill json")?;
    Ok(drill)
}

/// Loads either a single drill object or an array of drills (a catalog file).
pub fn load_drills_json_from_str(json: &str) -> anyhow::Result<Vec<Drill>> {
    let value: serde_json::Value = serde_json::from_str(json).context("failed to parse drill json")?;
    if value.is_array() {
        serde_json::from_value(value).context("failed to parse drill catalog")
    } else {
        let drill: Drill = serde_json::from_value(value).context("failed to parse drill json")?;
        Ok(vec![drill])
    }
}
