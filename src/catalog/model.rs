//! Map definitions and the `map.json` descriptor loader.
//!
//! A descriptor is validated against the bundled contract
//! (`schema/map_descriptor.schema.json`) before it is deserialized, so type
//! mismatches are reported with the contract's error messages instead of a
//! bare serde failure.

use crate::error::MapError;
use jsonschema::JSONSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

/// Upper bound on descriptor size; anything larger is rejected unread.
pub const MAX_DESCRIPTOR_BYTES: u64 = 1024 * 1024;

const DESCRIPTOR_CONTRACT: &str = include_str!("../../schema/map_descriptor.schema.json");

/// A registered map with its parsed descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDefinition {
    pub id: String,
    /// Logical asset-root location, relative to the static root.
    pub path: String,
    #[serde(default)]
    pub title: BTreeMap<String, String>,
    #[serde(default)]
    pub keys: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct MapDescriptor {
    #[serde(default)]
    title: Option<BTreeMap<String, String>>,
    #[serde(default)]
    keys: Option<Vec<String>>,
}

/// Read, validate and parse the descriptor at `descriptor` for map `id`.
///
/// Missing, unreadable, non-regular and oversize files are reported as `InvalidFormat`:
/// the map id is registered, its content is just not usable.
pub fn load_definition(id: &str, path: &str, descriptor: &Path) -> Result<MapDefinition, MapError> {
    let raw = read_bounded(descriptor).map_err(|reason| MapError::invalid_format(id, reason))?;
    let value: Value = serde_json::from_slice(&raw).map_err(|err| {
        MapError::invalid_format(id, format!("parsing {}: {err}", descriptor.display()))
    })?;
    validate_descriptor(&value)
        .map_err(|details| MapError::invalid_format(id, format!("{}: {details}", descriptor.display())))?;
    let parsed: MapDescriptor = serde_json::from_value(value).map_err(|err| {
        MapError::invalid_format(id, format!("decoding {}: {err}", descriptor.display()))
    })?;

    Ok(MapDefinition {
        id: id.to_string(),
        path: path.to_string(),
        title: parsed.title.unwrap_or_default(),
        keys: parsed.keys.unwrap_or_default(),
    })
}

// Only regular files are opened: a FIFO or device would block `open` or
// `read` indefinitely.
fn read_bounded(descriptor: &Path) -> Result<Vec<u8>, String> {
    let meta = fs::metadata(descriptor)
        .map_err(|err| format!("inspecting {}: {err}", descriptor.display()))?;
    if !meta.is_file() {
        return Err(format!("{} is not a regular file", descriptor.display()));
    }
    let file = File::open(descriptor)
        .map_err(|err| format!("opening {}: {err}", descriptor.display()))?;
    let mut buf = Vec::new();
    file.take(MAX_DESCRIPTOR_BYTES + 1)
        .read_to_end(&mut buf)
        .map_err(|err| format!("reading {}: {err}", descriptor.display()))?;
    if buf.len() as u64 > MAX_DESCRIPTOR_BYTES {
        return Err(format!(
            "{} exceeds {MAX_DESCRIPTOR_BYTES} bytes",
            descriptor.display()
        ));
    }
    Ok(buf)
}

/// Check a parsed descriptor against the bundled contract.
///
/// Returns the joined validation messages on failure.
pub fn validate_descriptor(value: &Value) -> Result<(), String> {
    let Some(contract) = descriptor_contract() else {
        return Ok(());
    };
    if let Err(errors) = contract.validate(value) {
        let details = errors
            .map(|err| err.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(details);
    }
    Ok(())
}

// The contract is compiled once and shared. A contract that fails to compile
// is logged and validation falls back to serde's type checks.
fn descriptor_contract() -> Option<&'static JSONSchema> {
    static SOURCE: OnceLock<Value> = OnceLock::new();
    static COMPILED: OnceLock<Option<JSONSchema>> = OnceLock::new();

    COMPILED
        .get_or_init(|| {
            let source = SOURCE.get_or_init(|| match serde_json::from_str(DESCRIPTOR_CONTRACT) {
                Ok(value) => value,
                Err(err) => {
                    log::error!("map descriptor contract is not valid JSON: {err}");
                    Value::Bool(true)
                }
            });
            match JSONSchema::compile(source) {
                Ok(compiled) => Some(compiled),
                Err(err) => {
                    log::error!("compiling map descriptor contract: {err}");
                    None
                }
            }
        })
        .as_ref()
}
