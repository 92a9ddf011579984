//! SingleStepTests fixtures.
//!
//! A fixture file holds a list of test vectors, each describing one
//! instruction: registers and RAM before, registers and RAM after, and the
//! cycle count. Two encodings are accepted:
//!
//! - JSON (`*.json`): `name`, `initial`, `final`, `length`. Extra fields such
//!   as `prefetch` and `transactions` are ignored.
//! - The packed binary form (`*.json.bin`), recognised by its leading magic.

mod binary;

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::HarnessError;

/// Register fields as they appear in a fixture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireRegisters {
    pub d0: u32,
    pub d1: u32,
    pub d2: u32,
    pub d3: u32,
    pub d4: u32,
    pub d5: u32,
    pub d6: u32,
    pub d7: u32,
    pub a0: u32,
    pub a1: u32,
    pub a2: u32,
    pub a3: u32,
    pub a4: u32,
    pub a5: u32,
    pub a6: u32,
    pub usp: u32,
    pub ssp: u32,
    pub sr: u16,
    pub pc: u32,
}

/// Registers plus the RAM bytes that matter for one side of a vector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireState {
    #[serde(flatten)]
    pub registers: WireRegisters,
    /// `(byte address, value)` pairs. Unlisted addresses are zero.
    pub ram: Vec<(u32, u8)>,
}

/// One single-instruction test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestVector {
    pub name: String,
    pub initial: WireState,
    #[serde(rename = "final")]
    pub final_state: WireState,
    /// Expected cycle count.
    pub length: u32,
}

/// Load every vector in a fixture file.
pub fn load(path: &Path) -> Result<Vec<TestVector>, HarnessError> {
    let bytes = fs::read(path).map_err(|source| HarnessError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let vectors = if binary::is_binary(&bytes) {
        debug!("{}: binary fixture", path.display());
        binary::decode(&bytes, path)?
    } else {
        debug!("{}: JSON fixture", path.display());
        parse_json(&bytes, path)?
    };
    debug!("{}: {} vectors", path.display(), vectors.len());
    Ok(vectors)
}

/// Parse a JSON fixture already in memory.
pub fn parse_json(bytes: &[u8], path: &Path) -> Result<Vec<TestVector>, HarnessError> {
    serde_json::from_slice(bytes).map_err(|source| HarnessError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve the command-line path to fixture files.
///
/// A file is used as-is. A directory is searched recursively for `*.json`
/// and `*.json.bin`, in sorted order.
pub fn discover(path: &Path) -> Result<Vec<PathBuf>, HarnessError> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let base = glob::Pattern::escape(&path.to_string_lossy());
    let mut files = Vec::new();
    for suffix in ["json", "json.bin"] {
        for entry in glob::glob(&format!("{base}/**/*.{suffix}"))? {
            let file = entry.map_err(|e| HarnessError::Io {
                path: e.path().to_path_buf(),
                source: e.into_error(),
            })?;
            files.push(file);
        }
    }
    files.sort();
    files.dedup();

    if files.is_empty() {
        return Err(HarnessError::NoFixtures {
            path: path.to_path_buf(),
        });
    }
    Ok(files)
}
