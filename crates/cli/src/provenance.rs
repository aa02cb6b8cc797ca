//! Provenance sidecars for generated worlds.
//!
//! A world written to `town.json` gets `town.provenance.json` next to it:
//! code revision, crate version, the writing callsite, the generation
//! parameters and free-form notes. Enough to regenerate the same world.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Parameters and notes recorded next to an artifact.
pub struct Payload {
    pub params: Value,
    pub notes: Vec<String>,
}

impl Payload {
    pub fn new(params: Value) -> Self {
        Self {
            params,
            notes: Vec::new(),
        }
    }
}

#[derive(Serialize)]
struct Callsite {
    file: &'static str,
    line: u32,
}

#[derive(Serialize)]
struct Sidecar<'a> {
    code_rev: String,
    generator: String,
    callsite: Callsite,
    params: &'a Value,
    notes: &'a [String],
    outputs: Vec<String>,
}

/// Write the sidecar for `artifact`; returns its path.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let caller = Location::caller();
    let sidecar = Sidecar {
        code_rev: current_git_rev(),
        generator: format!("roadscape {}", roadscape::VERSION),
        callsite: Callsite {
            file: caller.file(),
            line: caller.line(),
        },
        params: &payload.params,
        notes: &payload.notes,
        outputs: vec![artifact.to_string_lossy().into_owned()],
    };

    let path = sidecar_path(artifact);
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let bytes = serde_json::to_vec_pretty(&sidecar)?;
    fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), "provenance written");
    Ok(path)
}

/// `dir/name.ext` becomes `dir/name.provenance.json`.
fn sidecar_path(artifact: &Path) -> PathBuf {
    let stem = artifact
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "world".to_string());
    artifact.with_file_name(format!("{stem}.provenance.json"))
}

/// Commit hash from `GIT_COMMIT` (build time, then run time), else `git`.
pub fn current_git_rev() -> String {
    let from_env = option_env!("GIT_COMMIT")
        .map(str::to_string)
        .or_else(|| std::env::var("GIT_COMMIT").ok())
        .filter(|s| !s.is_empty());
    if let Some(rev) = from_env {
        return rev;
    }
    let Ok(output) = Command::new("git").args(["rev-parse", "HEAD"]).output() else {
        return "unknown".to_string();
    };
    if !output.status.success() {
        return "unknown".to_string();
    }
    String::from_utf8(output.stdout)
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn sidecar_sits_next_to_artifact() {
        let derived = sidecar_path(Path::new("/tmp/worlds/town.json"));
        assert_eq!(derived, Path::new("/tmp/worlds/town.provenance.json"));
        let bare = sidecar_path(Path::new("out"));
        assert_eq!(bare, Path::new("out.provenance.json"));
    }

    #[test]
    fn write_sidecar_records_params_and_notes() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("world.json");
        fs::write(&artifact, "{}").unwrap();
        let mut payload = Payload::new(json!({"seed": 42}));
        payload.notes.push("grid 3x3".into());
        let prov_path = write_sidecar(&artifact, payload).unwrap();
        assert!(prov_path.exists());
        let parsed: Value = serde_json::from_slice(&fs::read(prov_path).unwrap()).unwrap();
        assert_eq!(parsed["outputs"][0], artifact.to_string_lossy().as_ref());
        assert_eq!(parsed["params"]["seed"], 42);
        assert_eq!(parsed["notes"][0], "grid 3x3");
        assert!(parsed["callsite"]["line"].as_u64().is_some());
        assert!(parsed["generator"]
            .as_str()
            .is_some_and(|g| g.starts_with("roadscape")));
    }
}
