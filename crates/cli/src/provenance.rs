//! `<stem>.provenance.json` sidecars recording how a CLI artifact was made.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Environment override for the recorded code revision (e.g. in CI images
/// without a git checkout).
pub const REV_ENV: &str = "MRFCUT_GIT_REV";

/// Sidecar document; serialized as-is.
#[derive(Debug, Serialize)]
pub struct Sidecar {
    /// Subcommand that produced the artifact.
    pub command: &'static str,
    pub code_rev: String,
    pub mrfcut_version: &'static str,
    pub tags: Vec<String>,
    pub params: Value,
    /// Run summary; `null` until set.
    pub result: Value,
    pub artifact: String,
    /// `file:line` of the `write` call.
    pub written_by: String,
}

impl Sidecar {
    pub fn new(command: &'static str, params: Value) -> Self {
        Self {
            command,
            code_rev: code_rev(),
            mrfcut_version: mrfcut::VERSION,
            tags: Vec::new(),
            params,
            result: Value::Null,
            artifact: String::new(),
            written_by: String::new(),
        }
    }

    pub fn with_result(mut self, result: Value) -> Self {
        self.result = result;
        self
    }

    pub fn with_tag(mut self, tag: Option<String>) -> Self {
        self.tags.extend(tag);
        self
    }

    /// Write the sidecar next to `artifact` and return its path.
    #[track_caller]
    pub fn write(mut self, artifact: &Path) -> Result<PathBuf> {
        let caller = Location::caller();
        self.written_by = format!("{}:{}", caller.file(), caller.line());
        self.artifact = artifact.display().to_string();

        let path = sidecar_path(artifact);
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        }
        let body = serde_json::to_vec_pretty(&self)?;
        fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
        tracing::debug!(path = %path.display(), "provenance sidecar written");
        Ok(path)
    }
}

/// `out/assign.parquet` -> `out/assign.provenance.json`.
pub fn sidecar_path(artifact: &Path) -> PathBuf {
    artifact.with_extension("provenance.json")
}

/// Revision of the working tree: `$MRFCUT_GIT_REV` if set, else
/// `git describe --always --dirty`, else `"unknown"`.
pub fn code_rev() -> String {
    if let Some(rev) = std::env::var(REV_ENV).ok().filter(|r| !r.is_empty()) {
        return rev;
    }
    let described = Command::new("git")
        .args(["describe", "--always", "--dirty"])
        .output();
    match described {
        Ok(out) if out.status.success() => {
            String::from_utf8_lossy(&out.stdout).trim().to_string()
        }
        Ok(out) => {
            tracing::debug!(status = %out.status, "git describe failed");
            "unknown".to_string()
        }
        Err(err) => {
            tracing::debug!(%err, "git not available");
            "unknown".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn sidecar_replaces_the_artifact_extension() {
        assert_eq!(
            sidecar_path(Path::new("/tmp/output/assign.parquet")),
            Path::new("/tmp/output/assign.provenance.json")
        );
        assert_eq!(sidecar_path(Path::new("graph")), Path::new("graph.provenance.json"));
    }

    #[test]
    fn written_sidecar_records_run() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("assign.csv");
        fs::write(&artifact, "node,label\n").unwrap();
        let path = Sidecar::new("solve", json!({"labels": 3}))
            .with_result(json!({"score": 0.5}))
            .with_tag(Some("smoke".to_string()))
            .write(&artifact)
            .unwrap();
        assert_eq!(path, dir.path().join("assign.provenance.json"));

        let parsed: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(parsed["command"], "solve");
        assert_eq!(parsed["artifact"], artifact.display().to_string());
        assert_eq!(parsed["tags"][0], "smoke");
        assert_eq!(parsed["params"]["labels"], 3);
        assert_eq!(parsed["result"]["score"], 0.5);
        assert_eq!(parsed["mrfcut_version"], mrfcut::VERSION);
        assert!(parsed["written_by"].as_str().unwrap().contains("provenance.rs"));
    }

    #[test]
    fn untouched_result_stays_null() {
        let sidecar = Sidecar::new("random", json!({}));
        assert!(sidecar.result.is_null());
        assert!(!sidecar.code_rev.is_empty());
    }
}
