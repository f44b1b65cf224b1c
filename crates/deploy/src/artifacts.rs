//! Compiled contract artifacts.

use std::path::{Path, PathBuf};

use alloy_core::primitives::Bytes;
use anyhow::{Context, Result};
use serde::Deserialize;

/// Bytecode field of an artifact, in either Hardhat or Foundry layout.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ArtifactBytecode {
    /// Hardhat: `"bytecode": "0x..."`.
    Hex(Bytes),
    /// Foundry: `"bytecode": { "object": "0x..." }`.
    Object { object: Bytes },
}

#[derive(Debug, Deserialize)]
struct ArtifactFile {
    bytecode: ArtifactBytecode,
}

/// Directory of `<ContractName>.json` artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the artifact for `contract`.
    pub fn path_of(&self, contract: &str) -> PathBuf {
        self.root.join(format!("{contract}.json"))
    }

    /// Load the creation bytecode of `contract`.
    pub fn bytecode(&self, contract: &str) -> Result<Bytes> {
        let path = self.path_of(contract);
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read artifact {}", path.display()))?;
        let artifact: ArtifactFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse artifact {}", path.display()))?;

        let bytecode = match artifact.bytecode {
            ArtifactBytecode::Hex(bytes) | ArtifactBytecode::Object { object: bytes } => bytes,
        };

        if bytecode.is_empty() {
            anyhow::bail!(
                "Artifact {} has no bytecode (abstract contract or interface?)",
                path.display()
            );
        }

        Ok(bytecode)
    }
}
