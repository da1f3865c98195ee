//! Loading of compiled contract artifacts

use std::{fs, path::Path};

use alloy::{json_abi::JsonAbi, primitives::Bytes};
use eyre::WrapErr;
use serde::Deserialize;

/// ABI and creation bytecode of a compiled contract
#[derive(Debug, Clone)]
pub struct Artifact {
    pub name: String,
    pub abi: JsonAbi,
    pub bytecode: Bytes,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    contract_name: Option<String>,
    abi: JsonAbi,
    bytecode: RawBytecode,
}

/// Hardhat stores the bytecode as a hex string, Foundry nests it under `object`
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    Hex(Bytes),
    Object { object: Bytes },
}

impl Artifact {
    pub fn load(path: &Path) -> eyre::Result<Self> {
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read artifact at {}", path.display()))?;
        let fallback_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self::from_json(&content, fallback_name)
            .wrap_err_with(|| format!("failed to parse artifact at {}", path.display()))
    }

    pub fn from_json(content: &str, fallback_name: String) -> eyre::Result<Self> {
        let raw: RawArtifact = serde_json::from_str(content)?;
        let bytecode = match raw.bytecode {
            RawBytecode::Hex(bytes) | RawBytecode::Object { object: bytes } => bytes,
        };
        let name = raw.contract_name.unwrap_or(fallback_name);
        eyre::ensure!(
            !bytecode.is_empty(),
            "artifact {name} has no creation bytecode"
        );

        Ok(Self {
            name,
            abi: raw.abi,
            bytecode,
        })
    }

    /// Number of arguments the constructor takes
    pub fn constructor_arity(&self) -> usize {
        self.abi
            .constructor
            .as_ref()
            .map_or(0, |constructor| constructor.inputs.len())
    }
}
