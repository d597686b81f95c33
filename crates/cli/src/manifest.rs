use anyhow::{Context, Result, bail};
use optset::OptionSpec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MANIFEST_NAME: &str = "optset.json";
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<u32>,

    #[serde(default)]
    pub options: Vec<OptionEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionEntry {
    /// Prototype string, e.g. `o|output=`.
    pub prototype: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Number of value slots; 1 when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_values: Option<usize>,
}

impl OptionEntry {
    pub fn max_values(&self) -> usize {
        self.max_values.unwrap_or(1)
    }

    pub fn compile(&self) -> Result<OptionSpec> {
        let spec = OptionSpec::compile(&self.prototype, self.max_values())
            .with_context(|| format!("invalid option prototype `{}`", self.prototype))?;
        Ok(spec.with_description(self.description.clone()))
    }
}

impl Manifest {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;
        let manifest: Manifest = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse manifest JSON: {}", path.display()))?;

        if let Some(version) = manifest.schema_version
            && version != SCHEMA_VERSION
        {
            bail!(
                "unsupported schemaVersion {version} in {} (expected {SCHEMA_VERSION})",
                path.display()
            );
        }
        Ok(manifest)
    }

    /// Compile every prototype, stopping at the first bad one.
    pub fn compile(&self) -> Result<Vec<OptionSpec>> {
        self.options.iter().map(OptionEntry::compile).collect()
    }
}

/// Write a starter manifest into `project_dir`. Never overwrites.
pub fn write_default_manifest(project_dir: &Path) -> Result<PathBuf> {
    let dest = project_dir.join(DEFAULT_MANIFEST_NAME);
    if dest.exists() {
        bail!("{DEFAULT_MANIFEST_NAME} already exists in {}", project_dir.display());
    }

    let entry = |prototype: &str, description: &str, max_values: Option<usize>| OptionEntry {
        prototype: prototype.to_string(),
        description: Some(description.to_string()),
        max_values,
    };
    let manifest = Manifest {
        schema_version: Some(SCHEMA_VERSION),
        options: vec![
            entry("h|?|help", "show this message and exit", None),
            entry("v|verbose", "increase message verbosity", None),
            entry("o|output=", "write results to {FILE}", None),
            entry("D|define=", "define {0:name} as {1:value}", Some(2)),
        ],
    };

    let bytes = serde_json::to_vec_pretty(&manifest).context("failed to serialize manifest")?;
    let mut out = String::from_utf8(bytes).context("manifest is not valid UTF-8")?;
    out.push('\n');

    let tmp = dest.with_extension("tmp");
    fs::write(&tmp, out.as_bytes())
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, &dest)
        .with_context(|| format!("failed to move {} into place", dest.display()))?;
    Ok(dest)
}
