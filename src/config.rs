use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Name under which the loader appears in pipeline configs.
pub const LOADER_TYPE: &str = "LoadMultiChannelImage";

/// Construction-time options for [`crate::transform::ImageLoader`].
///
/// Deserializes from the pipeline-config shape
/// `{"type": "LoadMultiChannelImage", "to_float32": true, "ignore_empty": false}`;
/// every field is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Widen the decoded buffer to `f32` (values unchanged).
    pub to_float32: bool,
    /// Report a decode failure as a skipped sample instead of an error.
    pub ignore_empty: bool,
}

#[derive(Deserialize)]
struct LoaderConfigFile {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(flatten)]
    config: LoaderConfig,
}

impl LoaderConfig {
    /// Parse a config from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let file: LoaderConfigFile = serde_json::from_str(text).context("parsing loader config")?;
        if let Some(kind) = file.kind.as_deref() {
            if kind != LOADER_TYPE {
                bail!("loader config has type '{kind}', expected '{LOADER_TYPE}'");
            }
        }
        Ok(file.config)
    }

    /// Read a config from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading loader config {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("in {}", path.display()))
    }

    pub fn with_to_float32(mut self, to_float32: bool) -> Self {
        self.to_float32 = to_float32;
        self
    }

    pub fn with_ignore_empty(mut self, ignore_empty: bool) -> Self {
        self.ignore_empty = ignore_empty;
        self
    }
}
