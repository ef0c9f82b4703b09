//! Demo option files
//!
//! An option file is TOML or JSON, chosen by extension:
//!
//! ```toml
//! max_width_selected_item = 300
//! default = [{ label = "Science", value = "science" }]
//!
//! [[options]]
//! label = "Science"
//! value = "science"
//! icon = "assets/science.png"
//! ```

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use selecta_core::{SelectConfig, SelectConfigBuilder, SelectOption};

/// Contents of an option file
#[derive(Debug, Deserialize, Serialize)]
pub struct DemoConfig {
    pub options: Vec<SelectOption>,
    #[serde(default)]
    pub default: Option<Vec<SelectOption>>,
    #[serde(default)]
    pub max_width_selected_item: Option<f32>,
    #[serde(default)]
    pub width: Option<f32>,
}

impl DemoConfig {
    /// Load from a `.toml` or `.json` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml(&content)
                .with_context(|| format!("Failed to parse {}", path.display())),
            Some("json") => Self::from_json(&content)
                .with_context(|| format!("Failed to parse {}", path.display())),
            _ => bail!(
                "Unsupported option file {} (expected .toml or .json)",
                path.display()
            ),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Start a control configuration from this file
    pub fn builder(self) -> SelectConfigBuilder {
        let mut builder = SelectConfig::builder().options(self.options);
        if let Some(default) = self.default {
            builder = builder.default_value(default);
        }
        if let Some(width) = self.max_width_selected_item {
            builder = builder.max_width_selected_item(width);
        }
        if let Some(width) = self.width {
            builder = builder.width(width);
        }
        builder
    }
}
