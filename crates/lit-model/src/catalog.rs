//! Named layouts.
//!
//! A catalog bundles every layout a deployment ships with and names the one
//! to start from. Catalogs are read from TOML or JSON:
//!
//! ```toml
//! default_layout = "simple"
//!
//! [layouts.simple.components]
//! Main = ["data-table-module"]
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::layout::DeclaredLayout;
use crate::spec::{DatasetSpec, ModelSpecs};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutCatalog {
    /// Layout used when the host does not ask for one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_layout: Option<String>,
    #[serde(default)]
    pub layouts: BTreeMap<String, DeclaredLayout>,
}

impl LayoutCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_layout(mut self, name: impl Into<String>, layout: DeclaredLayout) -> Self {
        self.layouts.insert(name.into(), layout);
        self
    }

    #[must_use]
    pub fn with_default(mut self, name: impl Into<String>) -> Self {
        self.default_layout = Some(name.into());
        self
    }

    pub fn names(&self) -> Vec<&str> {
        self.layouts.keys().map(String::as_str).collect()
    }

    pub fn get(&self, name: &str) -> Result<&DeclaredLayout> {
        self.layouts
            .get(name)
            .ok_or_else(|| ModelError::UnknownLayout {
                name: name.to_string(),
            })
    }

    /// Name of the default layout: the configured one, else the first by name.
    pub fn default_name(&self) -> Result<&str> {
        match &self.default_layout {
            Some(name) => Ok(name.as_str()),
            None => self
                .layouts
                .keys()
                .next()
                .map(String::as_str)
                .ok_or(ModelError::EmptyCatalog),
        }
    }

    pub fn default_layout(&self) -> Result<&DeclaredLayout> {
        self.get(self.default_name()?)
    }

    /// Checks that the catalog is usable as loaded.
    pub fn validate(&self) -> Result<()> {
        if self.layouts.is_empty() {
            return Err(ModelError::EmptyCatalog);
        }
        if let Some(name) = &self.default_layout {
            self.get(name)?;
        }
        Ok(())
    }

    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|source| ModelError::Toml {
            path: origin.to_path_buf(),
            source,
        })
    }

    pub fn from_json_str(content: &str, origin: &Path) -> Result<Self> {
        serde_json::from_str(content).map_err(|source| ModelError::Json {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Loads and validates a catalog, picking the format by file extension.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ModelError::io(path, e))?;
        let catalog = match file_format(path)? {
            FileFormat::Toml => Self::from_toml_str(&content, path)?,
            FileFormat::Json => Self::from_json_str(&content, path)?,
        };
        catalog.validate()?;
        Ok(catalog)
    }
}

/// Loads a model name -> model info map from JSON.
pub fn load_model_specs(path: &Path) -> Result<ModelSpecs> {
    load_json(path)
}

/// Loads a dataset spec from JSON.
pub fn load_dataset_spec(path: &Path) -> Result<DatasetSpec> {
    load_json(path)
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| ModelError::io(path, e))?;
    serde_json::from_str(&content).map_err(|source| ModelError::Json {
        path: path.to_path_buf(),
        source,
    })
}

enum FileFormat {
    Toml,
    Json,
}

fn file_format(path: &Path) -> Result<FileFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("toml") => Ok(FileFormat::Toml),
        Some("json") => Ok(FileFormat::Json),
        _ => Err(ModelError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}
