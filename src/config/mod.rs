//! Typed configuration for the dashboard widgets.
//!
//! The configuration file is a JSON array of module blocks:
//!
//! ```json
//! [
//!   {
//!     "module": "NewsFeed",
//!     "position": {
//!       "verticalAlignment": "bottom",
//!       "horizontalAlignment": "center",
//!       "margin": { "left": 0, "top": 0, "right": 0, "bottom": 1 }
//!     },
//!     "attributes": { "feeds": [{ "name": "BBC", "uri": "https://..." }], "defaultFeed": "BBC" }
//!   }
//! ]
//! ```
//!
//! The outer shape is parsed once when the file is loaded.  Each widget then
//! validates its own `position` and `attributes` into typed structs via
//! [`ModuleBlock::parse`], so a broken block only affects its own widget.
//!
//! Reloading lives in [`reload`].

pub mod reload;

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("reading configuration from {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parsing configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no configuration block for module {0}")]
    Missing(String),

    #[error("invalid configuration for module {module}: {source}")]
    Invalid {
        module: String,
        source: serde_json::Error,
    },
}

/// The full set of module blocks, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Configuration {
    modules: Vec<ModuleBlock>,
}

impl Configuration {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// First block whose `module` equals `name`.
    pub fn lookup(&self, name: &str) -> Option<&ModuleBlock> {
        self.modules.iter().find(|m| m.module == name)
    }

    /// Look up and validate a module's block in one step.
    pub fn module<A: DeserializeOwned>(&self, name: &str) -> Result<ModuleConfig<A>, ConfigError> {
        self.lookup(name)
            .ok_or_else(|| ConfigError::Missing(name.to_string()))?
            .parse()
    }
}

/// One untyped module block as it appears in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModuleBlock {
    pub module: String,
    #[serde(default)]
    position: serde_json::Value,
    #[serde(default)]
    attributes: serde_json::Value,
}

impl ModuleBlock {
    /// Validate this block into a typed [`ModuleConfig`].
    pub fn parse<A: DeserializeOwned>(&self) -> Result<ModuleConfig<A>, ConfigError> {
        let invalid = |source| ConfigError::Invalid {
            module: self.module.clone(),
            source,
        };

        let position = if self.position.is_null() {
            Position::default()
        } else {
            Position::deserialize(&self.position).map_err(invalid)?
        };
        // An absent attributes block reads as `{}` so all-default widgets bind.
        let attributes = if self.attributes.is_null() {
            A::deserialize(&serde_json::Value::Object(serde_json::Map::new()))
        } else {
            A::deserialize(&self.attributes)
        }
        .map_err(invalid)?;

        Ok(ModuleConfig {
            position,
            attributes,
        })
    }
}

/// A validated module block.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleConfig<A> {
    pub position: Position,
    pub attributes: A,
}

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Position {
    pub vertical_alignment: VerticalAlignment,
    pub horizontal_alignment: HorizontalAlignment,
    pub margin: Margin,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum VerticalAlignment {
    #[default]
    Top,
    Center,
    Bottom,
    Stretch,
}

impl From<String> for VerticalAlignment {
    fn from(value: String) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "CENTER" => Self::Center,
            "BOTTOM" => Self::Bottom,
            "STRETCH" => Self::Stretch,
            _ => Self::Top,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
    Stretch,
}

impl From<String> for HorizontalAlignment {
    fn from(value: String) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "CENTER" => Self::Center,
            "RIGHT" => Self::Right,
            "STRETCH" => Self::Stretch,
            _ => Self::Left,
        }
    }
}

/// Margins in terminal cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

// ---------------------------------------------------------------------------
// Shared attribute shapes
// ---------------------------------------------------------------------------

/// A `{ name, uri }` pair used by the news feed and radio station lists.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamedUri {
    pub name: String,
    pub uri: String,
}
