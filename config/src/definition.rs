//! Declarative command tree definitions.
//!
//! A definition file lists root nodes and their children. A node with an
//! `argument` entry compiles to an argument node reading that built-in type;
//! every other node is a literal.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! roots:
//!   - name: give
//!     case_sensitive: false
//!     requires: admin
//!     children:
//!       - name: amount
//!         argument: { kind: integer, min: 1, max: 64 }
//!         executes: 1
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use marshal_core::commands::{argument, literal};
use marshal_core::{ArgumentType, CommandNode, validate_tree};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ConfigError, Result};
use crate::permissions::PermissionSource;

/// On-disk encoding of a definition, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionFormat {
    Yaml,
    Json,
}

impl DefinitionFormat {
    /// Maps `.yaml`/`.yml` and `.json` (case-insensitive) to a format.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFormat`](ConfigError::UnsupportedFormat) for any
    /// other extension, or none.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

fn default_case_sensitive() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

/// One node of a definition and its subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDefinition {
    /// Literal keyword or argument name.
    pub name: String,
    /// Makes this an argument node reading the given type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argument: Option<ArgumentType>,
    /// Literal matching mode. Ignored for arguments.
    #[serde(default = "default_case_sensitive", skip_serializing_if = "is_true")]
    pub case_sensitive: bool,
    /// Permission the source must hold to use this node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires: Option<String>,
    /// Result code returned when the node executes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executes: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeDefinition>,
}

impl NodeDefinition {
    /// A bare literal definition.
    pub fn literal(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            argument: None,
            case_sensitive: true,
            requires: None,
            executes: None,
            children: Vec::new(),
        }
    }

    /// A bare argument definition.
    pub fn argument(name: impl Into<String>, argument_type: ArgumentType) -> Self {
        Self {
            argument: Some(argument_type),
            ..Self::literal(name)
        }
    }

    pub fn with_child(mut self, child: NodeDefinition) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_executes(mut self, code: i32) -> Self {
        self.executes = Some(code);
        self
    }

    pub fn with_requires(mut self, permission: impl Into<String>) -> Self {
        self.requires = Some(permission.into());
        self
    }

    /// Compiles this definition into a command node.
    ///
    /// Children are attached in file order, so duplicate sibling names follow
    /// the usual merge rules of the parent's variant.
    pub fn compile<S>(&self) -> CommandNode<S>
    where
        S: PermissionSource + 'static,
    {
        match &self.argument {
            None => {
                let mut builder = literal(self.name.clone()).case_sensitive(self.case_sensitive);
                for child in &self.children {
                    builder = builder.then(child.compile::<S>());
                }
                if let Some(permission) = self.requires.clone() {
                    builder = builder.requires(move |source: &S| source.has_permission(&permission));
                }
                if let Some(code) = self.executes {
                    builder = builder.executes(move |_| Ok(code));
                }
                builder.build()
            }
            Some(argument_type) => {
                let mut builder = argument(self.name.clone(), argument_type.clone());
                for child in &self.children {
                    builder = builder.then(child.compile::<S>());
                }
                if let Some(permission) = self.requires.clone() {
                    builder = builder.requires(move |source: &S| source.has_permission(&permission));
                }
                if let Some(code) = self.executes {
                    builder = builder.executes(move |_| Ok(code));
                }
                builder.build()
            }
        }
    }
}

/// A complete definition file.
///
/// # Examples
///
/// ```
/// use marshal_config::{PermissionSet, TreeConfig};
///
/// let config = TreeConfig::from_yaml_str(r#"
/// version: "1.0"
/// roots:
///   - name: ping
///     executes: 0
/// "#).unwrap();
///
/// let roots = config.build::<PermissionSet>().unwrap();
/// assert_eq!(roots[0].name(), "ping");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Definition format version (e.g., `"1.0"`).
    pub version: String,
    #[serde(default)]
    pub roots: Vec<NodeDefinition>,
}

impl TreeConfig {
    pub fn new(roots: Vec<NodeDefinition>) -> Self {
        Self {
            version: "1.0".to_string(),
            roots,
        }
    }

    /// Loads a definition file, choosing YAML or JSON by extension.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFormat`](ConfigError::UnsupportedFormat) for an
    /// unknown extension, [`Io`](ConfigError::Io) if the file cannot be
    /// read, or the parser's error if the content is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = DefinitionFormat::from_path(path)?;
        let reader = BufReader::new(std::fs::File::open(path)?);
        let config: Self = match format {
            DefinitionFormat::Yaml => serde_yaml::from_reader(reader)?,
            DefinitionFormat::Json => serde_json::from_reader(reader)?,
        };
        info!(
            path = %path.display(),
            roots = config.roots.len(),
            "Loaded command tree definition"
        );
        Ok(config)
    }

    /// Saves the definition, choosing YAML or JSON by extension.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFormat`](ConfigError::UnsupportedFormat) for an
    /// unknown extension, [`Io`](ConfigError::Io) if the file cannot be
    /// written, or the serializer's error.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = DefinitionFormat::from_path(path)?;
        let writer = BufWriter::new(std::fs::File::create(path)?);
        match format {
            DefinitionFormat::Yaml => serde_yaml::to_writer(writer, self)?,
            DefinitionFormat::Json => serde_json::to_writer_pretty(writer, self)?,
        }
        Ok(())
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Compiles and validates every root.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTree`](ConfigError::InvalidTree) with the first
    /// validation error of the first failing root.
    pub fn build<S>(&self) -> Result<Vec<CommandNode<S>>>
    where
        S: PermissionSource + 'static,
    {
        let mut roots = Vec::with_capacity(self.roots.len());
        for definition in &self.roots {
            let node = definition.compile::<S>();
            if let Some(err) = validate_tree(&node).into_iter().next() {
                return Err(err.into());
            }
            debug!(
                root = %node.name(),
                children = node.child_count(),
                "Compiled command root"
            );
            roots.push(node);
        }
        Ok(roots)
    }
}
