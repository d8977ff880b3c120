//! `rancherize.json` storage.
//!
//! The file holds one JSON tree. Every key used by the blueprint is a
//! dotted path into that tree, so `docker.repository` addresses
//! `{"docker": {"repository": ...}}`.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::resolve::ConfigRead;

/// File name of the project configuration.
pub const CONFIG_FILE: &str = "rancherize.json";

/// The whole configuration tree of a project.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    root: Value,
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

impl Configuration {
    pub fn new() -> Self {
        Self {
            root: Value::Object(Map::new()),
        }
    }

    /// Wrap an existing tree. A non-object root is replaced by an empty object.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(_) => Self { root: value },
            _ => Self::new(),
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    pub fn path(project_dir: &Path) -> PathBuf {
        project_dir.join(CONFIG_FILE)
    }

    /// Load from rancherize.json at the given path, or return an empty tree if not found.
    pub fn load(project_dir: &Path) -> crate::Result<Self> {
        let config_path = Self::path(project_dir);
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, starting empty");
            return Ok(Self::new());
        }

        let content =
            std::fs::read_to_string(&config_path).map_err(|e| crate::Error::ConfigLoad {
                path: config_path.clone(),
                source: e,
            })?;
        if content.trim().is_empty() {
            return Ok(Self::new());
        }

        let root: Value =
            serde_json::from_str(&content).map_err(|e| crate::Error::ConfigParse {
                path: config_path.clone(),
                source: e,
            })?;
        if !root.is_object() {
            return Err(crate::Error::ConfigRoot { path: config_path });
        }
        Ok(Self { root })
    }

    /// Write the tree back as pretty-printed JSON.
    pub fn save(&self, project_dir: &Path) -> crate::Result<PathBuf> {
        let config_path = Self::path(project_dir);
        let mut content =
            serde_json::to_string_pretty(&self.root).map_err(|e| crate::Error::ConfigSerialize {
                path: config_path.clone(),
                source: e,
            })?;
        content.push('\n');
        std::fs::write(&config_path, content).map_err(|e| crate::Error::ConfigWrite {
            path: config_path.clone(),
            source: e,
        })?;
        Ok(config_path)
    }

    /// Set `key`, creating intermediate objects along the way.
    ///
    /// An intermediate segment holding a non-object value is replaced.
    pub fn set(&mut self, key: &str, value: Value) {
        let mut segments = key.split('.').peekable();
        let mut node = &mut self.root;

        while let Some(segment) = segments.next() {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            let Some(map) = node.as_object_mut() else {
                return;
            };
            if segments.peek().is_none() {
                map.insert(segment.to_owned(), value);
                return;
            }
            node = map
                .entry(segment.to_owned())
                .or_insert_with(|| Value::Object(Map::new()));
        }
    }
}

impl ConfigRead for Configuration {
    fn get(&self, key: &str) -> Option<&Value> {
        let found = key
            .split('.')
            .try_fold(&self.root, |node, segment| node.as_object()?.get(segment))?;
        (!found.is_null()).then_some(found)
    }
}
