//! Named design templates
//!
//! Saved designs are opaque JSON documents keyed by name. The store is a
//! plain key/value seam; the designer never looks inside what it persists.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use serde_json::Value;
use thiserror::Error;

/// Template store errors
#[derive(Error, Debug)]
pub enum TemplateStoreError {
    #[error("invalid template name '{0}'")]
    InvalidName(String),
    #[error("template IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("template '{name}' is not valid JSON: {error}")]
    Corrupt {
        name: String,
        #[source]
        error: serde_json::Error,
    },
    #[error("template store lock poisoned")]
    Poisoned,
}

/// Key/value persistence for design documents
pub trait TemplateStore: Send + Sync {
    /// Template names, sorted
    fn list(&self) -> Result<Vec<String>, TemplateStoreError>;

    fn get(&self, name: &str) -> Result<Option<Value>, TemplateStoreError>;

    fn put(&self, name: &str, document: &Value) -> Result<(), TemplateStoreError>;
}

/// Reject names that could escape the store or hide files
pub fn validate_name(name: &str) -> Result<(), TemplateStoreError> {
    let valid = !name.is_empty()
        && name.len() <= 128
        && !name.starts_with('.')
        && !name.chars().any(|c| matches!(c, '/' | '\\' | '\0') || c.is_control());
    if valid {
        Ok(())
    } else {
        Err(TemplateStoreError::InvalidName(name.to_string()))
    }
}

/// One `<name>.json` file per template
#[derive(Debug, Clone)]
pub struct DirectoryTemplateStore {
    dir: PathBuf,
}

impl DirectoryTemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, name: &str) -> Result<PathBuf, TemplateStoreError> {
        validate_name(name)?;
        Ok(self.dir.join(format!("{name}.json")))
    }
}

impl TemplateStore for DirectoryTemplateStore {
    fn list(&self) -> Result<Vec<String>, TemplateStoreError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut names: Vec<String> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let file_name = entry.file_name().to_string_lossy().to_string();
                file_name.strip_suffix(".json").map(str::to_string)
            })
            .filter(|name| validate_name(name).is_ok())
            .collect();
        names.sort();
        Ok(names)
    }

    fn get(&self, name: &str) -> Result<Option<Value>, TemplateStoreError> {
        let path = self.path(name)?;
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)?;
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|error| TemplateStoreError::Corrupt { name: name.to_string(), error })
    }

    fn put(&self, name: &str, document: &Value) -> Result<(), TemplateStoreError> {
        let path = self.path(name)?;
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(document)
            .map_err(|error| TemplateStoreError::Corrupt { name: name.to_string(), error })?;
        fs::write(&path, json)?;
        tracing::info!(template = name, path = %path.display(), "Saved design template");
        Ok(())
    }
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryTemplateStore {
    templates: RwLock<BTreeMap<String, Value>>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TemplateStore for MemoryTemplateStore {
    fn list(&self) -> Result<Vec<String>, TemplateStoreError> {
        let templates = self.templates.read().map_err(|_| TemplateStoreError::Poisoned)?;
        Ok(templates.keys().cloned().collect())
    }

    fn get(&self, name: &str) -> Result<Option<Value>, TemplateStoreError> {
        validate_name(name)?;
        let templates = self.templates.read().map_err(|_| TemplateStoreError::Poisoned)?;
        Ok(templates.get(name).cloned())
    }

    fn put(&self, name: &str, document: &Value) -> Result<(), TemplateStoreError> {
        validate_name(name)?;
        let mut templates = self.templates.write().map_err(|_| TemplateStoreError::Poisoned)?;
        templates.insert(name.to_string(), document.clone());
        Ok(())
    }
}
