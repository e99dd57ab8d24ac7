//! State import and export
//!
//! Persisted documents are JSON objects: top-level scalars are host theme
//! values, and the reserved `fx` field maps module ids to state objects.
//! Imports validate everything up front so a malformed document never
//! partially applies.

use serde_json::{Map, Value};
use thiserror::Error;

use super::registry::FxRegistry;
use super::types::ModuleState;

/// Reserved top-level field holding module state
pub const FX_FIELD: &str = "fx";

/// Reasons an import is rejected
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("document root must be a JSON object")]
    NotAnObject,
    #[error("'fx' must be an object mapping module ids to state")]
    FxNotAnObject,
    #[error("state for module '{0}' must be an object")]
    EntryNotAnObject(String),
    #[error("theme field '{0}' must be a scalar")]
    ThemeNotScalar(String),
}

/// What an import did, per module id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Ids whose existing state was merged into
    pub merged: Vec<String>,
    /// Ids stored verbatim because no state existed yet
    pub stored: Vec<String>,
}

/// A validated persisted document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesignDocument {
    /// Host theme fields (everything except `fx`)
    pub theme: Map<String, Value>,
    /// Module state mapping, if the document had one
    pub fx: Option<Map<String, Value>>,
}

impl DesignDocument {
    /// Parse and validate a document without applying it
    pub fn parse(json: &str) -> Result<Self, ImportError> {
        let root: Value = serde_json::from_str(json)?;
        Self::from_value(root)
    }

    pub fn from_value(root: Value) -> Result<Self, ImportError> {
        let Value::Object(mut fields) = root else {
            return Err(ImportError::NotAnObject);
        };

        let fx = match fields.remove(FX_FIELD) {
            None | Some(Value::Null) => None,
            Some(Value::Object(fx)) => {
                validate_fx(&fx)?;
                Some(fx)
            }
            Some(_) => return Err(ImportError::FxNotAnObject),
        };

        if let Some((key, _)) = fields.iter().find(|(_, v)| v.is_array() || v.is_object()) {
            return Err(ImportError::ThemeNotScalar(key.clone()));
        }

        Ok(Self { theme: fields, fx })
    }

    /// Serialize back into the persisted shape
    pub fn to_value(&self) -> Value {
        let mut root = self.theme.clone();
        if let Some(fx) = &self.fx {
            root.insert(FX_FIELD.to_string(), Value::Object(fx.clone()));
        }
        Value::Object(root)
    }
}

/// Check that every entry of an `fx` mapping is an object
pub fn validate_fx(saved: &Map<String, Value>) -> Result<(), ImportError> {
    match saved.iter().find(|(_, v)| !v.is_object()) {
        Some((id, _)) => Err(ImportError::EntryNotAnObject(id.clone())),
        None => Ok(()),
    }
}

/// Merge persisted module state into the registry
///
/// Existing state gets a shallow field-level merge; ids without state are
/// stored verbatim and picked up when (if) their module registers.
pub fn import_state(registry: &mut FxRegistry, saved: &Map<String, Value>) -> Result<ImportSummary, ImportError> {
    validate_fx(saved)?;

    let mut summary = ImportSummary::default();
    for (id, value) in saved {
        let Value::Object(patch) = value else {
            continue;
        };
        match registry.state_mut(id) {
            Some(state) => {
                state.merge(patch);
                summary.merged.push(id.clone());
            }
            None => {
                registry.insert_state(id.clone(), ModuleState::from_fields(patch.clone()));
                summary.stored.push(id.clone());
            }
        }
    }

    tracing::info!(
        merged = summary.merged.len(),
        stored = summary.stored.len(),
        "Imported FX state"
    );
    Ok(summary)
}
