//! Core registry data types
//!
//! Parameter specs are immutable metadata declared by a module. Module state
//! and the global context are JSON-object newtypes so persisted documents can
//! carry fields the running build doesn't know about yet.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn default_step() -> f64 {
    1.0
}

/// Editing widget kind for a parameter
///
/// Serialized with a `type` tag using the widget names the control panel
/// renders (`range`, `color`, `checkbox`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ParamKind {
    /// Numeric slider with bounds
    Range {
        min: f64,
        max: f64,
        #[serde(default = "default_step")]
        step: f64,
    },
    /// Hex color (`#rrggbb`)
    Color,
    /// On/off toggle
    #[serde(rename = "checkbox", alias = "boolean")]
    Boolean,
}

impl ParamKind {
    /// Widget name used by the control panel
    pub fn widget(&self) -> &'static str {
        match self {
            ParamKind::Range { .. } => "range",
            ParamKind::Color => "color",
            ParamKind::Boolean => "checkbox",
        }
    }
}

/// Declaration of one editable module parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Key inside the module's state (unique within the module)
    pub id: String,
    /// Display label in the control panel
    pub label: String,
    /// Widget kind and numeric bounds
    #[serde(flatten)]
    pub kind: ParamKind,
    /// Default value seeded into fresh state
    #[serde(rename = "value")]
    pub default: Value,
}

impl ParameterSpec {
    /// Create a range parameter with a step of 1
    pub fn range(id: impl Into<String>, label: impl Into<String>, default: f64, min: f64, max: f64) -> Self {
        Self::range_with_step(id, label, default, min, max, default_step())
    }

    /// Create a range parameter with an explicit step
    pub fn range_with_step(
        id: impl Into<String>,
        label: impl Into<String>,
        default: f64,
        min: f64,
        max: f64,
        step: f64,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: ParamKind::Range { min, max, step },
            default: number_value(default),
        }
    }

    /// Create a color parameter
    pub fn color(id: impl Into<String>, label: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: ParamKind::Color,
            default: Value::String(default.into()),
        }
    }

    /// Create a boolean parameter
    pub fn boolean(id: impl Into<String>, label: impl Into<String>, default: bool) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: ParamKind::Boolean,
            default: Value::Bool(default),
        }
    }
}

/// Live values of one module: `enabled` plus one scalar per parameter
///
/// State created by an import before its module registered is stored
/// verbatim and may carry extra or missing fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleState(Map<String, Value>);

impl ModuleState {
    /// Field holding the on/off switch
    pub const ENABLED: &'static str = "enabled";

    /// Seed fresh state from parameter defaults
    pub fn seeded(enabled: bool, params: &[ParameterSpec]) -> Self {
        let mut fields = Map::new();
        fields.insert(Self::ENABLED.to_string(), Value::Bool(enabled));
        for param in params {
            fields.insert(param.id.clone(), param.default.clone());
        }
        Self(fields)
    }

    /// Wrap fields exactly as persisted
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Whether the module contributes to composition (absent means off)
    pub fn enabled(&self) -> bool {
        self.0.get(Self::ENABLED).and_then(value_as_bool).unwrap_or(false)
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.0.insert(Self::ENABLED.to_string(), Value::Bool(enabled));
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    /// Shallow field-level merge: present fields replace, absent ones stay
    pub fn merge(&mut self, patch: &Map<String, Value>) {
        for (field, value) in patch {
            self.0.insert(field.clone(), value.clone());
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

/// Host-level theme values passed read-only to every generator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobalContext(Map<String, Value>);

impl GlobalContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Builder-style insert, mostly for tests and defaults
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value, if present and a string
    pub fn str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Numeric value (numeric strings accepted)
    pub fn number(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(value_as_f64)
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(value_as_bool)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub(crate) fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.0
    }
}

/// Interpret a JSON scalar as a number
///
/// HTML inputs post strings, so `"2.5"` is accepted.
pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Interpret a JSON scalar as a boolean
pub fn value_as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// JSON number for an `f64`, preferring an integer representation
///
/// Keeps `5.0` serialized as `5` so exported documents stay stable.
pub fn number_value(v: f64) -> Value {
    if v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        Value::from(v as i64)
    } else {
        serde_json::Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
    }
}
