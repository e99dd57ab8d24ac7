//! Data-driven modules
//!
//! A [`TemplateDescriptor`] is a JSON file declaring an effect's parameters
//! and a CSS body with `{{placeholder}}` slots. This lets new effects be
//! dropped into the fx directory without rebuilding the server.
//!
//! Placeholders:
//! - `{{param}}` - value of a declared parameter
//! - `{{id}}` - the module id (for unique animation names)
//! - `{{global.key}}` - a host theme value

use serde::{Deserialize, Serialize};

use super::traits::{FxModule, ParamValues, StyleError};
use super::types::{GlobalContext, ParameterSpec};

/// On-disk description of a template module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDescriptor {
    pub id: String,
    pub name: String,
    #[serde(default, alias = "enable")]
    pub enabled: bool,
    #[serde(default)]
    pub params: Vec<ParameterSpec>,
    pub css: String,
}

/// Module backed by a descriptor
#[derive(Debug, Clone)]
pub struct TemplateModule {
    descriptor: TemplateDescriptor,
}

impl TemplateModule {
    pub fn new(descriptor: TemplateDescriptor) -> Self {
        Self { descriptor }
    }

    /// Parse a descriptor from JSON text
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json).map(Self::new)
    }

    pub fn descriptor(&self) -> &TemplateDescriptor {
        &self.descriptor
    }

    fn placeholder(&self, key: &str, params: &ParamValues<'_>, globals: &GlobalContext) -> Result<String, StyleError> {
        if key == "id" {
            return Ok(params.module_id().to_string());
        }
        if let Some(global) = key.strip_prefix("global.") {
            return match globals.get(global) {
                Some(serde_json::Value::String(s)) => Ok(s.clone()),
                Some(v) if !v.is_null() => Ok(v.to_string()),
                _ => Err(StyleError::UnknownPlaceholder(key.to_string())),
            };
        }
        params.text(key).map_err(|e| match e {
            StyleError::UnknownParameter(_) => StyleError::UnknownPlaceholder(key.to_string()),
            other => other,
        })
    }
}

impl FxModule for TemplateModule {
    fn id(&self) -> &str {
        &self.descriptor.id
    }

    fn name(&self) -> &str {
        &self.descriptor.name
    }

    fn default_enabled(&self) -> bool {
        self.descriptor.enabled
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        self.descriptor.params.clone()
    }

    fn generate_style(&self, params: &ParamValues<'_>, globals: &GlobalContext) -> Result<String, StyleError> {
        let mut out = String::with_capacity(self.descriptor.css.len());
        let mut rest = self.descriptor.css.as_str();

        while let Some(start) = rest.find("{{") {
            let Some(len) = rest[start + 2..].find("}}") else {
                break;
            };
            out.push_str(&rest[..start]);
            let key = rest[start + 2..start + 2 + len].trim();
            out.push_str(&self.placeholder(key, params, globals)?);
            rest = &rest[start + 2 + len + 2..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fx::types::ModuleState;

    const PULSE: &str = r##"{
        "id": "fx_pulse",
        "name": "Pulse",
        "enable": true,
        "params": [
            { "id": "speed", "label": "Speed", "type": "range", "min": 0.5, "max": 5, "step": 0.1, "value": 1.5 },
            { "id": "tint", "label": "Tint", "type": "color", "value": "#ff00aa" }
        ],
        "css": ".bar { animation: pulse_{{id}} {{speed}}s; color: {{ tint }}; border-color: {{global.trackColor}}; }"
    }"##;

    fn render(module: &TemplateModule, state: &ModuleState, globals: &GlobalContext) -> Result<String, StyleError> {
        let specs = module.parameters();
        module.generate_style(&ParamValues::new(module.id(), state, &specs), globals)
    }

    #[test]
    fn test_descriptor_parse() {
        let module = TemplateModule::from_json(PULSE).unwrap();
        assert_eq!(module.id(), "fx_pulse");
        assert!(module.default_enabled());
        assert_eq!(module.parameters().len(), 2);
    }

    #[test]
    fn test_placeholders_substituted() {
        let module = TemplateModule::from_json(PULSE).unwrap();
        let state = ModuleState::seeded(true, &module.parameters());
        let globals = GlobalContext::new().with("trackColor", "#333333");

        let css = render(&module, &state, &globals).unwrap();
        assert_eq!(
            css,
            ".bar { animation: pulse_fx_pulse 1.5s; color: #ff00aa; border-color: #333333; }"
        );
    }

    #[test]
    fn test_unknown_placeholder_is_error() {
        let mut descriptor = TemplateModule::from_json(PULSE).unwrap().descriptor().clone();
        descriptor.css = "a { width: {{width}}px; }".to_string();
        let module = TemplateModule::new(descriptor);
        let state = ModuleState::default();

        assert_eq!(
            render(&module, &state, &GlobalContext::new()),
            Err(StyleError::UnknownPlaceholder("width".to_string()))
        );
    }

    #[test]
    fn test_unterminated_placeholder_is_literal() {
        let module = TemplateModule::new(TemplateDescriptor {
            id: "t".to_string(),
            name: "T".to_string(),
            enabled: false,
            params: Vec::new(),
            css: "a { content: \"{{\"; }".to_string(),
        });
        let css = render(&module, &ModuleState::default(), &GlobalContext::new()).unwrap();
        assert_eq!(css, "a { content: \"{{\"; }");
    }
}
