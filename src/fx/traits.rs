//! Module contract
//!
//! Every visual effect implements [`FxModule`]. The registry stores
//! implementations behind `Arc<dyn FxModule>` and never mutates them.

use thiserror::Error;

use super::types::{value_as_bool, value_as_f64, GlobalContext, ModuleState, ParamKind, ParameterSpec};

/// Errors a style generator can report
///
/// The composer treats any of these as "this module contributes nothing".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleError {
    #[error("parameter '{0}' is not declared by this module")]
    UnknownParameter(String),
    #[error("parameter '{param}' is not a {expected}")]
    WrongKind { param: String, expected: &'static str },
    #[error("unknown template placeholder '{0}'")]
    UnknownPlaceholder(String),
    #[error("{0}")]
    Other(String),
}

/// A self-contained visual effect contributing an optional style fragment
///
/// Implementations must be side-effect free in `generate_style` and should
/// return an empty string to contribute nothing.
pub trait FxModule: Send + Sync {
    /// Globally unique identifier (e.g. "fx_heartbeat")
    fn id(&self) -> &str;

    /// Human-readable display name
    fn name(&self) -> &str;

    /// Whether fresh state starts enabled
    fn default_enabled(&self) -> bool {
        false
    }

    /// Editable parameters, in display order
    fn parameters(&self) -> Vec<ParameterSpec>;

    /// Produce this module's style fragment for the given values
    fn generate_style(&self, params: &ParamValues<'_>, globals: &GlobalContext) -> Result<String, StyleError>;
}

/// Read-only view of a module's state resolved against its parameter specs
///
/// Missing or malformed values fall back to the declared default, so generators
/// never see garbage from a hand-edited document.
#[derive(Debug, Clone, Copy)]
pub struct ParamValues<'a> {
    module_id: &'a str,
    state: &'a ModuleState,
    specs: &'a [ParameterSpec],
}

impl<'a> ParamValues<'a> {
    pub fn new(module_id: &'a str, state: &'a ModuleState, specs: &'a [ParameterSpec]) -> Self {
        Self { module_id, state, specs }
    }

    /// Id of the module being rendered, for collision-free animation names
    pub fn module_id(&self) -> &'a str {
        self.module_id
    }

    pub fn state(&self) -> &'a ModuleState {
        self.state
    }

    fn spec(&self, param: &str) -> Result<&'a ParameterSpec, StyleError> {
        self.specs
            .iter()
            .find(|s| s.id == param)
            .ok_or_else(|| StyleError::UnknownParameter(param.to_string()))
    }

    /// Numeric value of a range parameter
    pub fn number(&self, param: &str) -> Result<f64, StyleError> {
        let spec = self.spec(param)?;
        if let Some(v) = self.state.get(param).and_then(value_as_f64) {
            return Ok(v);
        }
        value_as_f64(&spec.default).ok_or_else(|| StyleError::WrongKind {
            param: param.to_string(),
            expected: "number",
        })
    }

    /// Hex color value of a color parameter, always `#rrggbb`
    ///
    /// Shorthand `#rgb` is expanded and an alpha byte is dropped, so
    /// generators can append their own alpha suffix.
    pub fn color(&self, param: &str) -> Result<String, StyleError> {
        let spec = self.spec(param)?;
        let valid = |v: &serde_json::Value| v.as_str().and_then(normalize_hex_color);
        if let Some(v) = self.state.get(param).and_then(valid) {
            return Ok(v);
        }
        valid(&spec.default).ok_or_else(|| StyleError::WrongKind {
            param: param.to_string(),
            expected: "color",
        })
    }

    /// Boolean value of a checkbox parameter
    pub fn flag(&self, param: &str) -> Result<bool, StyleError> {
        let spec = self.spec(param)?;
        if let Some(v) = self.state.get(param).and_then(value_as_bool) {
            return Ok(v);
        }
        value_as_bool(&spec.default).ok_or_else(|| StyleError::WrongKind {
            param: param.to_string(),
            expected: "boolean",
        })
    }

    /// Value of any declared parameter rendered as CSS text
    pub fn text(&self, param: &str) -> Result<String, StyleError> {
        let spec = self.spec(param)?;
        match spec.kind {
            ParamKind::Range { .. } => self.number(param).map(|v| v.to_string()),
            ParamKind::Color => self.color(param),
            ParamKind::Boolean => self.flag(param).map(|v| v.to_string()),
        }
    }
}

/// `#rgb`, `#rrggbb` or `#rrggbbaa` as lowercase `#rrggbb`
fn normalize_hex_color(s: &str) -> Option<String> {
    let digits = s.strip_prefix('#')?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let rgb: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        8 => digits[..6].to_string(),
        _ => return None,
    };
    Some(format!("#{}", rgb.to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn specs() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::range_with_step("speed", "Speed", 2.5, 0.5, 10.0, 0.1),
            ParameterSpec::color("glow", "Glow", "#00eaff"),
            ParameterSpec::boolean("stripes", "Stripes", true),
        ]
    }

    #[test]
    fn test_values_read_state() {
        let specs = specs();
        let state = ModuleState::from_fields(
            json!({"enabled": true, "speed": "4", "glow": "#ff0000", "stripes": false})
                .as_object()
                .cloned()
                .unwrap(),
        );
        let values = ParamValues::new("fx_test", &state, &specs);
        assert_eq!(values.number("speed"), Ok(4.0));
        assert_eq!(values.color("glow"), Ok("#ff0000".to_string()));
        assert_eq!(values.flag("stripes"), Ok(false));
        assert_eq!(values.module_id(), "fx_test");
    }

    #[test]
    fn test_values_fall_back_to_defaults() {
        let specs = specs();
        let state = ModuleState::from_fields(
            json!({"enabled": true, "speed": "fast", "glow": "red"}).as_object().cloned().unwrap(),
        );
        let values = ParamValues::new("fx_test", &state, &specs);
        assert_eq!(values.number("speed"), Ok(2.5));
        assert_eq!(values.color("glow"), Ok("#00eaff".to_string()));
        assert_eq!(values.flag("stripes"), Ok(true));
        assert_eq!(values.text("speed"), Ok("2.5".to_string()));
    }

    #[test]
    fn test_color_normalized_to_six_digits() {
        let specs = specs();
        let color_of = |raw: &str| {
            let state = ModuleState::from_fields(json!({"glow": raw}).as_object().cloned().unwrap());
            ParamValues::new("fx_test", &state, &specs).color("glow")
        };
        assert_eq!(color_of("#fff"), Ok("#ffffff".to_string()));
        assert_eq!(color_of("#A1b2C3"), Ok("#a1b2c3".to_string()));
        assert_eq!(color_of("#11223380"), Ok("#112233".to_string()));
        assert_eq!(color_of("#12345"), Ok("#00eaff".to_string()));
        assert_eq!(color_of("fff"), Ok("#00eaff".to_string()));
    }

    #[test]
    fn test_undeclared_parameter_is_error() {
        let specs = specs();
        let state = ModuleState::default();
        let values = ParamValues::new("fx_test", &state, &specs);
        assert_eq!(values.number("gap"), Err(StyleError::UnknownParameter("gap".to_string())));
    }
}
