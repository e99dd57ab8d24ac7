//! Style composition
//!
//! Walks registered modules in registration order and concatenates the
//! fragments of every enabled one. A failing generator is isolated: it is
//! logged and contributes nothing for that pass.

use std::panic::{catch_unwind, AssertUnwindSafe};

use super::registry::{FxRegistry, ModuleEntry};
use super::traits::ParamValues;
use super::types::GlobalContext;

/// Compose the style fragments of all enabled modules
///
/// Pure with respect to the registry: calling it twice without a mutation
/// in between yields identical text.
pub fn compose(registry: &FxRegistry, globals: &GlobalContext) -> String {
    let mut css = String::new();
    for entry in registry.entries() {
        let Some(state) = entry.state else {
            continue;
        };
        if !state.enabled() {
            continue;
        }

        css.push_str(&separator(entry.module.name()));
        if let Some(fragment) = generate_isolated(&entry, globals) {
            css.push_str(&fragment);
        }
    }
    css
}

/// Human-readable marker preceding each module's fragment
pub fn separator(name: &str) -> String {
    format!("\n/* FX: {} */\n", name)
}

fn generate_isolated(entry: &ModuleEntry<'_>, globals: &GlobalContext) -> Option<String> {
    let state = entry.state?;
    let values = ParamValues::new(entry.id, state, entry.parameters);
    let result = catch_unwind(AssertUnwindSafe(|| entry.module.generate_style(&values, globals)));

    match result {
        Ok(Ok(fragment)) => Some(fragment),
        Ok(Err(e)) => {
            tracing::warn!(module = entry.id, error = %e, "FX module failed to generate style");
            None
        }
        Err(_) => {
            tracing::error!(module = entry.id, "FX module panicked while generating style");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fx::registry::tests::MockModule;
    use crate::fx::traits::{FxModule, StyleError};
    use crate::fx::types::ParameterSpec;
    use serde_json::json;

    struct FailingModule;

    impl FxModule for FailingModule {
        fn id(&self) -> &str {
            "broken"
        }

        fn name(&self) -> &str {
            "Broken"
        }

        fn default_enabled(&self) -> bool {
            true
        }

        fn parameters(&self) -> Vec<ParameterSpec> {
            Vec::new()
        }

        fn generate_style(&self, _params: &ParamValues<'_>, _globals: &GlobalContext) -> Result<String, StyleError> {
            Err(StyleError::Other("boom".to_string()))
        }
    }

    struct PanickingModule;

    impl FxModule for PanickingModule {
        fn id(&self) -> &str {
            "panicky"
        }

        fn name(&self) -> &str {
            "Panicky"
        }

        fn default_enabled(&self) -> bool {
            true
        }

        fn parameters(&self) -> Vec<ParameterSpec> {
            Vec::new()
        }

        fn generate_style(&self, _params: &ParamValues<'_>, _globals: &GlobalContext) -> Result<String, StyleError> {
            panic!("generator bug")
        }
    }

    fn enabled(id: &'static str) -> MockModule {
        let mut m = MockModule::new(id);
        m.enabled = true;
        m
    }

    #[test]
    fn test_compose_empty_registry() {
        assert_eq!(compose(&FxRegistry::new(), &GlobalContext::new()), "");
    }

    #[test]
    fn test_compose_in_registration_order() {
        let mut registry = FxRegistry::new();
        registry.register(enabled("b")).unwrap();
        registry.register(enabled("a")).unwrap();

        let css = compose(&registry, &GlobalContext::new());
        assert_eq!(
            css,
            "\n/* FX: Mock */\n.b { animation-duration: 5s; }\n\n/* FX: Mock */\n.a { animation-duration: 5s; }\n"
        );
    }

    #[test]
    fn test_compose_is_idempotent() {
        let mut registry = FxRegistry::new();
        registry.register(enabled("a")).unwrap();
        let globals = GlobalContext::new();
        assert_eq!(compose(&registry, &globals), compose(&registry, &globals));
    }

    #[test]
    fn test_disabled_modules_are_silent() {
        let mut registry = FxRegistry::new();
        registry.register(MockModule::new("off")).unwrap();
        registry.set_parameter("off", "speed", json!(9));
        assert_eq!(compose(&registry, &GlobalContext::new()), "");
    }

    #[test]
    fn test_failing_module_is_isolated() {
        let mut registry = FxRegistry::new();
        registry.register(enabled("b")).unwrap();
        registry.register(FailingModule).unwrap();
        registry.register(PanickingModule).unwrap();
        registry.register(enabled("c")).unwrap();

        let css = compose(&registry, &GlobalContext::new());
        assert!(css.contains(".b { animation-duration: 5s; }"));
        assert!(css.contains(".c { animation-duration: 5s; }"));
        assert!(css.contains("/* FX: Broken */"));
        assert!(!css.contains("boom"));
    }

    #[test]
    fn test_state_without_definition_is_skipped() {
        let mut registry = FxRegistry::new();
        registry.insert_state(
            "pending",
            crate::fx::ModuleState::from_fields(json!({"enabled": true}).as_object().cloned().unwrap()),
        );
        assert_eq!(compose(&registry, &GlobalContext::new()), "");
    }
}
