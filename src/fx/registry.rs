//! FX registry
//!
//! Owns module implementations and their live state. Registration order is
//! append-only and is the sole ordering used for composition.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

use super::traits::FxModule;
use super::types::{ModuleState, ParameterSpec};

/// Errors raised by registry operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("module id must not be empty")]
    EmptyId,
}

/// A registered implementation plus the parameter specs it declared
struct RegisteredModule {
    module: Arc<dyn FxModule>,
    parameters: Vec<ParameterSpec>,
}

/// Borrowed view of one registered module, yielded in registration order
#[derive(Clone, Copy)]
pub struct ModuleEntry<'a> {
    pub id: &'a str,
    pub module: &'a Arc<dyn FxModule>,
    pub parameters: &'a [ParameterSpec],
    pub state: Option<&'a ModuleState>,
}

/// Registry of effect modules and their state store
#[derive(Default)]
pub struct FxRegistry {
    /// Implementations by id
    modules: HashMap<String, RegisteredModule>,
    /// Live state by id (may exist before the module registers)
    states: HashMap<String, ModuleState>,
    /// Ids in first-registration order
    order: Vec<String>,
}

impl FxRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module implementation
    pub fn register(&mut self, module: impl FxModule + 'static) -> Result<(), RegistryError> {
        self.register_arc(Arc::new(module))
    }

    /// Register a shared module implementation
    ///
    /// Re-registering an id replaces the implementation but keeps its slot in
    /// the order and never touches existing state.
    pub fn register_arc(&mut self, module: Arc<dyn FxModule>) -> Result<(), RegistryError> {
        let id = module.id().to_string();
        if id.is_empty() {
            return Err(RegistryError::EmptyId);
        }

        let parameters = module.parameters();
        if !self.states.contains_key(&id) {
            self.states
                .insert(id.clone(), ModuleState::seeded(module.default_enabled(), &parameters));
        }

        let replaced = self
            .modules
            .insert(id.clone(), RegisteredModule { module: Arc::clone(&module), parameters })
            .is_some();
        if replaced {
            tracing::info!(module = %id, name = module.name(), "Replaced FX module implementation");
        } else {
            tracing::info!(module = %id, name = module.name(), "Registered FX module");
            self.order.push(id);
        }
        Ok(())
    }

    /// Get a module implementation by id
    pub fn get(&self, id: &str) -> Option<Arc<dyn FxModule>> {
        self.modules.get(id).map(|m| Arc::clone(&m.module))
    }

    /// Check if a module implementation is registered
    pub fn contains(&self, id: &str) -> bool {
        self.modules.contains_key(id)
    }

    /// Number of registered implementations
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Module ids in registration order
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Registered modules with their specs and state, in registration order
    pub fn entries(&self) -> impl Iterator<Item = ModuleEntry<'_>> {
        self.order.iter().filter_map(move |id| {
            self.modules.get(id).map(|m| ModuleEntry {
                id: id.as_str(),
                module: &m.module,
                parameters: &m.parameters,
                state: self.states.get(id),
            })
        })
    }

    /// Parameter specs declared by a registered module
    pub fn parameters(&self, id: &str) -> Option<&[ParameterSpec]> {
        self.modules.get(id).map(|m| m.parameters.as_slice())
    }

    /// Current state for an id, registered or not
    pub fn state(&self, id: &str) -> Option<&ModuleState> {
        self.states.get(id)
    }

    pub fn has_state(&self, id: &str) -> bool {
        self.states.contains_key(id)
    }

    pub(crate) fn state_mut(&mut self, id: &str) -> Option<&mut ModuleState> {
        self.states.get_mut(id)
    }

    pub(crate) fn insert_state(&mut self, id: impl Into<String>, state: ModuleState) {
        self.states.insert(id.into(), state);
    }

    /// Turn a module on or off
    ///
    /// Unknown ids are ignored so UI events racing a load don't fail.
    /// Returns whether state was changed.
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> bool {
        match self.states.get_mut(id) {
            Some(state) => {
                state.set_enabled(enabled);
                true
            }
            None => {
                tracing::debug!(module = id, "Ignoring toggle for unknown FX module");
                false
            }
        }
    }

    /// Set one parameter value; unknown ids are ignored
    pub fn set_parameter(&mut self, id: &str, param: &str, value: Value) -> bool {
        match self.states.get_mut(id) {
            Some(state) => {
                state.set(param, value);
                true
            }
            None => {
                tracing::debug!(module = id, param, "Ignoring parameter update for unknown FX module");
                false
            }
        }
    }

    /// Reseed a registered module's state from its defaults
    pub fn reset(&mut self, id: &str) -> bool {
        let Some(registered) = self.modules.get(id) else {
            return false;
        };
        let seeded = ModuleState::seeded(registered.module.default_enabled(), &registered.parameters);
        self.states.insert(id.to_string(), seeded);
        true
    }

    /// Drop every state entry; definitions stay registered
    pub fn clear_state(&mut self) {
        self.states.clear();
    }

    /// Full id -> state mapping, including states of unregistered ids
    pub fn export_state(&self) -> Map<String, Value> {
        self.states
            .iter()
            .map(|(id, state)| (id.clone(), Value::Object(state.fields().clone())))
            .collect()
    }

    /// Registered modules whose id or name contains the query
    pub fn search(&self, query: &str) -> Vec<Arc<dyn FxModule>> {
        let query_lower = query.to_lowercase();
        self.entries()
            .filter(|e| {
                e.id.to_lowercase().contains(&query_lower) || e.module.name().to_lowercase().contains(&query_lower)
            })
            .map(|e| Arc::clone(e.module))
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::fx::traits::{ParamValues, StyleError};
    use crate::fx::types::GlobalContext;
    use serde_json::json;

    /// Minimal module used across the fx test suites
    pub(crate) struct MockModule {
        pub id: &'static str,
        pub name: &'static str,
        pub enabled: bool,
        pub speed: f64,
    }

    impl MockModule {
        pub(crate) fn new(id: &'static str) -> Self {
            Self { id, name: "Mock", enabled: false, speed: 5.0 }
        }
    }

    impl FxModule for MockModule {
        fn id(&self) -> &str {
            self.id
        }

        fn name(&self) -> &str {
            self.name
        }

        fn default_enabled(&self) -> bool {
            self.enabled
        }

        fn parameters(&self) -> Vec<ParameterSpec> {
            vec![ParameterSpec::range("speed", "Speed", self.speed, 0.0, 10.0)]
        }

        fn generate_style(&self, params: &ParamValues<'_>, _globals: &GlobalContext) -> Result<String, StyleError> {
            Ok(format!(".{} {{ animation-duration: {}s; }}\n", params.module_id(), params.number("speed")?))
        }
    }

    #[test]
    fn test_registry_new() {
        let registry = FxRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.order().is_empty());
    }

    #[test]
    fn test_register_seeds_defaults() {
        let mut registry = FxRegistry::new();
        registry.register(MockModule::new("m1")).unwrap();

        assert!(registry.contains("m1"));
        let state = registry.state("m1").unwrap();
        assert!(!state.enabled());
        assert_eq!(state.get("speed"), Some(&json!(5)));
    }

    #[test]
    fn test_register_rejects_empty_id() {
        let mut registry = FxRegistry::new();
        assert_eq!(registry.register(MockModule::new("")), Err(RegistryError::EmptyId));
        assert!(registry.is_empty());
        assert!(!registry.has_state(""));
    }

    #[test]
    fn test_reregister_keeps_state_and_order() {
        let mut registry = FxRegistry::new();
        registry.register(MockModule::new("a")).unwrap();
        registry.register(MockModule::new("b")).unwrap();
        registry.set_parameter("a", "speed", json!(9));

        let mut replacement = MockModule::new("a");
        replacement.speed = 1.0;
        replacement.name = "Mock v2";
        registry.register(replacement).unwrap();

        assert_eq!(registry.order(), ["a".to_string(), "b".to_string()]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("a").unwrap().name(), "Mock v2");
        assert_eq!(registry.state("a").unwrap().get("speed"), Some(&json!(9)));
    }

    #[test]
    fn test_register_does_not_override_imported_state() {
        let mut registry = FxRegistry::new();
        let imported = ModuleState::from_fields(json!({"enabled": true, "speed": 2}).as_object().cloned().unwrap());
        registry.insert_state("m2", imported.clone());

        registry.register(MockModule::new("m2")).unwrap();
        assert_eq!(registry.state("m2"), Some(&imported));
    }

    #[test]
    fn test_mutations_on_unknown_ids_are_noops() {
        let mut registry = FxRegistry::new();
        assert!(!registry.set_enabled("ghost", true));
        assert!(!registry.set_parameter("ghost", "speed", json!(1)));
        assert!(!registry.has_state("ghost"));
    }

    #[test]
    fn test_set_enabled_and_parameter() {
        let mut registry = FxRegistry::new();
        registry.register(MockModule::new("m1")).unwrap();
        assert!(registry.set_enabled("m1", true));
        assert!(registry.set_parameter("m1", "speed", json!("7.5")));

        let state = registry.state("m1").unwrap();
        assert!(state.enabled());
        assert_eq!(state.get("speed"), Some(&json!("7.5")));
    }

    #[test]
    fn test_reset_and_clear() {
        let mut registry = FxRegistry::new();
        registry.register(MockModule::new("m1")).unwrap();
        registry.set_enabled("m1", true);
        assert!(registry.reset("m1"));
        assert!(!registry.state("m1").unwrap().enabled());
        assert!(!registry.reset("ghost"));

        registry.clear_state();
        assert!(!registry.has_state("m1"));
        assert!(registry.contains("m1"));
    }

    #[test]
    fn test_export_includes_unregistered_state() {
        let mut registry = FxRegistry::new();
        registry.register(MockModule::new("m1")).unwrap();
        registry.insert_state("later", ModuleState::default());

        let exported = registry.export_state();
        assert_eq!(exported.len(), 2);
        assert_eq!(exported["m1"], json!({"enabled": false, "speed": 5}));
    }

    #[test]
    fn test_registry_search() {
        let mut registry = FxRegistry::new();
        registry.register(MockModule::new("fx_glow")).unwrap();
        registry.register(MockModule::new("fx_glitch")).unwrap();
        assert_eq!(registry.search("GL").len(), 2);
        assert_eq!(registry.search("glow").len(), 1);
    }
}
