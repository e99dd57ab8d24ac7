//! FX plugin system for the goal-bar designer
//!
//! Independently authored visual effects register themselves with a
//! registry, expose a uniform parameter contract, and contribute CSS
//! fragments that are composed into one stylesheet.
//!
//! # Architecture
//!
//! - **Types** (`types.rs`): ParameterSpec, ModuleState, GlobalContext
//! - **Traits** (`traits.rs`): the FxModule contract and ParamValues view
//! - **Registry** (`registry.rs`): definitions, state store, registration order
//! - **Composer** (`composer.rs`): ordered concatenation with per-module isolation
//! - **Importer** (`importer.rs`): merge of persisted state, document validation
//! - **Loader** (`loader.rs`): catalog-driven concurrent resolution
//! - **Template** (`template.rs`): effects described by JSON descriptors
//! - **Builtin** (`builtin/`): stock effects
//!
//! # Usage
//!
//! ```
//! use overlay_fx::fx::{builtin, compose, FxRegistry, GlobalContext};
//!
//! let mut registry = FxRegistry::new();
//! builtin::register_builtin_effects(&mut registry).unwrap();
//!
//! registry.set_enabled("fx_heartbeat", true);
//! registry.set_parameter("fx_heartbeat", "speed", serde_json::json!(0.8));
//!
//! let css = compose(&registry, &GlobalContext::new());
//! assert!(css.contains("/* FX: Heartbeat */"));
//! ```

mod composer;
mod importer;
mod loader;
mod registry;
mod template;
mod traits;
mod types;
pub mod builtin;

pub use composer::*;
pub use importer::*;
pub use loader::*;
pub use registry::*;
pub use template::*;
pub use traits::*;
pub use types::*;

#[cfg(test)]
pub(crate) use registry::tests::MockModule;
