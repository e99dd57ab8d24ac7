//! Overlay FX Library
//!
//! A goal-bar overlay designer for live streams. Visual effects are
//! independently authored modules that plug into a registry, expose typed
//! parameters, and contribute CSS fragments to one composed stylesheet.

pub mod api;
pub mod css;
pub mod designer;
pub mod fx;
pub mod panel;
pub mod settings;
pub mod telemetry;
pub mod templates;
pub mod theme;

pub use designer::Designer;
pub use fx::{compose, FxModule, FxRegistry, GlobalContext, ModuleState, ParameterSpec};
pub use settings::ServerSettings;
pub use templates::{DirectoryTemplateStore, TemplateStore};
