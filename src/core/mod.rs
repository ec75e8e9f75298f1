/*
 * Platform-agnostic logic of the plugin: the selection data model, the filter
 * resolver that turns a selection kind into each platform's native filter
 * syntax, read-only configuration, and path utilities.
 */
pub mod config;
pub mod filter_resolver;
pub mod path_utils;
pub mod selection;

pub use selection::{Platform, SelectionKind, SelectionRequest, SelectionResult};

pub use filter_resolver::{FilterExpression, ResolveError, parse_kind, resolve};

pub use config::{ConfigError, ConfigManagerOperations, CoreConfigManager, PluginConfig};
