/*
 * This module provides the boundary layer of the plugin, centered around
 * `FilePickerPlugin`, which decodes method calls from the application shell,
 * drives the filter resolver and dialog invoker, and encodes replies.
 * Unit tests for `FilePickerPlugin` are in `handler_tests.rs`.
 */
pub mod channel_constants;
pub mod handler;


pub use handler::{FilePickerPlugin, MethodCall, PluginError, PluginErrorKind, Reply};
