/*
 * Desktop file picker bridge. Receives method calls from an application
 * shell, resolves a platform file-type filter, shows the native open dialog
 * and replies with the chosen path(s).
 *
 * Layers:
 * - `core`: selection model, filter resolution, configuration.
 * - `platform_layer`: native dialog back-ends (zenity, osascript, Win32) and
 *   the invoker that drives them.
 * - `app_logic`: the method channel handler.
 */
pub mod app_logic;
pub mod core;
pub mod platform_layer;

pub use app_logic::{FilePickerPlugin, MethodCall, PluginError, PluginErrorKind, Reply};
pub use platform_layer::native_dialog_for_current_platform;

use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, SimpleLogger, TermLogger, TerminalMode};
use std::sync::Once;

static LOGGING_INIT: Once = Once::new();

/*
 * Installs the global logger. Safe to call any number of times; only the first
 * call has an effect. Falls back to a plain stderr logger when no terminal is
 * available (e.g. under a test harness capturing output).
 */
pub fn initialize_logging() {
    LOGGING_INIT.call_once(|| {
        let config = ConfigBuilder::new()
            .set_thread_level(LevelFilter::Off)
            .build();
        if TermLogger::init(
            LevelFilter::Debug,
            config.clone(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        )
        .is_err()
        {
            let _ = SimpleLogger::init(LevelFilter::Debug, config);
        }
    });
}
