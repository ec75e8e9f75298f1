/*
 * Native dialog back-ends and the invoker that drives them. The zenity and
 * osascript back-ends compile everywhere (they only spawn processes); the
 * Win32 back-end is Windows-only.
 */
pub mod error;
pub mod invoker;
pub mod osascript_dialog;
pub mod process_runner;
pub mod types;
#[cfg(target_os = "windows")]
pub mod win32_dialog;
pub mod zenity_dialog;

pub use error::{DialogError, Result as DialogResult};
pub use invoker::DialogInvoker;
pub use osascript_dialog::OsaScriptDialog;
pub use process_runner::{CoreProcessRunner, ProcessOutput, ProcessRunnerOperations};
pub use types::NativeDialogOperations;
#[cfg(target_os = "windows")]
pub use win32_dialog::Win32Dialog;
pub use zenity_dialog::ZenityDialog;

use crate::core::{Platform, PluginConfig};
use std::sync::Arc;

/*
 * Builds the dialog back-end for the platform this binary targets, using the
 * helper binary locations from `config`.
 */
pub fn native_dialog_for_current_platform(config: &PluginConfig) -> Arc<dyn NativeDialogOperations> {
    let runner: Arc<dyn ProcessRunnerOperations> = Arc::new(CoreProcessRunner::new());
    match Platform::current() {
        Platform::MacOs => Arc::new(OsaScriptDialog::new(config.osascript_program(), runner)),
        #[cfg(target_os = "windows")]
        Platform::Windows => Arc::new(Win32Dialog::new()),
        _ => Arc::new(ZenityDialog::new(config.zenity_program(), runner)),
    }
}
