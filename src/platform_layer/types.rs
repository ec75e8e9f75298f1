/*
 * The native-dialog capability consumed by the dialog invoker. Every back-end
 * (zenity, osascript, Win32 common dialogs) and every test double implements
 * `NativeDialogOperations`, so the invoker and the request handler never know
 * how a dialog is actually put on screen.
 */

use super::error::Result as DialogResult;
use crate::core::{FilterExpression, Platform};
use std::path::{Path, PathBuf};

pub trait NativeDialogOperations: Send + Sync {
    /// The platform whose filter syntax this back-end understands.
    fn platform(&self) -> Platform;

    /*
     * Shows a single-selection chooser. `Ok(None)` means the user dismissed
     * the dialog. With `is_directory` set, a folder chooser is shown and the
     * filter is ignored.
     */
    fn choose_one(
        &self,
        title: &str,
        filter: &FilterExpression,
        is_directory: bool,
        initial_directory: Option<&Path>,
    ) -> DialogResult<Option<PathBuf>>;

    /*
     * Shows a multi-selection chooser. Paths come back in dialog order;
     * `Ok(None)` means the user dismissed the dialog.
     */
    fn choose_many(
        &self,
        title: &str,
        filter: &FilterExpression,
        initial_directory: Option<&Path>,
    ) -> DialogResult<Option<Vec<PathBuf>>>;
}
