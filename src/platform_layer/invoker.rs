/*
 * Drives a native dialog for one `SelectionRequest` and turns its answer into
 * a `SelectionResult`. Single selections and folder picks map "no path" to
 * `Cancelled`; multi-selections map it to an empty list. Errors from the
 * back-end are passed through untouched, and nothing is retried.
 */
use super::error::Result as DialogResult;
use super::types::NativeDialogOperations;
use crate::core::{FilterExpression, Platform, SelectionRequest, SelectionResult};
use std::sync::Arc;

pub struct DialogInvoker {
    native: Arc<dyn NativeDialogOperations>,
}

impl DialogInvoker {
    pub fn new(native: Arc<dyn NativeDialogOperations>) -> Self {
        DialogInvoker { native }
    }

    /// The platform whose filter syntax the wrapped back-end expects.
    pub fn platform(&self) -> Platform {
        self.native.platform()
    }

    pub fn invoke(
        &self,
        request: &SelectionRequest,
        filter: &FilterExpression,
    ) -> DialogResult<SelectionResult> {
        let initial_dir = request.initial_directory.as_deref();

        if request.allow_multiple && !request.is_directory {
            let paths = self
                .native
                .choose_many(&request.title, filter, initial_dir)?
                .unwrap_or_default();
            log::debug!("DialogInvoker: Multi-selection returned {} path(s).", paths.len());
            return Ok(SelectionResult::Multiple(paths));
        }

        match self
            .native
            .choose_one(&request.title, filter, request.is_directory, initial_dir)?
        {
            Some(path) => {
                log::debug!("DialogInvoker: Selection returned {path:?}.");
                Ok(SelectionResult::Single(path))
            }
            None => {
                log::debug!("DialogInvoker: Selection cancelled by user.");
                Ok(SelectionResult::Cancelled)
            }
        }
    }
}
