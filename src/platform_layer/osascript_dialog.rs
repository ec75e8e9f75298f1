/*
 * macOS dialog back-end driven through `osascript`.
 *
 * Every script asks AppleScript for `POSIX path of` the chosen item, so the
 * volume mapping (`/Volumes/<name>/...` for non-boot disks) is done by the
 * system rather than by parsing HFS aliases. Multiple selections print one
 * path per line, since the alias list AppleScript prints by default is comma
 * separated and ambiguous for names containing commas.
 */
use super::error::{DialogError, Result as DialogResult};
use super::process_runner::{
    ProcessRunnerOperations, path_from_bytes, paths_from_lines, script_outcome,
};
use super::types::NativeDialogOperations;
use crate::core::{FilterExpression, Platform};

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const COMPONENT: &str = "OsaScriptDialog";

pub struct OsaScriptDialog {
    program: PathBuf,
    runner: Arc<dyn ProcessRunnerOperations>,
}

// Quotes `text` as an AppleScript string literal.
fn applescript_string(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

fn default_location_clause(initial_directory: Option<&Path>) -> String {
    match initial_directory {
        Some(dir) => format!(
            " default location (POSIX file {})",
            applescript_string(&dir.to_string_lossy())
        ),
        None => String::new(),
    }
}

impl OsaScriptDialog {
    pub fn new(program: PathBuf, runner: Arc<dyn ProcessRunnerOperations>) -> Self {
        OsaScriptDialog { program, runner }
    }

    pub(crate) fn single_script(
        title: &str,
        filter: &FilterExpression,
        is_directory: bool,
        initial_directory: Option<&Path>,
    ) -> Vec<String> {
        let location = default_location_clause(initial_directory);
        let chooser = if is_directory {
            format!(
                "choose folder with prompt {}{location}",
                applescript_string(title)
            )
        } else {
            format!(
                "choose file of type {{{}}} with prompt {}{location}",
                filter.native(),
                applescript_string(title)
            )
        };
        vec![format!("POSIX path of ({chooser})")]
    }

    pub(crate) fn multi_script(
        title: &str,
        filter: &FilterExpression,
        initial_directory: Option<&Path>,
    ) -> Vec<String> {
        vec![
            format!(
                "set picked to choose file of type {{{}}} with prompt {}{} with multiple selections allowed",
                filter.native(),
                applescript_string(title),
                default_location_clause(initial_directory)
            ),
            "set out to \"\"".to_string(),
            "repeat with f in picked".to_string(),
            "set out to out & POSIX path of f & linefeed".to_string(),
            "end repeat".to_string(),
            "return out".to_string(),
        ]
    }

    fn run_script(&self, lines: &[String]) -> DialogResult<Option<Vec<u8>>> {
        let mut args: Vec<OsString> = Vec::with_capacity(lines.len() * 2);
        for line in lines {
            args.push("-e".into());
            args.push(line.into());
        }
        script_outcome(COMPONENT, &self.program, self.runner.run(&self.program, &args))
    }
}

impl NativeDialogOperations for OsaScriptDialog {
    fn platform(&self) -> Platform {
        Platform::MacOs
    }

    fn choose_one(
        &self,
        title: &str,
        filter: &FilterExpression,
        is_directory: bool,
        initial_directory: Option<&Path>,
    ) -> DialogResult<Option<PathBuf>> {
        log::debug!(
            "{COMPONENT}: Showing single chooser. Title: '{}', directory: {}",
            title,
            is_directory
        );
        let script = Self::single_script(title, filter, is_directory, initial_directory);
        let Some(mut bytes) = self.run_script(&script)? else {
            return Ok(None);
        };
        if bytes.first() != Some(&b'/') {
            let printed = String::from_utf8_lossy(&bytes).into_owned();
            log::error!("{COMPONENT}: Expected an absolute path, got {printed:?}");
            return Err(DialogError::MalformedOutput(printed));
        }
        // Folders come back as "/Users/me/Documents/".
        while bytes.len() > 1 && bytes.last() == Some(&b'/') {
            bytes.pop();
        }
        path_from_bytes(&bytes).map(Some)
    }

    fn choose_many(
        &self,
        title: &str,
        filter: &FilterExpression,
        initial_directory: Option<&Path>,
    ) -> DialogResult<Option<Vec<PathBuf>>> {
        log::debug!("{COMPONENT}: Showing multi chooser. Title: '{}'", title);
        let script = Self::multi_script(title, filter, initial_directory);
        self.run_script(&script)?
            .map(|bytes| paths_from_lines(&bytes))
            .transpose()
    }
}
