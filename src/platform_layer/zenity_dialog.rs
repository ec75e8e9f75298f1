/*
 * Linux dialog back-end. Shells out to `zenity --file-selection`, passing the
 * glob filter through `--file-filter`. Multi-selection output is split on
 * newlines, which is requested explicitly as the separator.
 */
use super::error::Result as DialogResult;
use super::process_runner::{
    ProcessRunnerOperations, path_from_bytes, paths_from_lines, script_outcome,
};
use super::types::NativeDialogOperations;
use crate::core::{FilterExpression, Platform};

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const COMPONENT: &str = "ZenityDialog";
const MULTI_SEPARATOR: &str = "\n";

pub struct ZenityDialog {
    program: PathBuf,
    runner: Arc<dyn ProcessRunnerOperations>,
}

impl ZenityDialog {
    pub fn new(program: PathBuf, runner: Arc<dyn ProcessRunnerOperations>) -> Self {
        ZenityDialog { program, runner }
    }

    fn base_args(title: &str, initial_directory: Option<&Path>) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["--file-selection".into(), format!("--title={title}").into()];
        if let Some(dir) = initial_directory {
            // A trailing separator makes zenity open inside the folder.
            let mut filename = OsString::from("--filename=");
            filename.push(dir.join("").as_os_str());
            args.push(filename);
        }
        args
    }

    pub(crate) fn single_args(
        title: &str,
        filter: &FilterExpression,
        is_directory: bool,
        initial_directory: Option<&Path>,
    ) -> Vec<OsString> {
        let mut args = Self::base_args(title, initial_directory);
        if is_directory {
            args.push("--directory".into());
        } else {
            args.push(format!("--file-filter={}", filter.native()).into());
        }
        args
    }

    pub(crate) fn multi_args(
        title: &str,
        filter: &FilterExpression,
        initial_directory: Option<&Path>,
    ) -> Vec<OsString> {
        let mut args = Self::base_args(title, initial_directory);
        args.push("--multiple".into());
        args.push(format!("--separator={MULTI_SEPARATOR}").into());
        args.push(format!("--file-filter={}", filter.native()).into());
        args
    }
}

impl NativeDialogOperations for ZenityDialog {
    fn platform(&self) -> Platform {
        Platform::Linux
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
        let args = Self::single_args(title, filter, is_directory, initial_directory);
        let outcome = script_outcome(COMPONENT, &self.program, self.runner.run(&self.program, &args))?;
        outcome.map(|bytes| path_from_bytes(&bytes)).transpose()
    }

    fn choose_many(
        &self,
        title: &str,
        filter: &FilterExpression,
        initial_directory: Option<&Path>,
    ) -> DialogResult<Option<Vec<PathBuf>>> {
        log::debug!("{COMPONENT}: Showing multi chooser. Title: '{}'", title);
        let args = Self::multi_args(title, filter, initial_directory);
        let outcome = script_outcome(COMPONENT, &self.program, self.runner.run(&self.program, &args))?;
        outcome.map(|bytes| paths_from_lines(&bytes)).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform_layer::error::DialogError;
    use crate::platform_layer::process_runner::ProcessOutput;
    use std::io;
    use std::sync::Mutex;

    struct FakeRunner {
        result: Mutex<Option<io::Result<ProcessOutput>>>,
        calls: Mutex<Vec<(PathBuf, Vec<OsString>)>>,
    }

    impl FakeRunner {
        fn returning(result: io::Result<ProcessOutput>) -> Arc<Self> {
            Arc::new(FakeRunner {
                result: Mutex::new(Some(result)),
                calls: Mutex::new(Vec::new()),
            })
        }
        fn exited(code: i32, stdout: &str) -> Arc<Self> {
            Self::returning(Ok(ProcessOutput {
                exit_code: Some(code),
                stdout: stdout.as_bytes().to_vec(),
                stderr: String::new(),
            }))
        }
        fn last_args(&self) -> Vec<OsString> {
            self.calls.lock().unwrap().last().unwrap().1.clone()
        }
    }

    impl ProcessRunnerOperations for FakeRunner {
        fn run(&self, program: &Path, args: &[OsString]) -> io::Result<ProcessOutput> {
            self.calls
                .lock()
                .unwrap()
                .push((program.to_path_buf(), args.to_vec()));
            self.result
                .lock()
                .unwrap()
                .take()
                .expect("FakeRunner called more than once")
        }
    }

    fn glob(s: &str) -> FilterExpression {
        FilterExpression::Glob(s.to_string())
    }

    #[test]
    fn test_single_selection_returns_path_and_passes_filter() {
        let runner = FakeRunner::exited(0, "/tmp/a.png\n");
        let dialog = ZenityDialog::new(PathBuf::from("zenity"), runner.clone());
        let got = dialog
            .choose_one("Select a file", &glob("*.png *.jpg"), false, None)
            .unwrap();
        assert_eq!(got, Some(PathBuf::from("/tmp/a.png")));
        let args = runner.last_args();
        assert!(args.contains(&OsString::from("--file-filter=*.png *.jpg")));
        assert!(args.contains(&OsString::from("--title=Select a file")));
        assert!(!args.contains(&OsString::from("--multiple")));
    }

    #[test]
    fn test_directory_selection_omits_filter() {
        let runner = FakeRunner::exited(0, "/home/me/photos\n");
        let dialog = ZenityDialog::new(PathBuf::from("zenity"), runner.clone());
        let got = dialog
            .choose_one("Select a folder", &glob("*"), true, Some(Path::new("/home/me")))
            .unwrap();
        assert_eq!(got, Some(PathBuf::from("/home/me/photos")));
        let args = runner.last_args();
        assert!(args.contains(&OsString::from("--directory")));
        assert!(args.iter().all(|a| !a.to_string_lossy().starts_with("--file-filter")));
        assert!(args.contains(&OsString::from("--filename=/home/me/")));
    }

    #[test]
    fn test_multi_selection_preserves_order() {
        let runner = FakeRunner::exited(0, "/tmp/b.png\n/tmp/a.png\n");
        let dialog = ZenityDialog::new(PathBuf::from("zenity"), runner.clone());
        let got = dialog.choose_many("Pick", &glob("*.png"), None).unwrap();
        assert_eq!(
            got,
            Some(vec![PathBuf::from("/tmp/b.png"), PathBuf::from("/tmp/a.png")])
        );
        assert!(runner.last_args().contains(&OsString::from("--multiple")));
    }

    #[test]
    fn test_cancel_exit_code_is_none() {
        let dialog = ZenityDialog::new(PathBuf::from("zenity"), FakeRunner::exited(1, ""));
        assert_eq!(dialog.choose_one("t", &glob("*"), false, None).unwrap(), None);
        let dialog = ZenityDialog::new(PathBuf::from("zenity"), FakeRunner::exited(1, ""));
        assert_eq!(dialog.choose_many("t", &glob("*"), None).unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_selection_keeps_raw_bytes() {
        use std::os::unix::ffi::OsStrExt;

        let runner = FakeRunner::returning(Ok(ProcessOutput {
            exit_code: Some(0),
            stdout: b"/tmp/caf\xe9.png\n".to_vec(),
            stderr: String::new(),
        }));
        let dialog = ZenityDialog::new(PathBuf::from("zenity"), runner);
        let got = dialog.choose_one("t", &glob("*"), false, None).unwrap().unwrap();
        assert_eq!(got.as_os_str().as_bytes(), b"/tmp/caf\xe9.png");
    }

    #[test]
    fn test_missing_binary_is_launch_error() {
        let runner = FakeRunner::returning(Err(io::Error::new(io::ErrorKind::NotFound, "missing")));
        let dialog = ZenityDialog::new(PathBuf::from("/usr/bin/zenity"), runner);
        let err = dialog.choose_one("t", &glob("*"), false, None).unwrap_err();
        assert!(matches!(err, DialogError::Launch { .. }));
        assert!(err.to_string().contains("/usr/bin/zenity"));
    }
}
