/*
 * Runs helper programs (zenity, osascript) to completion and captures their
 * output. The script-driven dialog back-ends depend on the
 * `ProcessRunnerOperations` trait so their exit-code and output handling can
 * be exercised with canned results in tests.
 */
use super::error::{DialogError, Result as DialogResult};
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    // `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    // Raw bytes; helpers print file names, which need not be UTF-8.
    pub stdout: Vec<u8>,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

pub trait ProcessRunnerOperations: Send + Sync {
    /*
     * Runs `program` with `args` and blocks until it exits. An `Err` means the
     * process could not be started at all; a non-zero exit is reported through
     * `ProcessOutput::exit_code`.
     */
    fn run(&self, program: &Path, args: &[OsString]) -> io::Result<ProcessOutput>;
}

pub struct CoreProcessRunner {}

impl CoreProcessRunner {
    pub fn new() -> Self {
        CoreProcessRunner {}
    }
}

impl Default for CoreProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessRunnerOperations for CoreProcessRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> io::Result<ProcessOutput> {
        log::trace!("CoreProcessRunner: Running {program:?} with {args:?}");
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()?;
        let result = ProcessOutput {
            exit_code: output.status.code(),
            stdout: output.stdout,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        log::trace!(
            "CoreProcessRunner: {program:?} exited with {:?}",
            result.exit_code
        );
        Ok(result)
    }
}

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}

/*
 * Turns one line of helper output into a path without altering its bytes.
 * On Unix any byte sequence is a valid file name. Elsewhere the helpers print
 * UTF-8, and anything else is reported as malformed output.
 */
pub(crate) fn path_from_bytes(bytes: &[u8]) -> DialogResult<PathBuf> {
    #[cfg(unix)]
    {
        use std::os::unix::ffi::OsStringExt;
        Ok(PathBuf::from(OsString::from_vec(bytes.to_vec())))
    }
    #[cfg(not(unix))]
    {
        String::from_utf8(bytes.to_vec())
            .map(PathBuf::from)
            .map_err(|e| {
                DialogError::MalformedOutput(String::from_utf8_lossy(e.as_bytes()).into_owned())
            })
    }
}

/// Splits newline-separated helper output into paths, skipping blank lines.
pub(crate) fn paths_from_lines(bytes: &[u8]) -> DialogResult<Vec<PathBuf>> {
    bytes
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(path_from_bytes)
        .collect()
}

/*
 * Interprets the result of running a dialog helper.
 *
 * - Failure to start the helper is a `DialogError::Launch`.
 * - A non-zero exit without usable output is the user cancelling or closing
 *   the dialog, reported as `Ok(None)`.
 * - A non-zero exit that still printed something is a toolkit failure.
 * - A zero exit yields stdout without its line terminator; blank output
 *   counts as cancelled.
 */
pub(crate) fn script_outcome(
    component: &str,
    program: &Path,
    result: io::Result<ProcessOutput>,
) -> DialogResult<Option<Vec<u8>>> {
    let output = result.map_err(|source| {
        log::error!("{component}: Failed to launch {program:?}: {source}");
        DialogError::Launch {
            program: program.display().to_string(),
            source,
        }
    })?;

    let mut stdout = output.stdout.as_slice();
    while let [rest @ .., b'\r' | b'\n'] = stdout {
        stdout = rest;
    }
    if output.success() {
        if is_blank(stdout) {
            log::debug!("{component}: Dialog exited cleanly without a selection.");
            return Ok(None);
        }
        return Ok(Some(stdout.to_vec()));
    }

    if is_blank(stdout) {
        log::debug!(
            "{component}: Dialog exited with code {:?} and no output; treating as cancelled. stderr: {}",
            output.exit_code,
            output.stderr.trim()
        );
        return Ok(None);
    }

    let printed = String::from_utf8_lossy(stdout);
    log::error!(
        "{component}: Dialog exited with code {:?} and output {:?}",
        output.exit_code,
        printed
    );
    let detail = if output.stderr.trim().is_empty() {
        printed.into_owned()
    } else {
        output.stderr.trim().to_string()
    };
    Err(DialogError::Toolkit(format!(
        "exit code {:?}: {}",
        output.exit_code, detail
    )))
}
