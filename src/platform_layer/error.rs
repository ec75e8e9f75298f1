use std::io;

// Represents errors that can occur while driving a native dialog.
//
// Cancellation is not represented here: a dismissed dialog is a successful
// empty outcome. Every variant is reported once and never retried.
#[derive(Debug)]
pub enum DialogError {
    /// The helper process could not be started (binary missing, I/O error).
    Launch { program: String, source: io::Error },
    /// The dialog toolkit reported a failure of its own.
    Toolkit(String),
    /// The dialog succeeded but produced output that is not a path.
    MalformedOutput(String),
    /// An error originating from the Windows API.
    #[cfg(target_os = "windows")]
    Win32(windows::core::Error),
}

#[cfg(target_os = "windows")]
impl From<windows::core::Error> for DialogError {
    fn from(err: windows::core::Error) -> Self {
        DialogError::Win32(err)
    }
}

impl std::fmt::Display for DialogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DialogError::Launch { program, source } => {
                write!(f, "could not launch '{}': {}", program, source)
            }
            DialogError::Toolkit(s) => write!(f, "dialog toolkit error: {}", s),
            DialogError::MalformedOutput(s) => write!(f, "unexpected dialog output: {:?}", s),
            #[cfg(target_os = "windows")]
            DialogError::Win32(e) => write!(f, "Win32 Error: {}", e),
        }
    }
}

impl std::error::Error for DialogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DialogError::Launch { source, .. } => Some(source),
            #[cfg(target_os = "windows")]
            DialogError::Win32(e) => Some(e),
            _ => None,
        }
    }
}

/// A specialized `Result` type for dialog operations.
pub type Result<T> = std::result::Result<T, DialogError>;
