use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/*
 * The category of file a caller asks the native dialog to present.
 * `Custom` carries the caller-supplied extensions (no leading dot, no wildcard
 * characters). Built once per request from the decoded method call and never
 * mutated afterwards.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionKind {
    Any,
    Image,
    Audio,
    Video,
    Custom(Vec<String>),
}

impl SelectionKind {
    /// Short label used in log lines.
    pub fn label(&self) -> &'static str {
        match self {
            SelectionKind::Any => "any",
            SelectionKind::Image => "image",
            SelectionKind::Audio => "audio",
            SelectionKind::Video => "video",
            SelectionKind::Custom(_) => "custom",
        }
    }
}

// The operating-system family whose dialog syntax a filter is built for.
// Serializable so it can be pinned in the plugin configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
}

impl Platform {
    /*
     * Returns the platform this binary was compiled for. Unknown Unix-likes
     * are treated as Linux since they are served by the same zenity back-end.
     */
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }

    pub fn all() -> [Platform; 3] {
        [Platform::Linux, Platform::MacOs, Platform::Windows]
    }
}

/*
 * Everything the dialog invoker needs to know about one selection.
 * Constructed per call by the request handler; not persisted.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionRequest {
    pub title: String,
    pub kind: SelectionKind,
    pub allow_multiple: bool,
    pub is_directory: bool,
    pub initial_directory: Option<PathBuf>,
}

impl SelectionRequest {
    pub fn new(title: impl Into<String>, kind: SelectionKind, allow_multiple: bool) -> Self {
        SelectionRequest {
            title: title.into(),
            kind,
            allow_multiple,
            is_directory: false,
            initial_directory: None,
        }
    }

    /// A single-folder request. Folders are never multi-selected.
    pub fn directory(title: impl Into<String>) -> Self {
        SelectionRequest {
            title: title.into(),
            kind: SelectionKind::Any,
            allow_multiple: false,
            is_directory: true,
            initial_directory: None,
        }
    }

    pub fn with_initial_directory(mut self, dir: Option<PathBuf>) -> Self {
        self.initial_directory = dir;
        self
    }
}

/*
 * Outcome of a dialog invocation. Cancellation is a successful empty result,
 * never an error. For multi-selection a cancelled dialog is reported as an
 * empty `Multiple`, since the boundary cannot tell it apart from "nothing
 * selected".
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionResult {
    Single(PathBuf),
    Multiple(Vec<PathBuf>),
    Cancelled,
}

impl SelectionResult {
    pub fn is_cancelled(&self) -> bool {
        match self {
            SelectionResult::Cancelled => true,
            SelectionResult::Multiple(paths) => paths.is_empty(),
            SelectionResult::Single(_) => false,
        }
    }
}
