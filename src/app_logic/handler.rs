use crate::app_logic::channel_constants::*;
use crate::core::{
    FilterExpression, PluginConfig, ResolveError, SelectionRequest, SelectionResult, parse_kind,
    resolve,
};
use crate::platform_layer::{DialogError, DialogInvoker, NativeDialogOperations};

use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/*
 * One request crossing the method channel: a method name plus the decoded,
 * dynamically-typed arguments. The wire codec that produces it is owned by
 * the host transport.
 */
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        MethodCall {
            method: method.into(),
            arguments,
        }
    }
}

// The successful reply to a method call, before transport encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Path(String),
    Paths(Vec<String>),
    // Cancelled single selection.
    Empty,
    Flag(bool),
}

impl Reply {
    /*
     * Encodes the reply as a transport value. List elements are boxed one by
     * one into dynamically-typed string values, since the channel codec has no
     * typed string-list representation.
     */
    pub fn into_value(self) -> Value {
        match self {
            Reply::Path(path) => Value::String(path),
            Reply::Paths(paths) => Value::Array(paths.into_iter().map(Value::String).collect()),
            Reply::Empty => Value::Null,
            Reply::Flag(flag) => Value::Bool(flag),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginErrorKind {
    ResolveFilter,
    InvalidArgument,
    DialogFailure,
}

/*
 * Boundary error reply: a short caption naming the failing stage plus the
 * description of the underlying cause. Only the request handler builds these.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginError {
    pub kind: PluginErrorKind,
    pub details: String,
}

impl PluginError {
    fn dialog_failure(details: impl Into<String>) -> Self {
        PluginError {
            kind: PluginErrorKind::DialogFailure,
            details: details.into(),
        }
    }

    fn invalid_argument(details: impl Into<String>) -> Self {
        PluginError {
            kind: PluginErrorKind::InvalidArgument,
            details: details.into(),
        }
    }

    pub fn caption(&self) -> &'static str {
        match self.kind {
            PluginErrorKind::ResolveFilter => CAPTION_RESOLVE_FAILED,
            PluginErrorKind::InvalidArgument => CAPTION_INVALID_ARGUMENT,
            PluginErrorKind::DialogFailure => CAPTION_DIALOG_FAILED,
        }
    }
}

impl From<ResolveError> for PluginError {
    fn from(err: ResolveError) -> Self {
        PluginError {
            kind: PluginErrorKind::ResolveFilter,
            details: err.to_string(),
        }
    }
}

impl From<DialogError> for PluginError {
    fn from(err: DialogError) -> Self {
        PluginError {
            kind: PluginErrorKind::DialogFailure,
            details: err.to_string(),
        }
    }
}

impl std::fmt::Display for PluginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.caption(), self.details)
    }
}

impl std::error::Error for PluginError {}

// Arguments after decoding, independent of whether the shell sent a bare
// bool or a map.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct CallArguments {
    pub(crate) allow_multiple: Option<bool>,
    pub(crate) allowed_extensions: Vec<String>,
    pub(crate) dialog_title: Option<String>,
    pub(crate) initial_directory: Option<PathBuf>,
}

fn optional_string(map: &Map<String, Value>, key: &str) -> Result<Option<String>, PluginError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(PluginError::invalid_argument(format!(
            "'{key}' must be a string, got {other}"
        ))),
    }
}

/*
 * Decodes the call arguments. Older shells send the multiple-selection flag
 * as a bare bool; newer ones send a map with `allowMultipleSelection`,
 * `allowedExtensions` and optional dialog settings. A key that is present but
 * of the wrong type is an error; absence is left for the caller to judge.
 */
pub(crate) fn decode_arguments(arguments: &Value) -> Result<CallArguments, PluginError> {
    match arguments {
        Value::Null => Ok(CallArguments::default()),
        Value::Bool(flag) => Ok(CallArguments {
            allow_multiple: Some(*flag),
            ..Default::default()
        }),
        Value::Object(map) => {
            let allow_multiple = match map.get(ARG_ALLOW_MULTIPLE) {
                None | Some(Value::Null) => None,
                Some(Value::Bool(flag)) => Some(*flag),
                Some(other) => {
                    return Err(PluginError::invalid_argument(format!(
                        "'{ARG_ALLOW_MULTIPLE}' must be a bool, got {other}"
                    )));
                }
            };

            let allowed_extensions = match map.get(ARG_ALLOWED_EXTENSIONS) {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(items)) => items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => Ok(s.clone()),
                        other => Err(PluginError::invalid_argument(format!(
                            "'{ARG_ALLOWED_EXTENSIONS}' must contain strings, got {other}"
                        ))),
                    })
                    .collect::<Result<Vec<_>, _>>()?,
                Some(other) => {
                    return Err(PluginError::invalid_argument(format!(
                        "'{ARG_ALLOWED_EXTENSIONS}' must be a list, got {other}"
                    )));
                }
            };

            Ok(CallArguments {
                allow_multiple,
                allowed_extensions,
                dialog_title: optional_string(map, ARG_DIALOG_TITLE)?,
                initial_directory: optional_string(map, ARG_INITIAL_DIRECTORY)?
                    .map(PathBuf::from),
            })
        }
        other => Err(PluginError::invalid_argument(format!(
            "expected a bool or a map of arguments, got {other}"
        ))),
    }
}

/*
 * Request handler for the file picker channel. Decodes a method call into a
 * `SelectionRequest`, resolves the filter for the back-end's platform, runs
 * the dialog and marshals the result. It is the only layer that turns
 * internal errors into captioned `PluginError`s. Holds no mutable state, so
 * calls from several channels can run side by side.
 */
pub struct FilePickerPlugin {
    pub(crate) config: PluginConfig,
    pub(crate) invoker: DialogInvoker,
}

impl FilePickerPlugin {
    pub fn new(config: PluginConfig, native: Arc<dyn NativeDialogOperations>) -> Self {
        log::debug!(
            "FilePickerPlugin: Created for channel '{}' on {:?}",
            config.channel_name,
            native.platform()
        );
        FilePickerPlugin {
            config,
            invoker: DialogInvoker::new(native),
        }
    }

    pub fn channel_name(&self) -> &str {
        &self.config.channel_name
    }

    fn title_for(&self, explicit: Option<String>, is_directory: bool, allow_multiple: bool) -> String {
        explicit.unwrap_or_else(|| {
            if is_directory {
                self.config.directory_title.clone()
            } else if allow_multiple {
                self.config.multiple_selection_title.clone()
            } else {
                self.config.single_selection_title.clone()
            }
        })
    }

    /*
     * Builds the selection request for `call`. The method token is decoded
     * before the arguments are checked, so an unknown method is reported as a
     * filter failure even when its arguments are also bad.
     */
    pub(crate) fn build_request(&self, call: &MethodCall) -> Result<SelectionRequest, PluginError> {
        if call.method == METHOD_DIRECTORY || call.method == METHOD_GET_DIRECTORY_PATH {
            let args = decode_arguments(&call.arguments)?;
            let title = self.title_for(args.dialog_title, true, false);
            return Ok(SelectionRequest::directory(title).with_initial_directory(args.initial_directory));
        }

        let decoded = decode_arguments(&call.arguments);
        let extensions = decoded
            .as_ref()
            .map(|args| args.allowed_extensions.as_slice())
            .unwrap_or(&[]);
        let kind = parse_kind(&call.method, extensions)?;
        let args = decoded?;
        let allow_multiple = args.allow_multiple.ok_or_else(|| {
            PluginError::invalid_argument(format!("missing '{ARG_ALLOW_MULTIPLE}' argument"))
        })?;
        let title = self.title_for(args.dialog_title, false, allow_multiple);
        Ok(SelectionRequest::new(title, kind, allow_multiple)
            .with_initial_directory(args.initial_directory))
    }

    pub fn handle(&self, call: &MethodCall) -> Result<Reply, PluginError> {
        log::debug!(
            "FilePickerPlugin: Handling method '{}' with arguments {}",
            call.method,
            call.arguments
        );
        if call.method == METHOD_CLEAR {
            return Ok(Reply::Flag(true));
        }

        let result = self.build_request(call).and_then(|request| {
            let filter: FilterExpression = resolve(&request.kind, self.invoker.platform())?;
            let selection = self.invoker.invoke(&request, &filter)?;
            if selection.is_cancelled() {
                log::info!("FilePickerPlugin: Method '{}' ended without a selection.", call.method);
            }
            Self::marshal(selection)
        });

        match result {
            Ok(reply) => Ok(reply),
            Err(err) => {
                log::error!("FilePickerPlugin: Method '{}' failed: {}", call.method, err);
                Err(err)
            }
        }
    }

    /// Convenience entry point for transports working with raw values.
    pub fn handle_value(&self, method: &str, arguments: Value) -> Result<Value, PluginError> {
        self.handle(&MethodCall::new(method, arguments))
            .map(Reply::into_value)
    }

    // Replies carry strings, so a path that is not valid Unicode cannot be
    // sent back faithfully and is reported instead of being altered.
    fn reply_string(path: &Path) -> Result<String, PluginError> {
        path.to_str().map(str::to_string).ok_or_else(|| {
            PluginError::dialog_failure(format!("selected path is not valid UTF-8: {path:?}"))
        })
    }

    fn marshal(selection: SelectionResult) -> Result<Reply, PluginError> {
        match selection {
            SelectionResult::Single(path) => Ok(Reply::Path(Self::reply_string(&path)?)),
            SelectionResult::Multiple(paths) => paths
                .iter()
                .map(|p| Self::reply_string(p))
                .collect::<Result<Vec<_>, _>>()
                .map(Reply::Paths),
            SelectionResult::Cancelled => Ok(Reply::Empty),
        }
    }
}
