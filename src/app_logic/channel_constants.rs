/*
 * Method names, argument keys and error captions shared by the request
 * handler and its tests. These are the strings the application shell sends
 * and expects on the method channel.
 */

// Method selecting a single folder instead of files.
pub const METHOD_DIRECTORY: &str = "DIR";
// Spelling used by newer shells for the same request.
pub const METHOD_GET_DIRECTORY_PATH: &str = "getDirectoryPath";
// Asks the plugin to drop cached picks. Desktop dialogs cache nothing.
pub const METHOD_CLEAR: &str = "clear";

pub const ARG_ALLOW_MULTIPLE: &str = "allowMultipleSelection";
pub const ARG_ALLOWED_EXTENSIONS: &str = "allowedExtensions";
pub const ARG_DIALOG_TITLE: &str = "dialogTitle";
pub const ARG_INITIAL_DIRECTORY: &str = "initialDirectory";

pub const CAPTION_RESOLVE_FAILED: &str = "failed to get filter";
pub const CAPTION_DIALOG_FAILED: &str = "failed to open dialog picker";
pub const CAPTION_INVALID_ARGUMENT: &str = "invalid argument";
