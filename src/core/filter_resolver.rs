/*
 * Translates an abstract `SelectionKind` into the filter syntax each native
 * dialog expects. The mapping is a pure function of (kind, platform), so all
 * three platform variants can be resolved and tested from any host.
 *
 * - Linux (zenity): space separated `*.ext` globs; "any" is `*`.
 * - macOS (osascript `choose file of type`): quoted uniform type identifiers,
 *   or quoted bare extensions for custom kinds.
 * - Windows (common dialog): NUL-delimited label/pattern pairs. Every filter is
 *   followed by an "All Files" pair and closed by an empty pair (double NUL).
 */
use super::selection::{Platform, SelectionKind};

pub const CUSTOM_METHOD_PREFIX: &str = "__CUSTOM_";

const LINUX_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];
const LINUX_AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "midi", "ogg", "aac"];
const LINUX_VIDEO_EXTENSIONS: &[&str] = &["webm", "mpeg", "mkv", "mp4", "avi", "mov", "flv"];

const WINDOWS_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];
const WINDOWS_AUDIO_EXTENSIONS: &[&str] = &["mp3"];
const WINDOWS_VIDEO_EXTENSIONS: &[&str] =
    &["webm", "wmv", "mpeg", "mkv", "mp4", "avi", "mov", "flv"];
const WINDOWS_ALL_FILES_PAIR: &str = "All Files (*.*)\0*.*\0";

const MACOS_ANY_TYPE: &str = "public.item";
const MACOS_IMAGE_TYPE: &str = "public.image";
const MACOS_AUDIO_TYPE: &str = "public.audio";
const MACOS_VIDEO_TYPE: &str = "public.movie";

// Characters that would break one of the native filter syntaxes if an
// extension carried them. `|` splits name from patterns in zenity filters.
const FORBIDDEN_EXTENSION_CHARS: &[char] = &[';', ',', '|', '"', '\0', '/', '\\'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The method token matched no built-in kind and no custom marker.
    UnknownKind(String),
    /// A custom selection was requested without any extension.
    EmptyExtensionList,
    /// An extension was empty or contained wildcard/separator characters.
    InvalidExtension(String),
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveError::UnknownKind(token) => write!(f, "unknown method: {token}"),
            ResolveError::EmptyExtensionList => {
                write!(f, "custom selection requires at least one extension")
            }
            ResolveError::InvalidExtension(ext) => write!(
                f,
                "invalid extension '{ext}': use the extension without the dot or wildcards (e.g. 'jpg' instead of '*.jpg')"
            ),
        }
    }
}

impl std::error::Error for ResolveError {}

pub type Result<T> = std::result::Result<T, ResolveError>;

/*
 * A platform-native filter. The wrapped string is handed to the dialog
 * back-end verbatim and never appears in a reply.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterExpression {
    Glob(String),
    TypeIdentifiers(String),
    DescriptionPattern(String),
}

impl FilterExpression {
    pub fn native(&self) -> &str {
        match self {
            FilterExpression::Glob(s)
            | FilterExpression::TypeIdentifiers(s)
            | FilterExpression::DescriptionPattern(s) => s,
        }
    }

    pub fn platform(&self) -> Platform {
        match self {
            FilterExpression::Glob(_) => Platform::Linux,
            FilterExpression::TypeIdentifiers(_) => Platform::MacOs,
            FilterExpression::DescriptionPattern(_) => Platform::Windows,
        }
    }
}

/*
 * Decodes a method token into a `SelectionKind`.
 * Built-in tokens are accepted in upper case and in the lower-case spelling
 * newer shells send. `CUSTOM` takes its extensions from `allowed_extensions`;
 * `__CUSTOM_<ext>` embeds one extension (taken verbatim) and is augmented by
 * any extra `allowed_extensions`. Validation of the extensions themselves
 * happens in `resolve`.
 */
pub fn parse_kind(method: &str, allowed_extensions: &[String]) -> Result<SelectionKind> {
    match method {
        "ANY" | "any" => Ok(SelectionKind::Any),
        "IMAGE" | "image" => Ok(SelectionKind::Image),
        "AUDIO" | "audio" => Ok(SelectionKind::Audio),
        "VIDEO" | "video" => Ok(SelectionKind::Video),
        "CUSTOM" | "custom" => Ok(SelectionKind::Custom(allowed_extensions.to_vec())),
        other => match other.strip_prefix(CUSTOM_METHOD_PREFIX) {
            Some(embedded) => {
                let mut extensions = vec![embedded.to_string()];
                for ext in allowed_extensions {
                    if !extensions.contains(ext) {
                        extensions.push(ext.clone());
                    }
                }
                Ok(SelectionKind::Custom(extensions))
            }
            None => {
                log::debug!("FilterResolver: Unrecognized method token '{other}'.");
                Err(ResolveError::UnknownKind(other.to_string()))
            }
        },
    }
}

fn validate_extensions(extensions: &[String]) -> Result<()> {
    if extensions.is_empty() {
        return Err(ResolveError::EmptyExtensionList);
    }
    for ext in extensions {
        let has_glob_meta = glob::Pattern::escape(ext) != *ext;
        if ext.trim().is_empty()
            || has_glob_meta
            || ext.chars().any(char::is_whitespace)
            || ext.contains(FORBIDDEN_EXTENSION_CHARS)
        {
            return Err(ResolveError::InvalidExtension(ext.clone()));
        }
    }
    Ok(())
}

fn star_patterns<S: AsRef<str>>(extensions: &[S]) -> Vec<String> {
    extensions
        .iter()
        .map(|ext| format!("*.{}", ext.as_ref()))
        .collect()
}

fn linux_filter(kind: &SelectionKind) -> String {
    match kind {
        SelectionKind::Any => "*".to_string(),
        SelectionKind::Image => star_patterns(LINUX_IMAGE_EXTENSIONS).join(" "),
        SelectionKind::Audio => star_patterns(LINUX_AUDIO_EXTENSIONS).join(" "),
        SelectionKind::Video => star_patterns(LINUX_VIDEO_EXTENSIONS).join(" "),
        SelectionKind::Custom(exts) => star_patterns(exts).join(" "),
    }
}

fn quoted_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|item| format!("\"{}\"", item.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn macos_filter(kind: &SelectionKind) -> String {
    match kind {
        SelectionKind::Any => quoted_list(&[MACOS_ANY_TYPE]),
        SelectionKind::Image => quoted_list(&[MACOS_IMAGE_TYPE]),
        SelectionKind::Audio => quoted_list(&[MACOS_AUDIO_TYPE]),
        SelectionKind::Video => quoted_list(&[MACOS_VIDEO_TYPE]),
        SelectionKind::Custom(exts) => quoted_list(exts),
    }
}

// "Label (*.a,*.b)\0*.a;*.b\0All Files (*.*)\0*.*\0\0"
fn windows_pair(label: &str, patterns: &[String]) -> String {
    format!(
        "{label} ({})\0{}\0{WINDOWS_ALL_FILES_PAIR}\0",
        patterns.join(","),
        patterns.join(";")
    )
}

fn windows_filter(kind: &SelectionKind) -> String {
    match kind {
        SelectionKind::Any => format!("{WINDOWS_ALL_FILES_PAIR}\0"),
        SelectionKind::Image => windows_pair("Images", &star_patterns(WINDOWS_IMAGE_EXTENSIONS)),
        SelectionKind::Audio => windows_pair("Audios", &star_patterns(WINDOWS_AUDIO_EXTENSIONS)),
        SelectionKind::Video => windows_pair("Videos", &star_patterns(WINDOWS_VIDEO_EXTENSIONS)),
        SelectionKind::Custom(exts) => windows_pair("Files", &star_patterns(exts)),
    }
}

/*
 * Resolves `kind` into the filter syntax of `platform`.
 * Custom kinds must carry at least one well-formed extension; there is no
 * silent fallback to "any".
 */
pub fn resolve(kind: &SelectionKind, platform: Platform) -> Result<FilterExpression> {
    if let SelectionKind::Custom(exts) = kind {
        validate_extensions(exts)?;
    }
    let filter = match platform {
        Platform::Linux => FilterExpression::Glob(linux_filter(kind)),
        Platform::MacOs => FilterExpression::TypeIdentifiers(macos_filter(kind)),
        Platform::Windows => FilterExpression::DescriptionPattern(windows_filter(kind)),
    };
    log::trace!(
        "FilterResolver: Resolved kind '{}' for {:?} to {:?}",
        kind.label(),
        platform,
        filter.native()
    );
    Ok(filter)
}
