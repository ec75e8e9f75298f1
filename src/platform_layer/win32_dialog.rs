/*
 * Windows dialog back-end. File selection uses the common `GetOpenFileNameW`
 * dialog, which consumes the NUL-delimited description/pattern filter as is.
 * Folder selection uses the shell's `IFileOpenDialog` with `FOS_PICKFOLDERS`.
 * The dialogs are modal to the desktop; no owner window is attached.
 */

use super::error::{DialogError, Result as DialogResult};
use super::types::NativeDialogOperations;
use crate::core::{FilterExpression, Platform};

use std::ffi::{OsString, c_void};
use std::os::windows::ffi::OsStringExt;
use std::path::{Path, PathBuf};

use windows::{
    Win32::{
        Foundation::{HWND, RPC_E_CHANGED_MODE, S_FALSE},
        System::Com::{
            CLSCTX_INPROC_SERVER, COINIT_APARTMENTTHREADED, CoCreateInstance, CoInitializeEx,
            CoTaskMemFree, CoUninitialize,
        },
        UI::Controls::Dialogs::*, // OPENFILENAMEW, GetOpenFileNameW, OFN_* flags
        UI::Shell::{
            FOS_PICKFOLDERS, FileOpenDialog, IFileOpenDialog, IShellItem,
            SHCreateItemFromParsingName, SIGDN_FILESYSPATH,
        },
    },
    core::{HSTRING, PCWSTR, PWSTR},
};

const COMPONENT: &str = "Win32Dialog";
// Large enough for a multi-selection of a few hundred files.
const FILE_BUFFER_LEN: usize = 32 * 1024;

/*
 * Creates a `PathBuf` from a null-terminated or unterminated slice of UTF-16
 * code units, as written by the common dialogs.
 */
fn pathbuf_from_buf(buffer: &[u16]) -> PathBuf {
    let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
    PathBuf::from(OsString::from_wide(&buffer[..len]))
}

/*
 * Splits the buffer filled by an `OFN_ALLOWMULTISELECT | OFN_EXPLORER` dialog.
 * A single pick is one full path. Several picks are the directory followed by
 * each file name, NUL separated and closed by a double NUL.
 */
fn split_multiselect_buffer(buffer: &[u16]) -> Vec<PathBuf> {
    let entries: Vec<&[u16]> = buffer
        .split(|&c| c == 0)
        .take_while(|entry| !entry.is_empty())
        .collect();
    match entries.as_slice() {
        [] => Vec::new(),
        [single] => vec![pathbuf_from_buf(single)],
        [directory, files @ ..] => {
            let dir = pathbuf_from_buf(directory);
            files.iter().map(|name| dir.join(pathbuf_from_buf(name))).collect()
        }
    }
}

/*
 * Holds COM initialized on the current thread for the lifetime of a folder
 * pick. `CoInitializeEx` returning `S_OK` or `S_FALSE` must be balanced by
 * `CoUninitialize`; `RPC_E_CHANGED_MODE` means the thread already runs COM in
 * another apartment and took no reference, so nothing is released.
 */
struct ComApartment {
    owns_reference: bool,
}

impl ComApartment {
    fn enter() -> DialogResult<Self> {
        let hr = unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) };
        if hr == RPC_E_CHANGED_MODE {
            log::debug!("{COMPONENT}: COM already initialized in another apartment mode.");
            return Ok(ComApartment {
                owns_reference: false,
            });
        }
        if hr.is_err() {
            log::error!("{COMPONENT}: CoInitializeEx failed: {:?}", hr);
            return Err(DialogError::Toolkit(format!("CoInitializeEx failed: {:?}", hr)));
        }
        if hr == S_FALSE {
            log::trace!("{COMPONENT}: COM was already initialized on this thread.");
        }
        Ok(ComApartment {
            owns_reference: true,
        })
    }
}

impl Drop for ComApartment {
    fn drop(&mut self) {
        if self.owns_reference {
            log::trace!("{COMPONENT}: Calling CoUninitialize.");
            unsafe { CoUninitialize() };
        }
    }
}

pub struct Win32Dialog {}

impl Win32Dialog {
    pub fn new() -> Self {
        Win32Dialog {}
    }

    /*
     * Shows `GetOpenFileNameW` with the given filter and flags. Returns the
     * raw file buffer on success and `None` when the user cancelled.
     * `CommDlgExtendedError` distinguishes cancellation (0) from failure.
     */
    fn show_open_file_dialog(
        title: &str,
        filter: &FilterExpression,
        initial_dir: Option<&Path>,
        specific_flags: OPEN_FILENAME_FLAGS,
    ) -> DialogResult<Option<Vec<u16>>> {
        let mut file_buffer: Vec<u16> = vec![0; FILE_BUFFER_LEN];

        let title_hstring = HSTRING::from(title);
        // The filter already carries its own double-NUL terminator.
        let filter_utf16: Vec<u16> = filter.native().encode_utf16().collect();
        let initial_dir_hstring = initial_dir.map(|p| HSTRING::from(p.as_os_str()));
        let initial_dir_pcwstr = initial_dir_hstring
            .as_ref()
            .map_or(PCWSTR::null(), |h_str| PCWSTR(h_str.as_ptr()));

        let mut ofn = OPENFILENAMEW {
            lStructSize: std::mem::size_of::<OPENFILENAMEW>() as u32,
            hwndOwner: HWND::default(),
            lpstrFile: PWSTR(file_buffer.as_mut_ptr()),
            nMaxFile: file_buffer.len() as u32,
            lpstrFilter: PCWSTR(filter_utf16.as_ptr()),
            nFilterIndex: 1,
            lpstrTitle: PCWSTR(title_hstring.as_ptr()),
            lpstrInitialDir: initial_dir_pcwstr,
            Flags: OFN_EXPLORER | specific_flags,
            ..Default::default()
        };

        let dialog_succeeded = unsafe { GetOpenFileNameW(&mut ofn) }.as_bool();
        if dialog_succeeded {
            return Ok(Some(file_buffer));
        }

        let error_code = unsafe { CommDlgExtendedError() };
        if error_code != COMMON_DLG_ERRORS(0) {
            log::error!(
                "{COMPONENT}: GetOpenFileNameW failed. CommDlgExtendedError: {:?}",
                error_code
            );
            return Err(DialogError::Toolkit(format!(
                "GetOpenFileNameW failed with CommDlgExtendedError {:?}",
                error_code
            )));
        }
        log::debug!("{COMPONENT}: Dialog cancelled by user (no error).");
        Ok(None)
    }

    fn show_folder_picker(title: &str, initial_dir: Option<&Path>) -> DialogResult<Option<PathBuf>> {
        // Declared first so it is dropped after every COM object below.
        let _com = ComApartment::enter()?;
        unsafe {

            let file_dialog: IFileOpenDialog =
                CoCreateInstance(&FileOpenDialog, None, CLSCTX_INPROC_SERVER).map_err(|e| {
                    log::error!("{COMPONENT}: CoCreateInstance for IFileOpenDialog failed: {:?}", e);
                    DialogError::Win32(e)
                })?;

            file_dialog.SetOptions(FOS_PICKFOLDERS)?;
            file_dialog.SetTitle(&HSTRING::from(title))?;

            if let Some(dir_path) = initial_dir {
                let dir_hstring = HSTRING::from(dir_path.as_os_str());
                match SHCreateItemFromParsingName::<_, _, IShellItem>(&dir_hstring, None) {
                    Ok(item) => {
                        if let Err(e) = file_dialog.SetDefaultFolder(&item) {
                            log::warn!("{COMPONENT}: SetDefaultFolder failed: {:?}", e);
                        }
                    }
                    Err(e) => {
                        log::warn!(
                            "{COMPONENT}: SHCreateItemFromParsingName for {:?} failed: {:?}",
                            dir_path,
                            e
                        );
                    }
                }
            }

            if file_dialog.Show(None).is_err() {
                log::debug!("{COMPONENT}: Folder picker was cancelled.");
                return Ok(None);
            }

            let shell_item = file_dialog.GetResult()?;
            let pwstr_path = shell_item.GetDisplayName(SIGDN_FILESYSPATH)?;
            let path_string = pwstr_path.to_string().unwrap_or_default();
            CoTaskMemFree(Some(pwstr_path.as_ptr() as *const c_void));
            if path_string.is_empty() {
                return Err(DialogError::MalformedOutput(
                    "folder picker returned an empty path".to_string(),
                ));
            }
            Ok(Some(PathBuf::from(path_string)))
        }
    }
}

impl Default for Win32Dialog {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeDialogOperations for Win32Dialog {
    fn platform(&self) -> Platform {
        Platform::Windows
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
        if is_directory {
            return Self::show_folder_picker(title, initial_directory);
        }
        let buffer = Self::show_open_file_dialog(
            title,
            filter,
            initial_directory,
            OFN_PATHMUSTEXIST | OFN_FILEMUSTEXIST | OFN_NOCHANGEDIR,
        )?;
        Ok(buffer.map(|b| pathbuf_from_buf(&b)))
    }

    fn choose_many(
        &self,
        title: &str,
        filter: &FilterExpression,
        initial_directory: Option<&Path>,
    ) -> DialogResult<Option<Vec<PathBuf>>> {
        log::debug!("{COMPONENT}: Showing multi chooser. Title: '{}'", title);
        let buffer = Self::show_open_file_dialog(
            title,
            filter,
            initial_directory,
            OFN_PATHMUSTEXIST | OFN_FILEMUSTEXIST | OFN_NOCHANGEDIR | OFN_ALLOWMULTISELECT,
        )?;
        Ok(buffer.map(|b| split_multiselect_buffer(&b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wide(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    #[test]
    fn test_pathbuf_from_buf_stops_at_nul() {
        let mut buf = wide("C:\\tmp\\a.png");
        buf.extend([0, 0x41, 0]);
        assert_eq!(pathbuf_from_buf(&buf), PathBuf::from("C:\\tmp\\a.png"));
    }

    #[test]
    fn test_split_single_pick_is_full_path() {
        let mut buf = wide("C:\\tmp\\a.png");
        buf.extend([0, 0, 0, 0]);
        assert_eq!(
            split_multiselect_buffer(&buf),
            vec![PathBuf::from("C:\\tmp\\a.png")]
        );
    }

    #[test]
    fn test_split_several_picks_join_directory() {
        let mut buf = wide("C:\\tmp\0b.png\0a.png\0\0");
        buf.extend([0; 8]);
        assert_eq!(
            split_multiselect_buffer(&buf),
            vec![PathBuf::from("C:\\tmp\\b.png"), PathBuf::from("C:\\tmp\\a.png")]
        );
    }

    #[test]
    fn test_com_apartment_is_balanced_when_nested() {
        let outer = ComApartment::enter().unwrap();
        assert!(outer.owns_reference);
        {
            // Second entry on the same thread gets S_FALSE and must still release.
            let inner = ComApartment::enter().unwrap();
            assert!(inner.owns_reference);
        }
        drop(outer);
        // Fully released: a fresh entry succeeds again.
        let again = ComApartment::enter().unwrap();
        assert!(again.owns_reference);
    }

    #[test]
    fn test_split_empty_buffer() {
        assert!(split_multiselect_buffer(&[0u16; 4]).is_empty());
    }
}
