/*
 * Locates the per-user configuration directory used by the configuration
 * layer.
 */
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

/*
 * Retrieves the application's local configuration directory, creating it if
 * necessary. The path is derived without an organization qualifier, placing
 * it directly under the user's local configuration root (e.g. `~/.config` on
 * Linux, AppData/Local on Windows).
 *
 * Returns `None` if no home directory could be determined or the directory
 * could not be created.
 */
pub fn get_base_app_config_local_dir(app_name: &str) -> Option<PathBuf> {
    log::trace!(
        "PathUtils: Attempting to get base app config local dir for '{}'",
        app_name
    );
    ProjectDirs::from("", "", app_name).and_then(|proj_dirs| {
        let config_path = proj_dirs.config_local_dir();
        if !config_path.exists() {
            if let Err(e) = fs::create_dir_all(config_path) {
                log::error!(
                    "PathUtils: Failed to create base app config directory {:?}: {}",
                    config_path,
                    e
                );
                return None;
            }
            log::debug!(
                "PathUtils: Created base app config directory: {:?}",
                config_path
            );
        }
        Some(config_path.to_path_buf())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_base_app_config_local_dir_creates_if_not_exists() {
        // Using a highly unique app name to avoid collision with actual user configs.
        let unique_app_name = format!("TestApp_PathUtils_Create_{}", rand::random::<u128>());
        if let Some(proj_dirs) = ProjectDirs::from("", "", &unique_app_name) {
            let path_to_check = proj_dirs.config_local_dir();
            if path_to_check.exists() {
                fs::remove_dir_all(path_to_check).expect("Pre-test cleanup failed");
            }
        }

        let path_opt = get_base_app_config_local_dir(&unique_app_name);

        let Some(path) = path_opt else {
            // No home directory in this environment; nothing to verify.
            return;
        };
        assert!(path.exists(), "Directory should have been created at {path:?}");
        assert!(path.is_dir());

        let second = get_base_app_config_local_dir(&unique_app_name);
        assert_eq!(second.as_ref(), Some(&path));

        if let Err(e) = fs::remove_dir_all(&path) {
            eprintln!(
                "Test cleanup error for get_base_app_config_local_dir (dir: {}): {}",
                path.display(),
                e
            );
        }
    }
}
