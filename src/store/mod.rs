//! Storage layer (local JSON/CSV files).
//!
//! Every durable file is replaced wholesale: content goes to a sibling
//! temp file which is then renamed over the target.

pub mod cache;
pub mod tokens;

pub use cache::RawCache;
pub use tokens::TokenStore;

use crate::error::StoreError;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Write `contents` to `path` via temp file + rename, creating parent dirs.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    replace_file(path, contents, false)
}

/// Like [`write_atomic`], but on Unix the file is owner-only before it
/// is renamed into place.
pub fn write_private(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    replace_file(path, contents, true)
}

fn replace_file(path: &Path, contents: &[u8], private: bool) -> Result<(), StoreError> {
    let io_err = |e: std::io::Error| StoreError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        if private {
            options.mode(0o600);
        }
    }
    let mut file = options.open(&temp_path).map_err(io_err)?;

    // The creation mode does not apply to a temp file left by a crashed run
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if private {
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(io_err)?;
        }
    }
    #[cfg(not(unix))]
    let _ = private;

    file.write_all(contents).map_err(io_err)?;
    drop(file);

    fs::rename(&temp_path, path).map_err(io_err)?;
    Ok(())
}
