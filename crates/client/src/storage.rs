//! Local file collaborators: reading the input, persisting received payloads
//! and anchoring relative output paths.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::error::ClientError;

pub async fn read_input(path: &Path) -> Result<Vec<u8>, ClientError> {
    tokio::fs::read(path).await.map_err(|source| ClientError::LocalRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Permissions for a newly created public key file, before the umask.
pub const PUBLIC_KEY_MODE: u32 = 0o666;

/// Permissions for a newly created signature file, before the umask.
pub const SIGNATURE_MODE: u32 = 0o644;

/// Creates or truncates `path` and writes `payload` to it.
///
/// `mode` only applies when the file doesn't exist yet.
pub async fn write_output(path: &Path, payload: &[u8], mode: u32) -> Result<(), ClientError> {
    let local_write = |source: io::Error| ClientError::LocalWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(mode)
        .open(path)
        .await
        .map_err(local_write)?;
    file.write_all(payload).await.map_err(local_write)?;
    file.flush().await.map_err(local_write)?;

    debug!(path = %path.display(), bytes = payload.len(), "payload saved");
    Ok(())
}

/// Resolves `path` against the directory of the running executable.
///
/// Absolute paths are returned as is. If the executable can't be located or
/// the parent directory can't be created, the path is returned unchanged.
pub fn normalize_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        return path.to_path_buf();
    }

    let base = match env::current_exe() {
        Ok(exe) => match exe.parent() {
            Some(dir) => dir.to_path_buf(),
            None => return path.to_path_buf(),
        },
        Err(e) => {
            warn!(error = %e, "can't locate executable, keeping {}", path.display());
            return path.to_path_buf();
        }
    };

    anchor(&base, path)
}

fn anchor(base: &Path, path: &Path) -> PathBuf {
    let normal = base.join(path);
    if let Some(parent) = normal.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!(error = %e, "can't create {}, keeping {}", parent.display(), path.display());
            return path.to_path_buf();
        }
    }
    normal
}
