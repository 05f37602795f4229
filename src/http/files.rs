use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Content type sent for every served file.
pub const CONTENT_TYPE: &str = "text/plain";

/// What the server knows about the file a request path points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Document root and URL path joined with a `/`, not normalized
    pub path: PathBuf,
    /// Size in bytes, 0 when not servable
    pub size: u64,
    /// True only for an existing regular file. Directories and symbolic
    /// links are never servable.
    pub servable: bool,
}

/// Joins `docroot` and `urlpath` literally with a single `/` in between.
///
/// `..` segments and repeated separators are left alone.
pub fn build_path(docroot: &Path, urlpath: &str) -> PathBuf {
    let mut joined = OsString::from(docroot.as_os_str());
    joined.push("/");
    joined.push(urlpath);
    PathBuf::from(joined)
}

/// Resolves a request path against the document root.
///
/// The status check does not follow a trailing symbolic link. A path that
/// does not exist or is not a regular file comes back with `servable` unset
/// rather than as an error.
pub async fn resolve(docroot: &Path, urlpath: &str) -> FileInfo {
    let path = build_path(docroot, urlpath);

    match tokio::fs::symlink_metadata(&path).await {
        Ok(meta) if meta.file_type().is_file() => FileInfo {
            path,
            size: meta.len(),
            servable: true,
        },
        Ok(meta) => {
            tracing::debug!(path = %path.display(), file_type = ?meta.file_type(), "Not a regular file");
            FileInfo {
                path,
                size: 0,
                servable: false,
            }
        }
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "File lookup failed");
            FileInfo {
                path,
                size: 0,
                servable: false,
            }
        }
    }
}
