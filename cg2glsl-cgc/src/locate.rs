//! Finding the cgc binary on disk.

use crate::CgcError;
use log::{debug, trace};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// System-wide installs of the Cg toolkit.
const INSTALL_PATHS: [&str; 3] = [
    "/usr/bin/cgc",
    "C:/Program Files/NVIDIA Corporation/Cg/bin/cgc.exe",
    "C:/Program Files (x86)/NVIDIA Corporation/Cg/bin/cgc.exe",
];

/// Binaries bundled in an o3d checkout, relative to `third_party/cg/files`.
const BUNDLED_PATHS: [&str; 4] = [
    "linux/bin/cgc",
    "linux/bin64/cgc",
    "mac/bin/cgc",
    "win/bin/cgc.exe",
];

const ROOT_SEARCH_DEPTH: usize = 5;

/// Returns the first ancestor of `start` (at most five levels up) holding both
/// an `o3d` and a `third_party` directory.
pub fn find_o3d_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .skip(1)
        .take(ROOT_SEARCH_DEPTH)
        .find(|dir| dir.join("o3d").is_dir() && dir.join("third_party").is_dir())
        .map(Path::to_path_buf)
}

/// Runs `exe -v`; cgc prints its version and exits with 0 or 1.
///
/// Used where the file name alone cannot tell whether the binary matches the
/// host platform.
pub fn responds_to_version(exe: &Path) -> bool {
    let status = Command::new(exe)
        .arg("-v")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    trace!("Probing {}: {status:?}", exe.display());
    matches!(status.map(|s| s.code()), Ok(Some(0 | 1)))
}

/// Best guess for the cgc binary.
///
/// Checks the standard install locations, then `cgc`/`cgc.exe` next to the
/// running executable, then the binaries bundled in an enclosing o3d checkout.
pub fn default_cgc() -> Option<PathBuf> {
    if let Some(path) = INSTALL_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
    {
        debug!("Found cgc at {}", path.display());
        return Some(path);
    }

    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));

    if let Some(dir) = &exe_dir {
        if let Some(path) = ["cgc", "cgc.exe"]
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
        {
            debug!("Found cgc next to the executable at {}", path.display());
            return Some(path);
        }
    }

    // Without an o3d root the bundled paths are tried relative to the working directory.
    let root = exe_dir
        .as_deref()
        .and_then(find_o3d_root)
        .unwrap_or_default();
    let cg_root = root.join("third_party").join("cg").join("files");
    let found = BUNDLED_PATHS
        .iter()
        .map(|rel| cg_root.join(rel))
        .find(|exe| responds_to_version(exe));
    if let Some(path) = &found {
        debug!("Found bundled cgc at {}", path.display());
    }
    found
}

/// Fails with the instructional not-found message unless `path` exists.
pub fn check_cgc(path: &Path) -> Result<(), CgcError> {
    if path.exists() {
        Ok(())
    } else {
        Err(CgcError::NotFound(path.to_path_buf()))
    }
}
