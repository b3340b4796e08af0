use std::fmt::Write as _;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{fs, io};

use super::{MediumError, StorageMedium};

/// A medium storing one file per key under a root directory.
///
/// Keys become file names through a conservative percent escape, so
/// namespaced keys like `"settings/user1"` and keys containing arbitrary
/// bytes stay filesystem-safe on every platform. The root directory is
/// created lazily on first write.
#[derive(Clone, Debug)]
pub struct FileMedium {
    root: PathBuf,
}

impl FileMedium {
    /// Create a medium rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create a medium under the per-user local data directory,
    /// namespaced by `app`.
    ///
    /// Fails with [`MediumError::NoDataDir`] on platforms where no such
    /// directory can be resolved.
    pub fn in_local_data(app: &str) -> Result<Self, MediumError> {
        let base = dirs::data_local_dir().ok_or(MediumError::NoDataDir)?;
        Ok(Self::new(base.join(app)))
    }

    /// The directory this medium stores its entries in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(escape_key(key))
    }

    fn io_error(key: &str, source: io::Error) -> MediumError {
        MediumError::Io {
            key: key.to_string(),
            source,
        }
    }
}

impl StorageMedium for FileMedium {
    fn get_item(&self, key: &str) -> Result<Option<String>, MediumError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), MediumError> {
        fs::create_dir_all(&self.root).map_err(|e| Self::io_error(key, e))?;
        fs::write(self.path_for(key), value).map_err(|e| Self::io_error(key, e))
    }

    fn remove_item(&self, key: &str) -> Result<(), MediumError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }
}

/// Escape a key into a flat, portable file name.
///
/// ASCII alphanumerics and `. _ -` pass through; every other byte becomes
/// `%XX`. The mapping is injective, so distinct keys never collide.
fn escape_key(key: &str) -> String {
    let mut escaped = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'.' | b'_' | b'-' => {
                escaped.push(byte as char)
            }
            _ => {
                let _ = write!(escaped, "%{byte:02X}");
            }
        }
    }
    escaped
}
