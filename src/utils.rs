use crate::error::RenamerError;
use crate::Result;
use rand::distr::Alphanumeric;
use rand::{rng, Rng};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

/// The directory a run operates on.
///
/// Every path the run touches is resolved against this value instead of the
/// process working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkDir {
    root: PathBuf,
}

impl WorkDir {
    /// Validate `path` and wrap it. See [`validate_directory`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        validate_directory(path)?;
        Ok(Self {
            root: path.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of an entry inside this directory
    pub fn entry_path(&self, name: impl AsRef<OsStr>) -> PathBuf {
        self.root.join(name.as_ref())
    }

    /// Path of the backup subdirectory
    pub fn backup_dir(&self, backup_dir_name: &str) -> PathBuf {
        self.root.join(backup_dir_name)
    }

    /// Create the backup subdirectory if it does not exist yet
    pub fn ensure_backup_dir(&self, backup_dir_name: &str) -> Result<PathBuf> {
        let backup_dir = self.backup_dir(backup_dir_name);
        fs::create_dir_all(&backup_dir)?;
        Ok(backup_dir)
    }

    /// Names of every entry in the directory, in the order the OS returns them.
    ///
    /// Files and subdirectories are not told apart. Names are kept as the OS
    /// returned them; convert lossily only for display.
    pub fn list_entries(&self) -> Result<Vec<OsString>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            names.push(entry?.file_name());
        }
        Ok(names)
    }
}

/// Check that a user-entered path exists, is absolute and is a directory.
///
/// Existence is checked before absoluteness, so a relative path that happens
/// to resolve from the current directory is reported as relative.
pub fn validate_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(RenamerError::DirectoryNotFound {
            path: path.to_path_buf(),
        });
    }

    if !path.is_absolute() {
        return Err(RenamerError::RelativePath {
            path: path.to_path_buf(),
        });
    }

    match fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(RenamerError::NotADirectory {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(RenamerError::Io(e)),
    }
}

/// Sum of the sizes of the regular files among `names`
pub fn total_file_size(workdir: &WorkDir, names: &[OsString]) -> u64 {
    names
        .iter()
        .filter_map(|name| fs::metadata(workdir.entry_path(name)).ok())
        .filter(|metadata| metadata.is_file())
        .map(|metadata| metadata.len())
        .sum()
}

/// Random alphanumeric string for temporary file names
pub fn generate_random_string(length: usize) -> String {
    rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Format byte size in human-readable format
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: u64 = 1024;

    if bytes < THRESHOLD {
        return format!("{bytes} B");
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD as f64 && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD as f64;
        unit_index += 1;
    }

    let unit = UNITS[unit_index];
    format!("{size:.1} {unit}")
}
