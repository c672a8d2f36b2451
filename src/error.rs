use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenamerError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Path is not absolute: {path}")]
    RelativePath { path: PathBuf },

    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("{field} contains a character not allowed in filenames: {ch}")]
    ReservedCharacter { field: &'static str, ch: char },

    #[error("Joiner must be exactly one character, got {count}")]
    JoinerLength { count: usize },

    #[error("Suffix length must be an integer, got '{input}'")]
    SuffixNotInteger { input: String },

    #[error("Suffix length {length} out of range (1-{max})")]
    SuffixOutOfRange { length: i64, max: usize },

    #[error("Input closed before a value was entered")]
    InputClosed,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Operation interrupted by user")]
    Interrupted,
}

impl RenamerError {
    /// Create a configuration error with a custom message
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether the prompt that produced this error should simply ask again
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RenamerError::DirectoryNotFound { .. }
                | RenamerError::RelativePath { .. }
                | RenamerError::NotADirectory { .. }
                | RenamerError::ReservedCharacter { .. }
                | RenamerError::JoinerLength { .. }
                | RenamerError::SuffixNotInteger { .. }
                | RenamerError::SuffixOutOfRange { .. }
        )
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            RenamerError::Interrupted => 130,
            RenamerError::Config { .. } => 2,
            _ => 1,
        }
    }

    /// Provide helpful suggestions for resolving the error
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            RenamerError::Config { .. } => vec![
                "Check the config file with --dump-config".to_string(),
                "Remove the config file to fall back to defaults".to_string(),
            ],
            RenamerError::InputClosed => {
                vec!["Run the tool from an interactive terminal".to_string()]
            }
            RenamerError::Io(e) if e.kind() == io::ErrorKind::PermissionDenied => vec![
                "Check directory permissions".to_string(),
                "Ensure the chosen directory is writable".to_string(),
            ],
            _ => vec![],
        }
    }
}

/// Why a single entry could not be backed up or renamed.
///
/// The loop keeps going after any of these; the kind is kept so the report
/// can say more than just the file name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackupFailure {
    #[error("source no longer exists")]
    NotFound,

    #[error("permission denied")]
    PermissionDenied,

    #[error("is a directory")]
    IsDirectory,

    #[error("no space left on device")]
    StorageFull,

    #[error("target name already exists: {name}")]
    TargetExists { name: String },

    #[error("interrupted")]
    Interrupted,

    #[error("{message}")]
    Other { message: String },
}

impl BackupFailure {
    /// Classify an I/O error raised while copying or renaming one entry
    pub fn from_io(error: &io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => BackupFailure::NotFound,
            io::ErrorKind::PermissionDenied => BackupFailure::PermissionDenied,
            io::ErrorKind::Interrupted => BackupFailure::Interrupted,
            _ if is_storage_full(error) => BackupFailure::StorageFull,
            _ => BackupFailure::Other {
                message: error.to_string(),
            },
        }
    }
}

impl From<io::Error> for BackupFailure {
    fn from(error: io::Error) -> Self {
        BackupFailure::from_io(&error)
    }
}

fn is_storage_full(error: &io::Error) -> bool {
    // ENOSPC on unix, ERROR_DISK_FULL on windows
    #[cfg(unix)]
    {
        error.raw_os_error() == Some(28)
    }
    #[cfg(windows)]
    {
        error.raw_os_error() == Some(112)
    }
    #[cfg(not(any(unix, windows)))]
    {
        let _ = error;
        false
    }
}
