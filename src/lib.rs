pub mod backup;
pub mod config;
pub mod error;
pub mod naming;
#[cfg(feature = "progress")]
pub mod progress;
pub mod prompt;
pub mod report;
pub mod session;
pub mod signal;
pub mod utils;

pub use backup::{run_backup_loop, FileOps, FileOutcome, LoopOptions, RealFs, RunResult};
pub use config::{default_config, dump_config, load_config, Config};
pub use error::{BackupFailure, RenamerError};
pub use naming::{compute_name, RenameSettings};
pub use prompt::Prompter;
pub use session::{Session, SessionOutcome};
pub use signal::RunContext;
pub use utils::{validate_directory, WorkDir};

/// Main library result type
pub type Result<T> = std::result::Result<T, RenamerError>;
