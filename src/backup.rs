use crate::error::{BackupFailure, RenamerError};
use crate::naming::RenameSettings;
use crate::signal::RunContext;
use crate::utils::{format_size, generate_random_string, WorkDir};
use crate::Result;
use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const TEMP_PREFIX: &str = ".frn_temp_";

/// Filesystem operations the loop performs on each entry
pub trait FileOps {
    /// Copy file contents, returning the number of bytes copied
    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64>;

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Free bytes on the filesystem holding `dir`
    fn available_space(&self, dir: &Path) -> io::Result<u64> {
        fs2::available_space(dir)
    }
}

/// [`FileOps`] backed by `std::fs`
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl FileOps for RealFs {
    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
        fs::copy(from, to)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }
}

/// Knobs for one pass of the loop
#[derive(Debug, Clone)]
pub struct LoopOptions {
    pub counter_start: u64,
    pub preserve_permissions: bool,
    /// Rename originals after backing them up. Off means names are only computed.
    pub apply: bool,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self {
            counter_start: 1,
            preserve_permissions: true,
            apply: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    BackedUp {
        original: OsString,
        new_name: String,
        renamed: bool,
    },
    Failed {
        original: OsString,
        failure: BackupFailure,
    },
}

impl FileOutcome {
    pub fn original(&self) -> &OsStr {
        match self {
            FileOutcome::BackedUp { original, .. } | FileOutcome::Failed { original, .. } => {
                original
            }
        }
    }

    /// Original name for printing, lossy when it is not valid UTF-8
    pub fn display_name(&self) -> Cow<'_, str> {
        self.original().to_string_lossy()
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, FileOutcome::Failed { .. })
    }
}

#[derive(Debug)]
pub struct RunResult {
    pub total_files: usize,
    pub outcomes: Vec<FileOutcome>,
    pub backup_dir: PathBuf,
    pub bytes_copied: u64,
    pub duration: Duration,
}

impl RunResult {
    pub fn new(total_files: usize, backup_dir: PathBuf) -> Self {
        Self {
            total_files,
            outcomes: Vec::with_capacity(total_files),
            backup_dir,
            bytes_copied: 0,
            duration: Duration::from_secs(0),
        }
    }

    /// Printable names of failed entries, in processing order
    pub fn failed_files(&self) -> Vec<Cow<'_, str>> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.is_failure())
            .map(FileOutcome::display_name)
            .collect()
    }

    /// Failed entries together with why they failed
    pub fn failures(&self) -> impl Iterator<Item = (&OsStr, &BackupFailure)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            FileOutcome::Failed { original, failure } => Some((original.as_os_str(), failure)),
            FileOutcome::BackedUp { .. } => None,
        })
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| !outcome.is_failure())
            .count()
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|outcome| !outcome.is_failure())
    }

    /// One-line statistics for verbose output
    pub fn statistics(&self) -> String {
        format!(
            "Backed up {} of {} entries ({}) to {} in {:.2}s",
            self.succeeded(),
            self.total_files,
            format_size(self.bytes_copied),
            self.backup_dir.display(),
            self.duration.as_secs_f64()
        )
    }
}

/// Back up every entry in listing order and compute its new name.
///
/// Per-entry failures are recorded and the loop moves on. The counter
/// advances once per entry whatever the outcome. Only an interrupt stops the
/// loop early. `on_entry` is called after each entry with the number of
/// entries handled so far.
#[allow(clippy::too_many_arguments)]
pub fn run_backup_loop<F, W>(
    workdir: &WorkDir,
    entries: &[OsString],
    backup_dir: &Path,
    settings: &RenameSettings,
    options: &LoopOptions,
    ops: &F,
    context: &RunContext,
    out: &mut W,
    mut on_entry: impl FnMut(usize, &str),
) -> Result<RunResult>
where
    F: FileOps,
    W: Write,
{
    let start_time = Instant::now();
    let mut result = RunResult::new(entries.len(), backup_dir.to_path_buf());

    for (index, name) in entries.iter().enumerate() {
        if context.is_interrupted() {
            context.cleanup_active_copies();
            return Err(RenamerError::Interrupted);
        }

        let display = name.to_string_lossy();
        writeln!(out, "Attempting to backup {display}")?;

        let outcome = match options.counter_start.checked_add(index as u64) {
            Some(counter) => process_entry(
                workdir,
                name,
                &display,
                counter,
                backup_dir,
                settings,
                options,
                ops,
                context,
                &mut result,
                out,
            )?,
            None => {
                writeln!(out, "Error with backup of {display} - file not renamed.")?;
                log::warn!("suffix counter overflowed at {display}");
                FileOutcome::Failed {
                    original: name.clone(),
                    failure: BackupFailure::Other {
                        message: "suffix counter overflowed".to_string(),
                    },
                }
            }
        };

        result.outcomes.push(outcome);
        on_entry(index + 1, &*display);
    }

    result.duration = start_time.elapsed();
    log::debug!("{}", result.statistics());
    Ok(result)
}

/// Back up one entry and, with `apply`, rename it to its computed name
#[allow(clippy::too_many_arguments)]
fn process_entry<F: FileOps, W: Write>(
    workdir: &WorkDir,
    name: &OsStr,
    display: &str,
    counter: u64,
    backup_dir: &Path,
    settings: &RenameSettings,
    options: &LoopOptions,
    ops: &F,
    context: &RunContext,
    result: &mut RunResult,
    out: &mut W,
) -> Result<FileOutcome> {
    let source = workdir.entry_path(name);
    let bytes = match backup_entry(&source, backup_dir, name, options, ops, context) {
        Ok(bytes) => bytes,
        Err(failure) => {
            writeln!(out, "Error with backup of {display} - file not renamed.")?;
            log::warn!("backup of {display} failed: {failure}");
            return Ok(FileOutcome::Failed {
                original: name.to_os_string(),
                failure,
            });
        }
    };

    result.bytes_copied += bytes;
    let new_name = settings.name_for(display, counter);
    writeln!(out, "Backup successful, new file name is {new_name}")?;

    if !options.apply {
        return Ok(FileOutcome::BackedUp {
            original: name.to_os_string(),
            new_name,
            renamed: false,
        });
    }

    match rename_entry(workdir, &source, &new_name, ops) {
        Ok(()) => {
            writeln!(out, "Renamed {display} to {new_name}")?;
            Ok(FileOutcome::BackedUp {
                original: name.to_os_string(),
                new_name,
                renamed: true,
            })
        }
        Err(failure) => {
            writeln!(out, "Error renaming {display} to {new_name}: {failure}")?;
            log::warn!("rename of {display} failed: {failure}");
            Ok(FileOutcome::Failed {
                original: name.to_os_string(),
                failure,
            })
        }
    }
}

/// Copy one entry into the backup directory under its own name.
///
/// The copy goes to a temporary name first and is renamed into place, so a
/// backup file under the original name is always complete.
fn backup_entry<F: FileOps>(
    source: &Path,
    backup_dir: &Path,
    name: &OsStr,
    options: &LoopOptions,
    ops: &F,
    context: &RunContext,
) -> std::result::Result<u64, BackupFailure> {
    let metadata = fs::metadata(source)?;
    if metadata.is_dir() {
        return Err(BackupFailure::IsDirectory);
    }

    let temp_path = create_temp_backup_path(backup_dir);
    let guard = context.register_copy(temp_path.clone());

    let bytes = ops.copy(source, &temp_path)?;

    if options.preserve_permissions {
        fs::set_permissions(&temp_path, metadata.permissions())?;
    }

    ops.rename(&temp_path, &backup_dir.join(name))?;
    guard.complete();

    log::debug!("backed up {} ({} bytes)", source.display(), bytes);
    Ok(bytes)
}

/// Rename an original entry to its computed name inside the working directory
fn rename_entry<F: FileOps>(
    workdir: &WorkDir,
    source: &Path,
    new_name: &str,
    ops: &F,
) -> std::result::Result<(), BackupFailure> {
    let target = workdir.entry_path(new_name);
    if target.exists() {
        return Err(BackupFailure::TargetExists {
            name: new_name.to_string(),
        });
    }
    ops.rename(source, &target)?;
    Ok(())
}

/// Prefix of the temporary files this process creates
fn temp_prefix() -> String {
    format!("{TEMP_PREFIX}{}_", std::process::id())
}

/// Temporary path inside the backup directory for an in-flight copy.
///
/// The name does not embed the entry name, so it stays short even when the
/// entry name is close to the filesystem limit.
fn create_temp_backup_path(backup_dir: &Path) -> PathBuf {
    backup_dir.join(format!("{}{}", temp_prefix(), generate_random_string(12)))
}

/// Remove temporary files this process left behind in a backup directory.
///
/// Temporaries of other processes sharing the folder are left alone.
pub fn cleanup_temp_files(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }

    let prefix = temp_prefix();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if let Some(filename) = path.file_name().and_then(|name| name.to_str()) {
            if filename.starts_with(&prefix) {
                let _ = fs::remove_file(&path);
            }
        }
    }

    Ok(())
}
