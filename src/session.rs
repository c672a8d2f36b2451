use crate::backup::{cleanup_temp_files, run_backup_loop, FileOps, LoopOptions, RunResult};
use crate::config::Config;
use crate::error::RenamerError;
use crate::naming::RenameSettings;
use crate::prompt::Prompter;
use crate::report::write_summary;
use crate::signal::RunContext;
use crate::utils::{format_size, total_file_size, WorkDir};
use crate::Result;
use std::ffi::OsString;
use std::io::{self, BufRead, Write};

const INTRO: &str = "This is the FileRenamer tool. This tool will rename all the files in your chosen directory \
with a prefix of your choice, and a numerically ascending suffix of your chosen length, separated by a \
character of your choice.";

/// How an interactive run ended
#[derive(Debug)]
pub enum SessionOutcome {
    /// The loop ran over every entry
    Completed(RunResult),
    /// The user answered "n" at a confirmation prompt
    Declined,
    /// The chosen directory had no entries
    Empty,
}

/// One interactive run: collect input, confirm, back up, report.
pub struct Session<'a, F> {
    config: &'a Config,
    ops: F,
    context: RunContext,
    apply: bool,
    force_progress: bool,
}

impl<'a, F: FileOps> Session<'a, F> {
    pub fn new(config: &'a Config, ops: F) -> Self {
        Self {
            config,
            ops,
            context: RunContext::new(),
            apply: false,
            force_progress: false,
        }
    }

    /// Rename originals after backing them up
    pub fn apply(mut self, apply: bool) -> Self {
        self.apply = apply;
        self
    }

    pub fn context(mut self, context: RunContext) -> Self {
        self.context = context;
        self
    }

    /// Show the progress bar even below the entry threshold
    pub fn force_progress(mut self, force: bool) -> Self {
        self.force_progress = force;
        self
    }

    pub fn run<R: BufRead, W: Write>(
        &self,
        prompter: &mut Prompter<R, W>,
    ) -> Result<SessionOutcome> {
        writeln!(prompter.output(), "{INTRO}")?;
        writeln!(prompter.output())?;

        let workdir = prompter.ask_directory()?;
        log::info!("working in {}", workdir.root().display());

        let settings = self.collect_settings(prompter)?;

        let entries = workdir.list_entries()?;
        if entries.is_empty() {
            writeln!(prompter.output(), "The directory is empty. Nothing to rename.")?;
            return Ok(SessionOutcome::Empty);
        }

        if !self.confirm(prompter, &entries)? {
            log::info!("run declined by user");
            return Ok(SessionOutcome::Declined);
        }

        let backup_dir = workdir.ensure_backup_dir(&self.config.backup_dir_name)?;
        if self.config.check_space {
            self.warn_if_short_on_space(prompter, &workdir, &entries)?;
        }

        let options = LoopOptions {
            counter_start: self.config.counter_start,
            preserve_permissions: self.config.preserve_permissions,
            apply: self.apply,
        };

        #[cfg(feature = "progress")]
        let mut progress = {
            let mut progress_config =
                crate::progress::ProgressConfig::auto_detect(self.config.confirm_threshold);
            progress_config.force_enabled = self.force_progress;
            crate::progress::create_progress(&progress_config, entries.len())
        };
        #[cfg(feature = "progress")]
        let on_entry = |done: usize, name: &str| {
            if let Some(progress) = progress.as_mut() {
                progress.update(done, name);
            }
        };
        #[cfg(not(feature = "progress"))]
        let on_entry = {
            let _ = self.force_progress;
            |_: usize, _: &str| {}
        };

        self.context.set_loop_active(true);
        let result = run_backup_loop(
            &workdir,
            &entries,
            &backup_dir,
            &settings,
            &options,
            &self.ops,
            &self.context,
            prompter.output(),
            on_entry,
        );
        self.context.set_loop_active(false);

        #[cfg(feature = "progress")]
        if let Some(progress) = progress.as_mut() {
            progress.finish();
        }

        let result = match result {
            Ok(result) => result,
            Err(RenamerError::Interrupted) => {
                cleanup_temp_files(&backup_dir)?;
                return Err(RenamerError::Interrupted);
            }
            Err(e) => return Err(e),
        };

        writeln!(prompter.output())?;
        write_summary(&result, prompter.output())?;
        Ok(SessionOutcome::Completed(result))
    }

    fn collect_settings<R: BufRead, W: Write>(
        &self,
        prompter: &mut Prompter<R, W>,
    ) -> Result<RenameSettings> {
        writeln!(
            prompter.output(),
            "The filename prefix can be any string you choose, but cannot contain any characters \
             not allowed in a filename.  Choose carefully."
        )?;
        let prefix = prompter.ask_prefix()?;
        let joiner = prompter.ask_joiner()?;
        writeln!(prompter.output(), "File name prefix is {prefix}.")?;
        writeln!(prompter.output(), "Joining character is {joiner}.")?;

        writeln!(
            prompter.output(),
            "The filename will have an integer suffix appended.  The suffix will be padded to \
             the left with zeros to match the requested length."
        )?;
        let suffix_length = prompter.ask_suffix_length()?;
        writeln!(prompter.output(), "Suffix length is {suffix_length}.")?;

        Ok(RenameSettings {
            prefix,
            joiner,
            suffix_length,
        })
    }

    /// Show a sorted sample and ask to continue, twice for large directories
    fn confirm<R: BufRead, W: Write>(
        &self,
        prompter: &mut Prompter<R, W>,
        entries: &[OsString],
    ) -> Result<bool> {
        let mut sorted: Vec<&OsString> = entries.iter().collect();
        sorted.sort();
        let shown = sorted.len().min(self.config.preview_count);
        for name in &sorted[..shown] {
            writeln!(prompter.output(), "{}", name.to_string_lossy())?;
        }

        let question = format!(
            "These are the first {shown} files in the folder.  Please confirm you want to continue (y/n):"
        );
        if !prompter.confirm(&question)? {
            return Ok(false);
        }

        if entries.len() > self.config.confirm_threshold {
            let question = format!(
                "There are many files in this directory (> {}).  Please confirm you want to continue (y/n):",
                self.config.confirm_threshold
            );
            if !prompter.confirm(&question)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn warn_if_short_on_space<R: BufRead, W: Write>(
        &self,
        prompter: &mut Prompter<R, W>,
        workdir: &WorkDir,
        entries: &[OsString],
    ) -> Result<()> {
        let needed = total_file_size(workdir, entries);
        match self.ops.available_space(workdir.root()) {
            Ok(available) => write_space_warning(prompter.output(), needed, available)?,
            Err(e) => log::warn!("could not determine available disk space: {e}"),
        }
        Ok(())
    }
}

/// Warn when `available` bytes cannot hold `needed` bytes of backups
fn write_space_warning<W: Write>(out: &mut W, needed: u64, available: u64) -> io::Result<()> {
    if available < needed {
        writeln!(
            out,
            "Warning: backups need {} but only {} is free. Some backups may fail.",
            format_size(needed),
            format_size(available)
        )?;
    }
    Ok(())
}
