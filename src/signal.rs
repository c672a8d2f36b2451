use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Interrupt state and in-flight temporary files for one run
#[derive(Clone, Default)]
pub struct RunContext {
    interrupt_flag: Arc<AtomicBool>,
    loop_active: Arc<AtomicBool>,
    active_copies: Arc<Mutex<HashSet<PathBuf>>>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a Ctrl-C handler for this context.
    ///
    /// While the backup loop runs the handler only sets the flag; the loop
    /// notices it between entries and the guards remove any partial copy.
    /// Outside the loop nothing has been written yet, so it exits at once.
    pub fn install_handler(&self) -> Result<(), ctrlc::Error> {
        let flag = self.interrupt_flag.clone();
        let loop_active = self.loop_active.clone();
        ctrlc::set_handler(move || {
            flag.store(true, Ordering::SeqCst);
            if !loop_active.load(Ordering::SeqCst) {
                eprintln!("\nInterrupted by user.");
                std::process::exit(130);
            }
        })
    }

    /// Mark whether the backup loop is running
    pub fn set_loop_active(&self, active: bool) {
        self.loop_active.store(active, Ordering::SeqCst);
    }

    pub fn is_loop_active(&self) -> bool {
        self.loop_active.load(Ordering::SeqCst)
    }

    /// Check if an interrupt has been requested
    pub fn is_interrupted(&self) -> bool {
        self.interrupt_flag.load(Ordering::SeqCst)
    }

    /// Set interrupt state (mainly for testing)
    pub fn set_interrupted(&self, interrupted: bool) {
        self.interrupt_flag.store(interrupted, Ordering::SeqCst);
    }

    /// Track a temporary copy until it is moved into place
    pub fn register_copy(&self, temp_path: PathBuf) -> CopyGuard {
        if let Ok(mut copies) = self.active_copies.lock() {
            copies.insert(temp_path.clone());
        }
        CopyGuard {
            temp_path,
            context: self.clone(),
            completed: false,
        }
    }

    /// Snapshot of temporary copies currently in flight
    pub fn active_copies(&self) -> Vec<PathBuf> {
        self.active_copies
            .lock()
            .map(|copies| copies.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Remove every tracked temporary file that still exists
    pub fn cleanup_active_copies(&self) {
        for temp_path in self.active_copies() {
            remove_temp(&temp_path);
        }
        if let Ok(mut copies) = self.active_copies.lock() {
            copies.clear();
        }
    }

    fn forget(&self, temp_path: &Path) {
        if let Ok(mut copies) = self.active_copies.lock() {
            copies.remove(temp_path);
        }
    }
}

fn remove_temp(temp_path: &Path) {
    if temp_path.exists() {
        match std::fs::remove_file(temp_path) {
            Ok(()) => log::info!("cleaned up incomplete backup {}", temp_path.display()),
            Err(e) => log::warn!(
                "could not clean up incomplete backup {}: {e}",
                temp_path.display()
            ),
        }
    }
}

/// RAII guard for one temporary backup file.
///
/// Dropping it without [`CopyGuard::complete`] deletes the temporary file, so
/// a failed or interrupted copy never leaves a partial file behind.
pub struct CopyGuard {
    temp_path: PathBuf,
    context: RunContext,
    completed: bool,
}

impl CopyGuard {
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Mark the copy as moved into place (prevents cleanup on drop)
    pub fn complete(mut self) {
        self.context.forget(&self.temp_path);
        self.completed = true;
    }
}

impl Drop for CopyGuard {
    fn drop(&mut self) {
        if !self.completed {
            remove_temp(&self.temp_path);
            self.context.forget(&self.temp_path);
        }
    }
}
